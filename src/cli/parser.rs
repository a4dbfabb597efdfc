//! CLI argument parsing and structure definitions

use clap::Parser;
use std::path::PathBuf;

/// Run the clinical annotation pipeline over a directory of notes
#[derive(Parser, Debug)]
#[command(name = "clinanno-annotate")]
#[command(
    version,
    about = "Run the clinical annotation pipeline over a directory of notes",
    long_about = r#"
clinanno-annotate - staged clinical text annotation

Reads every regular, non-hidden file in the input directory, runs the
annotation chain over it and writes one <name>.xmi graph file per note.
With --code-dir, a code file per note is written as well.

EXAMPLES:
  clinanno-annotate --input-dir notes/ --output-dir out/xmi --dictionary umls.bsv
  clinanno-annotate --config clinanno.toml --workers 4 --report run.json
"#
)]
pub struct AnnotateCli {
    /// Directory of raw text notes
    #[arg(long, value_name = "DIR", required_unless_present = "config")]
    pub input_dir: Option<PathBuf>,

    /// Directory for .xmi graph files (created if absent)
    #[arg(long, value_name = "DIR", required_unless_present = "config")]
    pub output_dir: Option<PathBuf>,

    /// Term dictionary (CUI|TUI|term[|SCHEME=code;...])
    #[arg(long, value_name = "FILE", required_unless_present = "config")]
    pub dictionary: Option<PathBuf>,

    /// Also write code files into this existing directory
    #[arg(long, value_name = "DIR")]
    pub code_dir: Option<PathBuf>,

    /// Config, worker, report and logging flags
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Turn XMI graph files into ontology code files
#[derive(Parser, Debug)]
#[command(name = "clinanno-codes")]
#[command(
    version,
    about = "Turn XMI graph files into ontology code files",
    long_about = r#"
clinanno-codes - concept code extraction

Reads every file ending in .xmi in the input directory and writes one
code file per graph: space-separated [-]code|text|SemanticType tokens.
Files with any other extension are skipped.

EXAMPLES:
  clinanno-codes --xmi-dir out/xmi --output-dir out/codes
"#
)]
pub struct CodesCli {
    /// Directory of graph files; only names ending in .xmi are read
    #[arg(long, value_name = "DIR", required_unless_present = "config")]
    pub xmi_dir: Option<PathBuf>,

    /// Existing directory for code files
    #[arg(long, value_name = "DIR", required_unless_present = "config")]
    pub output_dir: Option<PathBuf>,

    /// Config, worker, report and logging flags
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Flags shared by both entry points.
#[derive(clap::Args, Debug, Default)]
pub struct CommonArgs {
    /// TOML config file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of document workers
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
