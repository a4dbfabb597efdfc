//! clinanno-annotate - run the clinical annotation pipeline
//!
//! ```bash
//! clinanno-annotate --input-dir notes/ --output-dir out/xmi --dictionary umls.bsv
//! ```

use clap::Parser;
use clinanno::cli::{commands, finish, output, AnnotateCli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = AnnotateCli::parse();
    output::init_logging(args.common.quiet);
    finish(commands::annotate::run(&args))
}
