//! Codes command: graph files in, code files out

use super::base_config;
use crate::cli::output::write_report;
use crate::cli::parser::CodesCli;
use crate::serialize::XMI_EXTENSION;
use crate::{discover_documents, PipelineConfig, PipelineRunner, Result, RunReport};
use std::path::Path;

/// Effective configuration for a codes run.
pub fn resolve_config(args: &CodesCli) -> Result<PipelineConfig> {
    let mut config = base_config(&args.common)?;
    if let Some(dir) = &args.xmi_dir {
        config.input.dir = Some(dir.clone());
    }
    if let Some(dir) = &args.output_dir {
        config.output.code_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Extract codes from every `.xmi` file and write the optional report.
pub fn run(args: &CodesCli) -> Result<RunReport> {
    let config = resolve_config(args)?;
    let runner = PipelineRunner::for_codes(&config)?;
    let input = config.input.dir.as_deref().unwrap_or(Path::new("."));
    let graphs: Vec<_> = discover_documents(input)?
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == XMI_EXTENSION))
        .collect();
    log::info!("Extracting codes from {} graph files in {}", graphs.len(), input.display());

    let report = runner.extract_codes(&graphs);
    if let Some(path) = &args.common.report {
        write_report(&report, path)?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_missing_output_dir_from_config_is_fatal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = tmp.path().join("c.toml");
        std::fs::write(&config, format!("[input]\ndir = {:?}\n", tmp.path())).unwrap();
        let args =
            CodesCli::parse_from(["clinanno-codes", "--config", config.to_str().unwrap()]);
        let err = run(&args).unwrap_err();
        assert!(err.is_startup_fatal());
    }

    #[test]
    fn test_only_xmi_files_processed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let xmi = tmp.path().join("xmi");
        let codes = tmp.path().join("codes");
        std::fs::create_dir_all(&xmi).unwrap();
        std::fs::create_dir_all(&codes).unwrap();
        let graph = crate::AnnotationGraph::new("plain text");
        std::fs::write(xmi.join("a.txt.xmi"), crate::write_xmi(&graph).unwrap()).unwrap();
        std::fs::write(xmi.join("notes.md"), "not a graph").unwrap();

        let args = CodesCli::parse_from([
            "clinanno-codes",
            "--xmi-dir",
            xmi.to_str().unwrap(),
            "--output-dir",
            codes.to_str().unwrap(),
        ]);
        let report = run(&args).unwrap();
        assert_eq!(report.processed.len(), 1);
        assert!(report.is_clean());
        assert_eq!(std::fs::read_to_string(codes.join("a.txt")).unwrap(), "");
    }
}
