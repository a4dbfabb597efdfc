//! Annotate command: raw notes in, graph files (and code files) out

use super::base_config;
use crate::cli::output::write_report;
use crate::cli::parser::AnnotateCli;
use crate::{discover_documents, PipelineConfig, PipelineRunner, Result, RunReport};

/// Effective configuration for an annotate run.
pub fn resolve_config(args: &AnnotateCli) -> Result<PipelineConfig> {
    let mut config = base_config(&args.common)?;
    if let Some(dir) = &args.input_dir {
        config.input.dir = Some(dir.clone());
    }
    if let Some(dir) = &args.output_dir {
        config.output.xmi_dir = Some(dir.clone());
    }
    if let Some(path) = &args.dictionary {
        config.dictionary.path = Some(path.clone());
    }
    if let Some(dir) = &args.code_dir {
        config.output.code_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Load models, annotate every document and write the optional report.
pub fn run(args: &AnnotateCli) -> Result<RunReport> {
    let config = resolve_config(args)?;
    let runner = PipelineRunner::for_annotate(&config)?;
    let input = config.input.dir.as_deref().unwrap_or(std::path::Path::new("."));
    let documents = discover_documents(input)?;
    log::info!("Annotating {} documents from {}", documents.len(), input.display());

    let report = runner.annotate(&documents);
    if let Some(path) = &args.common.report {
        write_report(&report, path)?;
    }
    Ok(report)
}
