//! Command implementations for the clinanno binaries
//!
//! Each entry point has its own module.

pub mod annotate;
pub mod codes;

use super::parser::CommonArgs;
use crate::{PipelineConfig, Result};

/// Config file (or defaults) with the shared flags applied on top.
pub(crate) fn base_config(common: &CommonArgs) -> Result<PipelineConfig> {
    let mut config = match &common.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(workers) = common.workers {
        config.runner.workers = workers;
    }
    Ok(config)
}
