//! CLI library modules for the clinanno binaries.
//!
//! Argument parsing and command bodies live here so they can be tested
//! without spawning a process.

pub mod commands;
pub mod output;
pub mod parser;

pub use parser::{AnnotateCli, CodesCli, CommonArgs};

use crate::{Result, RunReport};
use std::process::ExitCode;

/// Exit status for a startup-fatal error.
pub const EXIT_FATAL: u8 = 1;

/// Map a command result to a process exit code.
///
/// Per-document failures are already in the report and do not change the
/// status; any error that reaches here aborted the run.
pub fn finish(result: Result<RunReport>) -> ExitCode {
    match result {
        Ok(report) => {
            log::info!("{}", output::summary(&report));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
