//! Output and logging utilities for CLI commands

use crate::{Error, Result, RunReport};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over the default
/// level (`info`, or `warn` when quiet).
pub fn init_logging(quiet: bool) {
    let level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Write a run report as pretty JSON.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| Error::invalid_input(format!("cannot encode report: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to write report {}: {}", path.display(), e),
        ))
    })
}

/// One-line summary printed when a run finishes.
#[must_use]
pub fn summary(report: &RunReport) -> String {
    if report.is_clean() {
        format!("{} documents processed", report.processed.len())
    } else {
        format!(
            "{} documents processed, {} failed",
            report.processed.len(),
            report.failures.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::DocumentFailure;
    use std::path::PathBuf;

    #[test]
    fn test_report_written_as_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("report.json");
        let report = RunReport {
            processed: vec![PathBuf::from("a.txt")],
            failures: vec![DocumentFailure {
                path: PathBuf::from("b.txt"),
                message: "IO error: bad".into(),
            }],
        };
        write_report(&report, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["processed"][0], "a.txt");
        assert_eq!(value["failures"][0]["path"], "b.txt");
        assert_eq!(summary(&report), "1 documents processed, 1 failed");
    }
}
