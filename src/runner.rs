//! Batch driver.
//!
//! ```text
//! paths ──split──► worker 0: load ─► pipeline ─► serialize
//!                  worker 1: load ─► pipeline ─► serialize
//!                  ...
//!        ◄─merge── RunReport { processed, failures }
//! ```
//!
//! Models are shared read-only; every graph is owned by the worker that
//! built it. A failing document is logged and recorded, and the batch
//! moves on.

use crate::config::PipelineConfig;
use crate::document::{base_name, DocumentLoader};
use crate::models::ModelSet;
use crate::pipeline::Pipeline;
use crate::serialize::DocumentSerializer;
use crate::xmi::read_xmi;
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    /// Input path
    pub path: PathBuf,
    /// Error message
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Documents whose outputs were all written, in input order
    pub processed: Vec<PathBuf>,
    /// Documents that failed, in input order
    pub failures: Vec<DocumentFailure>,
}

impl RunReport {
    /// Number of documents seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.processed.len() + self.failures.len()
    }

    /// True when no document failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, path: &Path, outcome: Result<()>) {
        match outcome {
            Ok(()) => self.processed.push(path.to_path_buf()),
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                self.failures.push(DocumentFailure {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }

    fn merge(&mut self, other: RunReport) {
        self.processed.extend(other.processed);
        self.failures.extend(other.failures);
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Annotate,
    Codes,
}

/// Runs documents through a pipeline and serializer.
#[derive(Debug)]
pub struct PipelineRunner {
    pipeline: Pipeline,
    loader: DocumentLoader,
    serializer: DocumentSerializer,
    workers: usize,
}

impl PipelineRunner {
    /// Runner over an explicit pipeline and serializer.
    #[must_use]
    pub fn new(pipeline: Pipeline, serializer: DocumentSerializer) -> Self {
        Self {
            pipeline,
            loader: DocumentLoader::new(),
            serializer,
            workers: 1,
        }
    }

    /// Number of worker threads (at least 1).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Load models and set up outputs for the annotation entry point.
    ///
    /// Fails before any document is touched if configuration or a model
    /// resource is missing.
    pub fn for_annotate(config: &PipelineConfig) -> Result<Self> {
        config.validate_for_annotate()?;
        let models = ModelSet::load(config)?;
        let pipeline = Pipeline::standard(&models);
        log::debug!("pipeline: {:?}", pipeline.stage_names());

        let mut serializer = DocumentSerializer::new();
        if let Some(dir) = &config.output.xmi_dir {
            serializer = serializer.with_xmi_dir(dir);
        }
        if let Some(dir) = &config.output.code_dir {
            serializer = serializer.with_code_dir(dir);
        }
        Ok(Self::new(pipeline, serializer).with_workers(config.runner.workers))
    }

    /// Set up the code-extraction entry point (no models needed).
    pub fn for_codes(config: &PipelineConfig) -> Result<Self> {
        config.validate_for_codes()?;
        let code_dir = config
            .output
            .code_dir
            .as_ref()
            .ok_or_else(|| Error::config("missing required setting 'output.code_dir'"))?;
        let serializer = DocumentSerializer::new().with_code_dir(code_dir);
        Ok(Self::new(Pipeline::builder().build(), serializer).with_workers(config.runner.workers))
    }

    /// Annotate raw text documents.
    pub fn annotate(&self, paths: &[PathBuf]) -> RunReport {
        self.run(paths, Mode::Annotate)
    }

    /// Turn XMI graph files into code files.
    ///
    /// Code files are named after the graph file with its `.xmi` suffix
    /// removed.
    pub fn extract_codes(&self, paths: &[PathBuf]) -> RunReport {
        self.run(paths, Mode::Codes)
    }

    fn run(&self, paths: &[PathBuf], mode: Mode) -> RunReport {
        let report = if self.workers <= 1 || paths.len() <= 1 {
            self.run_sequential(paths, mode)
        } else {
            self.run_parallel(paths, mode)
        };
        log::info!(
            "Processed {} of {} documents ({} failed)",
            report.processed.len(),
            report.total(),
            report.failures.len()
        );
        report
    }

    fn run_sequential(&self, paths: &[PathBuf], mode: Mode) -> RunReport {
        let mut report = RunReport::default();
        for path in paths {
            report.record(path, self.run_one(path, mode));
        }
        report
    }

    fn run_parallel(&self, paths: &[PathBuf], mode: Mode) -> RunReport {
        let chunk_size = paths.len().div_ceil(self.workers);
        std::thread::scope(|scope| {
            let handles: Vec<_> = paths
                .chunks(chunk_size)
                .map(|chunk| (chunk, scope.spawn(move || self.run_sequential(chunk, mode))))
                .collect();

            let mut report = RunReport::default();
            for (chunk, handle) in handles {
                match handle.join() {
                    Ok(part) => report.merge(part),
                    Err(_) => {
                        for path in chunk {
                            report.record(path, Err(Error::invalid_input("worker panicked")));
                        }
                    }
                }
            }
            report
        })
    }

    fn run_one(&self, path: &Path, mode: Mode) -> Result<()> {
        match mode {
            Mode::Annotate => {
                let mut document = self.loader.load(path)?;
                self.pipeline.process(&mut document)?;
                self.serializer.write(&document.base_name(), &document.graph)?;
            }
            Mode::Codes => {
                let xml = std::fs::read_to_string(path)?;
                let graph = read_xmi(&xml)?;
                self.serializer.write(&code_base_name(path), &graph)?;
            }
        }
        log::debug!("Finished {}", path.display());
        Ok(())
    }
}

/// `note1.txt.xmi` → `note1.txt`.
fn code_base_name(path: &Path) -> String {
    let name = base_name(path);
    match name.strip_suffix(".xmi") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_base_name() {
        assert_eq!(code_base_name(Path::new("/x/note1.txt.xmi")), "note1.txt");
        assert_eq!(code_base_name(Path::new("plain")), "plain");
        assert_eq!(code_base_name(Path::new(".xmi")), ".xmi");
    }

    #[test]
    fn test_report_records_failures() {
        let mut report = RunReport::default();
        report.record(Path::new("a"), Ok(()));
        report.record(Path::new("b"), Err(Error::xmi("bad")));
        assert_eq!(report.total(), 2);
        assert!(!report.is_clean());
        assert_eq!(report.failures[0].path, PathBuf::from("b"));
        assert_eq!(report.failures[0].message, "XMI error: bad");
    }

    #[test]
    fn test_report_serializes() {
        let report = RunReport {
            processed: vec![PathBuf::from("a")],
            failures: vec![],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"processed":["a"],"failures":[]}"#);
    }
}
