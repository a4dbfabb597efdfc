//! Pipeline configuration.
//!
//! Every external resource is a named field; nothing is read from ambient
//! environment variables or hardcoded paths. A config file looks like:
//!
//! ```toml
//! [input]
//! dir = "notes/"
//!
//! [output]
//! xmi_dir = "out/xmi"
//! code_dir = "out/codes"
//!
//! [models]
//! pos = "resources/pos-lexicon.tsv"
//!
//! [dictionary]
//! path = "resources/umls-subset.bsv"
//!
//! [runner]
//! workers = 4
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default token distance over which an assertion cue applies.
pub const DEFAULT_NEGATION_DISTANCE: usize = 6;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Input documents
    pub input: InputConfig,
    /// Output locations
    pub output: OutputConfig,
    /// Optional statistical model resources
    pub models: ModelPaths,
    /// Dictionary resource
    pub dictionary: DictionaryConfig,
    /// Dictionary lookup tuning
    pub lookup: LookupConfig,
    /// Runner settings
    pub runner: RunnerConfig,
}

/// Input settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Directory of documents (raw text or XMI depending on the entry point)
    pub dir: Option<PathBuf>,
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory for `.xmi` graph files (created if absent)
    pub xmi_dir: Option<PathBuf>,
    /// Directory for code files (must already exist)
    pub code_dir: Option<PathBuf>,
}

/// Model resource files. Absent entries fall back to built-in resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelPaths {
    /// Abbreviation list for sentence detection
    pub sentence: Option<PathBuf>,
    /// `word<TAB>TAG` lexicon for POS tagging
    pub pos: Option<PathBuf>,
    /// `TAG<TAB>ROLE` grammar for chunking
    pub chunk: Option<PathBuf>,
    /// `word<TAB>base` exceptions for lexical normalization
    pub lvg: Option<PathBuf>,
}

/// Dictionary settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DictionaryConfig {
    /// Pipe-separated term dictionary (required for annotation)
    pub path: Option<PathBuf>,
}

/// Lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    /// Max tokens between an assertion cue and the mention it scopes over
    pub max_negation_distance: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_negation_distance: DEFAULT_NEGATION_DISTANCE,
        }
    }
}

/// Runner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Number of document workers
    pub workers: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl PipelineConfig {
    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    /// Parse TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Check everything the annotation entry point needs.
    pub fn validate_for_annotate(&self) -> Result<()> {
        self.require_input_dir()?;
        require(&self.output.xmi_dir, "output.xmi_dir")?;
        let dictionary = require(&self.dictionary.path, "dictionary.path")?;
        if !dictionary.is_file() {
            return Err(Error::config(format!(
                "dictionary not found: {}",
                dictionary.display()
            )));
        }
        self.validate_common()
    }

    /// Check everything the code-extraction entry point needs.
    pub fn validate_for_codes(&self) -> Result<()> {
        self.require_input_dir()?;
        require(&self.output.code_dir, "output.code_dir")?;
        self.validate_common()
    }

    fn require_input_dir(&self) -> Result<&Path> {
        let dir = require(&self.input.dir, "input.dir")?;
        if !dir.is_dir() {
            return Err(Error::config(format!(
                "input directory not found: {}",
                dir.display()
            )));
        }
        Ok(dir)
    }

    fn validate_common(&self) -> Result<()> {
        if self.runner.workers == 0 {
            return Err(Error::config("runner.workers must be at least 1"));
        }
        Ok(())
    }
}

fn require<'a>(value: &'a Option<PathBuf>, name: &str) -> Result<&'a Path> {
    value
        .as_deref()
        .ok_or_else(|| Error::config(format!("missing required setting '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config.runner.workers, 1);
        assert_eq!(config.lookup.max_negation_distance, DEFAULT_NEGATION_DISTANCE);
        assert!(config.dictionary.path.is_none());
    }

    #[test]
    fn test_parse_sections() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [input]
            dir = "notes"
            [output]
            xmi_dir = "out/xmi"
            [models]
            pos = "pos.tsv"
            [dictionary]
            path = "dict.bsv"
            [runner]
            workers = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.input.dir, Some(PathBuf::from("notes")));
        assert_eq!(config.models.pos, Some(PathBuf::from("pos.tsv")));
        assert_eq!(config.runner.workers, 3);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PipelineConfig::from_toml_str("[runner]\nthreads = 2\n").unwrap_err();
        assert!(err.is_startup_fatal());
    }

    #[test]
    fn test_missing_dictionary_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.input.dir = Some(dir.path().to_path_buf());
        config.output.xmi_dir = Some(dir.path().join("xmi"));

        let err = config.validate_for_annotate().unwrap_err();
        assert!(err.is_startup_fatal());
        assert!(err.to_string().contains("dictionary.path"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.input.dir = Some(dir.path().to_path_buf());
        config.output.code_dir = Some(dir.path().to_path_buf());
        config.runner.workers = 0;
        assert!(config.validate_for_codes().is_err());
        config.runner.workers = 2;
        assert!(config.validate_for_codes().is_ok());
    }
}
