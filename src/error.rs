//! Error types for clinanno.

use thiserror::Error;

/// Result type for clinanno operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for clinanno operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A model or dictionary resource could not be loaded.
    #[error("Model initialization failed: {0}")]
    ModelInit(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pipeline stage could not process the current document.
    #[error("Stage '{stage}' failed: {message}")]
    Stage {
        /// Stage name
        stage: &'static str,
        /// What went wrong
        message: String,
    },

    /// Graph file could not be written or read.
    #[error("XMI error: {0}")]
    Xmi(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Annotation graph error.
    #[error(transparent)]
    Core(#[from] clinanno_core::Error),

    /// Config file parse error.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a model initialization error.
    pub fn model_init(msg: impl Into<String>) -> Self {
        Error::ModelInit(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a stage error.
    pub fn stage(stage: &'static str, msg: impl Into<String>) -> Self {
        Error::Stage {
            stage,
            message: msg.into(),
        }
    }

    /// Create an XMI error.
    pub fn xmi(msg: impl Into<String>) -> Self {
        Error::Xmi(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// True for errors that must abort the run before any document is
    /// processed; everything else only fails the current document.
    #[must_use]
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, Error::ModelInit(_) | Error::Config(_) | Error::Toml(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy() {
        assert!(Error::model_init("missing pos model").is_startup_fatal());
        assert!(Error::config("no dictionary").is_startup_fatal());
        assert!(!Error::stage("pos", "boom").is_startup_fatal());
        assert!(!Error::xmi("bad char").is_startup_fatal());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!Error::from(io).is_startup_fatal());
    }

    #[test]
    fn test_stage_display() {
        let err = Error::stage("chunker", "model returned overlapping chunks");
        assert_eq!(
            err.to_string(),
            "Stage 'chunker' failed: model returned overlapping chunks"
        );
    }
}
