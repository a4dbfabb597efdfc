//! Error types for clinanno-core.

use thiserror::Error;

/// Result type for clinanno-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for clinanno-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A span does not fit the document it is added to.
    #[error("Invalid span [{begin}, {end}) for text of length {len}")]
    InvalidSpan {
        /// Span start (byte offset)
        begin: usize,
        /// Span end (byte offset)
        end: usize,
        /// Document length in bytes
        len: usize,
    },

    /// A span boundary falls inside a multi-byte character.
    #[error("Offset {0} is not on a character boundary")]
    CharBoundary(usize),

    /// An annotation id does not resolve to a live annotation.
    #[error("Unknown annotation: {0}")]
    UnknownAnnotation(u64),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
