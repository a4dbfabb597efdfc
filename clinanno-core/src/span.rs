//! Half-open text spans.
//!
//! All spans in a graph are byte offsets into the document text. Conversion
//! to character offsets happens only at the serialization boundary (see
//! [`crate::offset`]).

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A half-open `[begin, end)` byte range into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub begin: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// No validation happens here; [`crate::AnnotationGraph::add`] checks
    /// bounds against the document it is inserted into.
    #[must_use]
    pub const fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    /// True when the span covers no text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.begin
    }

    /// True when `other` lies inside this span (bounds may coincide).
    #[must_use]
    pub const fn contains(&self, other: &Span) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// True when the two spans share at least one byte.
    #[must_use]
    pub const fn overlaps(&self, other: &Span) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// Smallest span covering both.
    #[must_use]
    pub fn cover(&self, other: &Span) -> Span {
        Span::new(self.begin.min(other.begin), self.end.max(other.end))
    }

    /// Byte range for slicing.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    /// Check the span against a text: ordered, in bounds, on char boundaries.
    pub fn validate(&self, text: &str) -> crate::Result<()> {
        if self.begin > self.end || self.end > text.len() {
            return Err(crate::Error::InvalidSpan {
                begin: self.begin,
                end: self.end,
                len: text.len(),
            });
        }
        for offset in [self.begin, self.end] {
            if !text.is_char_boundary(offset) {
                return Err(crate::Error::CharBoundary(offset));
            }
        }
        Ok(())
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}
