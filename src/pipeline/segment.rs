//! Section segmentation.

use super::Stage;
use crate::Result;
use clinanno_core::{AnnotationGraph, AnnotationKind, Span, SIMPLE_SEGMENT};
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper-case heading at the start of a line, followed by a colon.
static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*([A-Z][A-Z0-9 /&()-]*[A-Z0-9)])[ \t]*:").unwrap()
});

/// Splits a document into contiguous segments at section headings.
///
/// Text before the first heading (or the whole document when there is
/// none) becomes a [`SIMPLE_SEGMENT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentStage;

impl SegmentStage {
    /// Create the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Segment boundaries as `(span, id)` pairs covering all of `text`.
    #[must_use]
    pub fn segments(text: &str) -> Vec<(Span, String)> {
        let headers: Vec<(usize, String)> = SECTION_HEADER
            .captures_iter(text)
            .filter_map(|c| {
                let whole = c.get(0)?;
                let name = c.get(1)?;
                Some((whole.start(), name.as_str().trim().to_string()))
            })
            .collect();

        let mut segments = Vec::with_capacity(headers.len() + 1);
        let first = headers.first().map_or(text.len(), |(start, _)| *start);
        if first > 0 || headers.is_empty() {
            segments.push((Span::new(0, first), SIMPLE_SEGMENT.to_string()));
        }
        for (i, (start, name)) in headers.iter().enumerate() {
            let end = headers.get(i + 1).map_or(text.len(), |(next, _)| *next);
            segments.push((Span::new(*start, end), name.clone()));
        }
        segments
    }
}

impl Stage for SegmentStage {
    fn name(&self) -> &'static str {
        "segment"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        for (span, id) in Self::segments(graph.text()) {
            graph.add(span, AnnotationKind::Segment { id })?;
        }
        Ok(())
    }
}
