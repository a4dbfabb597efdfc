//! Lookup window derivation.

use super::Stage;
use crate::Result;
use clinanno_core::{AnnotationGraph, AnnotationKind, AnnotationType, Span};

/// Creates one lookup window per live chunk of the configured type.
#[derive(Debug, Clone)]
pub struct LookupWindowStage {
    chunk_type: String,
}

impl LookupWindowStage {
    /// Windows over noun phrases.
    #[must_use]
    pub fn new() -> Self {
        Self::for_chunk_type("NP")
    }

    /// Windows over chunks labeled `chunk_type`.
    #[must_use]
    pub fn for_chunk_type(chunk_type: impl Into<String>) -> Self {
        Self {
            chunk_type: chunk_type.into(),
        }
    }
}

impl Default for LookupWindowStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for LookupWindowStage {
    fn name(&self) -> &'static str {
        "lookup-window"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        let spans: Vec<Span> = graph
            .select(AnnotationType::Chunk)
            .filter(|a| a.chunk_type() == Some(self.chunk_type.as_str()))
            .map(|a| a.span)
            .collect();
        for span in spans {
            graph.add(span, AnnotationKind::LookupWindow)?;
        }
        Ok(())
    }
}
