//! Shallow-parse chunking stage.

use super::{sentence_spans, tokens_in, Stage};
use crate::models::ChunkModel;
use crate::{Error, Result};
use clinanno_core::{AnnotationGraph, AnnotationKind};
use std::sync::Arc;

/// Tag used for tokens the POS stage left untagged.
const FALLBACK_TAG: &str = "NN";

/// Groups each sentence's tokens into labeled, non-overlapping chunks.
pub struct ChunkerStage {
    model: Arc<dyn ChunkModel>,
}

impl ChunkerStage {
    /// Wrap a chunk model.
    #[must_use]
    pub fn new(model: Arc<dyn ChunkModel>) -> Self {
        Self { model }
    }
}

impl Stage for ChunkerStage {
    fn name(&self) -> &'static str {
        "chunker"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        for sentence in sentence_spans(graph) {
            let tokens = tokens_in(graph, sentence);
            if tokens.is_empty() {
                continue;
            }
            let chunks = {
                let words: Vec<&str> = tokens.iter().map(|(_, s)| graph.covered_text(*s)).collect();
                let tags: Vec<&str> = tokens
                    .iter()
                    .map(|(id, _)| {
                        graph
                            .get(*id)
                            .and_then(|a| a.as_token())
                            .and_then(|t| t.pos.as_deref())
                            .unwrap_or(FALLBACK_TAG)
                    })
                    .collect();
                self.model.chunk(&words, &tags)?
            };

            let mut last_end = 0;
            for chunk in chunks {
                if chunk.start >= chunk.end || chunk.end > tokens.len() || chunk.start < last_end {
                    return Err(Error::stage(
                        self.name(),
                        format!(
                            "model '{}' returned invalid chunk {}..{} over {} tokens",
                            self.model.name(),
                            chunk.start,
                            chunk.end,
                            tokens.len()
                        ),
                    ));
                }
                let span = tokens[chunk.start].1.cover(&tokens[chunk.end - 1].1);
                graph.add(
                    span,
                    AnnotationKind::Chunk {
                        chunk_type: chunk.label,
                    },
                )?;
                last_end = chunk.end;
            }
        }
        Ok(())
    }
}
