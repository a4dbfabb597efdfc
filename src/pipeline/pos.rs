//! Part-of-speech tagging stage.

use super::{sentence_spans, tokens_in, Stage};
use crate::models::PosModel;
use crate::{Error, Result};
use clinanno_core::AnnotationGraph;
use std::sync::Arc;

/// Tags every live token, one sentence at a time.
pub struct PosStage {
    model: Arc<dyn PosModel>,
}

impl PosStage {
    /// Wrap a POS model.
    #[must_use]
    pub fn new(model: Arc<dyn PosModel>) -> Self {
        Self { model }
    }
}

impl Stage for PosStage {
    fn name(&self) -> &'static str {
        "pos"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        for sentence in sentence_spans(graph) {
            let tokens = tokens_in(graph, sentence);
            if tokens.is_empty() {
                continue;
            }
            let tags = {
                let words: Vec<&str> = tokens.iter().map(|(_, s)| graph.covered_text(*s)).collect();
                self.model.tag(&words)?
            };
            if tags.len() != tokens.len() {
                return Err(Error::stage(
                    self.name(),
                    format!(
                        "model '{}' returned {} tags for {} tokens",
                        self.model.name(),
                        tags.len(),
                        tokens.len()
                    ),
                ));
            }
            for ((id, _), tag) in tokens.into_iter().zip(tags) {
                if let Some(token) = graph.token_mut(id) {
                    token.pos = Some(tag);
                }
            }
        }
        Ok(())
    }
}
