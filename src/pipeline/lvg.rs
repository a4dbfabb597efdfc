//! Lexical normalization stage.

use super::Stage;
use crate::models::LexicalNormalizer;
use crate::Result;
use clinanno_core::{AnnotationGraph, AnnotationId, AnnotationType, TokenClass};
use std::sync::Arc;

/// Attaches a base form to every live word token.
pub struct LvgStage {
    normalizer: Arc<LexicalNormalizer>,
}

impl LvgStage {
    /// Wrap a normalizer.
    #[must_use]
    pub fn new(normalizer: Arc<LexicalNormalizer>) -> Self {
        Self { normalizer }
    }
}

impl Stage for LvgStage {
    fn name(&self) -> &'static str {
        "lvg"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        let forms: Vec<(AnnotationId, String)> = graph
            .select(AnnotationType::Token)
            .filter(|a| a.as_token().is_some_and(|t| t.class == TokenClass::Word))
            .map(|a| (a.id, self.normalizer.normalize(graph.covered_text(a.span))))
            .collect();
        for (id, form) in forms {
            if let Some(token) = graph.token_mut(id) {
                token.normalized = Some(form);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinanno_core::{AnnotationKind, Span, Token};

    #[test]
    fn test_word_tokens_normalized() {
        let mut graph = AnnotationGraph::new("Denies 2 lungs");
        for (b, e, class) in [
            (0, 6, TokenClass::Word),
            (7, 8, TokenClass::Number),
            (9, 14, TokenClass::Word),
        ] {
            graph.add(Span::new(b, e), AnnotationKind::Token(Token::new(class))).unwrap();
        }
        LvgStage::new(Arc::new(LexicalNormalizer::builtin()))
            .process(&mut graph)
            .unwrap();
        let forms: Vec<_> = graph
            .select(AnnotationType::Token)
            .map(|a| a.as_token().unwrap().normalized.clone())
            .collect();
        assert_eq!(forms, vec![Some("deny".into()), None, Some("lung".into())]);
    }
}
