//! Sentence detection stage.

use super::Stage;
use crate::models::SentenceModel;
use crate::{Error, Result};
use clinanno_core::{AnnotationGraph, AnnotationKind, AnnotationType, Span};
use std::sync::Arc;

/// Runs the sentence model over every segment.
pub struct SentenceStage {
    model: Arc<dyn SentenceModel>,
}

impl SentenceStage {
    /// Wrap a sentence model.
    #[must_use]
    pub fn new(model: Arc<dyn SentenceModel>) -> Self {
        Self { model }
    }
}

impl Stage for SentenceStage {
    fn name(&self) -> &'static str {
        "sentence"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        let segments: Vec<Span> = graph.select(AnnotationType::Segment).map(|a| a.span).collect();
        let mut number = 0;
        let mut last_end = 0;
        for segment in segments {
            let spans = self.model.detect(graph.text(), segment)?;
            for span in spans {
                if !segment.contains(&span) || span.begin < last_end || span.is_empty() {
                    return Err(Error::stage(
                        self.name(),
                        format!(
                            "model '{}' returned sentence {} outside segment {} or out of order",
                            self.model.name(),
                            span,
                            segment
                        ),
                    ));
                }
                graph.add(span, AnnotationKind::Sentence { number })?;
                number += 1;
                last_end = span.end;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleSentenceModel;
    use crate::pipeline::SegmentStage;

    struct Overlapping;

    impl SentenceModel for Overlapping {
        fn detect(&self, _text: &str, region: Span) -> Result<Vec<Span>> {
            Ok(vec![region, region])
        }
    }

    #[test]
    fn test_sentences_numbered_across_segments() {
        let mut graph = AnnotationGraph::new("Intro line.\nHISTORY:\nChest pain. No fever.");
        SegmentStage::new().process(&mut graph).unwrap();
        SentenceStage::new(Arc::new(RuleSentenceModel::default()))
            .process(&mut graph)
            .unwrap();

        let sentences: Vec<_> = graph
            .select(AnnotationType::Sentence)
            .map(|a| (graph.covered_text(a.span).to_string(), a.kind.clone()))
            .collect();
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[2].0, "Chest pain.");
        assert_eq!(sentences[3].1, AnnotationKind::Sentence { number: 3 });
    }

    #[test]
    fn test_overlapping_model_output_rejected() {
        let mut graph = AnnotationGraph::new("Chest pain.");
        SegmentStage::new().process(&mut graph).unwrap();
        let err = SentenceStage::new(Arc::new(Overlapping))
            .process(&mut graph)
            .unwrap_err();
        assert!(matches!(err, Error::Stage { stage: "sentence", .. }));
    }
}
