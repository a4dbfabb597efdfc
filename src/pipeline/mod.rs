//! The ordered stage chain.
//!
//! ```text
//!  raw text
//!     │
//!     ▼
//!  segment ─► sentence ─► tokenizer ─► token-merge ─► pos ─► chunker
//!                                                              │
//!     ┌────────────────────────────────────────────────────────┘
//!     ▼
//!  chunk-adjust(NP NP) ─► chunk-adjust(NP PP NP) ─► lookup-window
//!                                                        │
//!     ┌──────────────────────────────────────────────────┘
//!     ▼
//!  overlap ─► concept-lookup ─► lvg
//! ```
//!
//! Each stage reads the annotation types produced by its predecessors, so
//! order is a hard dependency. A failing stage aborts the document; the
//! chain never retries.

pub mod chunk_adjust;
pub mod chunker;
pub mod concept_lookup;
pub mod lookup_window;
pub mod lvg;
pub mod overlap;
pub mod pos;
pub mod segment;
pub mod sentence;
pub mod token_merge;
pub mod tokenizer;

pub use chunk_adjust::ChunkAdjuster;
pub use chunker::ChunkerStage;
pub use concept_lookup::ConceptLookupStage;
pub use lookup_window::LookupWindowStage;
pub use lvg::LvgStage;
pub use overlap::OverlapResolver;
pub use pos::PosStage;
pub use segment::SegmentStage;
pub use sentence::SentenceStage;
pub use token_merge::TokenMergeStage;
pub use tokenizer::TokenizerStage;

use crate::document::Document;
use crate::models::ModelSet;
use crate::{Error, Result};
use clinanno_core::{AnnotationGraph, AnnotationId, AnnotationType, Span};

/// One pass over a document's annotation graph.
///
/// Stages hold only read-only state (models, patterns) and never look
/// outside the graph they are given.
pub trait Stage: Send + Sync {
    /// Stage name for logging and error reports.
    fn name(&self) -> &'static str;

    /// Read prior annotations and append (or delete) annotations.
    fn process(&self, graph: &mut AnnotationGraph) -> Result<()>;
}

/// Ordered chain of stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Pipeline {
    /// Start building a custom chain.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The standard 12-pass clinical chain.
    #[must_use]
    pub fn standard(models: &ModelSet) -> Self {
        Self::builder()
            .stage(SegmentStage::new())
            .stage(SentenceStage::new(models.sentence.clone()))
            .stage(TokenizerStage::new())
            .stage(TokenMergeStage::new(models.abbreviations.clone()))
            .stage(PosStage::new(models.pos.clone()))
            .stage(ChunkerStage::new(models.chunk.clone()))
            .stage(ChunkAdjuster::new(&["NP", "NP"], 1))
            .stage(ChunkAdjuster::new(&["NP", "PP", "NP"], 2))
            .stage(LookupWindowStage::new())
            .stage(OverlapResolver::lookup_windows())
            .stage(ConceptLookupStage::new(models.dictionary.clone()))
            .stage(LvgStage::new(models.normalizer.clone()))
            .build()
    }

    /// Names of the stages in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True for an empty chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage over a graph, stopping at the first failure.
    pub fn run(&self, graph: &mut AnnotationGraph) -> Result<()> {
        for stage in &self.stages {
            log::debug!("running stage '{}'", stage.name());
            stage.process(graph).map_err(|e| match e {
                Error::Stage { .. } => e,
                other => Error::stage(stage.name(), other.to_string()),
            })?;
        }
        Ok(())
    }

    /// Run every stage over a document's graph.
    pub fn process(&self, document: &mut Document) -> Result<()> {
        self.run(&mut document.graph)
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineBuilder {
    /// Append a stage.
    #[must_use]
    pub fn stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append a boxed stage.
    #[must_use]
    pub fn stage_boxed(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Build the chain.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

// =============================================================================
// Shared graph helpers
// =============================================================================

/// Live sentence spans in document order.
pub(crate) fn sentence_spans(graph: &AnnotationGraph) -> Vec<Span> {
    graph.select(AnnotationType::Sentence).map(|a| a.span).collect()
}

/// Live tokens inside `span` as `(id, span)` pairs.
pub(crate) fn tokens_in(graph: &AnnotationGraph, span: Span) -> Vec<(AnnotationId, Span)> {
    graph
        .select_covered(AnnotationType::Token, span)
        .map(|a| (a.id, a.span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TermDictionary;
    use clinanno_core::AnnotationKind;

    struct Failing;

    impl Stage for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn process(&self, _graph: &mut AnnotationGraph) -> Result<()> {
            Err(Error::invalid_input("model exploded"))
        }
    }

    struct Marker;

    impl Stage for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
            graph.add(Span::new(0, 0), AnnotationKind::LookupWindow)?;
            Ok(())
        }
    }

    #[test]
    fn test_standard_chain_order() {
        let pipeline = Pipeline::standard(&ModelSet::with_dictionary(TermDictionary::new()));
        assert_eq!(
            pipeline.stage_names(),
            vec![
                "segment",
                "sentence",
                "tokenizer",
                "token-merge",
                "pos",
                "chunker",
                "chunk-adjust",
                "chunk-adjust",
                "lookup-window",
                "overlap",
                "concept-lookup",
                "lvg",
            ]
        );
        assert_eq!(pipeline.len(), 12);
    }

    #[test]
    fn test_failure_stops_chain_and_names_stage() {
        let pipeline = Pipeline::builder().stage(Failing).stage(Marker).build();
        let mut graph = AnnotationGraph::new("text");
        let err = pipeline.run(&mut graph).unwrap_err();
        assert!(matches!(err, Error::Stage { stage: "failing", .. }));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_boxed_stages_run_in_order() {
        let stages: Vec<Box<dyn Stage>> = vec![Box::new(Marker), Box::new(Failing)];
        let pipeline = stages
            .into_iter()
            .fold(Pipeline::builder(), PipelineBuilder::stage_boxed)
            .build();
        assert_eq!(pipeline.stage_names(), vec!["marker", "failing"]);
        let mut graph = AnnotationGraph::new("text");
        assert!(pipeline.run(&mut graph).is_err());
        assert_eq!(graph.count(AnnotationType::LookupWindow), 1);
    }
}
