//! Chunk adjustment: widen a chunk over the chunks that follow it when
//! their labels match a pattern.
//!
//! ```text
//! pattern NP PP NP, extend through index 2
//!
//!   [NP chest pain] [PP of] [NP unclear origin]
//!   └──────────────── NP ─────────────────────┘  (appended)
//!   [NP chest pain]                               (superseded)
//!                   [PP of] [NP unclear origin]   (still live)
//! ```
//!
//! Matches are found on each sentence's chunk list as it stood before the
//! pass, so one pass never re-matches its own output.

use super::{sentence_spans, Stage};
use crate::{Error, Result};
use clinanno_core::{AnnotationGraph, AnnotationId, AnnotationKind, AnnotationType, Span};

/// Widens the first chunk of each label-sequence match.
#[derive(Debug, Clone)]
pub struct ChunkAdjuster {
    pattern: Vec<String>,
    extend_through: usize,
}

impl ChunkAdjuster {
    /// Match `pattern` and extend the first chunk's end through the chunk at
    /// `extend_through` (an index into the pattern).
    ///
    /// An `extend_through` past the end of the pattern is clamped to its
    /// last element.
    #[must_use]
    pub fn new(pattern: &[&str], extend_through: usize) -> Self {
        Self {
            pattern: pattern.iter().map(|p| (*p).to_string()).collect(),
            extend_through: extend_through.min(pattern.len().saturating_sub(1)),
        }
    }

    /// The label sequence matched.
    #[must_use]
    pub fn pattern(&self) -> &[String] {
        &self.pattern
    }

    /// Merges found in one sentence: `(first chunk, merged span, label)`.
    fn matches(
        &self,
        chunks: &[(AnnotationId, Span, String)],
    ) -> Vec<(AnnotationId, Span, String)> {
        let width = self.pattern.len();
        if width == 0 || chunks.len() < width {
            return Vec::new();
        }
        chunks
            .windows(width)
            .filter(|run| run.iter().zip(&self.pattern).all(|(c, p)| &c.2 == p))
            .map(|run| {
                let (first, span, label) = &run[0];
                let last = &run[self.extend_through].1;
                (*first, Span::new(span.begin, last.end.max(span.end)), label.clone())
            })
            .collect()
    }
}

impl Stage for ChunkAdjuster {
    fn name(&self) -> &'static str {
        "chunk-adjust"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        for sentence in sentence_spans(graph) {
            let chunks: Vec<(AnnotationId, Span, String)> = graph
                .select_covered(AnnotationType::Chunk, sentence)
                .filter_map(|a| Some((a.id, a.span, a.chunk_type()?.to_string())))
                .collect();

            for (first, span, chunk_type) in self.matches(&chunks) {
                graph
                    .supersede(first, span, AnnotationKind::Chunk { chunk_type })
                    .map_err(|e| Error::stage(self.name(), e.to_string()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence_with_chunks(labels: &[&str]) -> (AnnotationGraph, Vec<AnnotationId>) {
        // one 4-byte chunk per label, separated by spaces
        let text = vec!["xxxx"; labels.len()].join(" ");
        let mut graph = AnnotationGraph::new(text.as_str());
        graph
            .add(Span::new(0, text.len()), AnnotationKind::Sentence { number: 0 })
            .unwrap();
        let ids = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                graph
                    .add(
                        Span::new(i * 5, i * 5 + 4),
                        AnnotationKind::Chunk {
                            chunk_type: (*label).to_string(),
                        },
                    )
                    .unwrap()
            })
            .collect();
        (graph, ids)
    }

    fn live(graph: &AnnotationGraph) -> Vec<(usize, usize, String)> {
        graph
            .select(AnnotationType::Chunk)
            .map(|a| (a.begin(), a.end(), a.chunk_type().unwrap().to_string()))
            .collect()
    }

    #[test]
    fn test_np_np_merges_first_and_keeps_second() {
        let (mut graph, ids) = sentence_with_chunks(&["NP", "NP", "VP"]);
        ChunkAdjuster::new(&["NP", "NP"], 1).process(&mut graph).unwrap();

        assert!(!graph.is_live(ids[0]));
        assert!(graph.is_live(ids[1]));
        assert_eq!(
            live(&graph),
            vec![
                (0, 9, "NP".to_string()),
                (5, 9, "NP".to_string()),
                (10, 14, "VP".to_string()),
            ]
        );
    }

    #[test]
    fn test_np_pp_np_extends_through_third() {
        let (mut graph, _) = sentence_with_chunks(&["NP", "PP", "NP"]);
        ChunkAdjuster::new(&["NP", "PP", "NP"], 2).process(&mut graph).unwrap();
        assert_eq!(live(&graph)[0], (0, 14, "NP".to_string()));
    }

    #[test]
    fn test_extend_through_clamped_to_pattern() {
        let adjuster = ChunkAdjuster::new(&["NP", "PP", "NP"], 7);
        assert_eq!(adjuster.pattern(), ["NP", "PP", "NP"]);
        let (mut graph, _) = sentence_with_chunks(&["NP", "PP", "NP"]);
        adjuster.process(&mut graph).unwrap();
        assert!(live(&graph).contains(&(0, 14, "NP".to_string())));
    }

    #[test]
    fn test_no_match_leaves_graph_untouched() {
        let (mut graph, _) = sentence_with_chunks(&["NP", "VP", "NP"]);
        ChunkAdjuster::new(&["NP", "NP"], 1).process(&mut graph).unwrap();
        assert_eq!(graph.superseded().count(), 0);
        assert_eq!(graph.count(AnnotationType::Chunk), 3);
    }

    #[test]
    fn test_chained_matches_use_pre_pass_list() {
        let (mut graph, _) = sentence_with_chunks(&["NP", "NP", "NP"]);
        ChunkAdjuster::new(&["NP", "NP"], 1).process(&mut graph).unwrap();
        assert_eq!(
            live(&graph),
            vec![
                (0, 9, "NP".to_string()),
                (5, 14, "NP".to_string()),
                (10, 14, "NP".to_string()),
            ]
        );
    }
}
