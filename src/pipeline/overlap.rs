//! Overlap resolution: delete annotations enveloped by others.
//!
//! Configured with an enveloping type A and a removable type B. Every B
//! that lies inside some *other* A (bounds may coincide) is deleted from
//! the graph. When A and B are the same type, outer spans win and exact
//! duplicates keep the first in document order.

use super::Stage;
use crate::Result;
use clinanno_core::{AnnotationGraph, AnnotationId, AnnotationType, Span};

/// Deletes type-B annotations enveloped by a type-A annotation.
#[derive(Debug, Clone, Copy)]
pub struct OverlapResolver {
    envelops: AnnotationType,
    removes: AnnotationType,
}

impl OverlapResolver {
    /// Resolver for `envelops` ⊇ `removes`.
    #[must_use]
    pub fn new(envelops: AnnotationType, removes: AnnotationType) -> Self {
        Self { envelops, removes }
    }

    /// Lookup windows nested inside other lookup windows.
    #[must_use]
    pub fn lookup_windows() -> Self {
        Self::new(AnnotationType::LookupWindow, AnnotationType::LookupWindow)
    }

    /// Ids to delete.
    #[must_use]
    pub fn enveloped(&self, graph: &AnnotationGraph) -> Vec<AnnotationId> {
        let spans = |ty| -> Vec<(AnnotationId, Span)> {
            graph.select(ty).map(|a| (a.id, a.span)).collect()
        };

        if self.envelops == self.removes {
            // Outer spans first; identical spans in insertion order.
            let mut all = spans(self.removes);
            all.sort_by(|(ia, a), (ib, b)| {
                a.begin
                    .cmp(&b.begin)
                    .then(b.end.cmp(&a.end))
                    .then(ia.cmp(ib))
            });
            let mut kept: Vec<Span> = Vec::new();
            let mut doomed = Vec::new();
            for (id, span) in all {
                if kept.iter().any(|outer| outer.contains(&span)) {
                    doomed.push(id);
                } else {
                    kept.push(span);
                }
            }
            doomed
        } else {
            let outers = spans(self.envelops);
            spans(self.removes)
                .into_iter()
                .filter(|(id, span)| {
                    outers
                        .iter()
                        .any(|(outer_id, outer)| outer_id != id && outer.contains(span))
                })
                .map(|(id, _)| id)
                .collect()
        }
    }
}

impl Stage for OverlapResolver {
    fn name(&self) -> &'static str {
        "overlap"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        let doomed = self.enveloped(graph);
        if !doomed.is_empty() {
            log::debug!("removing {} enveloped {:?} annotations", doomed.len(), self.removes);
        }
        for id in doomed {
            graph.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinanno_core::AnnotationKind;

    fn windows(spans: &[(usize, usize)]) -> (AnnotationGraph, Vec<AnnotationId>) {
        let mut graph = AnnotationGraph::new("x".repeat(40));
        let ids = spans
            .iter()
            .map(|&(b, e)| graph.add(Span::new(b, e), AnnotationKind::LookupWindow).unwrap())
            .collect();
        (graph, ids)
    }

    fn surviving(graph: &AnnotationGraph) -> Vec<(usize, usize)> {
        graph
            .select(AnnotationType::LookupWindow)
            .map(|a| (a.begin(), a.end()))
            .collect()
    }

    #[test]
    fn test_nested_window_removed() {
        let (mut graph, _) = windows(&[(5, 9), (0, 14), (20, 30)]);
        OverlapResolver::lookup_windows().process(&mut graph).unwrap();
        assert_eq!(surviving(&graph), vec![(0, 14), (20, 30)]);
    }

    #[test]
    fn test_shared_begin_keeps_longer() {
        let (mut graph, _) = windows(&[(0, 9), (0, 14)]);
        OverlapResolver::lookup_windows().process(&mut graph).unwrap();
        assert_eq!(surviving(&graph), vec![(0, 14)]);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let (mut graph, ids) = windows(&[(3, 8), (3, 8)]);
        OverlapResolver::lookup_windows().process(&mut graph).unwrap();
        assert!(graph.get(ids[0]).is_some());
        assert!(graph.get(ids[1]).is_none());
    }

    #[test]
    fn test_partial_overlap_keeps_both() {
        let (mut graph, _) = windows(&[(0, 9), (5, 14)]);
        OverlapResolver::lookup_windows().process(&mut graph).unwrap();
        assert_eq!(surviving(&graph), vec![(0, 9), (5, 14)]);
    }

    #[test]
    fn test_cross_type_envelope() {
        let mut graph = AnnotationGraph::new("x".repeat(20));
        graph.add(Span::new(0, 10), AnnotationKind::Sentence { number: 0 }).unwrap();
        graph.add(Span::new(2, 6), AnnotationKind::LookupWindow).unwrap();
        graph.add(Span::new(8, 14), AnnotationKind::LookupWindow).unwrap();
        OverlapResolver::new(AnnotationType::Sentence, AnnotationType::LookupWindow)
            .process(&mut graph)
            .unwrap();
        assert_eq!(surviving(&graph), vec![(8, 14)]);
    }
}
