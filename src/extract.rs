//! Concept code extraction.
//!
//! Reduces a finished graph to a flat sequence of signed code strings:
//!
//! ```text
//! [-]code|covered_text_lowercased|SemanticType
//!
//! -C0008031|chest_pain|EntityMention
//!  C0011849|diabetes_mellitus|DiseaseDisorderMention
//! ```
//!
//! Event mentions come first, then entity mentions, each block in document
//! order. Codes are deduplicated within a mention (and emitted sorted) but
//! not across mentions. A mention without concepts emits nothing.

use clinanno_core::{Annotation, AnnotationGraph, AnnotationType};
use std::collections::BTreeSet;

/// Mention blocks in output order.
const BLOCKS: [AnnotationType; 2] = [AnnotationType::EventMention, AnnotationType::EntityMention];

/// Walks mentions and formats their codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptExtractor;

impl ConceptExtractor {
    /// Create an extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// All code strings for a graph.
    #[must_use]
    pub fn extract(&self, graph: &AnnotationGraph) -> Vec<String> {
        BLOCKS
            .iter()
            .flat_map(|ty| graph.select(*ty))
            .flat_map(|mention| mention_codes(graph, mention))
            .collect()
    }

    /// Code file body: codes joined by single spaces.
    #[must_use]
    pub fn render(&self, graph: &AnnotationGraph) -> String {
        self.extract(graph).join(" ")
    }
}

/// Code strings for one mention annotation (empty for non-mentions).
#[must_use]
pub fn mention_codes(graph: &AnnotationGraph, annotation: &Annotation) -> Vec<String> {
    let Some(mention) = annotation.as_mention() else {
        return Vec::new();
    };
    let text = surface_form(graph.covered_text(annotation.span));
    let sign = if mention.polarity.is_positive() { "" } else { "-" };
    let codes: BTreeSet<String> = mention.concepts.iter().map(|c| c.code_string()).collect();
    codes
        .into_iter()
        .map(|code| format!("{sign}{code}|{text}|{}", mention.mention_type))
        .collect()
}

/// Lower-cased text with spaces turned into underscores. Other whitespace
/// is kept as is.
fn surface_form(covered: &str) -> String {
    covered.to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinanno_core::{AnnotationKind, Mention, MentionType, OntologyConcept, Polarity, Span};

    fn mention(
        graph: &mut AnnotationGraph,
        span: (usize, usize),
        ty: MentionType,
        polarity: Polarity,
        concepts: Vec<OntologyConcept>,
    ) {
        graph
            .add(
                Span::new(span.0, span.1),
                AnnotationKind::Mention(Mention::new(ty, polarity).with_concepts(concepts)),
            )
            .unwrap();
    }

    #[test]
    fn test_negated_entity() {
        let mut graph = AnnotationGraph::new("Patient denies chest pain.");
        mention(
            &mut graph,
            (15, 25),
            MentionType::Entity,
            Polarity::Negated,
            vec![OntologyConcept::umls("C0008031")],
        );
        assert_eq!(
            ConceptExtractor::new().extract(&graph),
            vec!["-C0008031|chest_pain|EntityMention"]
        );
    }

    #[test]
    fn test_two_concepts_and_duplicates() {
        let mut graph = AnnotationGraph::new("Chest Pain");
        mention(
            &mut graph,
            (0, 10),
            MentionType::Entity,
            Polarity::Positive,
            vec![
                OntologyConcept::umls("C0008031"),
                OntologyConcept::coded("SNOMEDCT", "12345"),
                OntologyConcept::umls("C0008031"),
            ],
        );
        assert_eq!(
            ConceptExtractor::new().extract(&graph),
            vec!["C0008031|chest_pain|EntityMention", "SNOMEDCT12345|chest_pain|EntityMention"]
        );
    }

    #[test]
    fn test_events_before_entities() {
        let mut graph = AnnotationGraph::new("aspirin for arm pain");
        mention(
            &mut graph,
            (12, 15),
            MentionType::AnatomicalSite,
            Polarity::Positive,
            vec![OntologyConcept::umls("C0446516")],
        );
        mention(
            &mut graph,
            (0, 7),
            MentionType::Medication,
            Polarity::Uncertain,
            vec![OntologyConcept::umls("C0004057")],
        );
        mention(&mut graph, (16, 20), MentionType::SignSymptom, Polarity::Positive, vec![]);

        assert_eq!(
            ConceptExtractor::new().render(&graph),
            "-C0004057|aspirin|MedicationMention C0446516|arm|AnatomicalSiteMention"
        );
    }

    #[test]
    fn test_no_mentions_is_empty() {
        let graph = AnnotationGraph::new("Nothing here.");
        assert!(ConceptExtractor::new().extract(&graph).is_empty());
        assert_eq!(ConceptExtractor::new().render(&graph), "");
    }

    #[test]
    fn test_only_spaces_become_underscores() {
        let mut graph = AnnotationGraph::new("chest\npain and\tArm Ache");
        mention(
            &mut graph,
            (0, 10),
            MentionType::Entity,
            Polarity::Positive,
            vec![OntologyConcept::umls("C0008031")],
        );
        mention(
            &mut graph,
            (11, 23),
            MentionType::Entity,
            Polarity::Positive,
            vec![OntologyConcept::umls("C0446516")],
        );
        assert_eq!(
            ConceptExtractor::new().extract(&graph),
            vec![
                "C0008031|chest\npain|EntityMention",
                "C0446516|and\tarm_ache|EntityMention",
            ]
        );
    }
}
