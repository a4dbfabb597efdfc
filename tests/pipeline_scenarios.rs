//! End-to-end tests of the standard chain: raw text in, codes and graph
//! files out.

use clinanno::{
    read_xmi, write_xmi, AnnotationType, ConceptExtractor, Document, ModelSet, Pipeline,
    TermDictionary,
};

fn annotate(dictionary: &str, text: &str) -> Document {
    let dictionary = TermDictionary::parse(dictionary).unwrap();
    let pipeline = Pipeline::standard(&ModelSet::with_dictionary(dictionary));
    let mut doc = Document::new("note.txt", text);
    pipeline.process(&mut doc).unwrap();
    doc
}

// =============================================================================
// Code scenarios
// =============================================================================

#[test]
fn test_denied_finding_is_negated() {
    let doc = annotate("C0008031||chest pain\n", "Patient denies chest pain.");
    assert_eq!(
        ConceptExtractor::new().extract(&doc.graph),
        vec!["-C0008031|chest_pain|EntityMention"]
    );
}

#[test]
fn test_two_concepts_emit_two_codes() {
    let doc = annotate(
        "C0008031|T184|chest pain|SNOMEDCT=12345\n",
        "Chest pain reported.",
    );
    let codes = ConceptExtractor::new().extract(&doc.graph);
    assert_eq!(codes.len(), 2);
    assert!(codes.contains(&"C0008031|chest_pain|SignSymptomMention".to_string()));
    assert!(codes.contains(&"SNOMEDCT12345|chest_pain|SignSymptomMention".to_string()));
}

#[test]
fn test_no_mentions_still_yields_graph() {
    let doc = annotate("C0008031||chest pain\n", "The weather is nice today.");
    assert_eq!(ConceptExtractor::new().render(&doc.graph), "");

    assert_eq!(doc.graph.count(AnnotationType::Segment), 1);
    assert_eq!(doc.graph.count(AnnotationType::Sentence), 1);
    assert!(doc.graph.count(AnnotationType::Token) >= 5);

    let xml = write_xmi(&doc.graph).unwrap();
    assert!(xml.contains("<textspan:Sentence"));
    assert!(xml.contains("<syntax:WordToken"));
}

// =============================================================================
// Chain behaviour
// =============================================================================

#[test]
fn test_sections_become_segments() {
    let doc = annotate(
        "C0008031||chest pain\n",
        "HISTORY:\nPatient reports chest pain.\n\nPLAN:\nFollow up in two weeks.",
    );
    let ids: Vec<String> = doc
        .graph
        .select(AnnotationType::Segment)
        .filter_map(|a| match &a.kind {
            clinanno::AnnotationKind::Segment { id } => Some(id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec!["HISTORY", "PLAN"]);
    assert_eq!(
        ConceptExtractor::new().extract(&doc.graph),
        vec!["C0008031|chest_pain|EntityMention"]
    );
}

#[test]
fn test_words_get_pos_and_base_form() {
    let doc = annotate("C0008031||chest pain\n", "Patient denies chest pain.");
    for token in doc.graph.select(AnnotationType::Token) {
        let token_data = token.as_token().unwrap();
        assert!(token_data.pos.is_some(), "untagged {:?}", token.span);
    }
    let words_with_base = doc
        .graph
        .select(AnnotationType::Token)
        .filter(|a| a.as_token().is_some_and(|t| t.normalized.is_some()))
        .count();
    assert_eq!(words_with_base, 4);
}

#[test]
fn test_surviving_windows_not_nested() {
    let doc = annotate(
        "C0008031||chest pain\n",
        "Severe chest pain of unclear origin and left arm numbness.",
    );
    let windows: Vec<_> = doc
        .graph
        .select(AnnotationType::LookupWindow)
        .map(|a| a.span)
        .collect();
    assert!(!windows.is_empty());
    for (i, a) in windows.iter().enumerate() {
        for (j, b) in windows.iter().enumerate() {
            if i != j {
                assert!(!a.contains(b), "{a:?} contains {b:?}");
            }
        }
    }
}

#[test]
fn test_graph_survives_xmi_roundtrip() {
    let doc = annotate("C0008031||chest pain\n", "Patient denies chest pain.");
    let back = read_xmi(&write_xmi(&doc.graph).unwrap()).unwrap();
    assert_eq!(back.text(), doc.text());
    for ty in AnnotationType::ALL {
        assert_eq!(back.count(ty), doc.graph.count(ty), "{ty:?}");
    }
    assert_eq!(
        ConceptExtractor::new().extract(&back),
        ConceptExtractor::new().extract(&doc.graph)
    );
}
