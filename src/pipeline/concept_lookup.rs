//! Concept lookup: resolve surviving lookup windows into mentions.

use super::{tokens_in, Stage};
use crate::models::{DictionaryResolver, LookupRequest};
use crate::Result;
use clinanno_core::{
    AnnotationGraph, AnnotationKind, AnnotationType, Mention, MentionType, Span,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Sends every lookup window (plus its sentence context) to the dictionary
/// and records the returned mentions.
///
/// The same `(span, type)` found from two windows is recorded once.
pub struct ConceptLookupStage {
    resolver: Arc<dyn DictionaryResolver>,
}

impl ConceptLookupStage {
    /// Wrap a resolver.
    #[must_use]
    pub fn new(resolver: Arc<dyn DictionaryResolver>) -> Self {
        Self { resolver }
    }
}

impl Stage for ConceptLookupStage {
    fn name(&self) -> &'static str {
        "concept-lookup"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        let windows: Vec<Span> = graph
            .select(AnnotationType::LookupWindow)
            .map(|a| a.span)
            .collect();

        let mut found = Vec::new();
        for window in windows {
            let window_tokens = token_spans(graph, window);
            if window_tokens.is_empty() {
                continue;
            }
            let sentence_tokens = match graph
                .select_covering(AnnotationType::Sentence, window)
                .next()
            {
                Some(sentence) => token_spans(graph, sentence.span),
                None => window_tokens.clone(),
            };
            let request = LookupRequest {
                text: graph.text(),
                window,
                window_tokens: &window_tokens,
                sentence_tokens: &sentence_tokens,
            };
            found.extend(self.resolver.resolve(&request)?);
        }

        let mut seen: HashSet<(Span, MentionType)> = HashSet::new();
        let mut added = 0;
        for term in found {
            if !seen.insert((term.span, term.mention_type)) {
                continue;
            }
            let mention =
                Mention::new(term.mention_type, term.polarity).with_concepts(term.concepts);
            graph.add(term.span, AnnotationKind::Mention(mention))?;
            added += 1;
        }
        log::debug!("{} mentions from {} resolver", added, self.resolver.name());
        Ok(())
    }
}

fn token_spans(graph: &AnnotationGraph, span: Span) -> Vec<Span> {
    tokens_in(graph, span).into_iter().map(|(_, s)| s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TermDictionary;
    use clinanno_core::{Polarity, Token, TokenClass};

    fn graph(text: &str, windows: &[(usize, usize)]) -> AnnotationGraph {
        let mut graph = AnnotationGraph::new(text);
        graph
            .add(Span::new(0, text.len()), AnnotationKind::Sentence { number: 0 })
            .unwrap();
        let mut offset = 0;
        for word in text.split(' ') {
            let word = word.trim_end_matches('.');
            graph
                .add(
                    Span::new(offset, offset + word.len()),
                    AnnotationKind::Token(Token::new(TokenClass::Word)),
                )
                .unwrap();
            offset += word.len() + 1;
        }
        for &(b, e) in windows {
            graph.add(Span::new(b, e), AnnotationKind::LookupWindow).unwrap();
        }
        graph
    }

    #[test]
    fn test_negated_mention_recorded() {
        let dict = TermDictionary::parse("C0008031||chest pain\n").unwrap();
        let mut graph = graph("Patient denies chest pain", &[(0, 7), (15, 25)]);
        ConceptLookupStage::new(Arc::new(dict)).process(&mut graph).unwrap();

        let mentions: Vec<_> = graph.select(AnnotationType::EntityMention).collect();
        assert_eq!(mentions.len(), 1);
        assert_eq!(graph.covered_text(mentions[0].span), "chest pain");
        let mention = mentions[0].as_mention().unwrap();
        assert_eq!(mention.polarity, Polarity::Negated);
        assert_eq!(mention.concepts.len(), 1);
    }

    #[test]
    fn test_same_mention_from_two_windows_recorded_once() {
        let dict = TermDictionary::parse("C0030193|T184|pain\n").unwrap();
        let mut graph = graph("chest pain", &[(0, 10), (6, 10)]);
        ConceptLookupStage::new(Arc::new(dict)).process(&mut graph).unwrap();
        assert_eq!(graph.count(AnnotationType::EventMention), 1);
    }
}
