//! Context-sensitive token merging.
//!
//! Adjacent tokens (no whitespace between them) inside one sentence are
//! glued together when they form:
//!
//! | Pattern                | Example      | Result  |
//! |------------------------|--------------|---------|
//! | dotted acronym         | `e . g .`    | Word    |
//! | abbreviation + period  | `Dr .`       | Word    |
//! | decimal / fraction     | `38 . 5`, `1 / 2` | Number |
//! | hyphenated word        | `x - ray`    | Word    |
//!
//! The merged token is appended and the constituents are superseded by it.

use super::{sentence_spans, tokens_in, Stage};
use crate::models::Abbreviations;
use crate::Result;
use clinanno_core::{AnnotationGraph, AnnotationId, AnnotationKind, Span, Token, TokenClass};
use std::sync::Arc;

/// Snapshot of one token for pattern matching.
struct Piece<'t> {
    id: AnnotationId,
    span: Span,
    class: TokenClass,
    text: &'t str,
}

/// Merges split abbreviations, numbers and hyphenated words.
#[derive(Debug, Clone)]
pub struct TokenMergeStage {
    abbreviations: Arc<Abbreviations>,
}

impl TokenMergeStage {
    /// Create the stage over a shared abbreviation list.
    #[must_use]
    pub fn new(abbreviations: Arc<Abbreviations>) -> Self {
        Self { abbreviations }
    }

    /// Length and class of the merge group starting at `i`, if any.
    fn group_at(&self, pieces: &[Piece<'_>], i: usize) -> Option<(usize, TokenClass)> {
        let n = pieces.len();
        let adjacent = |k: usize| k + 1 < n && pieces[k].span.end == pieces[k + 1].span.begin;
        let is = |k: usize, s: &str| k < n && pieces[k].text == s;
        let letter = |k: usize| {
            k < n && pieces[k].class == TokenClass::Word && pieces[k].text.chars().count() == 1
        };
        let numeric = |k: usize| k < n && pieces[k].class == TokenClass::Number;
        let wordlike = |k: usize| {
            k < n && matches!(pieces[k].class, TokenClass::Word | TokenClass::Number)
        };

        // dotted acronym: letter (. letter)+ .?
        if letter(i) {
            let mut end = i + 1;
            let mut letters = 1;
            while adjacent(end - 1) && is(end, ".") {
                end += 1;
                if adjacent(end - 1) && letter(end) {
                    end += 1;
                    letters += 1;
                } else {
                    break;
                }
            }
            if letters >= 2 {
                return Some((end - i, TokenClass::Word));
            }
        }

        // abbreviation + period
        if pieces[i].class == TokenClass::Word
            && adjacent(i)
            && is(i + 1, ".")
            && self.abbreviations.contains(pieces[i].text)
        {
            return Some((2, TokenClass::Word));
        }

        // decimals, fractions, dates
        if numeric(i) {
            let mut end = i + 1;
            while adjacent(end - 1)
                && (is(end, ".") || is(end, "/"))
                && adjacent(end)
                && numeric(end + 1)
            {
                end += 2;
            }
            if end > i + 1 {
                return Some((end - i, TokenClass::Number));
            }
        }

        // hyphenated words
        if wordlike(i) {
            let mut end = i + 1;
            while adjacent(end - 1) && is(end, "-") && adjacent(end) && wordlike(end + 1) {
                end += 2;
            }
            if end > i + 1 {
                let all_numeric = (i..end).step_by(2).all(numeric);
                let class = if all_numeric {
                    TokenClass::Number
                } else {
                    TokenClass::Word
                };
                return Some((end - i, class));
            }
        }
        None
    }
}

impl Stage for TokenMergeStage {
    fn name(&self) -> &'static str {
        "token-merge"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        for sentence in sentence_spans(graph) {
            let groups: Vec<(Vec<AnnotationId>, Span, TokenClass)> = {
                let text = graph.text();
                let pieces: Vec<Piece<'_>> = tokens_in(graph, sentence)
                    .into_iter()
                    .filter_map(|(id, span)| {
                        let class = graph.get(id)?.as_token()?.class;
                        Some(Piece {
                            id,
                            span,
                            class,
                            text: text.get(span.range())?,
                        })
                    })
                    .collect();

                let mut groups = Vec::new();
                let mut i = 0;
                while i < pieces.len() {
                    match self.group_at(&pieces, i) {
                        Some((len, class)) => {
                            let members = &pieces[i..i + len];
                            let span = members[0].span.cover(&members[len - 1].span);
                            groups.push((members.iter().map(|p| p.id).collect(), span, class));
                            i += len;
                        }
                        None => i += 1,
                    }
                }
                groups
            };

            for (members, span, class) in groups {
                let merged = graph.add(span, AnnotationKind::Token(Token::new(class)))?;
                for id in members {
                    graph.retire(id, merged);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{SegmentStage, SentenceStage, TokenizerStage};
    use crate::models::RuleSentenceModel;
    use clinanno_core::AnnotationType;

    fn merged(text: &str) -> Vec<(String, TokenClass)> {
        let mut graph = AnnotationGraph::new(text);
        SegmentStage::new().process(&mut graph).unwrap();
        SentenceStage::new(Arc::new(RuleSentenceModel::default()))
            .process(&mut graph)
            .unwrap();
        TokenizerStage::new().process(&mut graph).unwrap();
        TokenMergeStage::new(Arc::new(Abbreviations::builtin()))
            .process(&mut graph)
            .unwrap();
        graph
            .select(AnnotationType::Token)
            .map(|a| {
                (
                    graph.covered_text(a.span).to_string(),
                    a.as_token().unwrap().class,
                )
            })
            .collect()
    }

    fn texts(text: &str) -> Vec<String> {
        merged(text).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_abbreviation_and_acronym() {
        assert_eq!(
            texts("Seen by Dr. Smith, e.g. today."),
            vec!["Seen", "by", "Dr.", "Smith", ",", "e.g.", "today", "."]
        );
    }

    #[test]
    fn test_numbers() {
        let got = merged("Temp 38.5 on 1/2/2024.");
        assert_eq!(got[1], ("38.5".to_string(), TokenClass::Number));
        assert_eq!(got[3], ("1/2/2024".to_string(), TokenClass::Number));
        assert_eq!(got.last().unwrap().0, ".");
    }

    #[test]
    fn test_hyphenated() {
        assert_eq!(texts("Chest x-ray normal."), vec!["Chest", "x-ray", "normal", "."]);
    }

    #[test]
    fn test_constituents_superseded() {
        let mut graph = AnnotationGraph::new("Dr. Smith");
        SegmentStage::new().process(&mut graph).unwrap();
        SentenceStage::new(Arc::new(RuleSentenceModel::default()))
            .process(&mut graph)
            .unwrap();
        TokenizerStage::new().process(&mut graph).unwrap();
        TokenMergeStage::new(Arc::new(Abbreviations::builtin()))
            .process(&mut graph)
            .unwrap();

        let retired: Vec<_> = graph.superseded().map(|a| graph.covered_text(a.span)).collect();
        assert_eq!(retired, vec!["Dr", "."]);
        assert_eq!(graph.count(AnnotationType::Token), 2);
    }
}
