//! Penn-Treebank-flavoured tokenization.
//!
//! Alphanumeric runs become words (or numbers when all digits), contraction
//! suffixes (`n't`, `'s`, `'re`, ...) split off their host word, and every
//! other non-space character is a one-character punctuation or symbol
//! token. Decimals, fractions, acronyms and hyphenated words come out in
//! pieces here and are glued back by [`super::TokenMergeStage`].

use super::{sentence_spans, Stage};
use crate::Result;
use clinanno_core::{AnnotationGraph, AnnotationKind, Span, Token, TokenClass};
use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+|'(?i:s|re|ve|ll|d|m|t)\b|\S").unwrap());

const PUNCTUATION: &str = ".,;:!?()[]{}\"'`-/\u{2013}\u{2014}\u{2018}\u{2019}\u{201C}\u{201D}\u{2026}";

/// Splits sentences into tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizerStage;

impl TokenizerStage {
    /// Create the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Tokens of `text[span]` as absolute spans with their class.
    #[must_use]
    pub fn tokenize(text: &str, span: Span) -> Vec<(Span, TokenClass)> {
        let Some(slice) = text.get(span.range()) else {
            return Vec::new();
        };
        let mut tokens: Vec<(Span, TokenClass)> = Vec::new();
        for m in TOKEN.find_iter(slice) {
            let piece = m.as_str();
            let at = Span::new(span.begin + m.start(), span.begin + m.end());

            if piece.starts_with('\'') && piece.len() > 1 {
                // "don't" -> "do" + "n't"
                if piece.eq_ignore_ascii_case("'t") {
                    if let Some(last) = tokens.last_mut() {
                        let host = &text[last.0.range()];
                        if last.0.end == at.begin
                            && last.1 == TokenClass::Word
                            && host.len() > 1
                            && host.ends_with(['n', 'N'])
                        {
                            last.0.end -= 1;
                            let split = last.0.end;
                            tokens.push((Span::new(split, at.end), TokenClass::Contraction));
                            continue;
                        }
                    }
                }
                tokens.push((at, TokenClass::Contraction));
                continue;
            }
            tokens.push((at, classify(piece)));
        }
        tokens
    }
}

fn classify(piece: &str) -> TokenClass {
    let mut chars = piece.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_alphanumeric() => {
            if PUNCTUATION.contains(c) {
                TokenClass::Punctuation
            } else {
                TokenClass::Symbol
            }
        }
        _ if piece.chars().all(|c| c.is_numeric()) => TokenClass::Number,
        _ => TokenClass::Word,
    }
}

impl Stage for TokenizerStage {
    fn name(&self) -> &'static str {
        "tokenizer"
    }

    fn process(&self, graph: &mut AnnotationGraph) -> Result<()> {
        for sentence in sentence_spans(graph) {
            for (span, class) in Self::tokenize(graph.text(), sentence) {
                graph.add(span, AnnotationKind::Token(Token::new(class)))?;
            }
        }
        Ok(())
    }
}
