//! Rule-based sentence boundary detection.
//!
//! A sentence ends at `.`, `!` or `?` followed by whitespace (unless the
//! period closes a known abbreviation), at a blank line, and at the end of
//! a line whose text ends with `:` (section headings, list labels).

use super::{read_resource, resource_lines, SentenceModel};
use crate::Result;
use clinanno_core::Span;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Common clinical abbreviations written with a trailing period.
const BUILTIN_ABBREVIATIONS: &[&str] = &[
    "dr", "mr", "mrs", "ms", "pt", "vs", "approx", "e.g", "i.e", "b.i.d", "t.i.d", "q.i.d",
    "q.d", "q.h", "p.o", "h.s", "p.r.n", "a.m", "p.m", "cf", "jr", "sr", "st", "fig",
];

/// Lower-cased abbreviation list, without the final period.
#[derive(Debug, Clone, Default)]
pub struct Abbreviations {
    words: HashSet<String>,
}

impl Abbreviations {
    /// The built-in list.
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN_ABBREVIATIONS.iter().copied().collect()
    }

    /// Built-in list extended with one abbreviation per line of `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = read_resource(path)?;
        let mut abbreviations = Self::builtin();
        for (_, line) in resource_lines(&raw) {
            abbreviations.insert(line);
        }
        Ok(abbreviations)
    }

    /// Add one abbreviation; a trailing period is ignored.
    pub fn insert(&mut self, word: &str) {
        let word = word.trim().trim_end_matches('.').to_lowercase();
        if !word.is_empty() {
            self.words.insert(word);
        }
    }

    /// True if `word` (with or without trailing period) is listed.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words
            .contains(&word.trim_end_matches('.').to_lowercase())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Abbreviations {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut abbreviations = Self::default();
        for word in iter {
            abbreviations.insert(word);
        }
        abbreviations
    }
}

/// Punctuation and layout driven sentence detector.
#[derive(Debug, Clone)]
pub struct RuleSentenceModel {
    abbreviations: Arc<Abbreviations>,
}

impl RuleSentenceModel {
    /// Create a detector over a shared abbreviation list.
    #[must_use]
    pub fn new(abbreviations: Arc<Abbreviations>) -> Self {
        Self { abbreviations }
    }

    /// True if the word ending right before `end` is a listed abbreviation.
    fn ends_with_abbreviation(&self, slice: &str, end: usize) -> bool {
        let word = slice[..end]
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or("")
            .trim_start_matches(|c: char| !c.is_alphanumeric());
        !word.is_empty() && self.abbreviations.contains(word)
    }
}

impl Default for RuleSentenceModel {
    fn default() -> Self {
        Self::new(Arc::new(Abbreviations::builtin()))
    }
}

impl SentenceModel for RuleSentenceModel {
    fn detect(&self, text: &str, region: Span) -> Result<Vec<Span>> {
        region.validate(text)?;
        let slice = &text[region.range()];
        let mut sentences = Vec::new();
        let mut push = |start: usize, end: usize| {
            let piece = &slice[start..end];
            let lead = piece.len() - piece.trim_start().len();
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                let begin = region.begin + start + lead;
                sentences.push(Span::new(begin, begin + trimmed.len()));
            }
        };

        let mut start = 0;
        let mut chars = slice.char_indices().peekable();
        while let Some((pos, c)) = chars.next() {
            let next = chars.peek().map(|&(_, n)| n);
            let after = pos + c.len_utf8();
            match c {
                '.' | '!' | '?' => {
                    let at_break = next.map_or(true, char::is_whitespace);
                    if at_break && !(c == '.' && self.ends_with_abbreviation(slice, pos)) {
                        push(start, after);
                        start = after;
                    }
                }
                '\n' => {
                    let line = slice[start..pos].trim_end();
                    let rest = &slice[after..];
                    let gap = &rest[..rest.len() - rest.trim_start().len()];
                    if line.ends_with(':') || gap.contains('\n') {
                        push(start, pos);
                        start = after;
                    }
                }
                _ => {}
            }
        }
        push(start, slice.len());
        Ok(sentences)
    }

    fn name(&self) -> &'static str {
        "rule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<&str> {
        let model = RuleSentenceModel::default();
        model
            .detect(text, Span::new(0, text.len()))
            .unwrap()
            .into_iter()
            .map(|s| &text[s.range()])
            .collect()
    }

    #[test]
    fn test_terminal_punctuation() {
        assert_eq!(
            detect("Patient denies chest pain. No fever!  Cough?"),
            vec!["Patient denies chest pain.", "No fever!", "Cough?"]
        );
    }

    #[test]
    fn test_abbreviation_does_not_split() {
        assert_eq!(
            detect("Seen by Dr. Smith today. Take b.i.d. with food."),
            vec!["Seen by Dr. Smith today.", "Take b.i.d. with food."]
        );
    }

    #[test]
    fn test_decimal_does_not_split() {
        assert_eq!(detect("Temp 38.5 today."), vec!["Temp 38.5 today."]);
    }

    #[test]
    fn test_blank_line_and_heading() {
        assert_eq!(
            detect("HISTORY:\nChest pain\n\nNo fever"),
            vec!["HISTORY:", "Chest pain", "No fever"]
        );
    }

    #[test]
    fn test_region_offsets_are_absolute() {
        let text = "xxxx Pain here. More.";
        let model = RuleSentenceModel::default();
        let spans = model.detect(text, Span::new(5, text.len())).unwrap();
        assert_eq!(spans, vec![Span::new(5, 15), Span::new(16, 21)]);
    }

    #[test]
    fn test_custom_abbreviation_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abbr.txt");
        std::fs::write(&path, "# extra\nhx.\n").unwrap();
        let abbreviations = Abbreviations::from_file(&path).unwrap();
        assert!(abbreviations.contains("Hx."));
        assert!(abbreviations.contains("dr"));
    }
}
