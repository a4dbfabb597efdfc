//! Cue-based assertion (negation and uncertainty) detection.
//!
//! Works on the lower-cased words of one sentence. A cue applies to a
//! mention when it lies within `max_distance` words of it and no scope
//! terminator ("but", "however", ...) sits in between. The nearest cue
//! wins; cues before the mention are checked before cues after it.

use crate::config::DEFAULT_NEGATION_DISTANCE;
use clinanno_core::Polarity;
use std::collections::HashSet;
use std::ops::Range;

const PRE_NEGATION: &[&str] = &[
    "no",
    "not",
    "denies",
    "denied",
    "deny",
    "denying",
    "without",
    "negative for",
    "free of",
    "absence of",
    "no evidence of",
    "no signs of",
    "rules out",
    "ruled out",
    "never had",
    "resolved",
];

const POST_NEGATION: &[&str] = &[
    "was ruled out",
    "is ruled out",
    "has resolved",
    "unlikely",
    "absent",
    "free",
];

const PRE_UNCERTAINTY: &[&str] = &[
    "possible",
    "possibly",
    "probable",
    "probably",
    "likely",
    "suspected",
    "suspicious for",
    "may have",
    "questionable",
    "rule out",
    "r/o",
    "concern for",
    "cannot exclude",
];

const POST_UNCERTAINTY: &[&str] = &["is suspected", "not excluded", "cannot be excluded", "?"];

const TERMINATORS: &[&str] = &[
    "but", "however", "although", "though", "except", "aside", "yet", "which", "because", ".",
    ";",
];

fn phrases(list: &[&str]) -> Vec<Vec<String>> {
    list.iter()
        .map(|cue| cue.split_whitespace().map(str::to_string).collect())
        .collect()
}

/// Negation and uncertainty cue matcher.
#[derive(Debug, Clone)]
pub struct AssertionContext {
    pre_negation: Vec<Vec<String>>,
    post_negation: Vec<Vec<String>>,
    pre_uncertainty: Vec<Vec<String>>,
    post_uncertainty: Vec<Vec<String>>,
    terminators: HashSet<String>,
    max_distance: usize,
}

impl AssertionContext {
    /// Built-in cue lists with the given scope.
    #[must_use]
    pub fn new(max_distance: usize) -> Self {
        Self {
            pre_negation: phrases(PRE_NEGATION),
            post_negation: phrases(POST_NEGATION),
            pre_uncertainty: phrases(PRE_UNCERTAINTY),
            post_uncertainty: phrases(POST_UNCERTAINTY),
            terminators: TERMINATORS.iter().map(|t| (*t).to_string()).collect(),
            max_distance,
        }
    }

    /// Scope in words.
    #[must_use]
    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// Polarity of the mention covering `mention` (word indices) within
    /// `words` (lower-cased sentence words).
    #[must_use]
    pub fn polarity(&self, words: &[String], mention: Range<usize>) -> Polarity {
        self.scan_before(words, mention.start)
            .or_else(|| self.scan_after(words, mention.end))
            .unwrap_or(Polarity::Positive)
    }

    fn scan_before(&self, words: &[String], start: usize) -> Option<Polarity> {
        let start = start.min(words.len());
        let floor = start.saturating_sub(self.max_distance);
        let mut end = start;
        while end > floor {
            if self.terminators.contains(&words[end - 1]) {
                return None;
            }
            let prefix = &words[..end];
            if self.pre_negation.iter().any(|cue| prefix.ends_with(cue)) {
                return Some(Polarity::Negated);
            }
            if self.pre_uncertainty.iter().any(|cue| prefix.ends_with(cue)) {
                return Some(Polarity::Uncertain);
            }
            end -= 1;
        }
        None
    }

    fn scan_after(&self, words: &[String], end: usize) -> Option<Polarity> {
        let ceiling = end.saturating_add(self.max_distance).min(words.len());
        for begin in end..ceiling {
            let suffix = &words[begin..];
            if self.post_negation.iter().any(|cue| suffix.starts_with(cue)) {
                return Some(Polarity::Negated);
            }
            if self.post_uncertainty.iter().any(|cue| suffix.starts_with(cue)) {
                return Some(Polarity::Uncertain);
            }
            if self.terminators.contains(&words[begin]) {
                return None;
            }
        }
        None
    }
}

impl Default for AssertionContext {
    fn default() -> Self {
        Self::new(DEFAULT_NEGATION_DISTANCE)
    }
}
