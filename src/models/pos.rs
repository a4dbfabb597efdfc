//! Lexicon + suffix-rule part-of-speech tagger.

use super::{parse_pairs, read_resource, PosModel};
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// Closed-class words and frequent clinical vocabulary.
const BUILTIN_LEXICON: &[(&str, &str)] = &[
    // determiners, pronouns
    ("the", "DT"),
    ("a", "DT"),
    ("an", "DT"),
    ("no", "DT"),
    ("any", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("some", "DT"),
    ("he", "PRP"),
    ("she", "PRP"),
    ("it", "PRP"),
    ("they", "PRP"),
    ("i", "PRP"),
    ("we", "PRP"),
    ("his", "PRP$"),
    ("her", "PRP$"),
    ("their", "PRP$"),
    ("its", "PRP$"),
    // prepositions, conjunctions
    ("of", "IN"),
    ("in", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("for", "IN"),
    ("with", "IN"),
    ("without", "IN"),
    ("from", "IN"),
    ("by", "IN"),
    ("after", "IN"),
    ("before", "IN"),
    ("since", "IN"),
    ("during", "IN"),
    ("into", "IN"),
    ("to", "TO"),
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("nor", "CC"),
    // auxiliaries, frequent verbs
    ("is", "VBZ"),
    ("are", "VBP"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("be", "VB"),
    ("been", "VBN"),
    ("has", "VBZ"),
    ("have", "VBP"),
    ("had", "VBD"),
    ("does", "VBZ"),
    ("did", "VBD"),
    ("will", "MD"),
    ("may", "MD"),
    ("can", "MD"),
    ("should", "MD"),
    ("denies", "VBZ"),
    ("deny", "VBP"),
    ("denied", "VBD"),
    ("reports", "VBZ"),
    ("reported", "VBD"),
    ("complains", "VBZ"),
    ("presents", "VBZ"),
    ("presented", "VBD"),
    ("shows", "VBZ"),
    ("reveals", "VBZ"),
    ("revealed", "VBD"),
    ("takes", "VBZ"),
    ("take", "VB"),
    ("started", "VBD"),
    ("continue", "VB"),
    // adverbs, particles
    ("not", "RB"),
    ("n't", "RB"),
    ("also", "RB"),
    ("now", "RB"),
    ("today", "NN"),
    // frequent clinical nouns that the suffix rules would mis-tag
    ("patient", "NN"),
    ("chest", "NN"),
    ("pain", "NN"),
    ("history", "NN"),
    ("fever", "NN"),
    ("cough", "NN"),
    ("diabetes", "NN"),
    ("mellitus", "NN"),
    ("pneumonia", "NN"),
    ("nausea", "NN"),
    ("status", "NN"),
    ("abdomen", "NN"),
    ("pressure", "NN"),
    ("blood", "NN"),
    ("breath", "NN"),
    ("shortness", "NN"),
    ("possible", "JJ"),
    ("likely", "JJ"),
    ("acute", "JJ"),
    ("chronic", "JJ"),
    ("negative", "JJ"),
    ("positive", "JJ"),
    ("mild", "JJ"),
    ("severe", "JJ"),
    ("left", "JJ"),
    ("right", "JJ"),
];

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d[\d,]*(?:[./]\d+)*$").unwrap());

/// Tagger backed by a word→tag lexicon with suffix fallbacks.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: HashMap<String, String>,
}

impl LexiconTagger {
    /// The built-in lexicon only.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            lexicon: BUILTIN_LEXICON
                .iter()
                .map(|(w, t)| ((*w).to_string(), (*t).to_string()))
                .collect(),
        }
    }

    /// Built-in lexicon overridden by a `word<TAB>TAG` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = read_resource(path)?;
        let mut tagger = Self::builtin();
        for (word, tag) in parse_pairs(&raw, path)? {
            tagger.lexicon.insert(word.to_lowercase(), tag);
        }
        Ok(tagger)
    }

    /// Number of lexicon entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    /// True when the lexicon is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    fn tag_word(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            return tag.clone();
        }
        if let Some(tag) = punctuation_tag(word) {
            return tag.to_string();
        }
        if NUMBER.is_match(word) {
            return "CD".to_string();
        }
        suffix_tag(&lower).to_string()
    }
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PosModel for LexiconTagger {
    fn tag(&self, words: &[&str]) -> Result<Vec<String>> {
        Ok(words.iter().map(|w| self.tag_word(w)).collect())
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

fn punctuation_tag(word: &str) -> Option<&'static str> {
    Some(match word {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "-" | "--" => ":",
        "(" | "[" | "{" => "-LRB-",
        ")" | "]" | "}" => "-RRB-",
        "\"" | "'" | "`" | "``" | "''" => "''",
        "$" => "$",
        "#" => "#",
        _ if !word.is_empty() && word.chars().all(|c| !c.is_alphanumeric()) => "SYM",
        _ => return None,
    })
}

fn suffix_tag(lower: &str) -> &'static str {
    let long = lower.chars().count() > 4;
    if long && lower.ends_with("ly") {
        "RB"
    } else if long && lower.ends_with("ing") {
        "VBG"
    } else if long && lower.ends_with("ed") {
        "VBN"
    } else if long
        && ["ous", "ive", "ful", "less", "able", "ible", "ic", "al"]
            .iter()
            .any(|s| lower.ends_with(s))
    {
        "JJ"
    } else if lower.len() > 3
        && lower.ends_with('s')
        && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s))
    {
        "NNS"
    } else {
        "NN"
    }
}
