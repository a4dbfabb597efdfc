//! Tag-role grammar chunker.
//!
//! Each POS tag maps to a [`ChunkRole`]; maximal runs of compatible roles
//! become phrases:
//!
//! ```text
//! DT JJ NN NN  IN  DT NN   VBZ VBN   RB
//! └──── NP ──┘ PP  └─NP─┘  └─ VP ─┘ ADVP
//! ```
//!
//! A run of modifiers with no noun becomes `ADJP`. Tokens with role
//! `Other` (punctuation, symbols) are left outside every chunk.

use super::{parse_pairs, read_resource, ChunkModel, ChunkSpan};
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// Phrase-building role of a POS tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkRole {
    /// Noun-phrase head (nouns, pronouns, numbers)
    Noun,
    /// Noun-phrase premodifier (determiners, adjectives, possessives)
    Modifier,
    /// Preposition
    Prep,
    /// Verb group member
    Verb,
    /// Adverb
    Adverb,
    /// Outside any chunk
    Other,
}

impl ChunkRole {
    /// Parse a role name from a grammar file.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name.to_ascii_uppercase().as_str() {
            "NOUN" => Self::Noun,
            "MODIFIER" => Self::Modifier,
            "PREP" => Self::Prep,
            "VERB" => Self::Verb,
            "ADV" | "ADVERB" => Self::Adverb,
            "OTHER" => Self::Other,
            _ => return None,
        })
    }
}

const BUILTIN_ROLES: &[(&str, ChunkRole)] = &[
    ("NN", ChunkRole::Noun),
    ("NNS", ChunkRole::Noun),
    ("NNP", ChunkRole::Noun),
    ("NNPS", ChunkRole::Noun),
    ("PRP", ChunkRole::Noun),
    ("CD", ChunkRole::Noun),
    ("DT", ChunkRole::Modifier),
    ("PDT", ChunkRole::Modifier),
    ("JJ", ChunkRole::Modifier),
    ("JJR", ChunkRole::Modifier),
    ("JJS", ChunkRole::Modifier),
    ("PRP$", ChunkRole::Modifier),
    ("POS", ChunkRole::Modifier),
    ("IN", ChunkRole::Prep),
    ("TO", ChunkRole::Prep),
    ("VB", ChunkRole::Verb),
    ("VBD", ChunkRole::Verb),
    ("VBG", ChunkRole::Verb),
    ("VBN", ChunkRole::Verb),
    ("VBP", ChunkRole::Verb),
    ("VBZ", ChunkRole::Verb),
    ("MD", ChunkRole::Verb),
    ("RB", ChunkRole::Adverb),
    ("RBR", ChunkRole::Adverb),
    ("RBS", ChunkRole::Adverb),
];

/// Rule-based shallow parser.
#[derive(Debug, Clone)]
pub struct RuleChunker {
    roles: HashMap<String, ChunkRole>,
}

impl RuleChunker {
    /// Built-in Penn tag grammar.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            roles: BUILTIN_ROLES
                .iter()
                .map(|(tag, role)| ((*tag).to_string(), *role))
                .collect(),
        }
    }

    /// Built-in grammar overridden by a `TAG<TAB>ROLE` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = read_resource(path)?;
        let mut chunker = Self::builtin();
        for (tag, role) in parse_pairs(&raw, path)? {
            let parsed = ChunkRole::parse(&role).ok_or_else(|| {
                Error::model_init(format!("{}: unknown chunk role '{}'", path.display(), role))
            })?;
            chunker.roles.insert(tag, parsed);
        }
        Ok(chunker)
    }

    /// Role of a tag; unknown tags are `Other`.
    #[must_use]
    pub fn role(&self, tag: &str) -> ChunkRole {
        self.roles.get(tag).copied().unwrap_or(ChunkRole::Other)
    }
}

impl Default for RuleChunker {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ChunkModel for RuleChunker {
    fn chunk(&self, words: &[&str], tags: &[&str]) -> Result<Vec<ChunkSpan>> {
        if words.len() != tags.len() {
            return Err(Error::invalid_input(format!(
                "{} words but {} tags",
                words.len(),
                tags.len()
            )));
        }
        let roles: Vec<ChunkRole> = tags.iter().map(|t| self.role(t)).collect();
        let mut chunks = Vec::new();
        let mut i = 0;
        while i < roles.len() {
            let start = i;
            match roles[i] {
                ChunkRole::Noun | ChunkRole::Modifier => {
                    // Modifiers, then nouns; a modifier after a noun starts a new phrase.
                    while i < roles.len() && roles[i] == ChunkRole::Modifier {
                        i += 1;
                    }
                    let heads = i;
                    while i < roles.len() && roles[i] == ChunkRole::Noun {
                        i += 1;
                    }
                    let label = if i > heads { "NP" } else { "ADJP" };
                    chunks.push(ChunkSpan::new(start, i, label));
                }
                ChunkRole::Prep => {
                    i += 1;
                    chunks.push(ChunkSpan::new(start, i, "PP"));
                }
                ChunkRole::Verb => {
                    while i < roles.len()
                        && (roles[i] == ChunkRole::Verb
                            || (roles[i] == ChunkRole::Adverb
                                && roles.get(i + 1) == Some(&ChunkRole::Verb)))
                    {
                        i += 1;
                    }
                    chunks.push(ChunkSpan::new(start, i, "VP"));
                }
                ChunkRole::Adverb => {
                    while i < roles.len() && roles[i] == ChunkRole::Adverb {
                        i += 1;
                    }
                    chunks.push(ChunkSpan::new(start, i, "ADVP"));
                }
                ChunkRole::Other => i += 1,
            }
        }
        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "rule"
    }
}
