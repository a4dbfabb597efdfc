//! Model interfaces consumed by the stage chain, plus built-in rule-based
//! implementations.
//!
//! Every model is loaded once at startup and shared read-only across
//! document workers, so all traits require `Send + Sync`.
//!
//! | Trait                | Built-in           | Resource format            |
//! |----------------------|--------------------|----------------------------|
//! | [`SentenceModel`]    | [`RuleSentenceModel`] | abbreviation per line   |
//! | [`PosModel`]         | [`LexiconTagger`]  | `word<TAB>TAG`             |
//! | [`ChunkModel`]       | [`RuleChunker`]    | `TAG<TAB>ROLE`             |
//! | [`DictionaryResolver`] | [`TermDictionary`] | `CUI\|TUI\|term[\|codes]` |
//!
//! Lexical normalization uses [`LexicalNormalizer`] (`word<TAB>base`).
//!
//! A missing or malformed resource is a startup-fatal
//! [`Error::ModelInit`](crate::Error::ModelInit).

pub mod assertion;
pub mod chunk;
pub mod dictionary;
pub mod lvg;
pub mod pos;
pub mod sentence;

pub use assertion::AssertionContext;
pub use chunk::{ChunkRole, RuleChunker};
pub use dictionary::{mention_type_for_tui, TermDictionary};
pub use lvg::LexicalNormalizer;
pub use pos::LexiconTagger;
pub use sentence::{Abbreviations, RuleSentenceModel};

use crate::config::PipelineConfig;
use crate::{Error, Result};
use clinanno_core::{MentionType, OntologyConcept, Polarity, Span};
use std::path::Path;
use std::sync::Arc;

// =============================================================================
// Model traits
// =============================================================================

/// Sentence boundary detection.
pub trait SentenceModel: Send + Sync {
    /// Sentence spans inside `region` of `text`, non-overlapping and in
    /// document order. Offsets are relative to `text`.
    fn detect(&self, text: &str, region: Span) -> Result<Vec<Span>>;

    /// Model name for logging.
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// Part-of-speech tagging over one sentence.
pub trait PosModel: Send + Sync {
    /// One Penn Treebank tag per word.
    fn tag(&self, words: &[&str]) -> Result<Vec<String>>;

    /// Model name for logging.
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// A phrase over a half-open range of token indices within one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    /// First token index
    pub start: usize,
    /// One past the last token index
    pub end: usize,
    /// Phrase label (`NP`, `PP`, `VP`, ...)
    pub label: String,
}

impl ChunkSpan {
    /// Create a chunk span.
    #[must_use]
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

/// Shallow parsing over one tagged sentence.
pub trait ChunkModel: Send + Sync {
    /// Non-overlapping phrases in token order.
    fn chunk(&self, words: &[&str], tags: &[&str]) -> Result<Vec<ChunkSpan>>;

    /// Model name for logging.
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// Input to a dictionary lookup: one window plus its sentence context.
#[derive(Debug, Clone, Copy)]
pub struct LookupRequest<'a> {
    /// Full document text
    pub text: &'a str,
    /// The lookup window
    pub window: Span,
    /// Live token spans inside the window, in order
    pub window_tokens: &'a [Span],
    /// Live token spans of the enclosing sentence, in order
    pub sentence_tokens: &'a [Span],
}

/// One dictionary hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTerm {
    /// Matched text span
    pub span: Span,
    /// Semantic subtype
    pub mention_type: MentionType,
    /// Assertion polarity in context
    pub polarity: Polarity,
    /// Concepts for the matched term
    pub concepts: Vec<OntologyConcept>,
}

/// Maps lookup windows to ontology concepts.
pub trait DictionaryResolver: Send + Sync {
    /// Zero or more mentions inside the window.
    fn resolve(&self, request: &LookupRequest<'_>) -> Result<Vec<ResolvedTerm>>;

    /// Resolver name for logging.
    fn name(&self) -> &'static str {
        "unknown"
    }
}

// =============================================================================
// ModelSet
// =============================================================================

/// All shared, read-only models a pipeline needs.
#[derive(Clone)]
pub struct ModelSet {
    /// Abbreviations shared by sentence detection and token merging
    pub abbreviations: Arc<Abbreviations>,
    /// Sentence detector
    pub sentence: Arc<dyn SentenceModel>,
    /// POS tagger
    pub pos: Arc<dyn PosModel>,
    /// Chunker
    pub chunk: Arc<dyn ChunkModel>,
    /// Dictionary resolver
    pub dictionary: Arc<dyn DictionaryResolver>,
    /// Base-form normalizer
    pub normalizer: Arc<LexicalNormalizer>,
}

impl std::fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSet")
            .field("sentence", &self.sentence.name())
            .field("pos", &self.pos.name())
            .field("chunk", &self.chunk.name())
            .field("dictionary", &self.dictionary.name())
            .finish()
    }
}

impl ModelSet {
    /// Load every model named in `config`, falling back to built-in
    /// resources where a path is absent. The dictionary path is required.
    pub fn load(config: &PipelineConfig) -> Result<Self> {
        let abbreviations = match &config.models.sentence {
            Some(path) => Abbreviations::from_file(path)?,
            None => Abbreviations::builtin(),
        };
        let pos = match &config.models.pos {
            Some(path) => LexiconTagger::from_file(path)?,
            None => LexiconTagger::builtin(),
        };
        let chunk = match &config.models.chunk {
            Some(path) => RuleChunker::from_file(path)?,
            None => RuleChunker::builtin(),
        };
        let normalizer = match &config.models.lvg {
            Some(path) => LexicalNormalizer::from_file(path)?,
            None => LexicalNormalizer::builtin(),
        };
        let dictionary_path = config
            .dictionary
            .path
            .as_deref()
            .ok_or_else(|| Error::config("missing required setting 'dictionary.path'"))?;
        let assertion = AssertionContext::new(config.lookup.max_negation_distance);
        let dictionary = TermDictionary::from_file(dictionary_path)?.with_assertion(assertion);
        log::info!(
            "Loaded dictionary {} ({} terms)",
            dictionary_path.display(),
            dictionary.len()
        );

        let abbreviations = Arc::new(abbreviations);
        Ok(Self {
            sentence: Arc::new(RuleSentenceModel::new(Arc::clone(&abbreviations))),
            abbreviations,
            pos: Arc::new(pos),
            chunk: Arc::new(chunk),
            dictionary: Arc::new(dictionary),
            normalizer: Arc::new(normalizer),
        })
    }

    /// Built-in models around the given dictionary.
    #[must_use]
    pub fn with_dictionary(dictionary: TermDictionary) -> Self {
        let abbreviations = Arc::new(Abbreviations::builtin());
        Self {
            sentence: Arc::new(RuleSentenceModel::new(Arc::clone(&abbreviations))),
            abbreviations,
            pos: Arc::new(LexiconTagger::builtin()),
            chunk: Arc::new(RuleChunker::builtin()),
            dictionary: Arc::new(dictionary),
            normalizer: Arc::new(LexicalNormalizer::builtin()),
        }
    }
}

/// Read a resource file, mapping failures to a startup-fatal error.
pub(crate) fn read_resource(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::model_init(format!("cannot read {}: {}", path.display(), e)))
}

/// Non-blank, non-comment lines of a resource with 1-based line numbers.
pub(crate) fn resource_lines(raw: &str) -> impl Iterator<Item = (usize, &str)> {
    raw.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse a two-column tab-separated resource.
pub(crate) fn parse_pairs(raw: &str, path: &Path) -> Result<Vec<(String, String)>> {
    resource_lines(raw)
        .map(|(lineno, line)| {
            let mut parts = line.split('\t').map(str::trim);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(a), Some(b), None) if !a.is_empty() && !b.is_empty() => {
                    Ok((a.to_string(), b.to_string()))
                }
                _ => Err(Error::model_init(format!(
                    "{}:{}: expected two tab-separated columns",
                    path.display(),
                    lineno
                ))),
            }
        })
        .collect()
}
