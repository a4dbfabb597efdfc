//! Typed annotations stored in an [`crate::AnnotationGraph`].
//!
//! ```text
//! Segment ─┬─ Sentence ─┬─ Token (pos, normalized form)
//!          │            ├─ Chunk (NP / PP / VP ...)
//!          │            └─ LookupWindow ── Mention ── OntologyConcept*
//! ```

use crate::{OntologyConcept, Span};
use serde::{Deserialize, Serialize};

/// Identifier of an annotation, unique within one graph.
pub type AnnotationId = u64;

/// Segment id used when a document has no recognizable section headers.
pub const SIMPLE_SEGMENT: &str = "SIMPLE_SEGMENT";

/// One annotation: a span plus what kind of thing it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Identifier within the owning graph
    pub id: AnnotationId,
    /// Covered byte range
    pub span: Span,
    /// Variant payload
    pub kind: AnnotationKind,
}

impl Annotation {
    /// The type used for indexing this annotation.
    #[must_use]
    pub fn annotation_type(&self) -> AnnotationType {
        self.kind.annotation_type()
    }

    /// Start offset.
    #[must_use]
    pub fn begin(&self) -> usize {
        self.span.begin
    }

    /// End offset.
    #[must_use]
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Token payload, if this is a token.
    #[must_use]
    pub fn as_token(&self) -> Option<&Token> {
        match &self.kind {
            AnnotationKind::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Mention payload, if this is a mention.
    #[must_use]
    pub fn as_mention(&self) -> Option<&Mention> {
        match &self.kind {
            AnnotationKind::Mention(mention) => Some(mention),
            _ => None,
        }
    }

    /// Chunk label, if this is a chunk.
    #[must_use]
    pub fn chunk_type(&self) -> Option<&str> {
        match &self.kind {
            AnnotationKind::Chunk { chunk_type } => Some(chunk_type),
            _ => None,
        }
    }
}

/// Variant payload of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Coarse structural region (report section).
    Segment {
        /// Section identifier (heading text or [`SIMPLE_SEGMENT`])
        id: String,
    },
    /// Sentence within a segment.
    Sentence {
        /// Zero-based sentence number in document order
        number: usize,
    },
    /// Token within a sentence.
    Token(Token),
    /// Shallow-parse phrase.
    Chunk {
        /// Phrase label, e.g. `NP`, `PP`
        chunk_type: String,
    },
    /// Span submitted to dictionary lookup.
    LookupWindow,
    /// Entity or event mention resolved against the dictionary.
    Mention(Mention),
}

impl AnnotationKind {
    /// The type used for indexing.
    #[must_use]
    pub fn annotation_type(&self) -> AnnotationType {
        match self {
            Self::Segment { .. } => AnnotationType::Segment,
            Self::Sentence { .. } => AnnotationType::Sentence,
            Self::Token(_) => AnnotationType::Token,
            Self::Chunk { .. } => AnnotationType::Chunk,
            Self::LookupWindow => AnnotationType::LookupWindow,
            Self::Mention(m) if m.mention_type.is_event() => AnnotationType::EventMention,
            Self::Mention(_) => AnnotationType::EntityMention,
        }
    }
}

/// Index key for type-filtered iteration.
///
/// The declaration order is the type priority used to order co-located
/// annotations of different types: `Segment < Sentence < Token < ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationType {
    /// [`AnnotationKind::Segment`]
    Segment,
    /// [`AnnotationKind::Sentence`]
    Sentence,
    /// [`AnnotationKind::Token`]
    Token,
    /// [`AnnotationKind::Chunk`]
    Chunk,
    /// [`AnnotationKind::LookupWindow`]
    LookupWindow,
    /// Mentions whose type is an event subtype
    EventMention,
    /// All other mentions
    EntityMention,
}

impl AnnotationType {
    /// All types in priority order.
    pub const ALL: [AnnotationType; 7] = [
        Self::Segment,
        Self::Sentence,
        Self::Token,
        Self::Chunk,
        Self::LookupWindow,
        Self::EventMention,
        Self::EntityMention,
    ];

    /// Priority rank; lower sorts first among co-located annotations.
    #[must_use]
    pub fn priority(self) -> u8 {
        self as u8
    }
}

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lexical class assigned by the tokenizer
    pub class: TokenClass,
    /// Penn Treebank part-of-speech tag
    pub pos: Option<String>,
    /// Normalized base form
    pub normalized: Option<String>,
}

impl Token {
    /// A fresh token with no tag or normal form.
    #[must_use]
    pub fn new(class: TokenClass) -> Self {
        Self {
            class,
            pos: None,
            normalized: None,
        }
    }
}

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenClass {
    /// Alphabetic (or alphanumeric) word
    Word,
    /// Numeric literal, including decimals and fractions
    Number,
    /// Sentence or clause punctuation
    Punctuation,
    /// Other symbols (`%`, `+`, `#`, ...)
    Symbol,
    /// Contraction suffix such as `n't` or `'s`
    Contraction,
}

impl TokenClass {
    /// Type name used in the interchange format.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Word => "WordToken",
            Self::Number => "NumToken",
            Self::Punctuation => "PunctuationToken",
            Self::Symbol => "SymbolToken",
            Self::Contraction => "ContractionToken",
        }
    }

    /// Inverse of [`TokenClass::type_name`].
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "WordToken" => Self::Word,
            "NumToken" => Self::Number,
            "PunctuationToken" => Self::Punctuation,
            "SymbolToken" => Self::Symbol,
            "ContractionToken" => Self::Contraction,
            _ => return None,
        })
    }
}

/// Mention payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    /// Semantic subtype
    pub mention_type: MentionType,
    /// Assertion polarity
    pub polarity: Polarity,
    /// Attached ontology concepts, owned by this mention
    pub concepts: Vec<OntologyConcept>,
}

impl Mention {
    /// Create a mention with no concepts.
    #[must_use]
    pub fn new(mention_type: MentionType, polarity: Polarity) -> Self {
        Self {
            mention_type,
            polarity,
            concepts: Vec::new(),
        }
    }

    /// Attach concepts.
    #[must_use]
    pub fn with_concepts(mut self, concepts: Vec<OntologyConcept>) -> Self {
        self.concepts = concepts;
        self
    }
}

/// Semantic subtype of a mention.
///
/// Event subtypes are processed in the event block of code extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MentionType {
    /// Generic entity
    Entity,
    /// Generic event
    Event,
    /// Anatomical site (entity)
    AnatomicalSite,
    /// Disease or disorder (event)
    DiseaseDisorder,
    /// Sign or symptom (event)
    SignSymptom,
    /// Procedure (event)
    Procedure,
    /// Medication (event)
    Medication,
    /// Laboratory finding (event)
    Lab,
}

impl MentionType {
    /// True for event subtypes.
    #[must_use]
    pub fn is_event(self) -> bool {
        !matches!(self, Self::Entity | Self::AnatomicalSite)
    }

    /// Type name, used both as the semantic type in code output and as the
    /// element name in the interchange format.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Entity => "EntityMention",
            Self::Event => "EventMention",
            Self::AnatomicalSite => "AnatomicalSiteMention",
            Self::DiseaseDisorder => "DiseaseDisorderMention",
            Self::SignSymptom => "SignSymptomMention",
            Self::Procedure => "ProcedureMention",
            Self::Medication => "MedicationMention",
            Self::Lab => "LabMention",
        }
    }

    /// Inverse of [`MentionType::type_name`].
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "EntityMention" => Self::Entity,
            "EventMention" => Self::Event,
            "AnatomicalSiteMention" => Self::AnatomicalSite,
            "DiseaseDisorderMention" => Self::DiseaseDisorder,
            "SignSymptomMention" => Self::SignSymptom,
            "ProcedureMention" => Self::Procedure,
            "MedicationMention" => Self::Medication,
            "LabMention" => Self::Lab,
            _ => return None,
        })
    }
}

impl std::fmt::Display for MentionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Whether a finding is asserted present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Asserted present
    #[default]
    Positive,
    /// Explicitly negated ("denies chest pain")
    Negated,
    /// Hedged ("possible pneumonia")
    Uncertain,
}

impl Polarity {
    /// True only for [`Polarity::Positive`].
    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }
}
