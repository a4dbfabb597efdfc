//! # clinanno
//!
//! Staged clinical text annotation and ontology code extraction.
//!
//! - **Pipeline**: a fixed chain of passes (sections, sentences, tokens,
//!   POS, chunks, lookup windows, dictionary concepts, base forms) over a
//!   per-document [`AnnotationGraph`]
//! - **Codes**: signed `code|text|SemanticType` strings per mention
//! - **XMI**: graph files in and out
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clinanno::{ConceptExtractor, Document, ModelSet, Pipeline, TermDictionary};
//!
//! let dictionary = TermDictionary::parse("C0008031||chest pain\n")?;
//! let pipeline = Pipeline::standard(&ModelSet::with_dictionary(dictionary));
//!
//! let mut doc = Document::new("note.txt", "Patient denies chest pain.");
//! pipeline.process(&mut doc)?;
//! assert_eq!(
//!     ConceptExtractor::new().extract(&doc.graph),
//!     ["-C0008031|chest_pain|EntityMention"]
//! );
//! ```
//!
//! ## Stage chain
//!
//! ```text
//! segment → sentence → tokenizer → token-merge → pos → chunker
//!   → chunk-adjust(NP NP) → chunk-adjust(NP PP NP) → lookup-window
//!   → overlap → concept-lookup → lvg
//! ```
//!
//! Each stage reads what its predecessors wrote; a failing stage fails the
//! document and nothing is written for it.
//!
//! ## Batch runs
//!
//! [`PipelineRunner`] drives a directory of documents, optionally over
//! several worker threads, and returns a [`RunReport`]. Per-document
//! failures are logged through the `log` facade and never abort the batch.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod document;
mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod runner;
pub mod serialize;
pub mod xmi;

pub use config::PipelineConfig;
pub use document::{discover_documents, Document, DocumentLoader};
pub use error::{Error, Result};
pub use extract::ConceptExtractor;
pub use models::{ModelSet, TermDictionary};
pub use pipeline::{Pipeline, Stage};
pub use runner::{DocumentFailure, PipelineRunner, RunReport};
pub use serialize::DocumentSerializer;
pub use xmi::{read_xmi, write_xmi};

pub use clinanno_core::{
    Annotation, AnnotationGraph, AnnotationId, AnnotationKind, AnnotationType, Mention,
    MentionType, OffsetConverter, OntologyConcept, Polarity, Span, Token, TokenClass,
    SIMPLE_SEGMENT,
};

/// Common imports.
pub mod prelude {
    pub use crate::{
        discover_documents, AnnotationGraph, AnnotationType, ConceptExtractor, Document,
        DocumentSerializer, Error, ModelSet, Pipeline, PipelineConfig, PipelineRunner, Result,
        Stage,
    };
}
