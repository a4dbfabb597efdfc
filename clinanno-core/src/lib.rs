//! # clinanno-core
//!
//! Core types for the clinanno pipeline: the span model and the per-document
//! annotation graph every pipeline stage reads and writes.
//!
//! This crate provides:
//! - **Spans**: `Span` (half-open byte range) and `OffsetConverter`
//! - **Annotations**: `Annotation`, `AnnotationKind`, `Token`, `Mention`,
//!   `Polarity`, `OntologyConcept`
//! - **Graph**: `AnnotationGraph`, an arena with type-filtered document-order
//!   indices

pub mod annotation;
pub mod concept;
pub mod error;
pub mod graph;
pub mod offset;
pub mod span;

pub use annotation::{
    Annotation, AnnotationId, AnnotationKind, AnnotationType, Mention, MentionType, Polarity,
    Token, TokenClass, SIMPLE_SEGMENT,
};
pub use concept::{OntologyConcept, UMLS_SCHEME};
pub use error::{Error, Result};
pub use graph::AnnotationGraph;
pub use offset::OffsetConverter;
pub use span::Span;
