//! Per-document annotation store.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      AnnotationGraph                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  text: String                      (immutable after load)    │
//! │                                                              │
//! │  annotations: HashMap<AnnotationId, Annotation>   (arena)    │
//! │       │                                                      │
//! │       └──► live + superseded annotations                     │
//! │                                                              │
//! │  index: HashMap<AnnotationType, BTreeSet<(begin, end, id)>>  │
//! │       │                                                      │
//! │       └──► live annotations only, document order             │
//! │                                                              │
//! │  superseded: HashMap<old id, replacement id>                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Offsets are never edited in place. A stage that needs a different
//! extent appends a replacement with [`AnnotationGraph::supersede`]; the old
//! annotation stays in the arena for audit but drops out of every
//! `select*` query. [`AnnotationGraph::remove`] deletes outright.

use crate::{Annotation, AnnotationId, AnnotationKind, AnnotationType, Error, Result, Span, Token};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct IndexKey {
    begin: usize,
    end: usize,
    id: AnnotationId,
}

impl IndexKey {
    fn of(annotation: &Annotation) -> Self {
        Self {
            begin: annotation.span.begin,
            end: annotation.span.end,
            id: annotation.id,
        }
    }
}

/// Single-owner, append-mostly store of typed spans over one document.
///
/// Same-type iteration is ordered by ascending `begin`, then ascending
/// `end`, then insertion order.
#[derive(Debug, Clone, Default)]
pub struct AnnotationGraph {
    text: String,
    annotations: HashMap<AnnotationId, Annotation>,
    index: HashMap<AnnotationType, BTreeSet<IndexKey>>,
    superseded: HashMap<AnnotationId, AnnotationId>,
    next_id: AnnotationId,
}

impl AnnotationGraph {
    /// Create an empty graph over `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Document text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of live annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.values().map(BTreeSet::len).sum()
    }

    /// True when no live annotation exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live annotations of one type.
    #[must_use]
    pub fn count(&self, ty: AnnotationType) -> usize {
        self.index.get(&ty).map_or(0, BTreeSet::len)
    }

    /// Text covered by a span. Empty if the span does not fit the text.
    #[must_use]
    pub fn covered_text(&self, span: Span) -> &str {
        self.text.get(span.range()).unwrap_or("")
    }

    // -------------------------------------------------------------------------
    // Insertion and removal
    // -------------------------------------------------------------------------

    /// Add an annotation and return its id.
    pub fn add(&mut self, span: Span, kind: AnnotationKind) -> Result<AnnotationId> {
        span.validate(&self.text)?;
        let id = self.next_id;
        self.next_id += 1;
        let annotation = Annotation { id, span, kind };
        self.index
            .entry(annotation.annotation_type())
            .or_default()
            .insert(IndexKey::of(&annotation));
        self.annotations.insert(id, annotation);
        Ok(id)
    }

    /// Append `replacement` and retire `old` from all queries.
    ///
    /// Returns the id of the new annotation.
    pub fn supersede(
        &mut self,
        old: AnnotationId,
        span: Span,
        kind: AnnotationKind,
    ) -> Result<AnnotationId> {
        if !self.is_live(old) {
            return Err(Error::UnknownAnnotation(old));
        }
        let new_id = self.add(span, kind)?;
        self.unindex(old);
        self.superseded.insert(old, new_id);
        Ok(new_id)
    }

    /// Retire an annotation without a direct replacement (e.g. the parts of
    /// a merged token). Returns false if it was not live.
    pub fn retire(&mut self, id: AnnotationId, replaced_by: AnnotationId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        self.unindex(id);
        self.superseded.insert(id, replaced_by);
        true
    }

    /// Delete an annotation from the graph entirely.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let annotation = self.annotations.remove(&id)?;
        if let Some(keys) = self.index.get_mut(&annotation.annotation_type()) {
            keys.remove(&IndexKey::of(&annotation));
        }
        self.superseded.remove(&id);
        Some(annotation)
    }

    fn unindex(&mut self, id: AnnotationId) {
        if let Some(annotation) = self.annotations.get(&id) {
            let key = IndexKey::of(annotation);
            if let Some(keys) = self.index.get_mut(&annotation.annotation_type()) {
                keys.remove(&key);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Get an annotation by id, live or superseded.
    #[must_use]
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    /// True if the annotation exists and has not been superseded.
    #[must_use]
    pub fn is_live(&self, id: AnnotationId) -> bool {
        self.annotations.contains_key(&id) && !self.superseded.contains_key(&id)
    }

    /// Replacement recorded for a superseded annotation.
    #[must_use]
    pub fn superseded_by(&self, id: AnnotationId) -> Option<AnnotationId> {
        self.superseded.get(&id).copied()
    }

    /// Superseded annotations, in id order.
    pub fn superseded(&self) -> impl Iterator<Item = &Annotation> {
        let mut ids: Vec<_> = self.superseded.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(move |id| self.annotations.get(&id))
    }

    /// Mutable access to a live token's attributes. Offsets stay fixed.
    pub fn token_mut(&mut self, id: AnnotationId) -> Option<&mut Token> {
        if self.superseded.contains_key(&id) {
            return None;
        }
        match self.annotations.get_mut(&id).map(|a| &mut a.kind) {
            Some(AnnotationKind::Token(token)) => Some(token),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Type-filtered iteration
    // -------------------------------------------------------------------------

    /// Live annotations of one type in document order.
    pub fn select(&self, ty: AnnotationType) -> impl Iterator<Item = &Annotation> + '_ {
        self.index
            .get(&ty)
            .into_iter()
            .flat_map(|keys| keys.iter())
            .filter_map(move |key| self.annotations.get(&key.id))
    }

    /// Live annotations of one type that lie inside `span`.
    pub fn select_covered(
        &self,
        ty: AnnotationType,
        span: Span,
    ) -> impl Iterator<Item = &Annotation> + '_ {
        let lo = IndexKey {
            begin: span.begin,
            end: 0,
            id: 0,
        };
        let hi = IndexKey {
            begin: span.end,
            end: usize::MAX,
            id: AnnotationId::MAX,
        };
        self.index
            .get(&ty)
            .into_iter()
            .flat_map(move |keys| keys.range(lo..=hi))
            .filter(move |key| key.end <= span.end)
            .filter_map(move |key| self.annotations.get(&key.id))
    }

    /// Live annotations of one type that contain `span`.
    pub fn select_covering(
        &self,
        ty: AnnotationType,
        span: Span,
    ) -> impl Iterator<Item = &Annotation> + '_ {
        let hi = IndexKey {
            begin: span.begin,
            end: usize::MAX,
            id: AnnotationId::MAX,
        };
        self.index
            .get(&ty)
            .into_iter()
            .flat_map(move |keys| keys.range(..=hi))
            .filter(move |key| key.end >= span.end)
            .filter_map(move |key| self.annotations.get(&key.id))
    }

    /// All live annotations ordered by begin, then type priority, then end.
    ///
    /// Co-located spans of different types come out as
    /// `Segment < Sentence < Token < Chunk < LookupWindow < mentions`.
    #[must_use]
    pub fn annotations_in_order(&self) -> Vec<&Annotation> {
        let mut all: Vec<(usize, u8, usize, AnnotationId)> = self
            .index
            .iter()
            .flat_map(|(ty, keys)| keys.iter().map(move |k| (k.begin, ty.priority(), k.end, k.id)))
            .collect();
        all.sort_unstable();
        all.into_iter()
            .filter_map(|(_, _, _, id)| self.annotations.get(&id))
            .collect()
    }
}
