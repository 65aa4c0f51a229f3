//! Span-ordered annotation indexes.
//!
//! An index lists every annotation whose type is subsumed by the indexed type,
//! in the store's native order:
//!
//! 1. `begin` ascending
//! 2. `end` descending (longer spans first)
//! 3. type priority ascending (types without a priority last)
//! 4. insertion order
//!
//! Consumers must only rely on the first two keys. Runs of annotations with
//! identical spans come in an engine-defined order.

use std::{
  cmp::{
    Ordering,
    Reverse,
  },
  sync::Arc,
};

use crate::{
  annotation::Annotation,
  types::{
    TypeId,
    TypeSystem,
    TypeTree,
  },
};

/// Random-access view of one type-filtered index.
pub trait AnnotationIndex {
  fn len(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn get(&self, pos: usize) -> Option<Annotation>;

  /// Position of the first entry not ordered before `anchor`, or `len()` if
  /// every entry is. Identity is not part of the comparison, so an anchor
  /// stored in this index seeks to the first entry of its bucket.
  fn seek(&self, anchor: &Annotation) -> usize;
}

impl<T: AnnotationIndex + ?Sized> AnnotationIndex for &T {
  fn len(&self) -> usize {
    (**self).len()
  }

  fn get(&self, pos: usize) -> Option<Annotation> {
    (**self).get(pos)
  }

  fn seek(&self, anchor: &Annotation) -> usize {
    (**self).seek(anchor)
  }
}

impl<T: AnnotationIndex + ?Sized> AnnotationIndex for Arc<T> {
  fn len(&self) -> usize {
    (**self).len()
  }

  fn get(&self, pos: usize) -> Option<Annotation> {
    (**self).get(pos)
  }

  fn seek(&self, anchor: &Annotation) -> usize {
    (**self).seek(anchor)
  }
}

/// A store of annotations over one text, queried through its indexes.
pub trait AnnotationStore {
  type Types: TypeSystem + ?Sized;
  type Index<'a>: AnnotationIndex
  where
    Self: 'a;

  fn type_system(&self) -> &Self::Types;

  /// Index of every annotation whose type is subsumed by `ty`.
  fn annotation_index(&self, ty: TypeId) -> Self::Index<'_>;

  /// Index of all annotations in the store.
  fn full_index(&self) -> Self::Index<'_> {
    self.annotation_index(self.type_system().annotation_type())
  }

  fn text(&self) -> &str;
}

type SortKey = (usize, Reverse<usize>, usize);

/// Sorted snapshot of the annotations of one type, in native order.
#[derive(Debug, Clone)]
pub struct SortedIndex {
  types:   Arc<TypeTree>,
  entries: Vec<Annotation>,
}

impl SortedIndex {
  pub fn new(types: Arc<TypeTree>, mut entries: Vec<Annotation>) -> Self {
    entries.sort_by(|a, b| compare(&types, a, b).then(a.id.cmp(&b.id)));
    Self { types, entries }
  }

  pub fn as_slice(&self) -> &[Annotation] {
    &self.entries
  }

  pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Annotation> + '_ {
    self.entries.iter()
  }
}

fn sort_key(types: &TypeTree, ann: &Annotation) -> SortKey {
  (
    ann.begin(),
    Reverse(ann.end()),
    types.priority(ann.ty).unwrap_or(usize::MAX),
  )
}

fn compare(types: &TypeTree, a: &Annotation, b: &Annotation) -> Ordering {
  sort_key(types, a).cmp(&sort_key(types, b))
}

impl AnnotationIndex for SortedIndex {
  fn len(&self) -> usize {
    self.entries.len()
  }

  fn get(&self, pos: usize) -> Option<Annotation> {
    self.entries.get(pos).copied()
  }

  fn seek(&self, anchor: &Annotation) -> usize {
    let key = sort_key(&self.types, anchor);
    self
      .entries
      .partition_point(|entry| sort_key(&self.types, entry) < key)
  }
}
