//! In-memory annotation store over one text buffer.

use std::{
  collections::HashMap,
  sync::Arc,
};

use parking_lot::RwLock;
use thiserror::Error;

use crate::{
  annotation::{
    Annotation,
    AnnotationId,
  },
  index::{
    AnnotationStore,
    SortedIndex,
  },
  span::Span,
  types::{
    TypeError,
    TypeId,
    TypeSystem,
    TypeTree,
  },
};

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CasError {
  #[error(transparent)]
  Type(#[from] TypeError),
  #[error("invalid span: begin {begin} is after end {end}")]
  InvalidSpan { begin: usize, end: usize },
  #[error("annotation ids exhausted after {0} annotations")]
  IdsExhausted(usize),
}

pub type Result<T> = std::result::Result<T, CasError>;

/// Text plus the annotations over it.
///
/// Type-filtered indexes are sorted on first request and cached until the
/// next mutation.
#[derive(Debug)]
pub struct Cas {
  types:       Arc<TypeTree>,
  text:        String,
  annotations: Vec<Option<Annotation>>,
  live:        usize,
  indexes:     RwLock<HashMap<TypeId, Arc<SortedIndex>>>,
}

impl Cas {
  pub fn new(types: Arc<TypeTree>, text: impl Into<String>) -> Self {
    Self {
      types,
      text: text.into(),
      annotations: Vec::new(),
      live: 0,
      indexes: RwLock::new(HashMap::new()),
    }
  }

  pub fn types(&self) -> &Arc<TypeTree> {
    &self.types
  }

  pub fn document_text(&self) -> &str {
    &self.text
  }

  pub fn set_document_text(&mut self, text: impl Into<String>) {
    self.text = text.into();
  }

  /// Adds an annotation of `ty` spanning `[begin, end)`.
  pub fn add(&mut self, ty: TypeId, begin: usize, end: usize) -> Result<Annotation> {
    self.types.check_annotation_type(ty)?;
    let span = Span::new(begin, end).ok_or(CasError::InvalidSpan { begin, end })?;
    let id = next_id(self.annotations.len())?;
    let annotation = Annotation::new(id, ty, span);
    self.annotations.push(Some(annotation));
    self.live += 1;
    self.indexes.get_mut().clear();
    Ok(annotation)
  }

  /// Removes an annotation. Returns `false` if it was not in this store.
  pub fn remove(&mut self, annotation: &Annotation) -> bool {
    let Some(slot) = self.annotations.get_mut(annotation.id.get() as usize) else {
      return false;
    };
    if slot.take().is_none() {
      return false;
    }
    self.live -= 1;
    self.indexes.get_mut().clear();
    true
  }

  pub fn get(&self, id: AnnotationId) -> Option<Annotation> {
    self.annotations.get(id.get() as usize).copied().flatten()
  }

  /// Number of annotations in the store.
  pub fn len(&self) -> usize {
    self.live
  }

  pub fn is_empty(&self) -> bool {
    self.live == 0
  }

  /// Text under the annotation, `None` if the span is outside the text or
  /// not on character boundaries.
  pub fn covered_text(&self, annotation: &Annotation) -> Option<&str> {
    self.text.get(annotation.begin()..annotation.end())
  }

  pub fn index(&self, ty: TypeId) -> Arc<SortedIndex> {
    if let Some(index) = self.indexes.read().get(&ty) {
      return index.clone();
    }

    let entries = self
      .annotations
      .iter()
      .flatten()
      .filter(|ann| self.types.subsumes(ty, ann.ty))
      .copied()
      .collect();
    let index = Arc::new(SortedIndex::new(self.types.clone(), entries));
    self.indexes.write().insert(ty, index.clone());
    index
  }
}

impl AnnotationStore for Cas {
  type Index<'a>
    = Arc<SortedIndex>
  where
    Self: 'a;
  type Types = TypeTree;

  fn type_system(&self) -> &TypeTree {
    &self.types
  }

  fn annotation_index(&self, ty: TypeId) -> Arc<SortedIndex> {
    self.index(ty)
  }

  fn text(&self) -> &str {
    &self.text
  }
}

/// Ids are never reused, so the id space bounds the number of adds.
fn next_id(added: usize) -> Result<AnnotationId> {
  u32::try_from(added)
    .map(AnnotationId::new)
    .map_err(|_| CasError::IdsExhausted(added))
}
