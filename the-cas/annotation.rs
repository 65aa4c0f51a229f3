use std::{
  fmt,
  hash::{
    Hash,
    Hasher,
  },
};

use crate::{
  span::Span,
  types::TypeId,
};

/// Identity of an annotation inside one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(u32);

impl AnnotationId {
  pub const fn new(id: u32) -> Self {
    Self(id)
  }

  pub const fn get(self) -> u32 {
    self.0
  }
}

impl fmt::Display for AnnotationId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// A typed span with its own identity.
///
/// Annotations are cheap copyable handles. Two annotations compare equal only
/// if they have the same [`AnnotationId`], regardless of their spans.
#[derive(Debug, Clone, Copy)]
pub struct Annotation {
  pub id:   AnnotationId,
  pub ty:   TypeId,
  pub span: Span,
}

impl Annotation {
  pub const fn new(id: AnnotationId, ty: TypeId, span: Span) -> Self {
    Self { id, ty, span }
  }

  pub const fn begin(&self) -> usize {
    self.span.begin
  }

  pub const fn end(&self) -> usize {
    self.span.end
  }
}

impl PartialEq for Annotation {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Annotation {}

impl Hash for Annotation {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Display for Annotation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.id, self.span)
  }
}
