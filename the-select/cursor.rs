//! Bidirectional positional handle into one type-filtered index.
//!
//! A cursor is either valid, pointing at one entry, or invalid. Running off
//! the front and running off the back end up in the same invalid state:
//! reading fails and stepping does nothing until the cursor is repositioned
//! with [`Cursor::move_first`], [`Cursor::move_last`] or one of the seeks.
//!
//! Cursors borrow their index and are meant to live for a single query.

use std::iter::FusedIterator;

use the_cas::{
  Annotation,
  AnnotationIndex,
};

use crate::{
  Result,
  SelectError,
};

#[derive(Debug)]
pub struct Cursor<'a, I: ?Sized> {
  index: &'a I,
  pos:   Option<usize>,
}

impl<I: ?Sized> Clone for Cursor<'_, I> {
  fn clone(&self) -> Self {
    Self {
      index: self.index,
      pos:   self.pos,
    }
  }
}

impl<'a, I: AnnotationIndex + ?Sized> Cursor<'a, I> {
  /// Cursor on the first entry, invalid if the index is empty.
  pub fn first(index: &'a I) -> Self {
    let mut cursor = Self { index, pos: None };
    cursor.move_first();
    cursor
  }

  /// Cursor on the last entry, invalid if the index is empty.
  pub fn last(index: &'a I) -> Self {
    let mut cursor = Self { index, pos: None };
    cursor.move_last();
    cursor
  }

  /// Cursor seeked to `anchor`, see [`Cursor::seek`].
  pub fn seeked(index: &'a I, anchor: &Annotation) -> Self {
    let mut cursor = Self { index, pos: None };
    cursor.seek(anchor);
    cursor
  }

  /// Moves to the first entry ordered equal to or after `anchor`. Becomes
  /// invalid if every entry is ordered before it.
  pub fn seek(&mut self, anchor: &Annotation) {
    self.set(self.index.seek(anchor));
  }

  /// Moves to the first entry with `begin >= offset`.
  pub fn seek_begin(&mut self, offset: usize) {
    let (mut lo, mut hi) = (0, self.index.len());
    while lo < hi {
      let mid = lo + (hi - lo) / 2;
      match self.index.get(mid) {
        Some(entry) if entry.begin() < offset => lo = mid + 1,
        _ => hi = mid,
      }
    }
    self.set(lo);
  }

  pub fn move_first(&mut self) {
    self.set(0);
  }

  pub fn move_last(&mut self) {
    self.pos = self.index.len().checked_sub(1);
  }

  pub fn move_next(&mut self) {
    if let Some(pos) = self.pos {
      self.set(pos + 1);
    }
  }

  pub fn move_previous(&mut self) {
    if let Some(pos) = self.pos {
      self.pos = pos.checked_sub(1);
    }
  }

  pub fn is_valid(&self) -> bool {
    self.pos.is_some()
  }

  pub fn current(&self) -> Option<Annotation> {
    self.pos.and_then(|pos| self.index.get(pos))
  }

  /// Like [`Cursor::current`], for call sites that have already established
  /// validity.
  pub fn get(&self) -> Result<Annotation> {
    self.current().ok_or(SelectError::InvalidCursor)
  }

  /// Iterates from the current entry towards the end of the index.
  pub fn forward(self) -> Forward<'a, I> {
    Forward { cursor: self }
  }

  /// Iterates from the current entry towards the start of the index.
  pub fn backward(self) -> Backward<'a, I> {
    Backward { cursor: self }
  }

  fn set(&mut self, pos: usize) {
    self.pos = (pos < self.index.len()).then_some(pos);
  }
}

pub struct Forward<'a, I: ?Sized> {
  cursor: Cursor<'a, I>,
}

impl<I: AnnotationIndex + ?Sized> Iterator for Forward<'_, I> {
  type Item = Annotation;

  fn next(&mut self) -> Option<Annotation> {
    let current = self.cursor.current()?;
    self.cursor.move_next();
    Some(current)
  }
}

impl<I: AnnotationIndex + ?Sized> FusedIterator for Forward<'_, I> {}

pub struct Backward<'a, I: ?Sized> {
  cursor: Cursor<'a, I>,
}

impl<I: AnnotationIndex + ?Sized> Iterator for Backward<'_, I> {
  type Item = Annotation;

  fn next(&mut self) -> Option<Annotation> {
    let current = self.cursor.current()?;
    self.cursor.move_previous();
    Some(current)
  }
}

impl<I: AnnotationIndex + ?Sized> FusedIterator for Backward<'_, I> {}
