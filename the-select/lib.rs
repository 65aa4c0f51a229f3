//! Positional queries over span-ordered annotation indexes.
//!
//! # Overview
//!
//! - [`Cursor`] walks one type-filtered index (seek, step, validity).
//! - [`select`] holds the queries: covered, covering, between, at, preceding,
//!   following and relative lookups. All results come back in index order
//!   (ascending `begin`) and never contain the reference annotations passed
//!   in.
//! - [`FsCollection`] presents an index, an [`FsArray`] or a [`ConsList`] as
//!   one lazy, read-only sequence.
//! - [`CoveringIndex`] precomputes covering/covered relations for repeated
//!   lookups.
//!
//! # Tie-breaks
//!
//! Indexes order annotations by `begin` ascending and `end` descending. Among
//! annotations with the same span the store may apply its own type priorities.
//! The queries here ignore those priorities: equal-span runs are treated as an
//! unordered bucket and are always searched as a whole.
//!
//! # Error Handling
//!
//! Queries return [`Result<T, SelectError>`]:
//!
//! - **InvalidType** - Type is undeclared or not an annotation type
//! - **NotFound** - A single-result query matched nothing
//! - **Ambiguous** - A single-result query matched more than once
//! - **OutOfBounds** - A relative lookup walked off the index
//! - **InvalidCursor** - Read through a cursor that points nowhere
//!
//! [`FsArray`]: the_cas::FsArray
//! [`ConsList`]: the_cas::ConsList

pub mod collection;
pub mod covering;
pub mod cursor;
pub mod select;

pub use collection::FsCollection;
pub use covering::{
  CoveringIndex,
  index_covered,
  index_covering,
};
pub use cursor::Cursor;
use the_cas::{
  Span,
  TypeError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SelectError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectError {
  #[error(transparent)]
  InvalidType(#[from] TypeError),
  #[error("no [{ty}] found{}", at(.span))]
  NotFound { ty: String, span: Option<Span> },
  #[error("found {count} [{ty}]{} where one was expected", at(.span))]
  Ambiguous {
    ty:    String,
    span:  Option<Span>,
    count: usize,
  },
  #[error("reached end of [{ty}] index seeking relative position {offset}")]
  OutOfBounds { ty: String, offset: isize },
  #[error("cursor does not point at an index entry")]
  InvalidCursor,
}

fn at(span: &Option<Span>) -> String {
  span.map(|span| format!(" at {span}")).unwrap_or_default()
}
