//! Annotation store primitives.
//!
//! This crate holds everything the positional query engine in `the-select`
//! consumes but does not own:
//!
//! - [`Span`] and [`Annotation`], the data model
//! - [`TypeSystem`], the subsumption oracle, and [`TypeTree`], its concrete
//!   single-inheritance implementation (loadable from TOML, see [`config`])
//! - [`AnnotationIndex`] / [`AnnotationStore`], the span-ordered index accessors
//! - [`Cas`], an in-memory store over one text buffer
//! - [`FsArray`] and [`ConsList`], the array and list backing structures

pub mod annotation;
pub mod array;
pub mod cas;
pub mod config;
pub mod index;
pub mod list;
pub mod span;
pub mod types;

pub use annotation::{
  Annotation,
  AnnotationId,
};
pub use array::FsArray;
pub use cas::{
  Cas,
  CasError,
};
pub use index::{
  AnnotationIndex,
  AnnotationStore,
  SortedIndex,
};
pub use list::ConsList;
pub use span::Span;
pub use types::{
  TypeError,
  TypeId,
  TypeSystem,
  TypeTree,
  TypeTreeBuilder,
};
