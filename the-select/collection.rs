//! Read-only sequence view over index, array and list backings.
//!
//! The size of a lazily backed collection is computed on first demand with a
//! single scan and cached. Concurrent first calls to [`FsCollection::len`]
//! still scan only once.

use std::fmt;

use once_cell::sync::OnceCell;
use the_cas::{
  Annotation,
  AnnotationIndex,
  ConsList,
  FsArray,
  TypeId,
  TypeSystem,
};

/// A restartable source of items. Each call to [`Scan::scan`] walks the
/// backing from the start.
pub trait Scan {
  type Item;

  fn scan(&self) -> Box<dyn Iterator<Item = Self::Item> + '_>;
}

/// Scans a live index in index order.
pub struct IndexScan<I>(pub I);

impl<I: AnnotationIndex> Scan for IndexScan<I> {
  type Item = Annotation;

  fn scan(&self) -> Box<dyn Iterator<Item = Annotation> + '_> {
    Box::new((0..self.0.len()).map_while(|pos| self.0.get(pos)))
  }
}

/// Scans whatever the closure produces.
pub struct FnScan<F>(pub F);

impl<F, It> Scan for FnScan<F>
where
  F: Fn() -> It,
  It: Iterator + 'static,
{
  type Item = It::Item;

  fn scan(&self) -> Box<dyn Iterator<Item = It::Item> + '_> {
    Box::new((self.0)())
  }
}

enum Backing<'a, T> {
  Scan(Box<dyn Scan<Item = T> + Send + Sync + 'a>),
  Snapshot(Vec<T>),
}

pub struct FsCollection<'a, T> {
  backing: Backing<'a, T>,
  size:    OnceCell<usize>,
}

impl<'a> FsCollection<'a, Annotation> {
  /// Live view of an index. Entries are read on every iteration.
  pub fn from_index<I>(index: I) -> Self
  where
    I: AnnotationIndex + Send + Sync + 'a,
  {
    Self::from_scan(IndexScan(index))
  }

  /// Non-empty slots of `array`, optionally restricted to annotations whose
  /// type is subsumed by `ty`. The slots are captured when the collection is
  /// created.
  pub fn from_fs_array<S>(types: &S, array: &FsArray, ty: Option<TypeId>) -> Self
  where
    S: TypeSystem + ?Sized,
  {
    array
      .slots()
      .iter()
      .flatten()
      .copied()
      .filter(|ann| ty.is_none_or(|ty| types.subsumes(ty, ann.ty)))
      .collect::<Vec<_>>()
      .into()
  }

  /// Annotations of `list`, optionally restricted to those whose type is
  /// subsumed by `ty`.
  pub fn from_fs_list<S>(types: &S, list: &ConsList<Annotation>, ty: Option<TypeId>) -> Self
  where
    S: TypeSystem + ?Sized,
  {
    list
      .iter()
      .copied()
      .filter(|ann| ty.is_none_or(|ty| types.subsumes(ty, ann.ty)))
      .collect::<Vec<_>>()
      .into()
  }
}

impl<'a, T> FsCollection<'a, T> {
  pub fn from_scan<S>(scan: S) -> Self
  where
    S: Scan<Item = T> + Send + Sync + 'a,
  {
    Self {
      backing: Backing::Scan(Box::new(scan)),
      size:    OnceCell::new(),
    }
  }

  /// Number of items. Computed with one full scan the first time it is
  /// asked for, then cached.
  pub fn len(&self) -> usize {
    *self.size.get_or_init(|| {
      match &self.backing {
        Backing::Snapshot(items) => items.len(),
        Backing::Scan(scan) => {
          let size = scan.scan().count();
          tracing::trace!(size, "counted lazy collection");
          size
        },
      }
    })
  }

  /// Does not force the size computation.
  pub fn is_empty(&self) -> bool {
    match (self.size.get(), &self.backing) {
      (Some(size), _) => *size == 0,
      (None, Backing::Snapshot(items)) => items.is_empty(),
      (None, Backing::Scan(scan)) => scan.scan().next().is_none(),
    }
  }

  /// Whether the size has been computed yet.
  pub fn is_sized(&self) -> bool {
    self.size.get().is_some()
  }
}

impl<'a, T: Clone> FsCollection<'a, T> {
  pub fn from_list(list: &ConsList<T>) -> Self {
    list.iter().cloned().collect::<Vec<_>>().into()
  }

  pub fn iter(&self) -> Box<dyn Iterator<Item = T> + '_> {
    match &self.backing {
      Backing::Snapshot(items) => Box::new(items.iter().cloned()),
      Backing::Scan(scan) => scan.scan(),
    }
  }

  pub fn first(&self) -> Option<T> {
    self.iter().next()
  }

  pub fn to_vec(&self) -> Vec<T> {
    self.iter().collect()
  }
}

impl<T: Clone + PartialEq> FsCollection<'_, T> {
  pub fn contains(&self, item: &T) -> bool {
    self.iter().any(|candidate| candidate == *item)
  }
}

impl<T> From<Vec<T>> for FsCollection<'_, T> {
  fn from(items: Vec<T>) -> Self {
    Self {
      size:    OnceCell::with_value(items.len()),
      backing: Backing::Snapshot(items),
    }
  }
}

impl<'c, T: Clone> IntoIterator for &'c FsCollection<'_, T> {
  type IntoIter = Box<dyn Iterator<Item = T> + 'c>;
  type Item = T;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<T> fmt::Debug for FsCollection<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let backing = match self.backing {
      Backing::Scan(_) => "scan",
      Backing::Snapshot(_) => "snapshot",
    };
    f.debug_struct("FsCollection")
      .field("backing", &backing)
      .field("size", &self.size.get())
      .finish()
  }
}
