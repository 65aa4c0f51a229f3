//! Precomputed covering relations.
//!
//! [`covering`](crate::select::covering) scans the whole store on every call.
//! When the same relation is needed for many annotations, build it once with
//! [`index_covering`] (covered annotation to the annotations containing it)
//! or [`index_covered`] (outer annotation to the annotations inside it).

use std::{
  collections::HashMap,
  time::Instant,
};

use indexmap::IndexSet;
use the_cas::{
  Annotation,
  AnnotationIndex,
  AnnotationStore,
  TypeId,
  TypeSystem,
};

use crate::{
  Result,
  cursor::Cursor,
};

/// Multimap from an annotation to a set of related annotations.
///
/// Lookups of annotations that have no entry yield an empty set. Related sets
/// keep index order.
#[derive(Debug, Clone, Default)]
pub struct CoveringIndex {
  map:   HashMap<Annotation, IndexSet<Annotation>>,
  empty: IndexSet<Annotation>,
}

impl CoveringIndex {
  pub fn get(&self, key: &Annotation) -> &IndexSet<Annotation> {
    self.map.get(key).unwrap_or(&self.empty)
  }

  pub fn contains_key(&self, key: &Annotation) -> bool {
    self.map.contains_key(key)
  }

  /// Number of keys with at least one related annotation.
  pub fn len(&self) -> usize {
    self.map.len()
  }

  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Annotation, &IndexSet<Annotation>)> + '_ {
    self.map.iter()
  }

  fn insert(&mut self, key: Annotation, value: Annotation) {
    self.map.entry(key).or_default().insert(value);
  }
}

/// Maps every annotation of `covered_ty` to the annotations of `covering_ty`
/// that contain it.
///
/// Agrees with [`covering`](crate::select::covering) for every key, but
/// costs one pass over the `covering_ty` index.
pub fn index_covering<S>(store: &S, covered_ty: TypeId, covering_ty: TypeId) -> Result<CoveringIndex>
where
  S: AnnotationStore + ?Sized,
{
  let types = store.type_system();
  types.check_annotation_type(covered_ty)?;
  types.check_annotation_type(covering_ty)?;

  let start = tracing::enabled!(tracing::Level::DEBUG).then(Instant::now);
  let mut index = CoveringIndex::default();
  let outer = store.annotation_index(covering_ty);
  let inner = store.annotation_index(covered_ty);
  for_each_contained(&outer, &inner, |outer, inner| index.insert(inner, outer));

  if let Some(start) = start {
    tracing::debug!(
      keys = index.len(),
      elapsed = ?start.elapsed(),
      "built covering index"
    );
  }
  Ok(index)
}

/// Maps every annotation of `outer_ty` to the annotations of `inner_ty` it
/// contains.
pub fn index_covered<S>(store: &S, outer_ty: TypeId, inner_ty: TypeId) -> Result<CoveringIndex>
where
  S: AnnotationStore + ?Sized,
{
  let types = store.type_system();
  types.check_annotation_type(outer_ty)?;
  types.check_annotation_type(inner_ty)?;

  let start = tracing::enabled!(tracing::Level::DEBUG).then(Instant::now);
  let mut index = CoveringIndex::default();
  let outer = store.annotation_index(outer_ty);
  let inner = store.annotation_index(inner_ty);
  for_each_contained(&outer, &inner, |outer, inner| index.insert(outer, inner));

  if let Some(start) = start {
    tracing::debug!(
      keys = index.len(),
      elapsed = ?start.elapsed(),
      "built covered index"
    );
  }
  Ok(index)
}

/// Calls `f(outer, inner)` for each pair where `outer` contains `inner`,
/// skipping an annotation paired with itself.
///
/// Outer entries come in index order, and for each of them the inner index
/// is entered at the outer `begin` and left at the first entry starting past
/// the outer `end`.
fn for_each_contained<O, I, F>(outer: &O, inner: &I, mut f: F)
where
  O: AnnotationIndex + ?Sized,
  I: AnnotationIndex + ?Sized,
  F: FnMut(Annotation, Annotation),
{
  let mut cursor = Cursor::first(inner);
  for outer in Cursor::first(outer).forward() {
    cursor.seek_begin(outer.begin());
    for inner in cursor.clone().forward() {
      if inner.begin() > outer.end() {
        break;
      }
      if inner.end() <= outer.end() && inner != outer {
        f(outer, inner);
      }
    }
  }
}

#[cfg(test)]
mod test {
  use std::sync::Arc;

  use quickcheck::quickcheck;
  use the_cas::{
    Cas,
    TypeTree,
    types::ANNOTATION,
  };

  use super::*;
  use crate::select;

  fn cas() -> (Cas, TypeId, TypeId) {
    let types = TypeTree::builder()
      .declare("test.Token", ANNOTATION)
      .declare("test.Sentence", ANNOTATION)
      .build()
      .unwrap();
    let token = types.type_by_name("test.Token").unwrap();
    let sentence = types.type_by_name("test.Sentence").unwrap();
    (Cas::new(Arc::new(types), ""), token, sentence)
  }

  #[test]
  fn missing_keys_map_to_empty() {
    let (mut cas, token, sentence) = cas();
    let inside = cas.add(token, 2, 4).unwrap();
    let outside = cas.add(token, 10, 12).unwrap();
    let outer = cas.add(sentence, 0, 5).unwrap();

    let index = index_covering(&cas, token, sentence).unwrap();
    assert_eq!(index.len(), 1);
    assert!(index.get(&outside).is_empty());
    assert!(!index.contains_key(&outside));
    assert_eq!(index.get(&inside).iter().copied().collect::<Vec<_>>(), vec![outer]);

    let index = index_covered(&cas, sentence, token).unwrap();
    assert_eq!(index.get(&outer).iter().copied().collect::<Vec<_>>(), vec![inside]);
    assert!(index.get(&inside).is_empty());
  }

  #[test]
  fn same_type_relation_skips_self() {
    let (mut cas, token, _) = cas();
    let long = cas.add(token, 0, 10).unwrap();
    let short = cas.add(token, 0, 10).unwrap();
    let zero = cas.add(token, 10, 10).unwrap();

    let index = index_covering(&cas, token, token).unwrap();
    assert_eq!(index.get(&short).iter().copied().collect::<Vec<_>>(), vec![long]);
    assert_eq!(index.get(&zero).len(), 2);
    assert!(!index.get(&long).contains(&long));
  }

  #[test]
  fn rejects_non_annotation_types() {
    let (cas, token, _) = cas();
    let top = cas.types().top_type();
    assert!(index_covering(&cas, token, top).is_err());
    assert!(index_covered(&cas, top, token).is_err());
  }

  fn build(spans: &[(u8, u8, bool)]) -> (Cas, TypeId, TypeId) {
    let (mut cas, token, sentence) = cas();
    for &(a, b, is_token) in spans {
      let (begin, end) = (a.min(b) as usize, a.max(b) as usize);
      let ty = if is_token { token } else { sentence };
      cas.add(ty, begin, end).unwrap();
    }
    (cas, token, sentence)
  }

  quickcheck! {
    fn agrees_with_covering_query(spans: Vec<(u8, u8, bool)>) -> bool {
      let (cas, token, sentence) = build(&spans);
      let index = index_covering(&cas, token, sentence).unwrap();
      cas.index(token).iter().all(|ann| {
        let expected = select::covering(&cas, sentence, ann).unwrap();
        index.get(ann).iter().copied().collect::<Vec<_>>() == expected
      })
    }

    fn covered_index_agrees_with_covered_query(spans: Vec<(u8, u8, bool)>) -> bool {
      let (cas, token, sentence) = build(&spans);
      let index = index_covered(&cas, sentence, token).unwrap();
      cas.index(sentence).iter().all(|ann| {
        let expected = select::covered(&cas, token, ann).unwrap();
        index.get(ann).iter().copied().collect::<Vec<_>>() == expected
      })
    }
  }
}
