//! Positional queries.
//!
//! Every query takes the store, a target type (the type and all of its
//! subtypes are matched) and the reference annotations or offsets. The target
//! type is validated before anything is scanned. Results are in index order,
//! i.e. ascending `begin`, and never include the reference annotations
//! themselves, even when they are of the target type.
//!
//! # Cost
//!
//! `covered`, `between`, `at`, `preceding` and `following` seek into the
//! type-filtered index and stop scanning as soon as the ascending `begin`
//! order rules out further matches.
//!
//! `covering` cannot seek: the `begin` of a covering annotation says nothing
//! about where its `end` lies, so it scans the full annotation index from the
//! start. The scan stops at the first entry that begins after the covered
//! span, but every entry before that point is visited, so the cost is still
//! linear in the store size. Callers that ask for covering annotations
//! repeatedly should build a [`CoveringIndex`] once instead.
//!
//! [`CoveringIndex`]: crate::CoveringIndex

use smallvec::SmallVec;
use the_cas::{
  Annotation,
  AnnotationIndex,
  AnnotationStore,
  Span,
  TypeId,
  TypeSystem,
};

use crate::{
  FsCollection,
  Result,
  SelectError,
  cursor::Cursor,
};

/// Resolves `name` to an annotation type of the store's type system.
pub fn annotation_type<S>(store: &S, name: &str) -> Result<TypeId>
where
  S: AnnotationStore + ?Sized,
{
  Ok(store.type_system().resolve_annotation_type(name)?)
}

fn check_type<S>(store: &S, ty: TypeId) -> Result<()>
where
  S: AnnotationStore + ?Sized,
{
  Ok(store.type_system().check_annotation_type(ty)?)
}

fn type_name<S>(store: &S, ty: TypeId) -> String
where
  S: AnnotationStore + ?Sized,
{
  store
    .type_system()
    .type_name(ty)
    .map_or_else(|| ty.to_string(), str::to_string)
}

/// All annotations of `ty`, as a lazy sequence over the live index.
pub fn all<'s, S>(store: &'s S, ty: TypeId) -> Result<FsCollection<'s, Annotation>>
where
  S: AnnotationStore + ?Sized,
  S::Index<'s>: Send + Sync + 's,
{
  check_type(store, ty)?;
  Ok(FsCollection::from_index(store.annotation_index(ty)))
}

/// Annotations of `ty` inside `covering` (boundaries included).
///
/// Annotations that only partially overlap `covering` are not returned.
pub fn covered<S>(store: &S, ty: TypeId, covering: &Annotation) -> Result<Vec<Annotation>>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  let index = store.annotation_index(ty);
  let mut cursor = Cursor::seeked(&index, covering);
  if !rewind_to_bucket(&mut cursor, covering.begin()) {
    return Ok(Vec::new());
  }
  Ok(scan_inside(cursor, covering.span, |ann| ann != covering))
}

/// Annotations of `ty` inside the offsets `[begin, end]`.
pub fn covered_range<S>(store: &S, ty: TypeId, begin: usize, end: usize) -> Result<Vec<Annotation>>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  let Some(span) = Span::new(begin, end) else {
    return Ok(Vec::new());
  };
  let index = store.annotation_index(ty);
  let mut cursor = Cursor::first(&index);
  cursor.seek_begin(begin);
  Ok(scan_inside(cursor, span, |_| true))
}

/// Annotations of `ty` that contain `covered`.
///
/// Scans the full index from the start up to the first entry beginning after
/// `covered`. Still linear in the store size, see the module docs.
pub fn covering<S>(store: &S, ty: TypeId, covered: &Annotation) -> Result<Vec<Annotation>>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  Ok(scan_covering(store, ty, covered.span, |ann| ann != covered))
}

/// Annotations of `ty` that contain the offsets `[begin, end]`.
pub fn covering_range<S>(store: &S, ty: TypeId, begin: usize, end: usize) -> Result<Vec<Annotation>>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  let Some(span) = Span::new(begin, end) else {
    return Ok(Vec::new());
  };
  Ok(scan_covering(store, ty, span, |_| true))
}

/// Annotations of `ty` between two boundary annotations, which may be passed
/// in either order.
///
/// The gap runs from the end of the left boundary to the begin of the right
/// one. Boundaries that overlap leave no gap and give an empty result.
pub fn between<S>(store: &S, ty: TypeId, a: &Annotation, b: &Annotation) -> Result<Vec<Annotation>>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  let (left, right) = if a.end() > b.begin() { (b, a) } else { (a, b) };
  let Some(gap) = Span::new(left.end(), right.begin()) else {
    return Ok(Vec::new());
  };

  let index = store.annotation_index(ty);
  let mut cursor = Cursor::seeked(&index, left);
  if !rewind_to_bucket(&mut cursor, gap.begin) {
    return Ok(Vec::new());
  }
  Ok(scan_inside(cursor, gap, |ann| ann != left && ann != right))
}

/// Annotations of `ty` whose span is exactly `[begin, end)`.
pub fn at<S>(store: &S, ty: TypeId, begin: usize, end: usize) -> Result<Vec<Annotation>>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  let Some(span) = Span::new(begin, end) else {
    return Ok(Vec::new());
  };
  let index = store.annotation_index(ty);
  let mut cursor = Cursor::first(&index);
  cursor.seek_begin(begin);
  // Longer spans with the same begin sort first.
  while cursor
    .current()
    .is_some_and(|ann| ann.begin() == begin && ann.end() > end)
  {
    cursor.move_next();
  }
  Ok(
    cursor
      .forward()
      .take_while(|ann| ann.span == span)
      .collect(),
  )
}

/// The single annotation of `ty` at exactly `[begin, end)`.
pub fn single_at<S>(store: &S, ty: TypeId, begin: usize, end: usize) -> Result<Annotation>
where
  S: AnnotationStore + ?Sized,
{
  let found = at(store, ty, begin, end)?;
  let span = Span::new(begin, end);
  match found.as_slice() {
    [single] => Ok(*single),
    [] => {
      Err(SelectError::NotFound {
        ty: type_name(store, ty),
        span,
      })
    },
    _ => {
      Err(SelectError::Ambiguous {
        ty: type_name(store, ty),
        span,
        count: found.len(),
      })
    },
  }
}

/// The only annotation of `ty` in the store.
pub fn single<S>(store: &S, ty: TypeId) -> Result<Annotation>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  let index = store.annotation_index(ty);
  match index.len() {
    1 => Cursor::first(&index).get(),
    0 => {
      Err(SelectError::NotFound {
        ty:   type_name(store, ty),
        span: None,
      })
    },
    count => {
      Err(SelectError::Ambiguous {
        ty: type_name(store, ty),
        span: None,
        count,
      })
    },
  }
}

/// The `n`-th annotation of `ty` in index order. Negative positions count
/// from the end, `-1` being the last annotation.
pub fn by_index<S>(store: &S, ty: TypeId, n: isize) -> Result<Option<Annotation>>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  let index = store.annotation_index(ty);
  let pos = if n >= 0 {
    Some(n.unsigned_abs())
  } else {
    index.len().checked_sub(n.unsigned_abs())
  };
  Ok(pos.and_then(|pos| index.get(pos)))
}

/// Up to `count` annotations of `ty` that end at or before `anchor` begins,
/// nearest first in the search, returned left to right.
///
/// Fewer than `count` results means the start of the index was reached.
pub fn preceding<S>(store: &S, ty: TypeId, anchor: &Annotation, count: usize) -> Result<Vec<Annotation>>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  let index = store.annotation_index(ty);
  let mut found: SmallVec<[Annotation; 8]> = walk_preceding(&index, anchor).take(count).collect();
  found.reverse();
  Ok(found.into_vec())
}

/// Up to `count` annotations of `ty` that begin at or after `anchor` ends,
/// left to right.
///
/// Fewer than `count` results means the end of the index was reached.
pub fn following<S>(store: &S, ty: TypeId, anchor: &Annotation, count: usize) -> Result<Vec<Annotation>>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  let index = store.annotation_index(ty);
  Ok(walk_following(&index, anchor).take(count).collect())
}

/// The annotation of `ty` at `offset` positions from `anchor`.
///
/// `0` is `anchor` itself, `-1` the nearest preceding and `1` the nearest
/// following annotation (as in [`preceding`] and [`following`]). Unlike the
/// count-based queries, running off the index is an error.
pub fn single_relative<S>(store: &S, ty: TypeId, anchor: &Annotation, offset: isize) -> Result<Annotation>
where
  S: AnnotationStore + ?Sized,
{
  check_type(store, ty)?;
  if offset == 0 {
    return Ok(*anchor);
  }

  let index = store.annotation_index(ty);
  let steps = offset.unsigned_abs() - 1;
  let found = if offset < 0 {
    walk_preceding(&index, anchor).nth(steps)
  } else {
    walk_following(&index, anchor).nth(steps)
  };
  found.ok_or_else(|| {
    SelectError::OutOfBounds {
      ty: type_name(store, ty),
      offset,
    }
  })
}

/// Text covered by each annotation. Annotations outside the text map to an
/// empty string.
pub fn texts<'s, S, I>(store: &'s S, annotations: I) -> Vec<&'s str>
where
  S: AnnotationStore + ?Sized,
  I: IntoIterator<Item = Annotation>,
{
  let text = store.text();
  annotations
    .into_iter()
    .map(|ann| text.get(ann.begin()..ann.end()).unwrap_or_default())
    .collect()
}

/// Prepares a seeked cursor for a forward scan starting at `begin`.
///
/// The seek may land inside a run of entries that start at `begin` (type
/// priorities decide where). Back up over the whole run so none of it is
/// skipped. Returns `false` if the index is empty.
fn rewind_to_bucket<I>(cursor: &mut Cursor<'_, I>, begin: usize) -> bool
where
  I: AnnotationIndex + ?Sized,
{
  if !cursor.is_valid() {
    cursor.move_last();
    if !cursor.is_valid() {
      return false;
    }
  }

  let mut moved = false;
  while cursor.current().is_some_and(|ann| ann.begin() >= begin) {
    cursor.move_previous();
    moved = true;
  }
  if moved {
    cursor.move_next();
  }
  if !cursor.is_valid() {
    cursor.move_first();
  }
  true
}

/// Collects entries inside `span`, starting from the cursor position.
fn scan_inside<I, F>(mut cursor: Cursor<'_, I>, span: Span, keep: F) -> Vec<Annotation>
where
  I: AnnotationIndex + ?Sized,
  F: Fn(&Annotation) -> bool,
{
  while cursor
    .current()
    .is_some_and(|ann| ann.begin() < span.begin)
  {
    cursor.move_next();
  }

  let mut found = Vec::new();
  for ann in cursor.forward() {
    if ann.begin() > span.end {
      break;
    }
    if ann.end() <= span.end && keep(&ann) {
      found.push(ann);
    }
  }
  found
}

fn scan_covering<S, F>(store: &S, ty: TypeId, span: Span, keep: F) -> Vec<Annotation>
where
  S: AnnotationStore + ?Sized,
  F: Fn(&Annotation) -> bool,
{
  let types = store.type_system();
  let index = store.full_index();
  tracing::trace!(entries = index.len(), "scanning full index for covering annotations");
  Cursor::first(&index)
    .forward()
    .take_while(|ann| ann.begin() <= span.begin)
    .filter(|ann| ann.span.covers(&span) && types.subsumes(ty, ann.ty) && keep(ann))
    .collect()
}

/// Entries ending at or before `anchor` begins, walking towards the start of
/// the index.
///
/// The walk starts at the last entry with `begin <= anchor.begin`. Zero-width
/// entries at `anchor.begin` sort after a longer anchor, so starting from the
/// anchor's own position would skip them.
fn walk_preceding<'i, I>(index: &'i I, anchor: &Annotation) -> impl Iterator<Item = Annotation> + 'i
where
  I: AnnotationIndex + ?Sized,
{
  let anchor = *anchor;
  let mut cursor = Cursor::first(index);
  cursor.seek_begin(anchor.begin().saturating_add(1));
  if cursor.is_valid() {
    cursor.move_previous();
  } else {
    cursor.move_last();
  }
  // Earlier entries may still reach into the anchor.
  cursor
    .backward()
    .filter(move |ann| ann.end() <= anchor.begin() && *ann != anchor)
}

/// Entries beginning at or after `anchor` ends, walking towards the end of
/// the index.
fn walk_following<'i, I>(index: &'i I, anchor: &Annotation) -> impl Iterator<Item = Annotation> + 'i
where
  I: AnnotationIndex + ?Sized,
{
  let anchor = *anchor;
  let mut cursor = Cursor::first(index);
  cursor.seek_begin(anchor.end());
  cursor.forward().filter(move |ann| *ann != anchor)
}

#[cfg(test)]
mod test {
  use std::sync::Arc;

  use the_cas::{
    Cas,
    TypeError,
    TypeTree,
    types::ANNOTATION,
  };

  use super::*;

  struct Fixture {
    cas:      Cas,
    token:    TypeId,
    noun:     TypeId,
    sentence: TypeId,
  }

  impl Fixture {
    fn new() -> Self {
      let types = TypeTree::builder()
        .declare("test.Token", ANNOTATION)
        .declare("test.Noun", "test.Token")
        .declare("test.Sentence", ANNOTATION)
        .declare("test.Meta", the_cas::types::TOP)
        // Sentences sort before tokens with the same span.
        .priorities(["test.Sentence", "test.Token"])
        .build()
        .unwrap();
      let token = types.type_by_name("test.Token").unwrap();
      let noun = types.type_by_name("test.Noun").unwrap();
      let sentence = types.type_by_name("test.Sentence").unwrap();
      Self {
        cas: Cas::new(Arc::new(types), "The quick brown fox jumps."),
        token,
        noun,
        sentence,
      }
    }

    fn add(&mut self, ty: TypeId, begin: usize, end: usize) -> Annotation {
      self.cas.add(ty, begin, end).unwrap()
    }

    fn tokens(&mut self, spans: &[(usize, usize)]) -> Vec<Annotation> {
      let token = self.token;
      spans
        .iter()
        .map(|&(begin, end)| self.add(token, begin, end))
        .collect()
    }
  }

  fn spans(anns: &[Annotation]) -> Vec<(usize, usize)> {
    anns.iter().map(|a| (a.begin(), a.end())).collect()
  }

  #[test]
  fn covered_excludes_partial_overlaps() {
    let mut f = Fixture::new();
    f.tokens(&[(0, 5), (5, 10), (10, 15), (15, 20)]);
    let sentence = f.add(f.sentence, 3, 18);

    let found = covered(&f.cas, f.token, &sentence).unwrap();
    assert_eq!(spans(&found), vec![(5, 10), (10, 15)]);
  }

  #[test]
  fn covered_finds_whole_equal_span_bucket() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 4), (4, 9)]);
    // The sentence sorts before the token at the same span, the noun after.
    let sentence = f.add(f.sentence, 4, 9);
    let noun = f.add(f.noun, 4, 9);

    let found = covered(&f.cas, f.cas.types().annotation_type(), &sentence).unwrap();
    assert_eq!(found, vec![tokens[1], noun]);

    let found = covered(&f.cas, f.token, &noun).unwrap();
    assert_eq!(found, vec![tokens[1]]);
  }

  #[test]
  fn covered_never_includes_covering() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 3), (0, 10), (4, 9), (10, 10)]);
    let found = covered(&f.cas, f.token, &tokens[1]).unwrap();
    assert_eq!(found, vec![tokens[0], tokens[2], tokens[3]]);
  }

  #[test]
  fn covered_anchor_after_index() {
    let mut f = Fixture::new();
    f.tokens(&[(0, 3), (4, 9)]);
    let sentence = f.add(f.sentence, 20, 26);
    assert!(covered(&f.cas, f.token, &sentence).unwrap().is_empty());

    let empty = Fixture::new();
    assert!(covered(&empty.cas, empty.token, &sentence).unwrap().is_empty());
  }

  #[test]
  fn covered_range_matches_covered() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 5), (5, 10), (10, 15), (15, 20), (18, 18)]);
    let found = covered_range(&f.cas, f.token, 3, 18).unwrap();
    assert_eq!(found, vec![tokens[1], tokens[2], tokens[4]]);
    assert!(covered_range(&f.cas, f.token, 9, 3).unwrap().is_empty());
  }

  #[test]
  fn covering_scans_all_types() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 3), (4, 9)]);
    let sentence = f.add(f.sentence, 0, 26);
    let noun = f.add(f.noun, 4, 9);

    assert_eq!(covering(&f.cas, f.sentence, &noun).unwrap(), vec![sentence]);
    assert_eq!(covering(&f.cas, f.token, &noun).unwrap(), vec![tokens[1]]);
    assert_eq!(covering(&f.cas, f.token, &tokens[1]).unwrap(), vec![noun]);
    assert_eq!(
      covering_range(&f.cas, f.token, 4, 9).unwrap(),
      vec![tokens[1], noun]
    );
    assert!(covering(&f.cas, f.noun, &tokens[0]).unwrap().is_empty());
  }

  #[test]
  fn between_zero_width() {
    let mut f = Fixture::new();
    let left = f.add(f.sentence, 1, 2);
    let right = f.add(f.sentence, 2, 3);
    let gap = f.add(f.token, 2, 2);

    assert_eq!(between(&f.cas, f.token, &left, &right).unwrap(), vec![gap]);
    assert_eq!(between(&f.cas, f.token, &right, &left).unwrap(), vec![gap]);
  }

  #[test]
  fn between_excludes_boundaries_and_overlaps() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 3), (4, 9), (10, 15), (9, 11), (16, 19)]);

    let found = between(&f.cas, f.token, &tokens[0], &tokens[4]).unwrap();
    assert_eq!(found, vec![tokens[1], tokens[3], tokens[2]]);

    let found = between(&f.cas, f.token, &tokens[4], &tokens[0]).unwrap();
    assert_eq!(found, vec![tokens[1], tokens[3], tokens[2]]);

    // Overlapping boundaries leave no gap.
    assert!(between(&f.cas, f.token, &tokens[2], &tokens[3]).unwrap().is_empty());
  }

  #[test]
  fn single_at() {
    let mut f = Fixture::new();
    assert_eq!(
      super::single_at(&f.cas, f.token, 4, 9),
      Err(SelectError::NotFound {
        ty:   "test.Token".into(),
        span: Span::new(4, 9),
      })
    );

    let first = f.add(f.token, 4, 9);
    f.tokens(&[(4, 12), (4, 5), (0, 9)]);
    assert_eq!(super::single_at(&f.cas, f.token, 4, 9), Ok(first));

    let second = f.add(f.noun, 4, 9);
    assert_eq!(at(&f.cas, f.token, 4, 9).unwrap(), vec![first, second]);
    assert_eq!(
      super::single_at(&f.cas, f.token, 4, 9),
      Err(SelectError::Ambiguous {
        ty:    "test.Token".into(),
        span:  Span::new(4, 9),
        count: 2,
      })
    );
  }

  #[test]
  fn at_skips_longer_spans_with_same_begin() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(2, 8), (2, 6), (2, 4), (2, 6), (3, 6)]);
    assert_eq!(at(&f.cas, f.token, 2, 6).unwrap(), vec![tokens[1], tokens[3]]);
    assert!(at(&f.cas, f.token, 2, 5).unwrap().is_empty());
    assert!(at(&f.cas, f.token, 6, 2).unwrap().is_empty());
  }

  #[test]
  fn preceding_and_following() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 3), (4, 9), (10, 15), (16, 19), (20, 25)]);
    let anchor = tokens[2];

    assert_eq!(
      preceding(&f.cas, f.token, &anchor, 2).unwrap(),
      vec![tokens[0], tokens[1]]
    );
    assert_eq!(
      preceding(&f.cas, f.token, &anchor, 10).unwrap(),
      vec![tokens[0], tokens[1]]
    );
    assert_eq!(
      following(&f.cas, f.token, &anchor, 1).unwrap(),
      vec![tokens[3]]
    );
    assert_eq!(
      following(&f.cas, f.token, &anchor, 10).unwrap(),
      vec![tokens[3], tokens[4]]
    );
    assert!(following(&f.cas, f.token, &tokens[4], 3).unwrap().is_empty());
    assert!(preceding(&f.cas, f.token, &tokens[0], 3).unwrap().is_empty());
  }

  #[test]
  fn preceding_skips_overlapping_entries() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 20), (0, 5), (5, 10), (12, 14)]);
    let anchor = f.add(f.sentence, 10, 15);

    assert_eq!(
      preceding(&f.cas, f.token, &anchor, 5).unwrap(),
      vec![tokens[1], tokens[2]]
    );
    assert!(following(&f.cas, f.token, &anchor, 5).unwrap().is_empty());
  }

  #[test]
  fn preceding_with_anchor_past_index() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 3), (4, 9)]);
    let anchor = f.add(f.sentence, 20, 25);
    assert_eq!(preceding(&f.cas, f.token, &anchor, 1).unwrap(), vec![tokens[1]]);
  }

  #[test]
  fn zero_width_anchor_is_not_its_own_neighbour() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 3), (3, 3), (3, 6)]);
    let anchor = tokens[1];
    assert_eq!(preceding(&f.cas, f.token, &anchor, 5).unwrap(), vec![tokens[0]]);
    assert_eq!(following(&f.cas, f.token, &anchor, 5).unwrap(), vec![tokens[2]]);
  }

  #[test]
  fn preceding_sees_zero_width_entries_at_anchor_begin() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 1), (3, 3), (3, 6)]);

    assert_eq!(
      preceding(&f.cas, f.token, &tokens[2], 5).unwrap(),
      vec![tokens[0], tokens[1]]
    );
    assert_eq!(following(&f.cas, f.token, &tokens[1], 1).unwrap(), vec![tokens[2]]);

    let next = super::single_relative(&f.cas, f.token, &tokens[1], 1).unwrap();
    assert_eq!(next, tokens[2]);
    assert_eq!(
      super::single_relative(&f.cas, f.token, &next, -1),
      Ok(tokens[1])
    );
  }

  #[test]
  fn single_relative() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(0, 3), (4, 9), (10, 15), (16, 19)]);

    assert_eq!(
      super::single_relative(&f.cas, f.token, &tokens[1], 0),
      Ok(tokens[1])
    );
    assert_eq!(
      super::single_relative(&f.cas, f.token, &tokens[1], 2),
      Ok(tokens[3])
    );
    assert_eq!(
      super::single_relative(&f.cas, f.token, &tokens[3], -2),
      Ok(tokens[1])
    );
    assert_eq!(
      super::single_relative(&f.cas, f.token, &tokens[1], -1),
      Ok(tokens[0])
    );
    assert_eq!(
      super::single_relative(&f.cas, f.token, &tokens[1], -2),
      Err(SelectError::OutOfBounds {
        ty:     "test.Token".into(),
        offset: -2,
      })
    );
    assert!(matches!(
      super::single_relative(&f.cas, f.token, &tokens[1], 3),
      Err(SelectError::OutOfBounds { offset: 3, .. })
    ));
  }

  #[test]
  fn single_and_by_index() {
    let mut f = Fixture::new();
    assert!(matches!(
      super::single(&f.cas, f.sentence),
      Err(SelectError::NotFound { span: None, .. })
    ));
    let sentence = f.add(f.sentence, 0, 26);
    assert_eq!(super::single(&f.cas, f.sentence), Ok(sentence));

    let tokens = f.tokens(&[(0, 3), (4, 9), (10, 15)]);
    assert!(matches!(
      super::single(&f.cas, f.token),
      Err(SelectError::Ambiguous { count: 3, .. })
    ));
    assert_eq!(by_index(&f.cas, f.token, 0), Ok(Some(tokens[0])));
    assert_eq!(by_index(&f.cas, f.token, 2), Ok(Some(tokens[2])));
    assert_eq!(by_index(&f.cas, f.token, 3), Ok(None));
    assert_eq!(by_index(&f.cas, f.token, -1), Ok(Some(tokens[2])));
    assert_eq!(by_index(&f.cas, f.token, -3), Ok(Some(tokens[0])));
    assert_eq!(by_index(&f.cas, f.token, -4), Ok(None));
  }

  #[test]
  fn rejects_invalid_types_before_scanning() {
    let mut f = Fixture::new();
    let token = f.add(f.token, 0, 3);
    let meta = f.cas.types().type_by_name("test.Meta").unwrap();

    let err = covered(&f.cas, meta, &token).unwrap_err();
    assert_eq!(
      err,
      SelectError::InvalidType(TypeError::NotAnnotationType("test.Meta".into()))
    );
    assert!(matches!(
      covering(&f.cas, TypeId::new(1000), &token),
      Err(SelectError::InvalidType(TypeError::Undeclared(_)))
    ));
    assert!(matches!(
      annotation_type(&f.cas, "test.Missing"),
      Err(SelectError::InvalidType(TypeError::Undeclared(_)))
    ));
    assert_eq!(annotation_type(&f.cas, "test.Token"), Ok(f.token));
  }

  #[test]
  fn all_and_texts() {
    let mut f = Fixture::new();
    let tokens = f.tokens(&[(4, 9), (0, 3), (10, 15)]);
    f.add(f.sentence, 0, 26);

    let all = all(&f.cas, f.token).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all.first(), Some(tokens[1]));
    assert_eq!(texts(&f.cas, &all), vec!["The", "quick", "brown"]);
  }
}
