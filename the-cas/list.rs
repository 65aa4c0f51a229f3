use std::iter::FusedIterator;

/// Singly-linked list terminated by the [`ConsList::Empty`] marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsList<T> {
  Empty,
  Cons { head: T, tail: Box<ConsList<T>> },
}

impl<T> ConsList<T> {
  pub fn cons(head: T, tail: ConsList<T>) -> Self {
    Self::Cons {
      head,
      tail: Box::new(tail),
    }
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, Self::Empty)
  }

  pub fn head(&self) -> Option<&T> {
    match self {
      Self::Empty => None,
      Self::Cons { head, .. } => Some(head),
    }
  }

  pub fn tail(&self) -> Option<&ConsList<T>> {
    match self {
      Self::Empty => None,
      Self::Cons { tail, .. } => Some(tail),
    }
  }

  /// Walks the cells from head to the empty marker.
  pub fn iter(&self) -> Iter<'_, T> {
    Iter { cell: self }
  }
}

impl<T> Default for ConsList<T> {
  fn default() -> Self {
    Self::Empty
  }
}

impl<T> FromIterator<T> for ConsList<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let items: Vec<T> = iter.into_iter().collect();
    items
      .into_iter()
      .rev()
      .fold(ConsList::Empty, |tail, head| ConsList::cons(head, tail))
  }
}

impl<T> Drop for ConsList<T> {
  // Unlink iteratively so long lists don't overflow the stack.
  fn drop(&mut self) {
    let mut next = std::mem::take(self);
    while let ConsList::Cons { tail, .. } = &mut next {
      next = std::mem::take(&mut **tail);
    }
  }
}

pub struct Iter<'a, T> {
  cell: &'a ConsList<T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  fn next(&mut self) -> Option<&'a T> {
    match self.cell {
      ConsList::Empty => None,
      ConsList::Cons { head, tail } => {
        self.cell = tail;
        Some(head)
      },
    }
  }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a ConsList<T> {
  type IntoIter = Iter<'a, T>;
  type Item = &'a T;

  fn into_iter(self) -> Iter<'a, T> {
    self.iter()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn builds_and_walks() {
    let list: ConsList<&str> = ["a", "b", "c"].into_iter().collect();
    assert_eq!(list.head(), Some(&"a"));
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(list.tail().and_then(ConsList::head), Some(&"b"));
  }

  #[test]
  fn empty_marker() {
    let list: ConsList<i32> = std::iter::empty().collect();
    assert!(list.is_empty());
    assert_eq!(list.iter().next(), None);
    assert_eq!(ConsList::cons(1, ConsList::Empty).iter().count(), 1);
  }

  #[test]
  fn drops_long_lists() {
    let list: ConsList<u32> = (0..200_000).collect();
    assert_eq!(list.iter().count(), 200_000);
  }
}
