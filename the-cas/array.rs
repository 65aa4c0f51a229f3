use crate::annotation::Annotation;

/// Fixed-size array of annotation slots. Slots start out empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FsArray {
  slots: Box<[Option<Annotation>]>,
}

impl FsArray {
  pub fn new(size: usize) -> Self {
    Self {
      slots: vec![None; size].into_boxed_slice(),
    }
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  pub fn get(&self, idx: usize) -> Option<Annotation> {
    self.slots.get(idx).copied().flatten()
  }

  /// Stores `value` at `idx`. Returns `false` if `idx` is out of bounds.
  pub fn set(&mut self, idx: usize, value: Option<Annotation>) -> bool {
    match self.slots.get_mut(idx) {
      Some(slot) => {
        *slot = value;
        true
      },
      None => false,
    }
  }

  /// Writes `values` into the leading slots. Values past the end are dropped.
  pub fn fill<I: IntoIterator<Item = Annotation>>(&mut self, values: I) -> &mut Self {
    for (slot, value) in self.slots.iter_mut().zip(values) {
      *slot = Some(value);
    }
    self
  }

  pub fn slots(&self) -> &[Option<Annotation>] {
    &self.slots
  }
}

impl FromIterator<Annotation> for FsArray {
  fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
    Self {
      slots: iter.into_iter().map(Some).collect(),
    }
  }
}
