use std::fmt;

/// A half-open interval `[begin, end)` of offsets into a text buffer.
///
/// `begin <= end` always holds. Zero-width spans (`begin == end`) are valid
/// and mark a position between two characters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
  pub begin: usize,
  pub end:   usize,
}

impl Span {
  /// Creates a span. Returns `None` if `begin > end`.
  pub const fn new(begin: usize, end: usize) -> Option<Self> {
    if begin > end {
      None
    } else {
      Some(Self { begin, end })
    }
  }

  pub const fn point(pos: usize) -> Self {
    Self {
      begin: pos,
      end:   pos,
    }
  }

  pub const fn len(&self) -> usize {
    self.end - self.begin
  }

  pub const fn is_empty(&self) -> bool {
    self.begin == self.end
  }

  /// `true` if `other` lies completely inside `self` (boundaries included).
  pub const fn covers(&self, other: &Span) -> bool {
    self.begin <= other.begin && other.end <= self.end
  }

  /// `true` if the two spans share at least one offset.
  ///
  /// Zero-width spans overlap a span only when they sit strictly inside it.
  pub const fn overlaps(&self, other: &Span) -> bool {
    self.begin < other.end && other.begin < self.end
  }
}

impl fmt::Display for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{},{})", self.begin, self.end)
  }
}

impl From<Span> for std::ops::Range<usize> {
  fn from(span: Span) -> Self {
    span.begin..span.end
  }
}
