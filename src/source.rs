use std::cmp::{max, min};
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::rc::Rc;

struct SourceData {
  code: Vec<u8>,
}

/// Reference-counted source buffer. Cheap to clone; every token and node
/// holds a range into one of these (the original input, or a synthesised
/// buffer for nodes created by a rewrite pass).
#[derive(Clone)]
pub struct Source(Rc<SourceData>);

impl Source {
  pub fn new(code: Vec<u8>) -> Source {
    Source(Rc::new(SourceData { code }))
  }

  pub fn code(&self) -> &[u8] {
    &self.0.code
  }
}

/// A slice of a Source. Compared and hashed by content, not position, so two
/// ranges from different buffers are equal iff their bytes are equal.
#[derive(Clone)]
pub struct SourceRange {
  pub source: Source,
  pub start: usize,
  pub end: usize,
}

impl SourceRange {
  /// A range over a freshly allocated buffer, for names and literals that do
  /// not come from the parsed input.
  pub fn synthesised<T: Into<Vec<u8>>>(text: T) -> SourceRange {
    let text = text.into();
    let end = text.len();
    SourceRange {
      source: Source::new(text),
      start: 0,
      end,
    }
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.source.code()[self.start..self.end]
  }

  pub fn as_str(&self) -> &str {
    // The lexer only ever splits on ASCII, so ranges stay on UTF-8 boundaries.
    unsafe { std::str::from_utf8_unchecked(self.as_slice()) }
  }

  pub fn len(&self) -> usize {
    self.end - self.start
  }

  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }

  pub fn extend(&mut self, other: &SourceRange) {
    self.start = min(self.start, other.start);
    self.end = max(self.end, other.end);
  }
}

impl Add for &SourceRange {
  type Output = SourceRange;

  fn add(self, rhs: Self) -> SourceRange {
    SourceRange {
      source: self.source.clone(),
      start: min(self.start, rhs.start),
      end: max(self.end, rhs.end),
    }
  }
}

impl Debug for SourceRange {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "`{}`[{}:{}]", self.as_str(), self.start, self.end)
  }
}

impl PartialEq for SourceRange {
  fn eq(&self, other: &Self) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl Eq for SourceRange {}

impl PartialEq<str> for SourceRange {
  fn eq(&self, other: &str) -> bool {
    self.as_slice() == other.as_bytes()
  }
}

impl Hash for SourceRange {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.as_slice().hash(state);
  }
}
