use lazy_static::lazy_static;
use std::ops::RangeInclusive;

/// Byte-class lookup table. The lexer only classifies ASCII; non-ASCII bytes
/// are assumed to continue an identifier (see lex).
#[derive(Clone)]
pub struct ByteSet {
  table: [bool; 256],
}

impl ByteSet {
  pub fn empty() -> ByteSet {
    ByteSet {
      table: [false; 256],
    }
  }

  pub fn with(mut self, c: u8) -> ByteSet {
    self.table[c as usize] = true;
    self
  }

  pub fn with_range(mut self, range: RangeInclusive<u8>) -> ByteSet {
    for c in range {
      self.table[c as usize] = true;
    }
    self
  }

  pub fn with_slice(mut self, bytes: &[u8]) -> ByteSet {
    for &c in bytes {
      self.table[c as usize] = true;
    }
    self
  }

  pub fn has(&self, c: u8) -> bool {
    self.table[c as usize]
  }
}

// WARNING: ASCII only; the full ECMAScript Unicode identifier categories are
// not modelled, matching the byte-oriented lexer.
pub const ID_START_BYTES: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";
pub const ID_CONTINUE_BYTES: &[u8] =
  b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";

lazy_static! {
  pub static ref DIGIT: ByteSet = ByteSet::empty().with_range(b'0'..=b'9');
  pub static ref DIGIT_BIN: ByteSet = ByteSet::empty().with_range(b'0'..=b'1');
  pub static ref DIGIT_OCT: ByteSet = ByteSet::empty().with_range(b'0'..=b'7');
  pub static ref DIGIT_HEX: ByteSet = ByteSet::empty()
    .with_range(b'0'..=b'9')
    .with_range(b'a'..=b'f')
    .with_range(b'A'..=b'F');
  pub static ref ID_START: ByteSet = ByteSet::empty().with_slice(ID_START_BYTES);
  pub static ref ID_CONTINUE: ByteSet = ByteSet::empty().with_slice(ID_CONTINUE_BYTES);
  pub static ref WHITESPACE: ByteSet = ByteSet::empty()
    .with(b'\x09')
    .with(b'\x0a')
    .with(b'\x0b')
    .with(b'\x0c')
    .with(b'\x0d')
    .with(b'\x20');
}

/// True iff `name` is lexically a JavaScript identifier (ASCII form). Keyword
/// status is the caller's concern.
pub fn is_identifier_text(name: &[u8]) -> bool {
  match name.split_first() {
    Some((&first, rest)) => {
      ID_START.has(first) && rest.iter().all(|&c| ID_CONTINUE.has(c))
    }
    None => false,
  }
}
