use std::str::FromStr;

use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::num::JsNumber;
use crate::parse::parser::Parser;
use crate::source::SourceRange;
use crate::token::TokenType;

fn parse_radix(raw: &str, radix: u32) -> Result<f64, ()> {
  u64::from_str_radix(raw, radix)
    .map(|v| v as f64)
    .map_err(|_| ())
}

/// Evaluates a number literal token to its f64 value. Distinct spellings of
/// the same value collapse here, so the literal hoister can pool them.
pub fn normalise_literal_number(raw: &SourceRange) -> SyntaxResult<JsNumber> {
  match raw.as_str() {
    s if s.starts_with("0b") || s.starts_with("0B") => parse_radix(&s[2..], 2),
    s if s.starts_with("0o") || s.starts_with("0O") => parse_radix(&s[2..], 8),
    s if s.starts_with("0x") || s.starts_with("0X") => parse_radix(&s[2..], 16),
    s => f64::from_str(s).map_err(|_| ()),
  }
  .map(JsNumber)
  .map_err(|_| SyntaxError::at_loc(raw, SyntaxErrorType::MalformedLiteralNumber, None))
}

/// Decimal digits of a bigint literal (the token includes the `n` suffix).
pub fn normalise_literal_bigint(raw: &SourceRange) -> SyntaxResult<String> {
  let s = raw.as_str();
  let digits = &s[..s.len() - 1];
  if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
    return Err(SyntaxError::at_loc(
      raw,
      SyntaxErrorType::MalformedLiteralBigInt,
      None,
    ));
  };
  Ok(digits.to_string())
}

/// Decodes a string literal token (quotes included) to its value. The emitter
/// re-encodes values from scratch, so the original quoting and escapes are
/// dropped here.
pub fn normalise_literal_string(raw: &SourceRange) -> SyntaxResult<String> {
  let bytes = raw.as_slice();
  let inner = &bytes[1..bytes.len() - 1];
  let mut out = Vec::<u8>::with_capacity(inner.len());
  let mut i = 0;
  while i < inner.len() {
    let c = inner[i];
    if c != b'\\' {
      out.push(c);
      i += 1;
      continue;
    };
    i += 1;
    if i >= inner.len() {
      return Err(SyntaxError::at_loc(raw, SyntaxErrorType::UnexpectedEnd, None));
    };
    let esc = inner[i];
    i += 1;
    match esc {
      b'n' => out.push(b'\n'),
      b'r' => out.push(b'\r'),
      b't' => out.push(b'\t'),
      b'b' => out.push(b'\x08'),
      b'f' => out.push(b'\x0c'),
      b'v' => out.push(b'\x0b'),
      b'0' if inner.get(i).map_or(true, |c| !c.is_ascii_digit()) => out.push(b'\0'),
      b'x' => {
        let hex = inner
          .get(i..i + 2)
          .and_then(|h| std::str::from_utf8(h).ok())
          .and_then(|h| u8::from_str_radix(h, 16).ok())
          .ok_or_else(|| SyntaxError::at_loc(raw, SyntaxErrorType::ExpectedSyntax("hex escape"), None))?;
        i += 2;
        push_char(&mut out, hex as char);
      }
      b'u' => {
        let cp = if inner.get(i) == Some(&b'{') {
          let close = inner[i..]
            .iter()
            .position(|&c| c == b'}')
            .ok_or_else(|| SyntaxError::at_loc(raw, SyntaxErrorType::ExpectedSyntax("unicode escape"), None))?;
          let digits = &inner[i + 1..i + close];
          i += close + 1;
          u32::from_str_radix(std::str::from_utf8(digits).map_err(|_| bad_unicode(raw))?, 16)
            .map_err(|_| bad_unicode(raw))?
        } else {
          let digits = inner.get(i..i + 4).ok_or_else(|| bad_unicode(raw))?;
          i += 4;
          u32::from_str_radix(std::str::from_utf8(digits).map_err(|_| bad_unicode(raw))?, 16)
            .map_err(|_| bad_unicode(raw))?
        };
        // Lone surrogates cannot round-trip through a Rust String; map them
        // to U+FFFD like any other unpaired surrogate handling.
        push_char(&mut out, char::from_u32(cp).unwrap_or('\u{fffd}'));
      }
      // Escaped line terminator is a line continuation: nothing.
      b'\n' => {}
      b'\r' => {
        if inner.get(i) == Some(&b'\n') {
          i += 1;
        };
      }
      c => out.push(c),
    };
  }
  String::from_utf8(out)
    .map_err(|_| SyntaxError::at_loc(raw, SyntaxErrorType::ExpectedSyntax("valid UTF-8 string"), None))
}

fn bad_unicode(raw: &SourceRange) -> SyntaxError {
  SyntaxError::at_loc(raw, SyntaxErrorType::ExpectedSyntax("unicode escape"), None)
}

fn push_char(out: &mut Vec<u8>, c: char) {
  let mut buf = [0u8; 4];
  out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

pub fn parse_and_normalise_literal_string(parser: &mut Parser) -> SyntaxResult<String> {
  let t = parser.require(TokenType::LiteralString)?;
  normalise_literal_string(&t.loc)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn range(s: &str) -> SourceRange {
    SourceRange::synthesised(s.as_bytes().to_vec())
  }

  #[test]
  fn test_normalise_literal_string_escapes() {
    assert_eq!(normalise_literal_string(&range(r#""a\nb""#)).unwrap(), "a\nb");
    assert_eq!(normalise_literal_string(&range(r#"'a\'b'"#)).unwrap(), "a'b");
    assert_eq!(normalise_literal_string(&range(r#""\x41B\u{43}""#)).unwrap(), "ABC");
    assert_eq!(normalise_literal_string(&range("\"a\\\nb\"")).unwrap(), "ab");
  }

  #[test]
  fn test_normalise_literal_number_radix() {
    assert_eq!(normalise_literal_number(&range("0x10")).unwrap().0, 16.0);
    assert_eq!(normalise_literal_number(&range("0b101")).unwrap().0, 5.0);
    assert_eq!(normalise_literal_number(&range(".5")).unwrap().0, 0.5);
    assert_eq!(normalise_literal_number(&range("1e3")).unwrap().0, 1000.0);
  }
}
