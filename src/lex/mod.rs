use std::collections::HashMap;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use lazy_static::lazy_static;
use memchr::{memchr, memchr3};

use crate::char::{ByteSet, DIGIT, DIGIT_BIN, DIGIT_HEX, DIGIT_OCT, ID_CONTINUE, ID_START_BYTES, WHITESPACE};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::source::{Source, SourceRange};
use crate::token::{Token, TokenType};

#[cfg(test)]
mod tests;

#[derive(Copy, Clone, Eq, PartialEq)]
pub enum LexMode {
  // At an operand position a `/` starts a regex literal.
  SlashIsRegex,
  Standard,
}

#[derive(Copy, Clone)]
pub struct LexerCheckpoint {
  next: usize,
}

pub struct Lexer {
  source: Source,
  next: usize,
}

impl Lexer {
  pub fn new(code: Vec<u8>) -> Lexer {
    Lexer {
      source: Source::new(code),
      next: 0,
    }
  }

  fn end(&self) -> usize {
    self.source.code().len()
  }

  fn at_end(&self) -> bool {
    self.next >= self.end()
  }

  fn remaining(&self) -> &[u8] {
    &self.source.code()[self.next..]
  }

  pub fn whole_range(&self) -> SourceRange {
    SourceRange {
      source: self.source.clone(),
      start: 0,
      end: self.end(),
    }
  }

  fn eof_range(&self) -> SourceRange {
    SourceRange {
      source: self.source.clone(),
      start: self.end(),
      end: self.end(),
    }
  }

  fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    SyntaxError::new(typ, self.next, None)
  }

  fn peek_at(&self, n: usize) -> Option<u8> {
    self.source.code().get(self.next + n).copied()
  }

  fn peek_or_err(&self, n: usize) -> SyntaxResult<u8> {
    self
      .peek_at(n)
      .ok_or_else(|| self.error(SyntaxErrorType::UnexpectedEnd))
  }

  pub fn checkpoint(&self) -> LexerCheckpoint {
    LexerCheckpoint { next: self.next }
  }

  pub fn since_checkpoint(&self, cp: LexerCheckpoint) -> SourceRange {
    SourceRange {
      source: self.source.clone(),
      start: cp.next,
      end: self.next,
    }
  }

  pub fn rewind(&mut self, cp: LexerCheckpoint) {
    self.next = cp.next;
  }

  fn skip(&mut self, n: usize) {
    debug_assert!(self.next + n <= self.end());
    self.next += n;
  }

  fn skip_while(&mut self, set: &ByteSet) -> usize {
    let mut len = 0;
    while let Some(c) = self.peek_at(len) {
      if !set.has(c) {
        break;
      };
      len += 1;
    }
    self.next += len;
    len
  }

  fn take_next(&mut self) -> SyntaxResult<u8> {
    let c = self.peek_or_err(0)?;
    self.next += 1;
    Ok(c)
  }

  fn range_of_next(&self, len: usize) -> SourceRange {
    SourceRange {
      source: self.source.clone(),
      start: self.next,
      end: self.next + len,
    }
  }
}

lazy_static! {
  pub static ref OPERATOR_TEXTS: HashMap<TokenType, &'static [u8]> = {
    let mut map = HashMap::<TokenType, &'static [u8]>::new();
    map.insert(TokenType::Ampersand, b"&");
    map.insert(TokenType::AmpersandAmpersand, b"&&");
    map.insert(TokenType::AmpersandAmpersandEquals, b"&&=");
    map.insert(TokenType::AmpersandEquals, b"&=");
    map.insert(TokenType::Asterisk, b"*");
    map.insert(TokenType::AsteriskAsterisk, b"**");
    map.insert(TokenType::AsteriskAsteriskEquals, b"**=");
    map.insert(TokenType::AsteriskEquals, b"*=");
    map.insert(TokenType::Bar, b"|");
    map.insert(TokenType::BarBar, b"||");
    map.insert(TokenType::BarBarEquals, b"||=");
    map.insert(TokenType::BarEquals, b"|=");
    map.insert(TokenType::BraceClose, b"}");
    map.insert(TokenType::BraceOpen, b"{");
    map.insert(TokenType::BracketClose, b"]");
    map.insert(TokenType::BracketOpen, b"[");
    map.insert(TokenType::Caret, b"^");
    map.insert(TokenType::CaretEquals, b"^=");
    map.insert(TokenType::ChevronLeft, b"<");
    map.insert(TokenType::ChevronLeftChevronLeft, b"<<");
    map.insert(TokenType::ChevronLeftChevronLeftEquals, b"<<=");
    map.insert(TokenType::ChevronLeftEquals, b"<=");
    map.insert(TokenType::ChevronRight, b">");
    map.insert(TokenType::ChevronRightChevronRight, b">>");
    map.insert(TokenType::ChevronRightChevronRightChevronRight, b">>>");
    map.insert(TokenType::ChevronRightChevronRightChevronRightEquals, b">>>=");
    map.insert(TokenType::ChevronRightChevronRightEquals, b">>=");
    map.insert(TokenType::ChevronRightEquals, b">=");
    map.insert(TokenType::Colon, b":");
    map.insert(TokenType::Comma, b",");
    map.insert(TokenType::Dot, b".");
    map.insert(TokenType::DotDotDot, b"...");
    map.insert(TokenType::Equals, b"=");
    map.insert(TokenType::EqualsChevronRight, b"=>");
    map.insert(TokenType::EqualsEquals, b"==");
    map.insert(TokenType::EqualsEqualsEquals, b"===");
    map.insert(TokenType::Exclamation, b"!");
    map.insert(TokenType::ExclamationEquals, b"!=");
    map.insert(TokenType::ExclamationEqualsEquals, b"!==");
    map.insert(TokenType::Hyphen, b"-");
    map.insert(TokenType::HyphenEquals, b"-=");
    map.insert(TokenType::HyphenHyphen, b"--");
    map.insert(TokenType::ParenthesisClose, b")");
    map.insert(TokenType::ParenthesisOpen, b"(");
    map.insert(TokenType::Percent, b"%");
    map.insert(TokenType::PercentEquals, b"%=");
    map.insert(TokenType::Plus, b"+");
    map.insert(TokenType::PlusEquals, b"+=");
    map.insert(TokenType::PlusPlus, b"++");
    map.insert(TokenType::PrivateMember, b"#");
    map.insert(TokenType::Question, b"?");
    map.insert(TokenType::QuestionDot, b"?.");
    map.insert(TokenType::QuestionDotBracketOpen, b"?.[");
    map.insert(TokenType::QuestionDotParenthesisOpen, b"?.(");
    map.insert(TokenType::QuestionQuestion, b"??");
    map.insert(TokenType::QuestionQuestionEquals, b"??=");
    map.insert(TokenType::Semicolon, b";");
    map.insert(TokenType::Slash, b"/");
    map.insert(TokenType::SlashEquals, b"/=");
    map.insert(TokenType::Tilde, b"~");
    map
  };

  pub static ref KEYWORD_TEXTS: HashMap<TokenType, &'static [u8]> = {
    let mut map = HashMap::<TokenType, &'static [u8]>::new();
    map.insert(TokenType::KeywordAs, b"as");
    map.insert(TokenType::KeywordAsync, b"async");
    map.insert(TokenType::KeywordAwait, b"await");
    map.insert(TokenType::KeywordBreak, b"break");
    map.insert(TokenType::KeywordCase, b"case");
    map.insert(TokenType::KeywordCatch, b"catch");
    map.insert(TokenType::KeywordClass, b"class");
    map.insert(TokenType::KeywordConst, b"const");
    map.insert(TokenType::KeywordConstructor, b"constructor");
    map.insert(TokenType::KeywordContinue, b"continue");
    map.insert(TokenType::KeywordDebugger, b"debugger");
    map.insert(TokenType::KeywordDefault, b"default");
    map.insert(TokenType::KeywordDelete, b"delete");
    map.insert(TokenType::KeywordDo, b"do");
    map.insert(TokenType::KeywordElse, b"else");
    map.insert(TokenType::KeywordExport, b"export");
    map.insert(TokenType::KeywordExtends, b"extends");
    map.insert(TokenType::KeywordFinally, b"finally");
    map.insert(TokenType::KeywordFor, b"for");
    map.insert(TokenType::KeywordFrom, b"from");
    map.insert(TokenType::KeywordFunction, b"function");
    map.insert(TokenType::KeywordGet, b"get");
    map.insert(TokenType::KeywordIf, b"if");
    map.insert(TokenType::KeywordImport, b"import");
    map.insert(TokenType::KeywordIn, b"in");
    map.insert(TokenType::KeywordInstanceof, b"instanceof");
    map.insert(TokenType::KeywordLet, b"let");
    map.insert(TokenType::KeywordNew, b"new");
    map.insert(TokenType::KeywordOf, b"of");
    map.insert(TokenType::KeywordReturn, b"return");
    map.insert(TokenType::KeywordSet, b"set");
    map.insert(TokenType::KeywordStatic, b"static");
    map.insert(TokenType::KeywordSuper, b"super");
    map.insert(TokenType::KeywordSwitch, b"switch");
    map.insert(TokenType::KeywordThis, b"this");
    map.insert(TokenType::KeywordThrow, b"throw");
    map.insert(TokenType::KeywordTry, b"try");
    map.insert(TokenType::KeywordTypeof, b"typeof");
    map.insert(TokenType::KeywordVar, b"var");
    map.insert(TokenType::KeywordVoid, b"void");
    map.insert(TokenType::KeywordWhile, b"while");
    map.insert(TokenType::KeywordWith, b"with");
    map.insert(TokenType::KeywordYield, b"yield");
    map.insert(TokenType::LiteralFalse, b"false");
    map.insert(TokenType::LiteralNull, b"null");
    map.insert(TokenType::LiteralTrue, b"true");
    map.insert(TokenType::LiteralUndefined, b"undefined");
    map
  };

  // Pattern order defines pattern ids, so PATTERNS and MATCHER must stay in
  // sync.
  static ref PATTERNS: Vec<(TokenType, &'static [u8])> = {
    let mut patterns: Vec<(TokenType, &'static [u8])> = Vec::new();
    for (&t, &text) in OPERATOR_TEXTS.iter() {
      patterns.push((t, text));
    }
    for (&t, &text) in KEYWORD_TEXTS.iter() {
      patterns.push((t, text));
    }
    patterns.push((TokenType::CommentMultiple, b"/*"));
    patterns.push((TokenType::CommentSingle, b"//"));
    for c in ID_START_BYTES.chunks(1) {
      patterns.push((TokenType::Identifier, c));
    }
    for c in b"0123456789".chunks(1) {
      patterns.push((TokenType::LiteralNumber, c));
    }
    patterns.push((TokenType::LiteralNumberBin, b"0b"));
    patterns.push((TokenType::LiteralNumberBin, b"0B"));
    patterns.push((TokenType::LiteralNumberHex, b"0x"));
    patterns.push((TokenType::LiteralNumberHex, b"0X"));
    patterns.push((TokenType::LiteralNumberOct, b"0o"));
    patterns.push((TokenType::LiteralNumberOct, b"0O"));
    // `.5` is a number, not the `.` operator.
    for c in b".0.1.2.3.4.5.6.7.8.9".chunks(2) {
      patterns.push((TokenType::LiteralNumber, c));
    }
    // `?.5` is `?` then `.5`, not the `?.` operator.
    for c in b"?.0?.1?.2?.3?.4?.5?.6?.7?.8?.9".chunks(3) {
      patterns.push((TokenType::Question, c));
    }
    patterns.push((TokenType::LiteralString, b"\""));
    patterns.push((TokenType::LiteralString, b"'"));
    patterns.push((TokenType::LiteralTemplatePartString, b"`"));
    patterns
  };

  static ref MATCHER: AhoCorasick = AhoCorasickBuilder::new()
    .anchored(true)
    .dfa(true)
    .match_kind(MatchKind::LeftmostLongest)
    .build(PATTERNS.iter().map(|(_, pat)| pat));

  static ref COMMENT_END: AhoCorasick = AhoCorasick::new(&[b"*/"]);
}

fn lex_comment_multiple(lexer: &mut Lexer) -> SyntaxResult<()> {
  lexer.skip(2);
  let mat = COMMENT_END
    .find(lexer.remaining())
    .ok_or_else(|| lexer.error(SyntaxErrorType::UnexpectedEnd))?;
  lexer.skip(mat.end());
  Ok(())
}

fn lex_comment_single(lexer: &mut Lexer) -> SyntaxResult<()> {
  lexer.skip(2);
  match memchr(b'\n', lexer.remaining()) {
    Some(pos) => lexer.skip(pos + 1),
    // A final line comment may run to EOF.
    None => lexer.next = lexer.end(),
  };
  Ok(())
}

fn lex_identifier(lexer: &mut Lexer, asi: bool) -> SyntaxResult<Token> {
  let cp = lexer.checkpoint();
  lexer.skip(1);
  loop {
    lexer.skip_while(&ID_CONTINUE);
    // Assume any non-ASCII byte continues the identifier; the UTF-8 sequence
    // is carried through verbatim.
    match lexer.peek_at(0) {
      Some(c) if !c.is_ascii() => lexer.skip(1),
      _ => break,
    };
  }
  Ok(Token::new(
    lexer.since_checkpoint(cp),
    TokenType::Identifier,
    asi,
  ))
}

fn lex_number(lexer: &mut Lexer, asi: bool) -> SyntaxResult<Token> {
  let cp = lexer.checkpoint();
  let int_digits = lexer.skip_while(&DIGIT);
  // `123n` is a bigint; a fraction or exponent cannot follow.
  if int_digits > 0 && lexer.peek_at(0) == Some(b'n') {
    lexer.skip(1);
    return Ok(Token::new(
      lexer.since_checkpoint(cp),
      TokenType::LiteralBigInt,
      asi,
    ));
  };
  if lexer.peek_at(0) == Some(b'.') {
    lexer.skip(1);
    lexer.skip_while(&DIGIT);
  };
  if matches!(lexer.peek_at(0), Some(b'e') | Some(b'E')) {
    lexer.skip(1);
    if matches!(lexer.peek_at(0), Some(b'+') | Some(b'-')) {
      lexer.skip(1);
    };
    lexer.skip_while(&DIGIT);
  };
  Ok(Token::new(
    lexer.since_checkpoint(cp),
    TokenType::LiteralNumber,
    asi,
  ))
}

fn lex_number_radix(lexer: &mut Lexer, digits: &ByteSet, asi: bool) -> SyntaxResult<Token> {
  let cp = lexer.checkpoint();
  lexer.skip(2);
  lexer.skip_while(digits);
  Ok(Token::new(
    lexer.since_checkpoint(cp),
    TokenType::LiteralNumber,
    asi,
  ))
}

fn lex_private_member(lexer: &mut Lexer, asi: bool) -> SyntaxResult<Token> {
  let cp = lexer.checkpoint();
  // The `#` is part of the name.
  lexer.skip(1);
  if !crate::char::ID_START.has(lexer.peek_or_err(0)?) {
    return Err(lexer.error(SyntaxErrorType::ExpectedSyntax("private member name")));
  };
  lexer.skip(1);
  lexer.skip_while(&ID_CONTINUE);
  Ok(Token::new(
    lexer.since_checkpoint(cp),
    TokenType::PrivateMember,
    asi,
  ))
}

fn lex_regex(lexer: &mut Lexer, asi: bool) -> SyntaxResult<Token> {
  let cp = lexer.checkpoint();
  // Opening slash.
  lexer.skip(1);
  let mut in_class = false;
  loop {
    match lexer.take_next()? {
      b'\\' => {
        if lexer.peek_or_err(0)? == b'\n' {
          return Err(lexer.error(SyntaxErrorType::LineTerminatorInRegex));
        };
        lexer.skip(1);
      }
      b'/' if !in_class => break,
      b'[' => in_class = true,
      b']' if in_class => in_class = false,
      b'\n' => return Err(lexer.error(SyntaxErrorType::LineTerminatorInRegex)),
      _ => {}
    };
  }
  // Flags.
  lexer.skip_while(&ID_CONTINUE);
  Ok(Token::new(
    lexer.since_checkpoint(cp),
    TokenType::LiteralRegex,
    asi,
  ))
}

fn lex_string(lexer: &mut Lexer, asi: bool) -> SyntaxResult<Token> {
  let cp = lexer.checkpoint();
  let quote = lexer.take_next()?;
  loop {
    let pos = memchr3(b'\\', b'\n', quote, lexer.remaining())
      .ok_or_else(|| lexer.error(SyntaxErrorType::UnexpectedEnd))?;
    lexer.skip(pos);
    match lexer.peek_or_err(0)? {
      b'\\' => lexer.skip(2.min(lexer.end() - lexer.next)),
      b'\n' => return Err(lexer.error(SyntaxErrorType::LineTerminatorInString)),
      _ => {
        lexer.skip(1);
        break;
      }
    };
  }
  Ok(Token::new(
    lexer.since_checkpoint(cp),
    TokenType::LiteralString,
    asi,
  ))
}

/// Lexes a template part up to `${` or the closing backtick, excluding both
/// delimiters from the token range. Also used by the parser after each
/// substitution.
pub fn lex_template_part(lexer: &mut Lexer, asi: bool) -> SyntaxResult<Token> {
  let cp = lexer.checkpoint();
  loop {
    let pos = memchr3(b'\\', b'`', b'$', lexer.remaining())
      .ok_or_else(|| lexer.error(SyntaxErrorType::UnexpectedEnd))?;
    lexer.skip(pos);
    match lexer.peek_or_err(0)? {
      b'\\' => lexer.skip(2.min(lexer.end() - lexer.next)),
      b'`' => {
        let loc = lexer.since_checkpoint(cp);
        lexer.skip(1);
        return Ok(Token::new(loc, TokenType::LiteralTemplatePartStringEnd, asi));
      }
      b'$' => {
        if lexer.peek_at(1) == Some(b'{') {
          let loc = lexer.since_checkpoint(cp);
          lexer.skip(2);
          return Ok(Token::new(loc, TokenType::LiteralTemplatePartString, asi));
        };
        lexer.skip(1);
      }
      _ => unreachable!(),
    };
  }
}

fn lex_template(lexer: &mut Lexer, asi: bool) -> SyntaxResult<Token> {
  // Opening backtick.
  lexer.skip(1);
  lex_template_part(lexer, asi)
}

pub fn lex_next(lexer: &mut Lexer, mode: LexMode) -> SyntaxResult<Token> {
  let mut asi = false;
  loop {
    let ws_start = lexer.next;
    lexer.skip_while(&WHITESPACE);
    asi = asi || memchr(b'\n', &lexer.source.code()[ws_start..lexer.next]).is_some();

    if lexer.at_end() {
      return Ok(Token::new(lexer.eof_range(), TokenType::Eof, asi));
    };

    // Any non-ASCII byte at token start is taken to begin an identifier.
    if lexer.peek_at(0).filter(|c| !c.is_ascii()).is_some() {
      return lex_identifier(lexer, asi);
    };

    let mat = MATCHER
      .find(lexer.remaining())
      .ok_or_else(|| lexer.error(SyntaxErrorType::ExpectedNotFound))?;
    let mut mat_len = mat.end();
    match PATTERNS[mat.pattern()].0 {
      TokenType::CommentMultiple => lex_comment_multiple(lexer)?,
      TokenType::CommentSingle => {
        // The comment consumes its terminating newline.
        asi = true;
        lex_comment_single(lexer)?;
      }
      pat => {
        return match pat {
          TokenType::Identifier => lex_identifier(lexer, asi),
          TokenType::LiteralNumber => lex_number(lexer, asi),
          TokenType::LiteralNumberBin => lex_number_radix(lexer, &DIGIT_BIN, asi),
          TokenType::LiteralNumberHex => lex_number_radix(lexer, &DIGIT_HEX, asi),
          TokenType::LiteralNumberOct => lex_number_radix(lexer, &DIGIT_OCT, asi),
          TokenType::LiteralString => lex_string(lexer, asi),
          TokenType::LiteralTemplatePartString => lex_template(lexer, asi),
          TokenType::PrivateMember => lex_private_member(lexer, asi),
          TokenType::Slash | TokenType::SlashEquals if mode == LexMode::SlashIsRegex => {
            lex_regex(lexer, asi)
          }
          typ => {
            if typ == TokenType::Question && mat_len != 1 {
              // Matched the `?.<digit>` guard pattern.
              mat_len = 1;
            } else if KEYWORD_TEXTS.contains_key(&typ)
              && lexer
                .peek_at(mat_len)
                .filter(|&c| ID_CONTINUE.has(c) || !c.is_ascii())
                .is_some()
            {
              // Keyword was a prefix of a longer identifier.
              return lex_identifier(lexer, asi);
            };
            let loc = lexer.range_of_next(mat_len);
            lexer.skip(mat_len);
            Ok(Token::new(loc, typ, asi))
          }
        };
      }
    };
  }
}
