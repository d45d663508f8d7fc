use std::fmt::{self, Debug, Display, Formatter};

use crate::source::SourceRange;
use crate::token::TokenType;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedNotFound,
  ExpectedSyntax(&'static str),
  ForLoopHeaderHasInvalidLhs,
  ForLoopHeaderHasMultipleDeclarators,
  ForLoopHeaderHasNoLhs,
  InvalidAssignmentTarget,
  LineTerminatorAfterArrowFunctionParameters,
  LineTerminatorAfterThrow,
  LineTerminatorInRegex,
  LineTerminatorInString,
  MalformedLiteralBigInt,
  MalformedLiteralNumber,
  RequiredTokenNotFound(TokenType),
  TryStatementHasNoCatchOrFinally,
  UnexpectedEnd,
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub position: usize,
  pub actual_token: Option<TokenType>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, position: usize, actual_token: Option<TokenType>) -> SyntaxError {
    SyntaxError {
      typ,
      position,
      actual_token,
    }
  }

  pub fn at_loc(loc: &SourceRange, typ: SyntaxErrorType, actual_token: Option<TokenType>) -> SyntaxError {
    SyntaxError {
      typ,
      position: loc.start,
      actual_token,
    }
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} [{} {:?}]", self.typ, self.position, self.actual_token)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} at position {}", self.typ, self.position)
  }
}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
