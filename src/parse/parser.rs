use std::ops::{Index, IndexMut};

use crate::ast::{Node, NodeId, NodePool, Syntax};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::lex::{lex_next, LexMode, Lexer, LexerCheckpoint};
use crate::source::SourceRange;
use crate::symbol::{Scope, ScopeId, ScopeKind, ScopeTree};
use crate::token::{Token, TokenType};

/// Result of matching an optional token: the matched range if it was there.
#[derive(Debug)]
pub struct MaybeToken {
  range: SourceRange,
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<&SourceRange> {
    if self.matched {
      Some(&self.range)
    } else {
      None
    }
  }

  pub fn take_loc(self) -> Option<SourceRange> {
    if self.matched {
      Some(self.range)
    } else {
      None
    }
  }

  pub fn and_then<R, F: FnOnce() -> SyntaxResult<R>>(self, f: F) -> SyntaxResult<Option<R>> {
    Ok(if self.matched { Some(f()?) } else { None })
  }
}

pub struct ParserCheckpoint {
  checkpoint: LexerCheckpoint,
}

struct BufferedToken {
  token: Token,
  lex_mode: LexMode,
  after_checkpoint: LexerCheckpoint,
}

/// Parses and, at the same time, registers declared bindings into the scope
/// tree. Two passes are unavoidable anyway (a use can precede its `let`
/// lexically), so reference resolution happens separately in `resolve`.
pub struct Parser {
  lexer: Lexer,
  buffered: Option<BufferedToken>,
  nodes: NodePool,
  scopes: ScopeTree,
}

impl Parser {
  pub fn new(lexer: Lexer) -> Parser {
    Parser {
      lexer,
      buffered: None,
      nodes: NodePool::new(),
      scopes: ScopeTree::new(),
    }
  }

  pub fn lexer_mut(&mut self) -> &mut Lexer {
    &mut self.lexer
  }

  pub fn clear_buffered(&mut self) {
    self.buffered = None;
  }

  pub fn create_node(&mut self, scope: ScopeId, loc: SourceRange, stx: Syntax) -> NodeId {
    self.nodes.create_node(scope, loc, stx)
  }

  pub fn create_top_level_scope(&mut self) -> ScopeId {
    self.scopes.create_top_level_scope()
  }

  pub fn create_child_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
    self.scopes.create_child_scope(parent, kind)
  }

  pub fn take(self) -> (NodePool, ScopeTree) {
    (self.nodes, self.scopes)
  }

  pub fn whole_range(&self) -> SourceRange {
    self.lexer.whole_range()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      checkpoint: self.lexer.checkpoint(),
    }
  }

  pub fn since_checkpoint(&self, cp: ParserCheckpoint) -> SourceRange {
    self.lexer.since_checkpoint(cp.checkpoint)
  }

  pub fn rewind(&mut self, cp: ParserCheckpoint) {
    self.buffered = None;
    self.lexer.rewind(cp.checkpoint);
  }

  fn forward<K: FnOnce(&Token) -> bool>(&mut self, mode: LexMode, keep: K) -> SyntaxResult<Token> {
    match self.buffered.as_ref() {
      Some(b) if b.lex_mode == mode => Ok(if keep(&b.token) {
        self.lexer.rewind(b.after_checkpoint);
        self.buffered.take().unwrap().token
      } else {
        b.token.clone()
      }),
      _ => {
        let cp = self.lexer.checkpoint();
        let t = lex_next(&mut self.lexer, mode)?;
        self.buffered = if keep(&t) {
          None
        } else {
          let after_checkpoint = self.lexer.checkpoint();
          self.lexer.rewind(cp);
          Some(BufferedToken {
            token: t.clone(),
            lex_mode: mode,
            after_checkpoint,
          })
        };
        Ok(t)
      }
    }
  }

  pub fn next_with_mode(&mut self, mode: LexMode) -> SyntaxResult<Token> {
    self.forward(mode, |_| true)
  }

  pub fn next(&mut self) -> SyntaxResult<Token> {
    self.next_with_mode(LexMode::Standard)
  }

  pub fn peek(&mut self) -> SyntaxResult<Token> {
    self.forward(LexMode::Standard, |_| false)
  }

  pub fn consume_peeked(&mut self) {
    let b = self.buffered.take().unwrap();
    self.lexer.rewind(b.after_checkpoint);
  }

  pub fn consume_if(&mut self, typ: TokenType) -> SyntaxResult<MaybeToken> {
    let t = self.forward(LexMode::Standard, |t| t.typ == typ)?;
    Ok(MaybeToken {
      matched: t.typ == typ,
      range: t.loc,
    })
  }

  pub fn consume_if_pred<P: Fn(&Token) -> bool>(&mut self, pred: P) -> SyntaxResult<MaybeToken> {
    let t = self.forward(LexMode::Standard, |t| pred(t))?;
    Ok(MaybeToken {
      matched: pred(&t),
      range: t.loc,
    })
  }

  pub fn require(&mut self, typ: TokenType) -> SyntaxResult<Token> {
    let t = self.next()?;
    if t.typ != typ {
      Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }

  pub fn require_predicate<P: FnOnce(TokenType) -> bool>(
    &mut self,
    pred: P,
    expected: &'static str,
  ) -> SyntaxResult<Token> {
    let t = self.next()?;
    if !pred(t.typ) {
      Err(t.error(SyntaxErrorType::ExpectedSyntax(expected)))
    } else {
      Ok(t)
    }
  }

  pub fn error_at(&self, n: NodeId, typ: SyntaxErrorType) -> SyntaxError {
    SyntaxError::at_loc(&self.nodes[n].loc, typ, None)
  }

  pub fn scopes(&self) -> &ScopeTree {
    &self.scopes
  }

  pub fn scopes_mut(&mut self) -> &mut ScopeTree {
    &mut self.scopes
  }

  pub fn nodes(&self) -> &NodePool {
    &self.nodes
  }
}

impl Index<NodeId> for Parser {
  type Output = Node;

  fn index(&self, index: NodeId) -> &Node {
    &self.nodes[index]
  }
}

impl IndexMut<NodeId> for Parser {
  fn index_mut(&mut self, index: NodeId) -> &mut Node {
    &mut self.nodes[index]
  }
}

impl Index<ScopeId> for Parser {
  type Output = Scope;

  fn index(&self, index: ScopeId) -> &Scope {
    &self.scopes[index]
  }
}

impl IndexMut<ScopeId> for Parser {
  fn index_mut(&mut self, index: ScopeId) -> &mut Scope {
    &mut self.scopes[index]
  }
}
