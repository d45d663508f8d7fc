pub mod expr;
pub mod literal;
pub mod operator;
pub mod parser;
pub mod pattern;
pub mod stmt;
#[cfg(test)]
mod tests;

use crate::ast::{NodeId, NodePool, Syntax};
use crate::error::SyntaxResult;
use crate::lex::Lexer;
use crate::symbol::{ScopeId, ScopeTree};
use crate::token::TokenType;

use self::parser::Parser;
use self::stmt::parse_stmt;

#[derive(Debug)]
pub struct ParseOutput {
  pub nodes: NodePool,
  pub scopes: ScopeTree,
  pub top_level_node: NodeId,
  pub top_level_scope: ScopeId,
}

/// Parses a whole program and registers every declared binding; reference
/// resolution is a separate pass (see `resolve`).
pub fn parse(source: Vec<u8>) -> SyntaxResult<ParseOutput> {
  let mut parser = Parser::new(Lexer::new(source));
  let top_level_scope = parser.create_top_level_scope();
  let mut body = Vec::<NodeId>::new();
  while !parser.consume_if(TokenType::Eof)?.is_match() {
    body.push(parse_stmt(top_level_scope, &mut parser)?);
  }
  let whole = parser.whole_range();
  let top_level_node = parser.create_node(top_level_scope, whole, Syntax::TopLevel { body });
  let (nodes, scopes) = parser.take();
  Ok(ParseOutput {
    nodes,
    scopes,
    top_level_node,
    top_level_scope,
  })
}
