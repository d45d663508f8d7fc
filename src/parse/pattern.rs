use crate::ast::{ArrayPatElement, MemberKey, NodeId, Syntax};
use crate::error::{SyntaxErrorType, SyntaxResult};
use crate::parse::expr::{parse_expr, parse_expr_until_either};
use crate::parse::parser::Parser;
use crate::symbol::{Binding, ScopeId};
use crate::token::TokenType;

/// Where the bindings introduced by a pattern land.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PatternAction {
  // Assignment targets: the names refer to existing bindings.
  None,
  // `let`/`const`/class/catch: the innermost scope.
  DeclareInBlock,
  // `var`/parameters/function names: the nearest closure-like scope.
  DeclareInClosure,
}

/// Tokens accepted where a binding or label name is expected. Contextual
/// keywords double as identifiers; the real reserved words do not.
pub fn is_identifier_like(typ: TokenType) -> bool {
  matches!(
    typ,
    TokenType::Identifier
      | TokenType::KeywordAs
      | TokenType::KeywordAsync
      | TokenType::KeywordConstructor
      | TokenType::KeywordFrom
      | TokenType::KeywordGet
      | TokenType::KeywordOf
      | TokenType::KeywordSet
      | TokenType::KeywordStatic
  )
}

pub fn declare_name(
  parser: &mut Parser,
  scope: ScopeId,
  action: PatternAction,
  name: &crate::source::SourceRange,
  declarator: NodeId,
) {
  match action {
    PatternAction::None => {}
    PatternAction::DeclareInBlock => {
      parser[scope].declare(name.clone(), Binding::new(declarator));
    }
    PatternAction::DeclareInClosure => {
      let closure = parser[scope].closure();
      parser[closure].declare(name.clone(), Binding::new(declarator));
    }
  };
}

fn parse_pattern_identifier(
  scope: ScopeId,
  parser: &mut Parser,
  action: PatternAction,
) -> SyntaxResult<NodeId> {
  let t = parser.require_predicate(is_identifier_like, "pattern identifier")?;
  let node = parser.create_node(scope, t.loc.clone(), Syntax::IdPat {
    name: t.loc.clone(),
  });
  declare_name(parser, scope, action, &t.loc, node);
  Ok(node)
}

pub fn parse_pattern(
  scope: ScopeId,
  parser: &mut Parser,
  action: PatternAction,
) -> SyntaxResult<NodeId> {
  let cp = parser.checkpoint();
  let t = parser.next()?;
  Ok(match t.typ {
    typ if is_identifier_like(typ) => {
      parser.rewind(cp);
      parse_pattern_identifier(scope, parser, action)?
    }
    TokenType::BraceOpen => {
      let mut properties = Vec::<NodeId>::new();
      let mut rest = None;
      loop {
        if parser.peek()?.typ == TokenType::BraceClose {
          break;
        };
        // Must be first or follow a comma, hence checked inside the loop.
        if parser.consume_if(TokenType::DotDotDot)?.is_match() {
          rest = Some(parse_pattern_identifier(scope, parser, action)?);
          break;
        };

        let mut loc = parser.peek()?.loc;
        let key = parse_member_key(scope, parser)?;
        let target = if parser.consume_if(TokenType::Colon)?.is_match() {
          Some(parse_pattern(scope, parser, action)?)
        } else {
          if let MemberKey::Computed(member) = key {
            return Err(parser.error_at(
              member,
              SyntaxErrorType::ExpectedSyntax("object pattern property subpattern"),
            ));
          };
          None
        };
        let default_value = parser.consume_if(TokenType::Equals)?.and_then(|| {
          parse_expr_until_either(scope, parser, TokenType::Comma, TokenType::BraceClose)
        })?;
        if let Some(n) = default_value.or(target) {
          loc.extend(&parser[n].loc);
        };
        let shorthand_name = match (&key, &target) {
          (MemberKey::Direct(name), None) => Some(name.clone()),
          _ => None,
        };
        let property = parser.create_node(scope, loc, Syntax::ObjectPatProp {
          key,
          target,
          default_value,
        });
        if let Some(name) = shorthand_name {
          declare_name(parser, scope, action, &name, property);
        };
        properties.push(property);
        if !parser.consume_if(TokenType::Comma)?.is_match() {
          break;
        };
      }
      let close = parser.require(TokenType::BraceClose)?;
      parser.create_node(scope, &t.loc + &close.loc, Syntax::ObjectPat {
        properties,
        rest,
      })
    }
    TokenType::BracketOpen => {
      let mut elements = Vec::<Option<ArrayPatElement>>::new();
      let mut rest = None;
      loop {
        if parser.peek()?.typ == TokenType::BracketClose {
          break;
        };
        if parser.consume_if(TokenType::DotDotDot)?.is_match() {
          rest = Some(parse_pattern(scope, parser, action)?);
          break;
        };

        // A bare comma elides this element.
        if parser.consume_if(TokenType::Comma)?.is_match() {
          elements.push(None);
          continue;
        };
        let target = parse_pattern(scope, parser, action)?;
        let default_value = parser.consume_if(TokenType::Equals)?.and_then(|| {
          parse_expr_until_either(scope, parser, TokenType::Comma, TokenType::BracketClose)
        })?;
        elements.push(Some(ArrayPatElement {
          target,
          default_value,
        }));
        if !parser.consume_if(TokenType::Comma)?.is_match() {
          break;
        };
      }
      let close = parser.require(TokenType::BracketClose)?;
      parser.create_node(scope, &t.loc + &close.loc, Syntax::ArrayPat {
        elements,
        rest,
      })
    }
    _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("pattern"))),
  })
}

/// `ident`, keyword, string, number, private name, or `[expr]`.
pub fn parse_member_key(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<MemberKey> {
  Ok(if parser.consume_if(TokenType::BracketOpen)?.is_match() {
    let expr = parse_expr(scope, parser, TokenType::BracketClose)?;
    parser.require(TokenType::BracketClose)?;
    MemberKey::Computed(expr)
  } else {
    let t = parser.next()?;
    match t.typ {
      TokenType::LiteralString
      | TokenType::LiteralNumber
      | TokenType::PrivateMember
      | TokenType::Identifier => MemberKey::Direct(t.loc),
      typ if crate::lex::KEYWORD_TEXTS.contains_key(&typ) => MemberKey::Direct(t.loc),
      _ => {
        return Err(t.error(SyntaxErrorType::ExpectedSyntax("member key")));
      }
    }
  })
}

/// Parses `( params )` into an FnSignature. `scope` must be the freshly
/// created closure scope of the function.
pub fn parse_fn_signature(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.checkpoint();
  let mut parameters = Vec::new();
  parser.require(TokenType::ParenthesisOpen)?;
  loop {
    if parser.consume_if(TokenType::ParenthesisClose)?.is_match() {
      break;
    };
    let rest = parser.consume_if(TokenType::DotDotDot)?.is_match();
    let pattern = parse_pattern(scope, parser, PatternAction::DeclareInClosure)?;
    let default_value = parser.consume_if(TokenType::Equals)?.and_then(|| {
      parse_expr_until_either(scope, parser, TokenType::Comma, TokenType::ParenthesisClose)
    })?;
    let loc = parser[pattern].loc.clone();
    parameters.push(parser.create_node(scope, loc, Syntax::ParamDecl {
      rest,
      pattern,
      default_value,
    }));
    if !parser.consume_if(TokenType::Comma)?.is_match() {
      parser.require(TokenType::ParenthesisClose)?;
      break;
    };
  }
  Ok(parser.create_node(scope, parser.since_checkpoint(start), Syntax::FnSignature {
    parameters,
  }))
}
