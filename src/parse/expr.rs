use crate::ast::{
  ArrayElement, ArrayPatElement, MemberKey, MemberValue, NodeId, ObjectMemberKind, Syntax,
  TemplatePart,
};
use crate::error::{SyntaxErrorType, SyntaxResult};
use crate::lex::{lex_template_part, LexMode, KEYWORD_TEXTS};
use crate::operator::{is_assignment_op, Associativity, OpName, OPERATORS};
use crate::parse::literal::{
  normalise_literal_bigint, normalise_literal_number, normalise_literal_string,
};
use crate::parse::operator::{MULTARY_OPERATOR_MAPPING, UNARY_OPERATOR_MAPPING};
use crate::parse::parser::Parser;
use crate::parse::pattern::{is_identifier_like, parse_fn_signature, PatternAction};
use crate::parse::stmt::{parse_class_body, parse_stmt_block};
use crate::symbol::{Binding, ScopeId, ScopeKind};
use crate::token::TokenType;

/// Automatic Semicolon Insertion state for the statement being parsed.
pub struct Asi {
  pub can_end_with_asi: bool,
  pub did_end_with_asi: bool,
}

impl Asi {
  pub fn can() -> Asi {
    Asi {
      can_end_with_asi: true,
      did_end_with_asi: false,
    }
  }

  pub fn no() -> Asi {
    Asi {
      can_end_with_asi: false,
      did_end_with_asi: false,
    }
  }
}

pub fn parse_expr(scope: ScopeId, parser: &mut Parser, terminator: TokenType) -> SyntaxResult<NodeId> {
  let mut asi = Asi::no();
  parse_expr_with_min_prec(scope, parser, 1, terminator, TokenType::_Dummy, false, &mut asi)
}

pub fn parse_expr_with_asi(
  scope: ScopeId,
  parser: &mut Parser,
  terminator: TokenType,
  asi: &mut Asi,
) -> SyntaxResult<NodeId> {
  parse_expr_with_min_prec(scope, parser, 1, terminator, TokenType::_Dummy, false, asi)
}

pub fn parse_expr_until_either(
  scope: ScopeId,
  parser: &mut Parser,
  terminator_a: TokenType,
  terminator_b: TokenType,
) -> SyntaxResult<NodeId> {
  let mut asi = Asi::no();
  parse_expr_with_min_prec(scope, parser, 1, terminator_a, terminator_b, false, &mut asi)
}

pub fn parse_expr_until_either_with_asi(
  scope: ScopeId,
  parser: &mut Parser,
  terminator_a: TokenType,
  terminator_b: TokenType,
  asi: &mut Asi,
) -> SyntaxResult<NodeId> {
  parse_expr_with_min_prec(scope, parser, 1, terminator_a, terminator_b, false, asi)
}

pub fn parse_call_args(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<Vec<NodeId>> {
  let mut args = Vec::<NodeId>::new();
  loop {
    if parser.peek()?.typ == TokenType::ParenthesisClose {
      break;
    };
    let spread = parser.consume_if(TokenType::DotDotDot)?.is_match();
    let value =
      parse_expr_until_either(scope, parser, TokenType::Comma, TokenType::ParenthesisClose)?;
    let loc = parser[value].loc.clone();
    args.push(parser.create_node(scope, loc, Syntax::CallArg { spread, value }));
    if !parser.consume_if(TokenType::Comma)?.is_match() {
      break;
    };
  }
  Ok(args)
}

fn parse_grouping(scope: ScopeId, parser: &mut Parser, asi: &mut Asi) -> SyntaxResult<NodeId> {
  parser.require(TokenType::ParenthesisOpen)?;
  let expr = parse_expr_with_min_prec(
    scope,
    parser,
    1,
    TokenType::ParenthesisClose,
    TokenType::_Dummy,
    true,
    asi,
  )?;
  parser.require(TokenType::ParenthesisClose)?;
  Ok(expr)
}

fn parse_expr_array(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::BracketOpen)?;
  let mut elements = Vec::<ArrayElement>::new();
  loop {
    if parser.consume_if(TokenType::Comma)?.is_match() {
      elements.push(ArrayElement::Empty);
      continue;
    };
    if parser.peek()?.typ == TokenType::BracketClose {
      break;
    };
    let rest = parser.consume_if(TokenType::DotDotDot)?.is_match();
    let value = parse_expr_until_either(scope, parser, TokenType::Comma, TokenType::BracketClose)?;
    elements.push(if rest {
      ArrayElement::Rest(value)
    } else {
      ArrayElement::Single(value)
    });
    if parser.peek()?.typ == TokenType::BracketClose {
      break;
    };
    parser.require(TokenType::Comma)?;
  }
  let end = parser.require(TokenType::BracketClose)?;
  Ok(parser.create_node(scope, &start.loc + &end.loc, Syntax::ArrayLit { elements }))
}

fn parse_expr_object(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::BraceOpen)?;
  let mut members = Vec::<NodeId>::new();
  loop {
    if parser.peek()?.typ == TokenType::BraceClose {
      break;
    };
    if parser.consume_if(TokenType::DotDotDot)?.is_match() {
      let value = parse_expr_until_either(scope, parser, TokenType::Comma, TokenType::BraceClose)?;
      let loc = parser[value].loc.clone();
      members.push(parser.create_node(scope, loc, Syntax::ObjectMember {
        kind: ObjectMemberKind::Rest { value },
      }));
    } else {
      let cp = parser.checkpoint();
      let (key, value) = parse_object_or_class_member(
        scope,
        parser,
        TokenType::Colon,
        TokenType::Comma,
        &mut Asi::no(),
      )?;
      let kind = match value {
        MemberValue::Property { initializer: None } => ObjectMemberKind::Shorthand {
          name: match key {
            MemberKey::Direct(name) => name,
            _ => unreachable!(),
          },
        },
        value => ObjectMemberKind::Valued { key, value },
      };
      members.push(parser.create_node(
        scope,
        parser.since_checkpoint(cp),
        Syntax::ObjectMember { kind },
      ));
    };
    if parser.peek()?.typ == TokenType::BraceClose {
      break;
    };
    parser.require(TokenType::Comma)?;
  }
  let end = parser.require(TokenType::BraceClose)?;
  Ok(parser.create_node(scope, &start.loc + &end.loc, Syntax::ObjectLit { members }))
}

/// One member of an object literal or class body; shared grammar modulo the
/// value/statement delimiters.
/// `<key> [ '=' | ':' <expr> ]?` | `async? '*'? <key> '(' … ')' { … }` |
/// `get`/`set` `<key>` accessor forms.
pub fn parse_object_or_class_member(
  scope: ScopeId,
  parser: &mut Parser,
  value_delimiter: TokenType,
  statement_delimiter: TokenType,
  property_initialiser_asi: &mut Asi,
) -> SyntaxResult<(MemberKey, MemberValue)> {
  let cp = parser.checkpoint();
  let mut is_getter = false;
  let mut is_setter = false;
  let mut is_async = false;
  if parser.consume_if(TokenType::KeywordGet)?.is_match() {
    is_getter = true;
  } else if parser.consume_if(TokenType::KeywordSet)?.is_match() {
    is_setter = true;
  } else if parser.consume_if(TokenType::KeywordAsync)?.is_match() {
    is_async = true;
  };
  if is_getter || is_setter || is_async {
    let next = parser.peek()?.typ;
    if next == value_delimiter
      || next == TokenType::ParenthesisOpen
      || next == statement_delimiter
      || next == TokenType::BraceClose
    {
      // `get`/`set`/`async` used as a plain property name.
      parser.rewind(cp);
      is_getter = false;
      is_setter = false;
      is_async = false;
    };
  };
  let is_generator = parser.consume_if(TokenType::Asterisk)?.is_match();
  let key = crate::parse::pattern::parse_member_key(scope, parser)?;
  let value = if is_generator || is_async || parser.peek()?.typ == TokenType::ParenthesisOpen {
    let fn_scope = parser.create_child_scope(scope, ScopeKind::Closure);
    let signature = parse_fn_signature(fn_scope, parser)?;
    MemberValue::Method {
      is_async,
      generator: is_generator,
      signature,
      body: parse_stmt_block(fn_scope, parser)?,
    }
  } else if is_getter {
    let fn_scope = parser.create_child_scope(scope, ScopeKind::Closure);
    parser.require(TokenType::ParenthesisOpen)?;
    parser.require(TokenType::ParenthesisClose)?;
    MemberValue::Getter {
      body: parse_stmt_block(fn_scope, parser)?,
    }
  } else if is_setter {
    let fn_scope = parser.create_child_scope(scope, ScopeKind::Closure);
    parser.require(TokenType::ParenthesisOpen)?;
    let parameter =
      crate::parse::pattern::parse_pattern(fn_scope, parser, PatternAction::DeclareInClosure)?;
    parser.require(TokenType::ParenthesisClose)?;
    MemberValue::Setter {
      parameter,
      body: parse_stmt_block(fn_scope, parser)?,
    }
  } else if match &key {
    MemberKey::Direct(_) => match parser.peek()? {
      t if t.typ == TokenType::BraceClose => true,
      t if t.typ == statement_delimiter => true,
      t if property_initialiser_asi.can_end_with_asi && t.preceded_by_line_terminator => true,
      _ => false,
    },
    _ => false,
  } {
    MemberValue::Property { initializer: None }
  } else {
    parser.require(value_delimiter)?;
    let value = parse_expr_until_either_with_asi(
      scope,
      parser,
      statement_delimiter,
      TokenType::BraceClose,
      property_initialiser_asi,
    )?;
    MemberValue::Property {
      initializer: Some(value),
    }
  };
  Ok((key, value))
}

fn parse_arrow_function_body(
  fn_scope: ScopeId,
  parser: &mut Parser,
  terminator_a: TokenType,
  terminator_b: TokenType,
) -> SyntaxResult<NodeId> {
  match parser.peek()?.typ {
    TokenType::BraceOpen => parse_stmt_block(fn_scope, parser),
    _ => parse_expr_until_either(fn_scope, parser, terminator_a, terminator_b),
  }
}

fn parse_expr_arrow_function_or_grouping(
  scope: ScopeId,
  parser: &mut Parser,
  terminator_a: TokenType,
  terminator_b: TokenType,
  asi: &mut Asi,
) -> SyntaxResult<NodeId> {
  // Parse as an arrow signature first; on failure, backtrack and parse as a
  // grouping. Once `=>` is seen there is no more backtracking.
  let cp = parser.checkpoint();
  let fn_scope = parser.create_child_scope(scope, ScopeKind::Closure);
  let signature = match parse_fn_signature(fn_scope, parser).and_then(|sig| {
    let arrow = parser.require(TokenType::EqualsChevronRight)?;
    if arrow.preceded_by_line_terminator {
      return Err(arrow.error(SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters));
    };
    Ok(sig)
  }) {
    Ok(sig) => sig,
    Err(err) if err.typ == SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters => {
      return Err(err);
    }
    Err(_) => {
      parser.rewind(cp);
      return parse_grouping(scope, parser, asi);
    }
  };
  let body = parse_arrow_function_body(fn_scope, parser, terminator_a, terminator_b)?;
  Ok(parser.create_node(
    scope,
    &parser[signature].loc + &parser[body].loc,
    Syntax::ArrowFnExpr {
      is_async: false,
      signature,
      body,
    },
  ))
}

fn parse_single_param_arrow_function(
  scope: ScopeId,
  parser: &mut Parser,
  terminator_a: TokenType,
  terminator_b: TokenType,
  is_async: bool,
  param: crate::source::SourceRange,
) -> SyntaxResult<NodeId> {
  let fn_scope = parser.create_child_scope(scope, ScopeKind::Closure);
  let pattern = parser.create_node(fn_scope, param.clone(), Syntax::IdPat {
    name: param.clone(),
  });
  parser[fn_scope].declare(param.clone(), Binding::new(pattern));
  let param_decl = parser.create_node(fn_scope, param.clone(), Syntax::ParamDecl {
    rest: false,
    pattern,
    default_value: None,
  });
  let signature = parser.create_node(fn_scope, param.clone(), Syntax::FnSignature {
    parameters: vec![param_decl],
  });
  let arrow = parser.require(TokenType::EqualsChevronRight)?;
  if arrow.preceded_by_line_terminator {
    return Err(arrow.error(SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters));
  };
  let body = parse_arrow_function_body(fn_scope, parser, terminator_a, terminator_b)?;
  Ok(parser.create_node(
    scope,
    &param + &parser[body].loc,
    Syntax::ArrowFnExpr {
      is_async,
      signature,
      body,
    },
  ))
}

fn parse_expr_function(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.checkpoint();
  let is_async = parser.consume_if(TokenType::KeywordAsync)?.is_match();
  parser.require(TokenType::KeywordFunction)?;
  let generator = parser.consume_if(TokenType::Asterisk)?.is_match();
  let fn_scope = parser.create_child_scope(scope, ScopeKind::Closure);
  let name = match parser
    .consume_if_pred(|t| is_identifier_like(t.typ))?
    .take_loc()
  {
    Some(name) => {
      // A function expression's name binds inside the function only.
      let name_node = parser.create_node(fn_scope, name.clone(), Syntax::ClassOrFnName {
        name: name.clone(),
      });
      parser[fn_scope].declare(name, Binding::new(name_node));
      Some(name_node)
    }
    None => None,
  };
  let signature = parse_fn_signature(fn_scope, parser)?;
  let body = parse_stmt_block(fn_scope, parser)?;
  Ok(parser.create_node(scope, parser.since_checkpoint(start), Syntax::FnExpr {
    parenthesised: false,
    is_async,
    generator,
    name,
    signature,
    body,
  }))
}

fn parse_expr_class(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordClass)?;
  let name = match parser.consume_if(TokenType::Identifier)?.take_loc() {
    Some(name) => {
      let name_node = parser.create_node(scope, name.clone(), Syntax::ClassOrFnName {
        name: name.clone(),
      });
      Some(name_node)
    }
    None => None,
  };
  let extends = parser
    .consume_if(TokenType::KeywordExtends)?
    .and_then(|| parse_expr(scope, parser, TokenType::BraceOpen))?;
  let (members, end) = parse_class_body(scope, parser)?;
  Ok(parser.create_node(scope, &start.loc + &end, Syntax::ClassExpr {
    parenthesised: false,
    name,
    extends,
    members,
  }))
}

fn parse_expr_import_call(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordImport)?;
  parser.require(TokenType::ParenthesisOpen)?;
  let module = parse_expr(scope, parser, TokenType::ParenthesisClose)?;
  let end = parser.require(TokenType::ParenthesisClose)?;
  Ok(parser.create_node(scope, &start.loc + &end.loc, Syntax::ImportCallExpr {
    module,
  }))
}

fn parse_expr_template(
  scope: ScopeId,
  parser: &mut Parser,
  head: crate::token::Token,
) -> SyntaxResult<NodeId> {
  let mut loc = head.loc.clone();
  let mut parts = vec![TemplatePart::Str(head.loc)];
  loop {
    let substitution = parse_expr(scope, parser, TokenType::BraceClose)?;
    parser.require(TokenType::BraceClose)?;
    parts.push(TemplatePart::Substitution(substitution));
    let part = lex_template_part(parser.lexer_mut(), false)?;
    parser.clear_buffered();
    loc.extend(&part.loc);
    let ended = part.typ == TokenType::LiteralTemplatePartStringEnd;
    parts.push(TemplatePart::Str(part.loc));
    if ended {
      break;
    };
  }
  Ok(parser.create_node(scope, loc, Syntax::TemplateLit { parts }))
}

fn parse_expr_operand(
  scope: ScopeId,
  parser: &mut Parser,
  terminator_a: TokenType,
  terminator_b: TokenType,
  asi: &mut Asi,
) -> SyntaxResult<NodeId> {
  let cp = parser.checkpoint();
  let t = parser.next_with_mode(LexMode::SlashIsRegex)?;
  let operand = if let Some(operator) = UNARY_OPERATOR_MAPPING.get(&t.typ) {
    let operator = if operator.name == OpName::Yield
      && parser.consume_if(TokenType::Asterisk)?.is_match()
    {
      &OPERATORS[&OpName::YieldDelegated]
    } else {
      *operator
    };
    let next_min_prec = operator.precedence + (operator.associativity == Associativity::Left) as u8;
    let operand = parse_expr_with_min_prec(
      scope,
      parser,
      next_min_prec,
      terminator_a,
      terminator_b,
      false,
      asi,
    )?;
    parser.create_node(scope, &t.loc + &parser[operand].loc, Syntax::UnaryExpr {
      parenthesised: false,
      operator: operator.name,
      argument: operand,
    })
  } else {
    match t.typ {
      TokenType::BracketOpen => {
        parser.rewind(cp);
        parse_expr_array(scope, parser)?
      }
      TokenType::BraceOpen => {
        parser.rewind(cp);
        parse_expr_object(scope, parser)?
      }
      TokenType::KeywordAsync => match parser.peek()?.typ {
        TokenType::KeywordFunction => {
          parser.rewind(cp);
          parse_expr_function(scope, parser)?
        }
        TokenType::ParenthesisOpen => {
          // `async (…) => …` is an arrow function; `async(…)` is a call of a
          // variable named `async`.
          let cp_args = parser.checkpoint();
          let fn_scope = parser.create_child_scope(scope, ScopeKind::Closure);
          match parse_fn_signature(fn_scope, parser).and_then(|sig| {
            let arrow = parser.require(TokenType::EqualsChevronRight)?;
            if arrow.preceded_by_line_terminator {
              return Err(
                arrow.error(SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters),
              );
            };
            Ok(sig)
          }) {
            Ok(signature) => {
              let body =
                parse_arrow_function_body(fn_scope, parser, terminator_a, terminator_b)?;
              parser.create_node(scope, &t.loc + &parser[body].loc, Syntax::ArrowFnExpr {
                is_async: true,
                signature,
                body,
              })
            }
            Err(_) => {
              parser.rewind(cp_args);
              parser.create_node(scope, t.loc.clone(), Syntax::IdExpr { name: t.loc })
            }
          }
        }
        typ if is_identifier_like(typ) => {
          let param = parser.next()?;
          parse_single_param_arrow_function(
            scope,
            parser,
            terminator_a,
            terminator_b,
            true,
            param.loc,
          )?
        }
        // `async` as a plain variable name.
        _ => parser.create_node(scope, t.loc.clone(), Syntax::IdExpr { name: t.loc }),
      },
      typ if is_identifier_like(typ) => {
        if parser.peek()?.typ == TokenType::EqualsChevronRight {
          parse_single_param_arrow_function(
            scope,
            parser,
            terminator_a,
            terminator_b,
            false,
            t.loc,
          )?
        } else {
          parser.create_node(scope, t.loc.clone(), Syntax::IdExpr { name: t.loc })
        }
      }
      TokenType::KeywordFunction => {
        parser.rewind(cp);
        parse_expr_function(scope, parser)?
      }
      TokenType::KeywordClass => {
        parser.rewind(cp);
        parse_expr_class(scope, parser)?
      }
      TokenType::KeywordImport => {
        parser.rewind(cp);
        parse_expr_import_call(scope, parser)?
      }
      TokenType::KeywordSuper => parser.create_node(scope, t.loc, Syntax::SuperExpr {}),
      TokenType::KeywordThis => parser.create_node(scope, t.loc, Syntax::ThisExpr {}),
      TokenType::LiteralTrue | TokenType::LiteralFalse => {
        let value = t.typ == TokenType::LiteralTrue;
        parser.create_node(scope, t.loc, Syntax::BoolLit { value })
      }
      TokenType::LiteralNull => parser.create_node(scope, t.loc, Syntax::NullLit {}),
      TokenType::LiteralUndefined => parser.create_node(scope, t.loc, Syntax::UndefinedLit {}),
      TokenType::LiteralNumber => {
        let value = normalise_literal_number(&t.loc)?;
        parser.create_node(scope, t.loc, Syntax::NumLit { value })
      }
      TokenType::LiteralBigInt => {
        let digits = normalise_literal_bigint(&t.loc)?;
        parser.create_node(scope, t.loc, Syntax::BigIntLit { digits })
      }
      TokenType::LiteralString => {
        let value = normalise_literal_string(&t.loc)?;
        parser.create_node(scope, t.loc, Syntax::StrLit { value })
      }
      TokenType::LiteralRegex => parser.create_node(scope, t.loc, Syntax::RegexLit {}),
      TokenType::LiteralTemplatePartString => parse_expr_template(scope, parser, t)?,
      TokenType::LiteralTemplatePartStringEnd => {
        let parts = vec![TemplatePart::Str(t.loc.clone())];
        parser.create_node(scope, t.loc, Syntax::TemplateLit { parts })
      }
      TokenType::ParenthesisOpen => {
        parser.rewind(cp);
        parse_expr_arrow_function_or_grouping(scope, parser, terminator_a, terminator_b, asi)?
      }
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("expression operand"))),
    }
  };
  Ok(operand)
}

fn transform_literal_expr_to_destructuring_pattern(
  scope: ScopeId,
  parser: &mut Parser,
  node: NodeId,
) -> SyntaxResult<NodeId> {
  let loc = parser[node].loc.clone();
  match &parser[node].stx {
    Syntax::ArrayLit { elements } => {
      let elements: Vec<_> = elements
        .iter()
        .map(|e| match e {
          ArrayElement::Single(n) => (false, Some(*n)),
          ArrayElement::Rest(n) => (true, Some(*n)),
          ArrayElement::Empty => (false, None),
        })
        .collect();
      let mut pat_elements = Vec::<Option<ArrayPatElement>>::new();
      let mut rest = None;
      for (is_rest, elem) in elements {
        if rest.is_some() {
          return Err(parser.error_at(node, SyntaxErrorType::InvalidAssignmentTarget));
        };
        let Some(elem) = elem else {
          pat_elements.push(None);
          continue;
        };
        if is_rest {
          rest = Some(transform_literal_expr_to_destructuring_pattern(
            scope, parser, elem,
          )?);
          continue;
        };
        match parser[elem].stx {
          Syntax::BinaryExpr {
            parenthesised,
            operator,
            left,
            right,
          } => {
            if parenthesised || operator != OpName::Assignment {
              return Err(parser.error_at(node, SyntaxErrorType::InvalidAssignmentTarget));
            };
            pat_elements.push(Some(ArrayPatElement {
              target: transform_literal_expr_to_destructuring_pattern(scope, parser, left)?,
              default_value: Some(right),
            }));
          }
          _ => pat_elements.push(Some(ArrayPatElement {
            target: transform_literal_expr_to_destructuring_pattern(scope, parser, elem)?,
            default_value: None,
          })),
        };
      }
      Ok(parser.create_node(scope, loc, Syntax::ArrayPat {
        elements: pat_elements,
        rest,
      }))
    }
    Syntax::ObjectLit { members } => {
      let members = members.clone();
      let mut properties = Vec::<NodeId>::new();
      let mut rest = None;
      for member in members {
        if rest.is_some() {
          return Err(parser.error_at(node, SyntaxErrorType::InvalidAssignmentTarget));
        };
        enum Planned {
          Valued {
            key: MemberKey,
            initializer: NodeId,
          },
          Shorthand(crate::source::SourceRange),
          Rest(NodeId),
        }
        let planned = match &parser[member].stx {
          Syntax::ObjectMember { kind } => match kind {
            ObjectMemberKind::Valued { key, value } => match value {
              MemberValue::Property {
                initializer: Some(initializer),
              } => Planned::Valued {
                key: key.clone(),
                initializer: *initializer,
              },
              _ => return Err(parser.error_at(node, SyntaxErrorType::InvalidAssignmentTarget)),
            },
            ObjectMemberKind::Shorthand { name } => Planned::Shorthand(name.clone()),
            ObjectMemberKind::Rest { value } => Planned::Rest(*value),
          },
          _ => unreachable!(),
        };
        match planned {
          Planned::Valued { key, initializer } => {
            let (target, default_value) = match parser[initializer].stx {
              Syntax::BinaryExpr {
                parenthesised,
                operator,
                left,
                right,
              } => {
                if parenthesised || operator != OpName::Assignment {
                  return Err(parser.error_at(node, SyntaxErrorType::InvalidAssignmentTarget));
                };
                (
                  transform_literal_expr_to_destructuring_pattern(scope, parser, left)?,
                  Some(right),
                )
              }
              _ => (
                transform_literal_expr_to_destructuring_pattern(scope, parser, initializer)?,
                None,
              ),
            };
            properties.push(parser.create_node(scope, loc.clone(), Syntax::ObjectPatProp {
              key,
              target: Some(target),
              default_value,
            }));
          }
          Planned::Shorthand(name) => {
            properties.push(parser.create_node(scope, loc.clone(), Syntax::ObjectPatProp {
              key: MemberKey::Direct(name),
              target: None,
              default_value: None,
            }));
          }
          Planned::Rest(value) => {
            rest = Some(transform_literal_expr_to_destructuring_pattern(
              scope, parser, value,
            )?);
          }
        };
      }
      Ok(parser.create_node(scope, loc, Syntax::ObjectPat { properties, rest }))
    }
    // `{a: b = 1} = x` has already parsed `b = 1` into a pattern.
    Syntax::IdExpr { name } | Syntax::IdPat { name } => {
      let name = name.clone();
      Ok(parser.create_node(scope, loc, Syntax::IdPat { name }))
    }
    _ => Err(parser.error_at(node, SyntaxErrorType::InvalidAssignmentTarget)),
  }
}

// The LHS of an assignment is parsed as an expression and retroactively
// converted: a member/computed-member chain stays as-is, while object/array
// literals and identifiers become patterns.
fn convert_assignment_lhs_to_target(
  scope: ScopeId,
  parser: &mut Parser,
  lhs: NodeId,
  operator_name: OpName,
) -> SyntaxResult<NodeId> {
  match &parser[lhs].stx {
    Syntax::ArrayLit { .. } | Syntax::ObjectLit { .. } => {
      if operator_name != OpName::Assignment {
        return Err(parser.error_at(lhs, SyntaxErrorType::InvalidAssignmentTarget));
      };
      transform_literal_expr_to_destructuring_pattern(scope, parser, lhs)
    }
    Syntax::IdExpr { .. } => transform_literal_expr_to_destructuring_pattern(scope, parser, lhs),
    Syntax::ComputedMemberExpr { .. } | Syntax::MemberExpr { .. } => Ok(lhs),
    _ => Err(parser.error_at(lhs, SyntaxErrorType::InvalidAssignmentTarget)),
  }
}

pub fn parse_expr_with_min_prec(
  scope: ScopeId,
  parser: &mut Parser,
  min_prec: u8,
  terminator_a: TokenType,
  terminator_b: TokenType,
  parenthesised: bool,
  asi: &mut Asi,
) -> SyntaxResult<NodeId> {
  let mut left = parse_expr_operand(scope, parser, terminator_a, terminator_b, asi)?;

  loop {
    let cp = parser.checkpoint();
    let t = parser.next()?;

    if t.typ == terminator_a || t.typ == terminator_b || t.typ == TokenType::Eof {
      parser.rewind(cp);
      break;
    };

    match t.typ {
      // No ASI between the operand and a postfix operator.
      TokenType::PlusPlus | TokenType::HyphenHyphen if !t.preceded_by_line_terminator => {
        let operator_name = match t.typ {
          TokenType::PlusPlus => OpName::PostfixIncrement,
          _ => OpName::PostfixDecrement,
        };
        let operator = &OPERATORS[&operator_name];
        if operator.precedence < min_prec {
          parser.rewind(cp);
          break;
        };
        left = parser.create_node(scope, &parser[left].loc + &t.loc, Syntax::PostfixExpr {
          parenthesised: false,
          operator: operator_name,
          argument: left,
        });
        continue;
      }
      _ => {}
    };

    match MULTARY_OPERATOR_MAPPING.get(&t.typ) {
      None => {
        if asi.can_end_with_asi && (t.preceded_by_line_terminator || t.typ == TokenType::BraceClose)
        {
          parser.rewind(cp);
          asi.did_end_with_asi = true;
          break;
        };
        return Err(t.error(SyntaxErrorType::ExpectedSyntax("expression operator")));
      }
      Some(operator) => {
        if operator.precedence < min_prec {
          parser.rewind(cp);
          break;
        };

        let next_min_prec =
          operator.precedence + (operator.associativity == Associativity::Left) as u8;

        left = match operator.name {
          OpName::Call | OpName::OptionalChainingCall => {
            let arguments = parse_call_args(scope, parser)?;
            let end = parser.require(TokenType::ParenthesisClose)?;
            parser.create_node(scope, &parser[left].loc + &end.loc, Syntax::CallExpr {
              parenthesised: false,
              optional_chaining: operator.name == OpName::OptionalChainingCall,
              callee: left,
              arguments,
            })
          }
          OpName::ComputedMemberAccess | OpName::OptionalChainingComputedMemberAccess => {
            let member = parse_expr(scope, parser, TokenType::BracketClose)?;
            let end = parser.require(TokenType::BracketClose)?;
            parser.create_node(scope, &parser[left].loc + &end.loc, Syntax::ComputedMemberExpr {
              optional_chaining: operator.name == OpName::OptionalChainingComputedMemberAccess,
              object: left,
              member,
            })
          }
          OpName::Conditional => {
            let consequent = parse_expr_with_min_prec(
              scope,
              parser,
              1,
              TokenType::Colon,
              TokenType::_Dummy,
              false,
              &mut Asi::no(),
            )?;
            parser.require(TokenType::Colon)?;
            // The alternate is the next assignment-level expression, not a
            // full comma expression.
            let alternate = parse_expr_with_min_prec(
              scope,
              parser,
              OPERATORS[&OpName::Assignment].precedence,
              terminator_a,
              terminator_b,
              false,
              asi,
            )?;
            parser.create_node(scope, &parser[left].loc + &parser[alternate].loc, Syntax::CondExpr {
              parenthesised: false,
              test: left,
              consequent,
              alternate,
            })
          }
          OpName::MemberAccess | OpName::OptionalChainingMemberAccess => {
            let right_tok = parser.next()?;
            match right_tok.typ {
              TokenType::Identifier | TokenType::PrivateMember => {}
              typ if KEYWORD_TEXTS.contains_key(&typ) => {}
              _ => {
                return Err(right_tok.error(SyntaxErrorType::ExpectedSyntax("member property")));
              }
            };
            parser.create_node(scope, &parser[left].loc + &right_tok.loc, Syntax::MemberExpr {
              parenthesised: false,
              optional_chaining: operator.name == OpName::OptionalChainingMemberAccess,
              left,
              right: right_tok.loc,
            })
          }
          _ => {
            if is_assignment_op(operator.name) {
              left = convert_assignment_lhs_to_target(scope, parser, left, operator.name)?;
            };
            let right = parse_expr_with_min_prec(
              scope,
              parser,
              next_min_prec,
              terminator_a,
              terminator_b,
              false,
              asi,
            )?;
            parser.create_node(scope, &parser[left].loc + &parser[right].loc, Syntax::BinaryExpr {
              parenthesised: false,
              operator: operator.name,
              left,
              right,
            })
          }
        };
      }
    };
  }

  if parenthesised {
    match &mut parser[left].stx {
      Syntax::BinaryExpr { parenthesised, .. }
      | Syntax::CallExpr { parenthesised, .. }
      | Syntax::ClassExpr { parenthesised, .. }
      | Syntax::CondExpr { parenthesised, .. }
      | Syntax::FnExpr { parenthesised, .. }
      | Syntax::MemberExpr { parenthesised, .. }
      | Syntax::PostfixExpr { parenthesised, .. }
      | Syntax::UnaryExpr { parenthesised, .. } => {
        *parenthesised = true;
      }
      _ => {}
    };
  };

  Ok(left)
}
