use crate::ast::{
  ClassMember, ExportName, ExportNames, ForHeader, ForInit, ForLhs, MemberKey, NodeId, Syntax,
  VarDeclKind, VarDeclarator,
};
use crate::error::{SyntaxErrorType, SyntaxResult};
use crate::parse::expr::{
  parse_expr, parse_expr_until_either_with_asi, parse_expr_with_asi, parse_object_or_class_member,
  Asi,
};
use crate::parse::literal::parse_and_normalise_literal_string;
use crate::parse::parser::Parser;
use crate::parse::pattern::{
  is_identifier_like, parse_fn_signature, parse_pattern, PatternAction,
};
use crate::source::SourceRange;
use crate::symbol::{Binding, ScopeId, ScopeKind};
use crate::token::TokenType;

pub fn parse_stmt(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  match parser.peek()?.typ {
    TokenType::BraceOpen => parse_stmt_block(scope, parser),
    TokenType::KeywordBreak => parse_stmt_break(scope, parser),
    TokenType::KeywordClass => parse_decl_class(scope, parser, false),
    TokenType::KeywordConst | TokenType::KeywordLet | TokenType::KeywordVar => {
      parse_stmt_var(scope, parser)
    }
    TokenType::KeywordContinue => parse_stmt_continue(scope, parser),
    TokenType::KeywordDebugger => parse_stmt_debugger(scope, parser),
    TokenType::KeywordDo => parse_stmt_do_while(scope, parser),
    TokenType::KeywordExport => parse_stmt_export(scope, parser),
    TokenType::KeywordFor => parse_stmt_for(scope, parser),
    TokenType::KeywordFunction => parse_decl_function(scope, parser, false),
    TokenType::KeywordAsync => {
      // `async function` begins a declaration; anything else beginning with
      // `async` is an expression statement.
      let cp = parser.checkpoint();
      parser.consume_peeked();
      let next = parser.peek()?;
      parser.rewind(cp);
      if next.typ == TokenType::KeywordFunction && !next.preceded_by_line_terminator {
        parse_decl_function(scope, parser, false)
      } else {
        parse_stmt_expression(scope, parser)
      }
    }
    TokenType::KeywordIf => parse_stmt_if(scope, parser),
    TokenType::KeywordImport => parse_stmt_import_or_expr_import(scope, parser),
    TokenType::KeywordReturn => parse_stmt_return(scope, parser),
    TokenType::KeywordSwitch => parse_stmt_switch(scope, parser),
    TokenType::KeywordThrow => parse_stmt_throw(scope, parser),
    TokenType::KeywordTry => parse_stmt_try(scope, parser),
    TokenType::KeywordWhile => parse_stmt_while(scope, parser),
    TokenType::Semicolon => parse_stmt_empty(scope, parser),
    typ if is_identifier_like(typ) => {
      let cp = parser.checkpoint();
      let label_name = parser.next()?.loc;
      if parser.consume_if(TokenType::Colon)?.is_match() {
        let statement = parse_stmt(scope, parser)?;
        Ok(parser.create_node(scope, parser.since_checkpoint(cp), Syntax::LabelStmt {
          name: label_name,
          statement,
        }))
      } else {
        parser.rewind(cp);
        parse_stmt_expression(scope, parser)
      }
    }
    _ => parse_stmt_expression(scope, parser),
  }
}

pub fn parse_stmt_empty(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let loc = parser.require(TokenType::Semicolon)?.loc;
  Ok(parser.create_node(scope, loc, Syntax::EmptyStmt {}))
}

pub fn parse_stmt_block(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::BraceOpen)?;
  let block_scope = parser.create_child_scope(scope, ScopeKind::Block);
  let mut body = Vec::<NodeId>::new();
  loop {
    if let Some(end_loc) = parser.consume_if(TokenType::BraceClose)?.match_loc() {
      return Ok(parser.create_node(scope, &start.loc + end_loc, Syntax::BlockStmt { body }));
    };
    body.push(parse_stmt(block_scope, parser)?);
  }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum VarDeclParseMode {
  // Ordinary `var`/`let`/`const` statement, with ASI.
  Asi,
  // Take declarators up to the first non-comma token; used by `for` headers.
  Leftmost,
}

pub fn parse_decl_var(
  scope: ScopeId,
  parser: &mut Parser,
  parse_mode: VarDeclParseMode,
) -> SyntaxResult<NodeId> {
  let t = parser.next()?;
  let kind = match t.typ {
    TokenType::KeywordConst => VarDeclKind::Const,
    TokenType::KeywordLet => VarDeclKind::Let,
    TokenType::KeywordVar => VarDeclKind::Var,
    _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("variable declaration"))),
  };
  let mut loc = t.loc;
  let mut declarators = Vec::new();
  loop {
    let pattern = parse_pattern(scope, parser, match kind {
      VarDeclKind::Var => PatternAction::DeclareInClosure,
      _ => PatternAction::DeclareInBlock,
    })?;
    loc.extend(&parser[pattern].loc);
    let mut asi = match parse_mode {
      VarDeclParseMode::Asi => Asi::can(),
      VarDeclParseMode::Leftmost => Asi::no(),
    };
    let initializer = if parser.consume_if(TokenType::Equals)?.is_match() {
      let expr = parse_expr_until_either_with_asi(
        scope,
        parser,
        TokenType::Semicolon,
        TokenType::Comma,
        &mut asi,
      )?;
      loc.extend(&parser[expr].loc);
      Some(expr)
    } else {
      None
    };
    declarators.push(VarDeclarator {
      pattern,
      initializer,
    });
    match parse_mode {
      VarDeclParseMode::Asi => {
        if parser.consume_if(TokenType::Semicolon)?.is_match() || asi.did_end_with_asi {
          break;
        };
        let next = parser.peek()?;
        if next.preceded_by_line_terminator
          || next.typ == TokenType::BraceClose
          || next.typ == TokenType::Eof
        {
          break;
        };
        parser.require(TokenType::Comma)?;
      }
      VarDeclParseMode::Leftmost => {
        if !parser.consume_if(TokenType::Comma)?.is_match() {
          break;
        };
      }
    };
  }
  Ok(parser.create_node(scope, loc, Syntax::VarDecl { kind, declarators }))
}

pub fn parse_stmt_var(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let declaration = parse_decl_var(scope, parser, VarDeclParseMode::Asi)?;
  let loc = parser[declaration].loc.clone();
  Ok(parser.create_node(scope, loc, Syntax::VarStmt { declaration }))
}

pub fn parse_decl_function(
  scope: ScopeId,
  parser: &mut Parser,
  name_optional: bool,
) -> SyntaxResult<NodeId> {
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
      let name_node = parser.create_node(fn_scope, name.clone(), Syntax::ClassOrFnName {
        name: name.clone(),
      });
      // Sloppy-mode semantics: function declarations hoist to the enclosing
      // closure, even from inside a block.
      let closure = parser[scope].closure();
      parser[closure].declare(name, Binding::new(name_node));
      Some(name_node)
    }
    None if name_optional => None,
    None => {
      return Err(
        parser
          .peek()?
          .error(SyntaxErrorType::ExpectedSyntax("function name")),
      );
    }
  };
  let signature = parse_fn_signature(fn_scope, parser)?;
  let body = parse_stmt_block(fn_scope, parser)?;
  Ok(parser.create_node(scope, parser.since_checkpoint(start), Syntax::FnDecl {
    is_async,
    generator,
    name,
    signature,
    body,
  }))
}

/// Class body shared by declarations and expressions; returns the members and
/// the closing brace's range.
pub fn parse_class_body(
  scope: ScopeId,
  parser: &mut Parser,
) -> SyntaxResult<(Vec<ClassMember>, SourceRange)> {
  parser.require(TokenType::BraceOpen)?;
  let mut members = Vec::<ClassMember>::new();
  loop {
    if parser.consume_if(TokenType::Semicolon)?.is_match() {
      continue;
    };
    if parser.peek()?.typ == TokenType::BraceClose {
      break;
    };
    // `static` always comes first if present.
    let statik = parser.consume_if(TokenType::KeywordStatic)?.is_match();
    let (key, value) = parse_object_or_class_member(
      scope,
      parser,
      TokenType::Equals,
      TokenType::Semicolon,
      &mut Asi::can(),
    )?;
    parser.consume_if(TokenType::Semicolon)?;
    members.push(ClassMember { key, statik, value });
  }
  let end = parser.require(TokenType::BraceClose)?.loc;
  Ok((members, end))
}

pub fn parse_decl_class(
  scope: ScopeId,
  parser: &mut Parser,
  name_optional: bool,
) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordClass)?.loc;
  let name = match parser.consume_if(TokenType::Identifier)?.take_loc() {
    Some(name) => {
      let name_node = parser.create_node(scope, name.clone(), Syntax::ClassOrFnName {
        name: name.clone(),
      });
      // Classes bind in their block, unlike function declarations.
      parser[scope].declare(name, Binding::new(name_node));
      Some(name_node)
    }
    None if name_optional => None,
    None => {
      return Err(
        parser
          .peek()?
          .error(SyntaxErrorType::ExpectedSyntax("class name")),
      );
    }
  };
  let extends = parser
    .consume_if(TokenType::KeywordExtends)?
    .and_then(|| parse_expr(scope, parser, TokenType::BraceOpen))?;
  let (members, end) = parse_class_body(scope, parser)?;
  Ok(parser.create_node(scope, &start + &end, Syntax::ClassDecl {
    name,
    extends,
    members,
  }))
}

struct BreakOrContinue {
  loc: SourceRange,
  label: Option<SourceRange>,
}

fn parse_stmt_break_or_continue(
  parser: &mut Parser,
  t: TokenType,
) -> SyntaxResult<BreakOrContinue> {
  let mut loc = parser.require(t)?.loc;
  let next = parser.peek()?;
  let label = if is_identifier_like(next.typ) && !next.preceded_by_line_terminator {
    parser.consume_peeked();
    loc.extend(&next.loc);
    Some(next.loc)
  } else if next.typ == TokenType::Semicolon {
    parser.consume_peeked();
    None
  } else if next.preceded_by_line_terminator
    || next.typ == TokenType::BraceClose
    || next.typ == TokenType::Eof
  {
    // ASI.
    None
  } else {
    return Err(next.error(SyntaxErrorType::ExpectedSyntax("label")));
  };
  Ok(BreakOrContinue { loc, label })
}

pub fn parse_stmt_break(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let stmt = parse_stmt_break_or_continue(parser, TokenType::KeywordBreak)?;
  Ok(parser.create_node(scope, stmt.loc, Syntax::BreakStmt { label: stmt.label }))
}

pub fn parse_stmt_continue(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let stmt = parse_stmt_break_or_continue(parser, TokenType::KeywordContinue)?;
  Ok(parser.create_node(scope, stmt.loc, Syntax::ContinueStmt { label: stmt.label }))
}

pub fn parse_stmt_debugger(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let loc = parser.require(TokenType::KeywordDebugger)?.loc;
  parser.consume_if(TokenType::Semicolon)?;
  Ok(parser.create_node(scope, loc, Syntax::DebuggerStmt {}))
}

pub fn parse_stmt_expression(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let mut asi = Asi::can();
  let expression = parse_expr_with_asi(scope, parser, TokenType::Semicolon, &mut asi)?;
  if !asi.did_end_with_asi {
    let next = parser.peek()?;
    if next.typ != TokenType::Eof {
      parser.require(TokenType::Semicolon)?;
    };
  };
  let loc = parser[expression].loc.clone();
  Ok(parser.create_node(scope, loc, Syntax::ExprStmt { expression }))
}

// Parses `a`, `a as b`, `default as b`. Declares the alias if importing.
fn parse_import_or_export_name(
  scope: ScopeId,
  parser: &mut Parser,
  add_to_scope: bool,
) -> SyntaxResult<ExportName> {
  let (target, alias) = match parser.consume_if(TokenType::KeywordDefault)?.take_loc() {
    Some(target) => {
      parser.require(TokenType::KeywordAs)?;
      let alias = parser.require(TokenType::Identifier)?.loc;
      (target, alias)
    }
    None => {
      let target = parser
        .require_predicate(is_identifier_like, "import or export name")?
        .loc;
      let alias = if parser.consume_if(TokenType::KeywordAs)?.is_match() {
        parser.require(TokenType::Identifier)?.loc
      } else {
        target.clone()
      };
      (target, alias)
    }
  };
  let alias_node = parser.create_node(scope, alias.clone(), Syntax::IdPat {
    name: alias.clone(),
  });
  if add_to_scope {
    parser[scope].declare(alias, Binding::new(alias_node));
  };
  Ok(ExportName {
    target,
    alias: alias_node,
  })
}

/// Marks every binding introduced by an exported declaration so the mangler
/// leaves its public name alone.
fn mark_declaration_exported(parser: &mut Parser, scope: ScopeId, declaration: NodeId) {
  let mut names = Vec::<SourceRange>::new();
  collect_declared_names(parser, declaration, &mut names);
  for name in names {
    if let Some(owner) = parser.scopes().find_binding(scope, &name) {
      if let Some(binding) = parser[owner].get_mut(&name) {
        binding.exported = true;
      };
    };
  }
}

fn collect_declared_names(parser: &Parser, n: NodeId, out: &mut Vec<SourceRange>) {
  match &parser[n].stx {
    Syntax::VarStmt { declaration } => collect_declared_names(parser, *declaration, out),
    Syntax::VarDecl { declarators, .. } => {
      for decl in declarators {
        collect_declared_names(parser, decl.pattern, out);
      }
    }
    Syntax::FnDecl { name, .. } | Syntax::ClassDecl { name, .. } => {
      if let Some(name) = name {
        collect_declared_names(parser, *name, out);
      };
    }
    Syntax::ClassOrFnName { name } | Syntax::IdPat { name } => out.push(name.clone()),
    Syntax::ArrayPat { elements, rest } => {
      for e in elements.iter().flatten() {
        collect_declared_names(parser, e.target, out);
      }
      if let Some(rest) = rest {
        collect_declared_names(parser, *rest, out);
      };
    }
    Syntax::ObjectPat { properties, rest } => {
      for p in properties {
        collect_declared_names(parser, *p, out);
      }
      if let Some(rest) = rest {
        collect_declared_names(parser, *rest, out);
      };
    }
    Syntax::ObjectPatProp { key, target, .. } => match target {
      Some(target) => collect_declared_names(parser, *target, out),
      None => {
        if let MemberKey::Direct(name) = key {
          out.push(name.clone());
        };
      }
    },
    _ => {}
  };
}

pub fn parse_stmt_export(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordExport)?;
  let cp = parser.checkpoint();
  let t = parser.next()?;
  Ok(match t.typ {
    TokenType::BraceOpen => {
      let mut names = Vec::<ExportName>::new();
      loop {
        if parser.consume_if(TokenType::BraceClose)?.is_match() {
          break;
        };
        names.push(parse_import_or_export_name(scope, parser, false)?);
        if !parser.consume_if(TokenType::Comma)?.is_match() {
          parser.require(TokenType::BraceClose)?;
          break;
        };
      }
      let from = parser
        .consume_if(TokenType::KeywordFrom)?
        .and_then(|| parse_and_normalise_literal_string(parser))?;
      parser.consume_if(TokenType::Semicolon)?;
      parser.create_node(scope, start.loc, Syntax::ExportListStmt {
        names: ExportNames::Specific(names),
        from,
      })
    }
    TokenType::Asterisk => {
      let alias = if parser.consume_if(TokenType::KeywordAs)?.is_match() {
        let alias = parser.require(TokenType::Identifier)?.loc;
        let alias_node = parser.create_node(scope, alias.clone(), Syntax::IdPat {
          name: alias,
        });
        Some(alias_node)
      } else {
        None
      };
      parser.require(TokenType::KeywordFrom)?;
      let from = parse_and_normalise_literal_string(parser)?;
      parser.consume_if(TokenType::Semicolon)?;
      parser.create_node(scope, start.loc, Syntax::ExportListStmt {
        names: ExportNames::All(alias),
        from: Some(from),
      })
    }
    TokenType::KeywordDefault => match parser.peek()?.typ {
      // Hoistable declarations, possibly unnamed.
      TokenType::KeywordClass => {
        let declaration = parse_decl_class(scope, parser, true)?;
        mark_declaration_exported(parser, scope, declaration);
        parser.create_node(
          scope,
          &start.loc + &parser[declaration].loc,
          Syntax::ExportDeclStmt {
            declaration,
            default: true,
          },
        )
      }
      TokenType::KeywordAsync | TokenType::KeywordFunction => {
        let declaration = parse_decl_function(scope, parser, true)?;
        mark_declaration_exported(parser, scope, declaration);
        parser.create_node(
          scope,
          &start.loc + &parser[declaration].loc,
          Syntax::ExportDeclStmt {
            declaration,
            default: true,
          },
        )
      }
      _ => {
        let expression = parse_expr(scope, parser, TokenType::Semicolon)?;
        parser.consume_if(TokenType::Semicolon)?;
        parser.create_node(
          scope,
          &start.loc + &parser[expression].loc,
          Syntax::ExportDefaultStmt { expression },
        )
      }
    },
    TokenType::KeywordVar
    | TokenType::KeywordLet
    | TokenType::KeywordConst
    | TokenType::KeywordAsync
    | TokenType::KeywordFunction
    | TokenType::KeywordClass => {
      parser.rewind(cp);
      let declaration = parse_stmt(scope, parser)?;
      mark_declaration_exported(parser, scope, declaration);
      parser.create_node(
        scope,
        &start.loc + &parser[declaration].loc,
        Syntax::ExportDeclStmt {
          declaration,
          default: false,
        },
      )
    }
    _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("exportable declaration"))),
  })
}

pub fn parse_stmt_import_or_expr_import(
  scope: ScopeId,
  parser: &mut Parser,
) -> SyntaxResult<NodeId> {
  let cp = parser.checkpoint();
  let start = parser.require(TokenType::KeywordImport)?;
  if parser.peek()?.typ == TokenType::ParenthesisOpen {
    parser.rewind(cp);
    return parse_stmt_expression(scope, parser);
  };

  let (default, can_have_names) =
    if let Some(alias) = parser.consume_if(TokenType::Identifier)?.take_loc() {
      let alias_node = parser.create_node(scope, alias.clone(), Syntax::IdPat {
        name: alias.clone(),
      });
      parser[scope].declare(alias, Binding::new(alias_node));
      (
        Some(alias_node),
        parser.consume_if(TokenType::Comma)?.is_match(),
      )
    } else {
      (None, true)
    };
  let names = if !can_have_names {
    None
  } else if parser.consume_if(TokenType::Asterisk)?.is_match() {
    parser.require(TokenType::KeywordAs)?;
    let alias = parser.require(TokenType::Identifier)?.loc;
    let alias_node = parser.create_node(scope, alias.clone(), Syntax::IdPat {
      name: alias.clone(),
    });
    parser[scope].declare(alias, Binding::new(alias_node));
    Some(ExportNames::All(Some(alias_node)))
  } else if default.is_some() && parser.peek()?.typ != TokenType::BraceOpen {
    // `import a from "m"`.
    None
  } else {
    parser.require(TokenType::BraceOpen)?;
    let mut names = Vec::<ExportName>::new();
    while !parser.consume_if(TokenType::BraceClose)?.is_match() {
      names.push(parse_import_or_export_name(scope, parser, true)?);
      if !parser.consume_if(TokenType::Comma)?.is_match() {
        parser.require(TokenType::BraceClose)?;
        break;
      };
    }
    Some(ExportNames::Specific(names))
  };
  parser.require(TokenType::KeywordFrom)?;
  let module = parse_and_normalise_literal_string(parser)?;
  parser.consume_if(TokenType::Semicolon)?;
  Ok(parser.create_node(scope, start.loc, Syntax::ImportStmt {
    default,
    names,
    module,
  }))
}

pub fn parse_stmt_if(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordIf)?;
  parser.require(TokenType::ParenthesisOpen)?;
  let test = parse_expr(scope, parser, TokenType::ParenthesisClose)?;
  parser.require(TokenType::ParenthesisClose)?;
  let consequent = parse_stmt(scope, parser)?;
  let alternate = if parser.consume_if(TokenType::KeywordElse)?.is_match() {
    Some(parse_stmt(scope, parser)?)
  } else {
    None
  };
  let end = alternate.unwrap_or(consequent);
  Ok(parser.create_node(scope, &start.loc + &parser[end].loc, Syntax::IfStmt {
    test,
    consequent,
    alternate,
  }))
}

pub fn parse_stmt_for(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let for_scope = parser.create_child_scope(scope, ScopeKind::Block);
  let start = parser.require(TokenType::KeywordFor)?;
  parser.require(TokenType::ParenthesisOpen)?;

  enum LhsRaw {
    Declaration(NodeId),
    Expression(NodeId),
    Pattern(NodeId),
    Empty,
  }
  let lhs_raw = match parser.peek()?.typ {
    TokenType::KeywordVar | TokenType::KeywordLet | TokenType::KeywordConst => LhsRaw::Declaration(
      parse_decl_var(for_scope, parser, VarDeclParseMode::Leftmost)?,
    ),
    TokenType::Semicolon => LhsRaw::Empty,
    _ => {
      // A for-in/of LHS pattern is ambiguous with an expression; try the
      // pattern reading and fall back.
      let cp = parser.checkpoint();
      let as_pattern = parse_pattern(for_scope, parser, PatternAction::None)
        .ok()
        .filter(|_| {
          matches!(
            parser.peek().map(|t| t.typ),
            Ok(TokenType::KeywordIn) | Ok(TokenType::KeywordOf)
          )
        });
      match as_pattern {
        Some(node) => LhsRaw::Pattern(node),
        None => {
          parser.rewind(cp);
          LhsRaw::Expression(parse_expr(for_scope, parser, TokenType::Semicolon)?)
        }
      }
    }
  };
  let header = match parser.peek()?.typ {
    TokenType::KeywordIn | TokenType::KeywordOf => {
      let of = parser.next()?.typ == TokenType::KeywordOf;
      let lhs = match lhs_raw {
        LhsRaw::Empty => return Err(start.error(SyntaxErrorType::ForLoopHeaderHasNoLhs)),
        LhsRaw::Declaration(node) => match &parser[node].stx {
          Syntax::VarDecl { declarators, .. } => {
            if declarators.len() != 1 {
              return Err(start.error(SyntaxErrorType::ForLoopHeaderHasMultipleDeclarators));
            };
            ForLhs::Declaration(node)
          }
          _ => unreachable!(),
        },
        LhsRaw::Pattern(node) => ForLhs::Pattern(node),
        LhsRaw::Expression(_) => {
          return Err(start.error(SyntaxErrorType::ForLoopHeaderHasInvalidLhs));
        }
      };
      let rhs = parse_expr(for_scope, parser, TokenType::ParenthesisClose)?;
      parser.require(TokenType::ParenthesisClose)?;
      ForHeader::InOf { of, lhs, rhs }
    }
    _ => {
      let init = match lhs_raw {
        LhsRaw::Declaration(node) => {
          parser.require(TokenType::Semicolon)?;
          ForInit::Declaration(node)
        }
        LhsRaw::Expression(node) => {
          parser.require(TokenType::Semicolon)?;
          ForInit::Expression(node)
        }
        LhsRaw::Empty => {
          parser.require(TokenType::Semicolon)?;
          ForInit::None
        }
        LhsRaw::Pattern(_) => {
          return Err(start.error(SyntaxErrorType::ForLoopHeaderHasInvalidLhs));
        }
      };
      let condition = if parser.consume_if(TokenType::Semicolon)?.is_match() {
        None
      } else {
        let expr = parse_expr(for_scope, parser, TokenType::Semicolon)?;
        parser.require(TokenType::Semicolon)?;
        Some(expr)
      };
      let post = if parser.consume_if(TokenType::ParenthesisClose)?.is_match() {
        None
      } else {
        let expr = parse_expr(for_scope, parser, TokenType::ParenthesisClose)?;
        parser.require(TokenType::ParenthesisClose)?;
        Some(expr)
      };
      ForHeader::Three {
        init,
        condition,
        post,
      }
    }
  };
  let body = parse_stmt(for_scope, parser)?;
  Ok(parser.create_node(scope, &start.loc + &parser[body].loc, Syntax::ForStmt {
    header,
    body,
  }))
}

pub fn parse_stmt_return(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordReturn)?;
  let mut loc = start.loc;
  let next = parser.peek()?;
  let value = if next.preceded_by_line_terminator
    || next.typ == TokenType::BraceClose
    || next.typ == TokenType::Eof
  {
    // ASI: `return` with nothing on the same line returns undefined.
    None
  } else if parser.consume_if(TokenType::Semicolon)?.is_match() {
    None
  } else {
    let mut asi = Asi::can();
    let value = parse_expr_with_asi(scope, parser, TokenType::Semicolon, &mut asi)?;
    if !asi.did_end_with_asi {
      let next = parser.peek()?;
      if next.typ != TokenType::Eof {
        parser.require(TokenType::Semicolon)?;
      };
    };
    loc.extend(&parser[value].loc);
    Some(value)
  };
  Ok(parser.create_node(scope, loc, Syntax::ReturnStmt { value }))
}

pub fn parse_stmt_throw(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordThrow)?;
  if parser.peek()?.preceded_by_line_terminator {
    // Restricted production.
    return Err(start.error(SyntaxErrorType::LineTerminatorAfterThrow));
  };
  let mut asi = Asi::can();
  let value = parse_expr_with_asi(scope, parser, TokenType::Semicolon, &mut asi)?;
  if !asi.did_end_with_asi {
    let next = parser.peek()?;
    if next.typ != TokenType::Eof {
      parser.require(TokenType::Semicolon)?;
    };
  };
  Ok(parser.create_node(scope, &start.loc + &parser[value].loc, Syntax::ThrowStmt {
    value,
  }))
}

pub fn parse_stmt_try(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordTry)?;
  let mut loc = start.loc.clone();
  let wrapped = parse_stmt_block(scope, parser)?;
  let catch = if parser.consume_if(TokenType::KeywordCatch)?.is_match() {
    let catch_scope = parser.create_child_scope(scope, ScopeKind::Block);
    let parameter = if parser.consume_if(TokenType::ParenthesisOpen)?.is_match() {
      let pattern = parse_pattern(catch_scope, parser, PatternAction::DeclareInBlock)?;
      parser.require(TokenType::ParenthesisClose)?;
      Some(pattern)
    } else {
      None
    };
    let body = parse_stmt_block(catch_scope, parser)?;
    loc.extend(&parser[body].loc);
    let catch_loc = parser[body].loc.clone();
    Some(parser.create_node(scope, catch_loc, Syntax::CatchBlock { parameter, body }))
  } else {
    None
  };
  let finally = if parser.consume_if(TokenType::KeywordFinally)?.is_match() {
    let body = parse_stmt_block(scope, parser)?;
    loc.extend(&parser[body].loc);
    Some(body)
  } else {
    None
  };
  if catch.is_none() && finally.is_none() {
    return Err(start.error(SyntaxErrorType::TryStatementHasNoCatchOrFinally));
  };
  Ok(parser.create_node(scope, loc, Syntax::TryStmt {
    wrapped,
    catch,
    finally,
  }))
}

pub fn parse_stmt_while(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordWhile)?;
  parser.require(TokenType::ParenthesisOpen)?;
  let condition = parse_expr(scope, parser, TokenType::ParenthesisClose)?;
  parser.require(TokenType::ParenthesisClose)?;
  let body = parse_stmt(scope, parser)?;
  Ok(parser.create_node(scope, &start.loc + &parser[body].loc, Syntax::WhileStmt {
    condition,
    body,
  }))
}

pub fn parse_stmt_do_while(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordDo)?;
  let body = parse_stmt(scope, parser)?;
  parser.require(TokenType::KeywordWhile)?;
  parser.require(TokenType::ParenthesisOpen)?;
  let condition = parse_expr(scope, parser, TokenType::ParenthesisClose)?;
  let end = parser.require(TokenType::ParenthesisClose)?;
  parser.consume_if(TokenType::Semicolon)?;
  Ok(parser.create_node(scope, &start.loc + &end.loc, Syntax::DoWhileStmt {
    condition,
    body,
  }))
}

pub fn parse_stmt_switch(scope: ScopeId, parser: &mut Parser) -> SyntaxResult<NodeId> {
  let start = parser.require(TokenType::KeywordSwitch)?;
  parser.require(TokenType::ParenthesisOpen)?;
  let test = parse_expr(scope, parser, TokenType::ParenthesisClose)?;
  parser.require(TokenType::ParenthesisClose)?;
  // All branches share one block scope.
  let switch_scope = parser.create_child_scope(scope, ScopeKind::Block);
  parser.require(TokenType::BraceOpen)?;
  let mut branches = Vec::<NodeId>::new();
  while parser.peek()?.typ != TokenType::BraceClose {
    let mut loc = parser.peek()?.loc;
    let case = if parser.consume_if(TokenType::KeywordCase)?.is_match() {
      Some(parse_expr(switch_scope, parser, TokenType::Colon)?)
    } else {
      parser.require(TokenType::KeywordDefault)?;
      None
    };
    parser.require(TokenType::Colon)?;
    let mut body = Vec::<NodeId>::new();
    loop {
      match parser.peek()?.typ {
        TokenType::KeywordCase | TokenType::KeywordDefault | TokenType::BraceClose => break,
        _ => {
          let stmt = parse_stmt(switch_scope, parser)?;
          loc.extend(&parser[stmt].loc);
          body.push(stmt);
        }
      };
    }
    branches.push(parser.create_node(switch_scope, loc, Syntax::SwitchBranch { case, body }));
  }
  let end = parser.require(TokenType::BraceClose)?;
  Ok(parser.create_node(scope, &start.loc + &end.loc, Syntax::SwitchStmt {
    test,
    branches,
  }))
}
