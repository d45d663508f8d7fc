use crate::ast::Syntax;
use crate::error::SyntaxErrorType;
use crate::parse::parse;

fn parse_ok(src: &str) -> crate::parse::ParseOutput {
  parse(src.as_bytes().to_vec()).unwrap()
}

fn parse_err(src: &str) -> SyntaxErrorType {
  parse(src.as_bytes().to_vec()).unwrap_err().typ
}

#[test]
fn test_parse_registers_declarations() {
  let out = parse_ok("let a = 1; var b; function f(c) {} class D {}");
  let top = &out.scopes[out.top_level_scope];
  for name in ["a", "b", "f", "D"] {
    assert!(
      top.get(&crate::source::SourceRange::synthesised(name)).is_some(),
      "{} should be declared at top level",
      name
    );
  }
}

#[test]
fn test_parse_var_hoists_to_closure() {
  let out = parse_ok("function f() { { var hoisted = 1; let blocked = 2; } }");
  let hoisted = crate::source::SourceRange::synthesised("hoisted");
  let blocked = crate::source::SourceRange::synthesised("blocked");
  let mut owner_of_hoisted = None;
  let mut owner_of_blocked = None;
  for id in out.scopes.ids() {
    if out.scopes[id].get(&hoisted).is_some() {
      owner_of_hoisted = Some(id);
    };
    if out.scopes[id].get(&blocked).is_some() {
      owner_of_blocked = Some(id);
    };
  }
  let owner_of_hoisted = owner_of_hoisted.unwrap();
  let owner_of_blocked = owner_of_blocked.unwrap();
  assert_ne!(owner_of_hoisted, owner_of_blocked);
  // `var` lands in a closure-like scope.
  assert_eq!(out.scopes[owner_of_hoisted].closure(), owner_of_hoisted);
}

#[test]
fn test_parse_asi() {
  // Newlines end statements where the grammar allows it.
  parse_ok("let a = 1\nlet b = 2\na + b");
  parse_ok("return_value()\nx++\n");
  // `return` on its own line returns undefined.
  let out = parse_ok("function f() { return\n1 }");
  let _ = out;
}

#[test]
fn test_parse_arrow_vs_grouping() {
  let out = parse_ok("x = (a, b) => a; y = (a, b);");
  let mut arrows = 0;
  crate::visit::walk(&out.nodes, out.top_level_node, &mut |n| {
    if matches!(&out.nodes[n].stx, Syntax::ArrowFnExpr { .. }) {
      arrows += 1;
    };
  });
  assert_eq!(arrows, 1);
}

#[test]
fn test_parse_errors_surface() {
  assert!(matches!(
    parse_err("let = 1;"),
    SyntaxErrorType::ExpectedSyntax(_) | SyntaxErrorType::RequiredTokenNotFound(_)
  ));
  assert_eq!(
    parse_err("try { f() }"),
    SyntaxErrorType::TryStatementHasNoCatchOrFinally
  );
  assert_eq!(parse_err("throw\nx;"), SyntaxErrorType::LineTerminatorAfterThrow);
  assert_eq!(
    parse_err("for (a b;;) {}"),
    SyntaxErrorType::ExpectedSyntax("expression operator")
  );
}

#[test]
fn test_parse_destructuring_assignment_targets() {
  let out = parse_ok("[a, { b: c }] = d;");
  let mut patterns = 0;
  crate::visit::walk(&out.nodes, out.top_level_node, &mut |n| {
    if matches!(
      &out.nodes[n].stx,
      Syntax::ArrayPat { .. } | Syntax::ObjectPat { .. }
    ) {
      patterns += 1;
    };
  });
  assert_eq!(patterns, 2);
}

#[test]
fn test_parse_scope_tree_shape() {
  let out = parse_ok("function f() { if (x) { let y; } }");
  // Program, function closure, body block, if-branch block.
  assert_eq!(out.scopes.len(), 4);
  // The program scope is always created first.
  assert_eq!(out.top_level_scope.id(), 0);
}
