use lazy_static::lazy_static;
use std::collections::HashMap;
use std::io::{self, Write};

use crate::ast::{
  ArrayElement, ClassMember, ExportNames, ForHeader, ForInit, ForLhs, MemberKey, MemberValue,
  NodeId, NodePool, ObjectMemberKind, Syntax, TemplatePart, VarDeclKind,
};
use crate::operator::{OpName, OPERATORS};

#[cfg(test)]
mod tests;

lazy_static! {
  static ref BINARY_OPERATOR_TEXT: HashMap<OpName, &'static str> = {
    let mut map = HashMap::<OpName, &'static str>::new();
    // Call, Conditional, and member accesses are emitted structurally.
    map.insert(OpName::Addition, "+");
    map.insert(OpName::Assignment, "=");
    map.insert(OpName::AssignmentAddition, "+=");
    map.insert(OpName::AssignmentBitwiseAnd, "&=");
    map.insert(OpName::AssignmentBitwiseLeftShift, "<<=");
    map.insert(OpName::AssignmentBitwiseOr, "|=");
    map.insert(OpName::AssignmentBitwiseRightShift, ">>=");
    map.insert(OpName::AssignmentBitwiseUnsignedRightShift, ">>>=");
    map.insert(OpName::AssignmentBitwiseXor, "^=");
    map.insert(OpName::AssignmentDivision, "/=");
    map.insert(OpName::AssignmentExponentiation, "**=");
    map.insert(OpName::AssignmentLogicalAnd, "&&=");
    map.insert(OpName::AssignmentLogicalOr, "||=");
    map.insert(OpName::AssignmentMultiplication, "*=");
    map.insert(OpName::AssignmentNullishCoalescing, "??=");
    map.insert(OpName::AssignmentRemainder, "%=");
    map.insert(OpName::AssignmentSubtraction, "-=");
    map.insert(OpName::BitwiseAnd, "&");
    map.insert(OpName::BitwiseLeftShift, "<<");
    map.insert(OpName::BitwiseOr, "|");
    map.insert(OpName::BitwiseRightShift, ">>");
    map.insert(OpName::BitwiseUnsignedRightShift, ">>>");
    map.insert(OpName::BitwiseXor, "^");
    map.insert(OpName::Comma, ",");
    map.insert(OpName::Division, "/");
    map.insert(OpName::Equality, "==");
    map.insert(OpName::Exponentiation, "**");
    map.insert(OpName::GreaterThan, ">");
    map.insert(OpName::GreaterThanOrEqual, ">=");
    map.insert(OpName::In, " in ");
    map.insert(OpName::Inequality, "!=");
    map.insert(OpName::Instanceof, " instanceof ");
    map.insert(OpName::LessThan, "<");
    map.insert(OpName::LessThanOrEqual, "<=");
    map.insert(OpName::LogicalAnd, "&&");
    map.insert(OpName::LogicalOr, "||");
    map.insert(OpName::Multiplication, "*");
    map.insert(OpName::NullishCoalescing, "??");
    map.insert(OpName::Remainder, "%");
    map.insert(OpName::StrictEquality, "===");
    map.insert(OpName::StrictInequality, "!==");
    map.insert(OpName::Subtraction, "-");
    map
  };

  static ref UNARY_OPERATOR_TEXT: HashMap<OpName, &'static str> = {
    let mut map = HashMap::<OpName, &'static str>::new();
    map.insert(OpName::Await, "await ");
    map.insert(OpName::BitwiseNot, "~");
    map.insert(OpName::Delete, "delete ");
    map.insert(OpName::LogicalNot, "!");
    map.insert(OpName::New, "new ");
    map.insert(OpName::PrefixDecrement, "--");
    map.insert(OpName::PrefixIncrement, "++");
    map.insert(OpName::Typeof, "typeof ");
    map.insert(OpName::UnaryNegation, "-");
    map.insert(OpName::UnaryPlus, "+");
    map.insert(OpName::Void, "void ");
    map.insert(OpName::Yield, "yield ");
    map.insert(OpName::YieldDelegated, "yield*");
  map
  };
}

/// JSON-style double-quoted encoding. This is also the cost model's notion of
/// a string's printed length, so any change here changes byte accounting.
pub fn quote_str(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\x08' => out.push_str("\\b"),
      '\x0c' => out.push_str("\\f"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      c if (c as u32) < 0x20 => {
        out.push_str(&format!("\\u{:04x}", c as u32));
      }
      c => out.push(c),
    };
  }
  out.push('"');
  out
}

/// Shortest of the decimal spellings of `value` that evaluate back to it.
pub fn render_number(value: f64) -> String {
  if value == 0.0 {
    return "0".to_string();
  };
  if value.is_nan() {
    return "NaN".to_string();
  };
  if value.is_infinite() {
    // `1e999` overflows to Infinity.
    return if value > 0.0 { "1e999" } else { "-1e999" }.to_string();
  };
  let mut candidates = Vec::<String>::new();
  let plain = format!("{}", value);
  if let Some(stripped) = plain.strip_prefix("0.") {
    candidates.push(format!(".{}", stripped));
  } else if let Some(stripped) = plain.strip_prefix("-0.") {
    candidates.push(format!("-.{}", stripped));
  };
  // `12300000` -> `123e5`.
  let trailing_zeroes = plain.len() - plain.trim_end_matches('0').len();
  if !plain.contains('.') && trailing_zeroes > 2 {
    candidates.push(format!(
      "{}e{}",
      &plain[..plain.len() - trailing_zeroes],
      trailing_zeroes
    ));
  };
  let exp = format!("{:e}", value);
  if !exp.ends_with("e0") {
    candidates.push(exp);
  };
  candidates.push(plain);
  candidates.into_iter().min_by_key(|c| c.len()).unwrap()
}

pub fn emit(nodes: &NodePool, top_level_node: NodeId) -> Vec<u8> {
  let mut out = Vec::new();
  // Writing to a Vec cannot fail.
  emit_js(&mut out, nodes, top_level_node).unwrap();
  out
}

pub fn emit_js<T: Write>(out: &mut T, nodes: &NodePool, n: NodeId) -> io::Result<()> {
  emit_with_prec(out, nodes, n, None)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LeafKind {
  EmptyStmt,
  Block,
  Other,
}

fn leaf_kind(nodes: &NodePool, n: NodeId) -> LeafKind {
  match &nodes[n].stx {
    Syntax::WhileStmt { body, .. } | Syntax::ForStmt { body, .. } => leaf_kind(nodes, *body),
    Syntax::LabelStmt { statement, .. } => leaf_kind(nodes, *statement),
    Syntax::IfStmt {
      consequent,
      alternate,
      ..
    } => match alternate {
      Some(n) => leaf_kind(nodes, *n),
      None => leaf_kind(nodes, *consequent),
    },
    Syntax::BlockStmt { .. } => LeafKind::Block,
    Syntax::EmptyStmt {} => LeafKind::EmptyStmt,
    _ => LeafKind::Other,
  }
}

/// Whether the first printed token of this expression would be `{` or
/// `function`/`class`, which a statement or arrow-body position would
/// misparse.
fn starts_ambiguously(nodes: &NodePool, n: NodeId) -> bool {
  match &nodes[n].stx {
    Syntax::ObjectLit { .. } | Syntax::ObjectPat { .. } => true,
    // When already flagged parenthesised these print their own parentheses,
    // so the statement starts with `(`.
    Syntax::FnExpr { parenthesised, .. } | Syntax::ClassExpr { parenthesised, .. } => {
      !parenthesised
    }
    Syntax::BinaryExpr { left, .. } => starts_ambiguously(nodes, *left),
    Syntax::CallExpr { callee, .. } => starts_ambiguously(nodes, *callee),
    Syntax::CondExpr { test, .. } => starts_ambiguously(nodes, *test),
    Syntax::MemberExpr { left, .. } => starts_ambiguously(nodes, *left),
    Syntax::ComputedMemberExpr { object, .. } => starts_ambiguously(nodes, *object),
    Syntax::PostfixExpr { argument, .. } => starts_ambiguously(nodes, *argument),
    _ => false,
  }
}

// Statement separators: semicolons are omitted after blocks and declarations,
// and a trailing `if(x);`-style empty leaf still needs its semicolon.
fn emit_statements<T: Write>(out: &mut T, nodes: &NodePool, statements: &[NodeId]) -> io::Result<()> {
  let mut last: Option<NodeId> = None;
  for &n in statements {
    if let Some(prev) = last {
      match &nodes[prev].stx {
        // Print nothing or end in `}` on every path.
        Syntax::EmptyStmt {}
        | Syntax::BlockStmt { .. }
        | Syntax::FnDecl { .. }
        | Syntax::ClassDecl { .. }
        | Syntax::SwitchStmt { .. }
        | Syntax::TryStmt { .. } => {}
        // End in `}` only when the trailing leaf statement is a block.
        Syntax::IfStmt { .. }
        | Syntax::ForStmt { .. }
        | Syntax::WhileStmt { .. }
        | Syntax::LabelStmt { .. } => {
          if leaf_kind(nodes, prev) != LeafKind::Block {
            out.write_all(b";")?;
          };
        }
        _ => out.write_all(b";")?,
      };
    };
    emit_js(out, nodes, n)?;
    last = Some(n);
  }
  if let Some(n) = last {
    if leaf_kind(nodes, n) == LeafKind::EmptyStmt {
      out.write_all(b";")?;
    };
  };
  Ok(())
}

fn emit_member_key<T: Write>(out: &mut T, nodes: &NodePool, key: &MemberKey) -> io::Result<()> {
  match key {
    MemberKey::Direct(name) => out.write_all(name.as_slice()),
    MemberKey::Computed(expr) => {
      out.write_all(b"[")?;
      emit_js(out, nodes, *expr)?;
      out.write_all(b"]")
    }
  }
}

// Returns whether the member was a property (which needs `;` in classes).
fn emit_class_or_object_member<T: Write>(
  out: &mut T,
  nodes: &NodePool,
  key: &MemberKey,
  value: &MemberValue,
  value_delimiter: &[u8],
) -> io::Result<bool> {
  let direct_key = matches!(key, MemberKey::Direct(_));
  match value {
    MemberValue::Getter { .. } => {
      out.write_all(if direct_key { b"get " as &[u8] } else { b"get" })?;
    }
    MemberValue::Setter { .. } => {
      out.write_all(if direct_key { b"set " as &[u8] } else { b"set" })?;
    }
    MemberValue::Method {
      is_async,
      generator,
      ..
    } => {
      if *is_async {
        out.write_all(b"async")?;
      };
      if *generator {
        out.write_all(b"*")?;
      } else if *is_async {
        out.write_all(b" ")?;
      };
    }
    MemberValue::Property { .. } => {}
  };
  emit_member_key(out, nodes, key)?;
  match value {
    MemberValue::Getter { body } => {
      out.write_all(b"()")?;
      emit_js(out, nodes, *body)?;
    }
    MemberValue::Method {
      signature, body, ..
    } => {
      out.write_all(b"(")?;
      emit_js(out, nodes, *signature)?;
      out.write_all(b")")?;
      emit_js(out, nodes, *body)?;
    }
    MemberValue::Setter { parameter, body } => {
      out.write_all(b"(")?;
      emit_js(out, nodes, *parameter)?;
      out.write_all(b")")?;
      emit_js(out, nodes, *body)?;
    }
    MemberValue::Property { initializer } => {
      if let Some(v) = initializer {
        out.write_all(value_delimiter)?;
        emit_with_prec(out, nodes, *v, Some(OPERATORS[&OpName::Assignment].precedence))?;
      };
    }
  };
  Ok(matches!(value, MemberValue::Property { .. }))
}

fn emit_class<T: Write>(
  out: &mut T,
  nodes: &NodePool,
  name: Option<NodeId>,
  extends: Option<NodeId>,
  members: &[ClassMember],
) -> io::Result<()> {
  out.write_all(b"class")?;
  if let Some(n) = name {
    out.write_all(b" ")?;
    emit_js(out, nodes, n)?;
  };
  if let Some(s) = extends {
    out.write_all(b" extends ")?;
    emit_with_prec(out, nodes, s, Some(OPERATORS[&OpName::MemberAccess].precedence))?;
  };
  out.write_all(b"{")?;
  let mut last_was_property = false;
  for (i, m) in members.iter().enumerate() {
    if i > 0 && last_was_property {
      out.write_all(b";")?;
    };
    if m.statik {
      out.write_all(b"static ")?;
    };
    last_was_property = emit_class_or_object_member(out, nodes, &m.key, &m.value, b"=")?;
  }
  out.write_all(b"}")
}

fn emit_import_export_names<T: Write>(
  out: &mut T,
  nodes: &NodePool,
  names: &ExportNames,
  from: Option<&String>,
) -> io::Result<()> {
  match names {
    ExportNames::All(alias) => {
      out.write_all(b"*")?;
      if let Some(alias) = alias {
        out.write_all(b" as ")?;
        emit_js(out, nodes, *alias)?;
      };
      if from.is_some() {
        out.write_all(b" ")?;
      };
    }
    ExportNames::Specific(names) => {
      out.write_all(b"{")?;
      for (i, e) in names.iter().enumerate() {
        if i > 0 {
          out.write_all(b",")?;
        };
        out.write_all(e.target.as_slice())?;
        // `a as a` collapses to `a`.
        let identical = match &nodes[e.alias].stx {
          Syntax::IdPat { name } => *name == e.target,
          _ => false,
        };
        if !identical {
          out.write_all(b" as ")?;
          emit_js(out, nodes, e.alias)?;
        };
      }
      out.write_all(b"}")?;
    }
  };
  if let Some(from) = from {
    out.write_all(b"from")?;
    out.write_all(quote_str(from).as_bytes())?;
  };
  Ok(())
}

fn emit_arrow_body<T: Write>(out: &mut T, nodes: &NodePool, body: NodeId) -> io::Result<()> {
  match &nodes[body].stx {
    Syntax::BlockStmt { .. } => emit_js(out, nodes, body),
    _ => {
      let wrap = starts_ambiguously(nodes, body);
      if wrap {
        out.write_all(b"(")?;
      };
      // The body is an assignment-level expression; commas need parentheses.
      emit_with_prec(
        out,
        nodes,
        body,
        Some(OPERATORS[&OpName::Assignment].precedence),
      )?;
      if wrap {
        out.write_all(b")")?;
      };
      Ok(())
    }
  }
}

fn emit_with_prec<T: Write>(
  out: &mut T,
  nodes: &NodePool,
  n: NodeId,
  parent_prec: Option<u8>,
) -> io::Result<()> {
  let assign_prec = OPERATORS[&OpName::Assignment].precedence;
  match &nodes[n].stx {
    Syntax::EmptyStmt {} => {}
    Syntax::IdExpr { name } | Syntax::IdPat { name } | Syntax::ClassOrFnName { name } => {
      out.write_all(name.as_slice())?;
    }
    Syntax::StrLit { value } => {
      out.write_all(quote_str(value).as_bytes())?;
    }
    Syntax::NumLit { value } => {
      out.write_all(render_number(value.0).as_bytes())?;
    }
    Syntax::BigIntLit { digits } => {
      out.write_all(digits.as_bytes())?;
      out.write_all(b"n")?;
    }
    Syntax::BoolLit { value } => {
      out.write_all(if *value { b"true" as &[u8] } else { b"false" })?;
    }
    Syntax::NullLit {} => out.write_all(b"null")?,
    Syntax::UndefinedLit {} => out.write_all(b"undefined")?,
    Syntax::RegexLit {} => out.write_all(nodes[n].loc.as_slice())?,
    Syntax::TemplateLit { parts } => {
      out.write_all(b"`")?;
      for p in parts {
        match p {
          TemplatePart::Str(raw) => out.write_all(raw.as_slice())?,
          TemplatePart::Substitution(sub) => {
            out.write_all(b"${")?;
            emit_js(out, nodes, *sub)?;
            out.write_all(b"}")?;
          }
        };
      }
      out.write_all(b"`")?;
    }
    Syntax::ThisExpr {} => out.write_all(b"this")?,
    Syntax::SuperExpr {} => out.write_all(b"super")?,
    Syntax::ArrayPat { elements, rest } => {
      out.write_all(b"[")?;
      for (i, e) in elements.iter().enumerate() {
        if i > 0 {
          out.write_all(b",")?;
        };
        if let Some(e) = e {
          emit_js(out, nodes, e.target)?;
          if let Some(v) = e.default_value {
            out.write_all(b"=")?;
            emit_with_prec(out, nodes, v, Some(assign_prec))?;
          };
        };
      }
      if let Some(rest) = rest {
        if !elements.is_empty() {
          out.write_all(b",")?;
        };
        out.write_all(b"...")?;
        emit_js(out, nodes, *rest)?;
      };
      out.write_all(b"]")?;
    }
    Syntax::ObjectPat { properties, rest } => {
      out.write_all(b"{")?;
      for (i, p) in properties.iter().enumerate() {
        if i > 0 {
          out.write_all(b",")?;
        };
        emit_js(out, nodes, *p)?;
      }
      if let Some(rest) = rest {
        if !properties.is_empty() {
          out.write_all(b",")?;
        };
        out.write_all(b"...")?;
        emit_js(out, nodes, *rest)?;
      };
      out.write_all(b"}")?;
    }
    Syntax::ObjectPatProp {
      key,
      target,
      default_value,
    } => {
      emit_member_key(out, nodes, key)?;
      if let Some(target) = target {
        out.write_all(b":")?;
        emit_js(out, nodes, *target)?;
      };
      if let Some(v) = default_value {
        out.write_all(b"=")?;
        emit_with_prec(out, nodes, *v, Some(assign_prec))?;
      };
    }
    Syntax::FnSignature { parameters } => {
      for (i, p) in parameters.iter().enumerate() {
        if i > 0 {
          out.write_all(b",")?;
        };
        emit_js(out, nodes, *p)?;
      }
    }
    Syntax::ParamDecl {
      rest,
      pattern,
      default_value,
    } => {
      if *rest {
        out.write_all(b"...")?;
      };
      emit_js(out, nodes, *pattern)?;
      if let Some(v) = default_value {
        out.write_all(b"=")?;
        emit_with_prec(out, nodes, *v, Some(assign_prec))?;
      };
    }
    Syntax::VarDecl { kind, declarators } => {
      out.write_all(match kind {
        VarDeclKind::Const => b"const " as &[u8],
        VarDeclKind::Let => b"let ",
        VarDeclKind::Var => b"var ",
      })?;
      for (i, decl) in declarators.iter().enumerate() {
        if i > 0 {
          out.write_all(b",")?;
        };
        emit_js(out, nodes, decl.pattern)?;
        if let Some(init) = decl.initializer {
          out.write_all(b"=")?;
          emit_with_prec(out, nodes, init, Some(assign_prec))?;
        };
      }
    }
    Syntax::VarStmt { declaration } => emit_js(out, nodes, *declaration)?,
    Syntax::ClassDecl {
      name,
      extends,
      members,
    } => {
      emit_class(out, nodes, *name, *extends, members)?;
    }
    Syntax::FnDecl {
      is_async,
      generator,
      name,
      signature,
      body,
    } => {
      if *is_async {
        out.write_all(b"async ")?;
      };
      out.write_all(b"function")?;
      if *generator {
        out.write_all(b"*")?;
      };
      if let Some(name) = name {
        if !generator {
          out.write_all(b" ")?;
        };
        emit_js(out, nodes, *name)?;
      };
      out.write_all(b"(")?;
      emit_js(out, nodes, *signature)?;
      out.write_all(b")")?;
      emit_js(out, nodes, *body)?;
    }
    Syntax::ArrowFnExpr {
      is_async,
      signature,
      body,
    } => {
      // An arrow binds like an assignment expression; any tighter context
      // (callee, member object, operand) needs parentheses around it.
      let must_parenthesise = matches!(parent_prec, Some(po) if po > assign_prec);
      if must_parenthesise {
        out.write_all(b"(")?;
      };
      if *is_async {
        out.write_all(b"async")?;
      };
      let single_identifier_param = match &nodes[*signature].stx {
        Syntax::FnSignature { parameters } if parameters.len() == 1 => {
          match &nodes[parameters[0]].stx {
            Syntax::ParamDecl {
              rest: false,
              pattern,
              default_value: None,
            } => match &nodes[*pattern].stx {
              Syntax::IdPat { .. } => {
                if *is_async {
                  // `async` must be separated from the parameter.
                  out.write_all(b" ")?;
                };
                true
              }
              _ => false,
            },
            _ => false,
          }
        }
        _ => false,
      };
      if !single_identifier_param {
        out.write_all(b"(")?;
      };
      emit_js(out, nodes, *signature)?;
      if !single_identifier_param {
        out.write_all(b")")?;
      };
      out.write_all(b"=>")?;
      emit_arrow_body(out, nodes, *body)?;
      if must_parenthesise {
        out.write_all(b")")?;
      };
    }
    Syntax::FnExpr {
      parenthesised,
      is_async,
      generator,
      name,
      signature,
      body,
    } => {
      // Parentheses stop a leading function expression from being read as a
      // declaration; `starts_ambiguously` handles the statement position.
      if *parenthesised {
        out.write_all(b"(")?;
      };
      if *is_async {
        out.write_all(b"async ")?;
      };
      out.write_all(b"function")?;
      if *generator {
        out.write_all(b"*")?;
      };
      if let Some(name) = name {
        if !generator {
          out.write_all(b" ")?;
        };
        emit_js(out, nodes, *name)?;
      };
      out.write_all(b"(")?;
      emit_js(out, nodes, *signature)?;
      out.write_all(b")")?;
      emit_js(out, nodes, *body)?;
      if *parenthesised {
        out.write_all(b")")?;
      };
    }
    Syntax::ClassExpr {
      parenthesised,
      name,
      extends,
      members,
    } => {
      if *parenthesised {
        out.write_all(b"(")?;
      };
      emit_class(out, nodes, *name, *extends, members)?;
      if *parenthesised {
        out.write_all(b")")?;
      };
    }
    Syntax::BinaryExpr {
      parenthesised,
      operator,
      left,
      right,
    } => {
      let op = &OPERATORS[operator];
      // Statement-level ambiguity (`{a}=b` reading as a block) is handled by
      // the statement and arrow-body emitters.
      let must_parenthesise = match parent_prec {
        Some(po) if po > op.precedence => true,
        Some(po) if po == op.precedence => *parenthesised,
        _ => false,
      };
      if must_parenthesise {
        out.write_all(b"(")?;
      };
      emit_with_prec(out, nodes, *left, Some(op.precedence))?;
      out.write_all(BINARY_OPERATOR_TEXT[operator].as_bytes())?;
      match operator {
        OpName::Addition | OpName::Subtraction => {
          // `a+ +b` must not merge into `a++b`.
          if matches!(
            &nodes[*right].stx,
            Syntax::UnaryExpr {
              operator: OpName::UnaryPlus | OpName::UnaryNegation | OpName::PrefixIncrement
                | OpName::PrefixDecrement,
              ..
            }
          ) {
            out.write_all(b" ")?;
          };
        }
        _ => {}
      };
      emit_with_prec(out, nodes, *right, Some(op.precedence))?;
      if must_parenthesise {
        out.write_all(b")")?;
      };
    }
    Syntax::CallExpr {
      parenthesised,
      optional_chaining,
      callee,
      arguments,
    } => {
      let op = &OPERATORS[&OpName::Call];
      let must_parenthesise = match parent_prec {
        Some(po) if po > op.precedence => true,
        Some(po) if po == op.precedence => *parenthesised,
        _ => false,
      };
      if must_parenthesise {
        out.write_all(b"(")?;
      };
      emit_with_prec(out, nodes, *callee, Some(op.precedence))?;
      if *optional_chaining {
        out.write_all(b"?.")?;
      };
      out.write_all(b"(")?;
      for (i, a) in arguments.iter().enumerate() {
        if i > 0 {
          out.write_all(b",")?;
        };
        emit_js(out, nodes, *a)?;
      }
      out.write_all(b")")?;
      if must_parenthesise {
        out.write_all(b")")?;
      };
    }
    Syntax::CallArg { spread, value } => {
      if *spread {
        out.write_all(b"...")?;
      };
      emit_with_prec(out, nodes, *value, Some(assign_prec))?;
    }
    Syntax::CondExpr {
      parenthesised,
      test,
      consequent,
      alternate,
    } => {
      let op = &OPERATORS[&OpName::Conditional];
      let must_parenthesise = match parent_prec {
        Some(po) if po > op.precedence => true,
        Some(po) if po == op.precedence => *parenthesised,
        _ => false,
      };
      if must_parenthesise {
        out.write_all(b"(")?;
      };
      emit_with_prec(out, nodes, *test, Some(op.precedence))?;
      out.write_all(b"?")?;
      emit_with_prec(out, nodes, *consequent, Some(assign_prec))?;
      out.write_all(b":")?;
      emit_with_prec(out, nodes, *alternate, Some(assign_prec))?;
      if must_parenthesise {
        out.write_all(b")")?;
      };
    }
    Syntax::ComputedMemberExpr {
      optional_chaining,
      object,
      member,
    } => {
      let op = &OPERATORS[&OpName::ComputedMemberAccess];
      let must_parenthesise = matches!(parent_prec, Some(po) if po > op.precedence);
      if must_parenthesise {
        out.write_all(b"(")?;
      };
      emit_with_prec(out, nodes, *object, Some(op.precedence))?;
      if *optional_chaining {
        out.write_all(b"?.")?;
      };
      out.write_all(b"[")?;
      emit_js(out, nodes, *member)?;
      out.write_all(b"]")?;
      if must_parenthesise {
        out.write_all(b")")?;
      };
    }
    Syntax::MemberExpr {
      parenthesised,
      optional_chaining,
      left,
      right,
    } => {
      let op = &OPERATORS[&OpName::MemberAccess];
      let must_parenthesise = match parent_prec {
        Some(po) if po > op.precedence => true,
        Some(po) if po == op.precedence => *parenthesised,
        _ => false,
      };
      if must_parenthesise {
        out.write_all(b"(")?;
      };
      emit_with_prec(out, nodes, *left, Some(op.precedence))?;
      // `1..toString()` needs the extra dot; a fractional or exponent form
      // already contains one.
      if !optional_chaining {
        if let Syntax::NumLit { value } = &nodes[*left].stx {
          let rendered = render_number(value.0);
          if !rendered.contains('.') && !rendered.contains('e') {
            out.write_all(b".")?;
          };
        };
      };
      out.write_all(if *optional_chaining { b"?." as &[u8] } else { b"." })?;
      out.write_all(right.as_slice())?;
      if must_parenthesise {
        out.write_all(b")")?;
      };
    }
    Syntax::ImportCallExpr { module } => {
      out.write_all(b"import(")?;
      emit_js(out, nodes, *module)?;
      out.write_all(b")")?;
    }
    Syntax::UnaryExpr {
      parenthesised,
      operator,
      argument,
    } => {
      let op = &OPERATORS[operator];
      let must_parenthesise = match parent_prec {
        Some(po) if po > op.precedence => true,
        Some(po) if po == op.precedence => *parenthesised,
        _ => false,
      };
      if must_parenthesise {
        out.write_all(b"(")?;
      };
      out.write_all(UNARY_OPERATOR_TEXT[operator].as_bytes())?;
      // `- -x` and `+ +x` must not merge into `--x`/`++x`.
      let clash = match (operator, &nodes[*argument].stx) {
        (
          OpName::UnaryNegation,
          Syntax::UnaryExpr {
            operator: OpName::UnaryNegation | OpName::PrefixDecrement,
            ..
          },
        ) => true,
        (
          OpName::UnaryPlus,
          Syntax::UnaryExpr {
            operator: OpName::UnaryPlus | OpName::PrefixIncrement,
            ..
          },
        ) => true,
        _ => false,
      };
      if clash {
        out.write_all(b" ")?;
      };
      emit_with_prec(out, nodes, *argument, Some(op.precedence))?;
      if must_parenthesise {
        out.write_all(b")")?;
      };
    }
    Syntax::PostfixExpr {
      parenthesised,
      operator,
      argument,
    } => {
      let op = &OPERATORS[operator];
      let must_parenthesise = match parent_prec {
        Some(po) if po > op.precedence => true,
        Some(po) if po == op.precedence => *parenthesised,
        _ => false,
      };
      if must_parenthesise {
        out.write_all(b"(")?;
      };
      emit_with_prec(out, nodes, *argument, Some(op.precedence))?;
      out.write_all(match operator {
        OpName::PostfixIncrement => b"++" as &[u8],
        OpName::PostfixDecrement => b"--",
        _ => unreachable!(),
      })?;
      if must_parenthesise {
        out.write_all(b")")?;
      };
    }
    Syntax::ArrayLit { elements } => {
      out.write_all(b"[")?;
      for (i, e) in elements.iter().enumerate() {
        if i > 0 {
          out.write_all(b",")?;
        };
        match e {
          ArrayElement::Single(v) => emit_with_prec(out, nodes, *v, Some(assign_prec))?,
          ArrayElement::Rest(v) => {
            out.write_all(b"...")?;
            emit_with_prec(out, nodes, *v, Some(assign_prec))?;
          }
          ArrayElement::Empty => {}
        };
      }
      out.write_all(b"]")?;
    }
    Syntax::ObjectLit { members } => {
      out.write_all(b"{")?;
      for (i, m) in members.iter().enumerate() {
        if i > 0 {
          out.write_all(b",")?;
        };
        emit_js(out, nodes, *m)?;
      }
      out.write_all(b"}")?;
    }
    Syntax::ObjectMember { kind } => {
      match kind {
        ObjectMemberKind::Valued { key, value } => {
          emit_class_or_object_member(out, nodes, key, value, b":")?;
        }
        ObjectMemberKind::Shorthand { name } => {
          out.write_all(name.as_slice())?;
        }
        ObjectMemberKind::Rest { value } => {
          out.write_all(b"...")?;
          emit_with_prec(out, nodes, *value, Some(assign_prec))?;
        }
      };
    }
    Syntax::BlockStmt { body } => {
      out.write_all(b"{")?;
      emit_statements(out, nodes, body)?;
      out.write_all(b"}")?;
    }
    Syntax::BreakStmt { label } => {
      out.write_all(b"break")?;
      if let Some(label) = label {
        out.write_all(b" ")?;
        out.write_all(label.as_slice())?;
      };
    }
    Syntax::ContinueStmt { label } => {
      out.write_all(b"continue")?;
      if let Some(label) = label {
        out.write_all(b" ")?;
        out.write_all(label.as_slice())?;
      };
    }
    Syntax::DebuggerStmt {} => out.write_all(b"debugger")?,
    Syntax::DoWhileStmt { condition, body } => {
      out.write_all(b"do")?;
      if !matches!(&nodes[*body].stx, Syntax::BlockStmt { .. }) {
        out.write_all(b" ")?;
      };
      emit_js(out, nodes, *body)?;
      if leaf_kind(nodes, *body) != LeafKind::Block {
        out.write_all(b";")?;
      };
      out.write_all(b"while(")?;
      emit_js(out, nodes, *condition)?;
      out.write_all(b")")?;
    }
    Syntax::ExportDeclStmt {
      declaration,
      default,
    } => {
      out.write_all(b"export ")?;
      if *default {
        out.write_all(b"default ")?;
      };
      emit_js(out, nodes, *declaration)?;
    }
    Syntax::ExportDefaultStmt { expression } => {
      out.write_all(b"export default ")?;
      emit_with_prec(out, nodes, *expression, Some(assign_prec))?;
    }
    Syntax::ExportListStmt { names, from } => {
      out.write_all(b"export")?;
      emit_import_export_names(out, nodes, names, from.as_ref())?;
    }
    Syntax::ExprStmt { expression } => {
      let wrap = starts_ambiguously(nodes, *expression);
      if wrap {
        out.write_all(b"(")?;
      };
      emit_js(out, nodes, *expression)?;
      if wrap {
        out.write_all(b")")?;
      };
    }
    Syntax::IfStmt {
      test,
      consequent,
      alternate,
    } => {
      out.write_all(b"if(")?;
      emit_js(out, nodes, *test)?;
      out.write_all(b")")?;
      emit_js(out, nodes, *consequent)?;
      if let Some(alternate) = alternate {
        if leaf_kind(nodes, *consequent) != LeafKind::Block {
          out.write_all(b";")?;
        };
        out.write_all(b"else")?;
        if !matches!(&nodes[*alternate].stx, Syntax::BlockStmt { .. }) {
          out.write_all(b" ")?;
        };
        emit_js(out, nodes, *alternate)?;
      };
    }
    Syntax::ForStmt { header, body } => {
      out.write_all(b"for(")?;
      match header {
        ForHeader::Three {
          init,
          condition,
          post,
        } => {
          match init {
            ForInit::None => {}
            ForInit::Expression(n) | ForInit::Declaration(n) => emit_js(out, nodes, *n)?,
          };
          out.write_all(b";")?;
          if let Some(n) = condition {
            emit_js(out, nodes, *n)?;
          };
          out.write_all(b";")?;
          if let Some(n) = post {
            emit_js(out, nodes, *n)?;
          };
        }
        ForHeader::InOf { of, lhs, rhs } => {
          match lhs {
            ForLhs::Declaration(n) | ForLhs::Pattern(n) => emit_js(out, nodes, *n)?,
          };
          out.write_all(if *of { b" of " } else { b" in " })?;
          emit_with_prec(out, nodes, *rhs, Some(assign_prec))?;
        }
      };
      out.write_all(b")")?;
      emit_js(out, nodes, *body)?;
    }
    Syntax::ImportStmt {
      default,
      names,
      module,
    } => {
      out.write_all(b"import")?;
      if let Some(default) = default {
        out.write_all(b" ")?;
        emit_js(out, nodes, *default)?;
        if names.is_some() {
          out.write_all(b",")?;
        } else {
          out.write_all(b" ")?;
        };
      };
      if let Some(names) = names {
        emit_import_export_names(out, nodes, names, None)?;
        if matches!(names, ExportNames::All(_)) {
          out.write_all(b" ")?;
        };
      };
      out.write_all(b"from")?;
      out.write_all(quote_str(module).as_bytes())?;
    }
    Syntax::LabelStmt { name, statement } => {
      out.write_all(name.as_slice())?;
      out.write_all(b":")?;
      emit_js(out, nodes, *statement)?;
    }
    Syntax::ReturnStmt { value } => {
      out.write_all(b"return")?;
      if let Some(value) = value {
        out.write_all(b" ")?;
        emit_js(out, nodes, *value)?;
      };
    }
    Syntax::SwitchStmt { test, branches } => {
      out.write_all(b"switch(")?;
      emit_js(out, nodes, *test)?;
      out.write_all(b"){")?;
      for (i, b) in branches.iter().enumerate() {
        if i > 0 {
          out.write_all(b";")?;
        };
        emit_js(out, nodes, *b)?;
      }
      out.write_all(b"}")?;
    }
    Syntax::SwitchBranch { case, body } => {
      match case {
        Some(case) => {
          out.write_all(b"case ")?;
          emit_js(out, nodes, *case)?;
          out.write_all(b":")?;
        }
        None => out.write_all(b"default:")?,
      };
      emit_statements(out, nodes, body)?;
    }
    Syntax::ThrowStmt { value } => {
      out.write_all(b"throw ")?;
      emit_js(out, nodes, *value)?;
    }
    Syntax::TryStmt {
      wrapped,
      catch,
      finally,
    } => {
      out.write_all(b"try")?;
      emit_js(out, nodes, *wrapped)?;
      if let Some(catch) = catch {
        emit_js(out, nodes, *catch)?;
      };
      if let Some(finally) = finally {
        out.write_all(b"finally")?;
        emit_js(out, nodes, *finally)?;
      };
    }
    Syntax::CatchBlock { parameter, body } => {
      out.write_all(b"catch")?;
      if let Some(parameter) = parameter {
        out.write_all(b"(")?;
        emit_js(out, nodes, *parameter)?;
        out.write_all(b")")?;
      };
      emit_js(out, nodes, *body)?;
    }
    Syntax::WhileStmt { condition, body } => {
      out.write_all(b"while(")?;
      emit_js(out, nodes, *condition)?;
      out.write_all(b")")?;
      emit_js(out, nodes, *body)?;
    }
    Syntax::TopLevel { body } => {
      emit_statements(out, nodes, body)?;
    }
  };
  Ok(())
}
