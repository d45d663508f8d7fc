use crate::ast::{
  ArrayElement, ExportNames, ForHeader, ForInit, ForLhs, MemberKey, MemberValue, NodeId, NodePool,
  ObjectMemberKind, Syntax, TemplatePart,
};

fn each_member_key<F: FnMut(NodeId)>(key: &MemberKey, f: &mut F) {
  if let MemberKey::Computed(expr) = key {
    f(*expr);
  };
}

fn each_member_value<F: FnMut(NodeId)>(value: &MemberValue, f: &mut F) {
  match value {
    MemberValue::Getter { body } => f(*body),
    MemberValue::Method {
      signature, body, ..
    } => {
      f(*signature);
      f(*body);
    }
    MemberValue::Property { initializer } => {
      if let Some(initializer) = initializer {
        f(*initializer);
      };
    }
    MemberValue::Setter { parameter, body } => {
      f(*parameter);
      f(*body);
    }
  };
}

/// Calls `f` with every direct child node of `n`, in source order. The basis
/// for every generic read-only pass; passes that need binder/read/write
/// context (resolution) walk by hand instead.
pub fn for_each_child<F: FnMut(NodeId)>(nodes: &NodePool, n: NodeId, f: &mut F) {
  match &nodes[n].stx {
    Syntax::IdPat { .. }
    | Syntax::ClassOrFnName { .. }
    | Syntax::IdExpr { .. }
    | Syntax::SuperExpr {}
    | Syntax::ThisExpr {}
    | Syntax::BigIntLit { .. }
    | Syntax::BoolLit { .. }
    | Syntax::NullLit {}
    | Syntax::NumLit { .. }
    | Syntax::RegexLit {}
    | Syntax::StrLit { .. }
    | Syntax::UndefinedLit {}
    | Syntax::BreakStmt { .. }
    | Syntax::ContinueStmt { .. }
    | Syntax::DebuggerStmt {}
    | Syntax::EmptyStmt {} => {}
    Syntax::ArrayPat { elements, rest } => {
      for e in elements.iter().flatten() {
        f(e.target);
        if let Some(v) = e.default_value {
          f(v);
        };
      }
      if let Some(rest) = rest {
        f(*rest);
      };
    }
    Syntax::ObjectPat { properties, rest } => {
      for p in properties {
        f(*p);
      }
      if let Some(rest) = rest {
        f(*rest);
      };
    }
    Syntax::ObjectPatProp {
      key,
      target,
      default_value,
    } => {
      each_member_key(key, f);
      if let Some(target) = target {
        f(*target);
      };
      if let Some(v) = default_value {
        f(*v);
      };
    }
    Syntax::FnSignature { parameters } => {
      for p in parameters {
        f(*p);
      }
    }
    Syntax::ClassDecl {
      name,
      extends,
      members,
    }
    | Syntax::ClassExpr {
      name,
      extends,
      members,
      ..
    } => {
      if let Some(name) = name {
        f(*name);
      };
      if let Some(extends) = extends {
        f(*extends);
      };
      for m in members {
        each_member_key(&m.key, f);
        each_member_value(&m.value, f);
      }
    }
    Syntax::FnDecl {
      name,
      signature,
      body,
      ..
    }
    | Syntax::FnExpr {
      name,
      signature,
      body,
      ..
    } => {
      if let Some(name) = name {
        f(*name);
      };
      f(*signature);
      f(*body);
    }
    Syntax::ParamDecl {
      pattern,
      default_value,
      ..
    } => {
      f(*pattern);
      if let Some(v) = default_value {
        f(*v);
      };
    }
    Syntax::VarDecl { declarators, .. } => {
      for decl in declarators {
        f(decl.pattern);
        if let Some(init) = decl.initializer {
          f(init);
        };
      }
    }
    Syntax::ArrowFnExpr {
      signature, body, ..
    } => {
      f(*signature);
      f(*body);
    }
    Syntax::BinaryExpr { left, right, .. } => {
      f(*left);
      f(*right);
    }
    Syntax::CallExpr {
      callee, arguments, ..
    } => {
      f(*callee);
      for a in arguments {
        f(*a);
      }
    }
    Syntax::CallArg { value, .. } => f(*value),
    Syntax::CondExpr {
      test,
      consequent,
      alternate,
      ..
    } => {
      f(*test);
      f(*consequent);
      f(*alternate);
    }
    Syntax::ComputedMemberExpr { object, member, .. } => {
      f(*object);
      f(*member);
    }
    Syntax::ImportCallExpr { module } => f(*module),
    Syntax::MemberExpr { left, .. } => f(*left),
    Syntax::UnaryExpr { argument, .. } | Syntax::PostfixExpr { argument, .. } => f(*argument),
    Syntax::ArrayLit { elements } => {
      for e in elements {
        match e {
          ArrayElement::Single(v) | ArrayElement::Rest(v) => f(*v),
          ArrayElement::Empty => {}
        };
      }
    }
    Syntax::ObjectLit { members } => {
      for m in members {
        f(*m);
      }
    }
    Syntax::ObjectMember { kind } => match kind {
      ObjectMemberKind::Valued { key, value } => {
        each_member_key(key, f);
        each_member_value(value, f);
      }
      ObjectMemberKind::Shorthand { .. } => {}
      ObjectMemberKind::Rest { value } => f(*value),
    },
    Syntax::TemplateLit { parts } => {
      for p in parts {
        if let TemplatePart::Substitution(sub) = p {
          f(*sub);
        };
      }
    }
    Syntax::BlockStmt { body } | Syntax::TopLevel { body } => {
      for stmt in body {
        f(*stmt);
      }
    }
    Syntax::DoWhileStmt { condition, body } | Syntax::WhileStmt { condition, body } => {
      f(*condition);
      f(*body);
    }
    Syntax::ExportDeclStmt { declaration, .. } => f(*declaration),
    Syntax::ExportDefaultStmt { expression } | Syntax::ExprStmt { expression } => f(*expression),
    Syntax::ExportListStmt { names, from } => {
      if from.is_none() {
        match names {
          ExportNames::All(alias) => {
            if let Some(alias) = alias {
              f(*alias);
            };
          }
          ExportNames::Specific(names) => {
            for name in names {
              f(name.alias);
            }
          }
        };
      };
    }
    Syntax::ForStmt { header, body } => {
      match header {
        ForHeader::Three {
          init,
          condition,
          post,
        } => {
          match init {
            ForInit::None => {}
            ForInit::Expression(n) | ForInit::Declaration(n) => f(*n),
          };
          if let Some(n) = condition {
            f(*n);
          };
          if let Some(n) = post {
            f(*n);
          };
        }
        ForHeader::InOf { lhs, rhs, .. } => {
          match lhs {
            ForLhs::Declaration(n) | ForLhs::Pattern(n) => f(*n),
          };
          f(*rhs);
        }
      };
      f(*body);
    }
    Syntax::IfStmt {
      test,
      consequent,
      alternate,
    } => {
      f(*test);
      f(*consequent);
      if let Some(alternate) = alternate {
        f(*alternate);
      };
    }
    Syntax::ImportStmt { default, names, .. } => {
      if let Some(default) = default {
        f(*default);
      };
      if let Some(names) = names {
        match names {
          ExportNames::All(alias) => {
            if let Some(alias) = alias {
              f(*alias);
            };
          }
          ExportNames::Specific(names) => {
            for name in names {
              f(name.alias);
            }
          }
        };
      };
    }
    Syntax::LabelStmt { statement, .. } => f(*statement),
    Syntax::ReturnStmt { value } => {
      if let Some(value) = value {
        f(*value);
      };
    }
    Syntax::SwitchStmt { test, branches } => {
      f(*test);
      for b in branches {
        f(*b);
      }
    }
    Syntax::SwitchBranch { case, body } => {
      if let Some(case) = case {
        f(*case);
      };
      for stmt in body {
        f(*stmt);
      }
    }
    Syntax::ThrowStmt { value } => f(*value),
    Syntax::TryStmt {
      wrapped,
      catch,
      finally,
    } => {
      f(*wrapped);
      if let Some(catch) = catch {
        f(*catch);
      };
      if let Some(finally) = finally {
        f(*finally);
      };
    }
    Syntax::CatchBlock { parameter, body } => {
      if let Some(parameter) = parameter {
        f(*parameter);
      };
      f(*body);
    }
    Syntax::VarStmt { declaration } => f(*declaration),
  };
}

/// Pre-order walk from `root`, visiting only reachable nodes. Backtracked
/// parse attempts leave orphans in the pool, so passes must never iterate the
/// pool directly when counting occurrences.
pub fn walk<F: FnMut(NodeId)>(nodes: &NodePool, root: NodeId, f: &mut F) {
  f(root);
  let mut stack = vec![root];
  while let Some(n) = stack.pop() {
    let before = stack.len();
    for_each_child(nodes, n, &mut |child| {
      f(child);
      stack.push(child);
    });
    // Children were pushed in source order; reverse them so the stack pops in
    // source order too.
    stack[before..].reverse();
  }
}
