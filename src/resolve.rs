use crate::ast::{
  ArrayElement, ExportNames, ForHeader, ForInit, ForLhs, MemberKey, MemberValue, NodeId, NodePool,
  ObjectMemberKind, Syntax, TemplatePart,
};
use crate::operator::{is_assignment_op, OpName};
use crate::source::SourceRange;
use crate::symbol::{ScopeId, ScopeTree};

/// Fills in reference and violation paths for every binding, and the globals
/// map for every free identifier. Runs after parsing (which only registers
/// declarations), and again from scratch after the re-parse; scope data is
/// never patched incrementally.
pub fn resolve(nodes: &NodePool, scopes: &mut ScopeTree, top_level_node: NodeId) {
  let mut resolver = Resolver { nodes, scopes };
  resolver.visit(top_level_node);
}

/// How a pattern's identifiers relate to bindings.
#[derive(Clone, Copy, PartialEq, Eq)]
enum PatternUse {
  // Introduces bindings; the parser already registered them.
  Declare,
  // Assigns to existing bindings.
  Assign,
}

struct Resolver<'a> {
  nodes: &'a NodePool,
  scopes: &'a mut ScopeTree,
}

impl<'a> Resolver<'a> {
  fn record_read(&mut self, n: NodeId, name: &SourceRange) {
    let scope = self.nodes[n].scope;
    match self.scopes.find_binding(scope, name) {
      Some(owner) => self.scopes[owner]
        .get_mut(name)
        .unwrap()
        .references
        .push(n),
      None => self.scopes.record_global_reference(name, n),
    };
  }

  fn record_write(&mut self, n: NodeId, name: &SourceRange) {
    let scope = self.nodes[n].scope;
    match self.scopes.find_binding(scope, name) {
      Some(owner) => self.scopes[owner]
        .get_mut(name)
        .unwrap()
        .violations
        .push(n),
      None => self.scopes.record_global_violation(name, n),
    };
  }

  /// A direct `eval` call can read and write every binding in scope, so the
  /// whole ancestor chain must keep its names.
  fn mark_dynamic_chain(&mut self, from: ScopeId) {
    let mut cur = Some(from);
    while let Some(id) = cur {
      self.scopes[id].dynamic = true;
      cur = self.scopes[id].parent;
    }
  }

  fn visit_member_key(&mut self, key: &MemberKey) {
    if let MemberKey::Computed(expr) = key {
      self.visit(*expr);
    };
  }

  fn visit_member_value(&mut self, value: &MemberValue) {
    match value {
      MemberValue::Getter { body } => self.visit(*body),
      MemberValue::Method {
        signature, body, ..
      } => {
        self.visit(*signature);
        self.visit(*body);
      }
      MemberValue::Property { initializer } => {
        if let Some(initializer) = initializer {
          self.visit(*initializer);
        };
      }
      MemberValue::Setter { parameter, body } => {
        self.visit_pattern(*parameter, PatternUse::Declare);
        self.visit(*body);
      }
    };
  }

  fn visit_pattern(&mut self, n: NodeId, use_: PatternUse) {
    let nodes = self.nodes;
    match &nodes[n].stx {
      Syntax::IdPat { name } => {
        if use_ == PatternUse::Assign {
          self.record_write(n, name);
        };
      }
      Syntax::ArrayPat { elements, rest } => {
        for e in elements.iter().flatten() {
          self.visit_pattern(e.target, use_);
          if let Some(v) = e.default_value {
            self.visit(v);
          };
        }
        if let Some(rest) = rest {
          self.visit_pattern(*rest, use_);
        };
      }
      Syntax::ObjectPat { properties, rest } => {
        for p in properties {
          self.visit_pattern(*p, use_);
        }
        if let Some(rest) = rest {
          self.visit_pattern(*rest, use_);
        };
      }
      Syntax::ObjectPatProp {
        key,
        target,
        default_value,
      } => {
        self.visit_member_key(key);
        match target {
          Some(target) => self.visit_pattern(*target, use_),
          None => {
            // Shorthand: the key is also the target name.
            if use_ == PatternUse::Assign {
              if let MemberKey::Direct(name) = key {
                self.record_write(n, name);
              };
            };
          }
        };
        if let Some(v) = default_value {
          self.visit(*v);
        };
      }
      // Assignment targets can be member chains.
      _ => self.visit(n),
    };
  }

  fn visit(&mut self, n: NodeId) {
    let nodes = self.nodes;
    match &nodes[n].stx {
      Syntax::IdExpr { name } => self.record_read(n, name),
      Syntax::IdPat { .. } | Syntax::ObjectPat { .. } | Syntax::ArrayPat { .. } => {
        // Reached directly only as a converted assignment target.
        self.visit_pattern(n, PatternUse::Assign);
      }
      Syntax::ClassOrFnName { .. } => {}
      Syntax::ObjectPatProp { .. } => self.visit_pattern(n, PatternUse::Assign),
      Syntax::FnSignature { parameters } => {
        for p in parameters {
          self.visit(*p);
        }
      }
      Syntax::ParamDecl {
        pattern,
        default_value,
        ..
      } => {
        self.visit_pattern(*pattern, PatternUse::Declare);
        if let Some(v) = default_value {
          self.visit(*v);
        };
      }
      Syntax::VarDecl { declarators, .. } => {
        for decl in declarators {
          self.visit_pattern(decl.pattern, PatternUse::Declare);
          if let Some(init) = decl.initializer {
            self.visit(init);
          };
        }
      }
      Syntax::ClassDecl {
        extends, members, ..
      }
      | Syntax::ClassExpr {
        extends, members, ..
      } => {
        if let Some(extends) = extends {
          self.visit(*extends);
        };
        for m in members {
          self.visit_member_key(&m.key);
          self.visit_member_value(&m.value);
        }
      }
      Syntax::FnDecl {
        signature, body, ..
      }
      | Syntax::FnExpr {
        signature, body, ..
      }
      | Syntax::ArrowFnExpr {
        signature, body, ..
      } => {
        self.visit(*signature);
        self.visit(*body);
      }
      Syntax::BinaryExpr {
        operator,
        left,
        right,
        ..
      } => {
        if is_assignment_op(*operator) {
          self.visit_pattern(*left, PatternUse::Assign);
        } else {
          self.visit(*left);
        };
        self.visit(*right);
      }
      Syntax::UnaryExpr {
        operator, argument, ..
      }
      | Syntax::PostfixExpr {
        operator, argument, ..
      } => match (*operator, &self.nodes[*argument].stx) {
        (
          OpName::PrefixIncrement
          | OpName::PrefixDecrement
          | OpName::PostfixIncrement
          | OpName::PostfixDecrement,
          Syntax::IdExpr { name },
        ) => self.record_write(*argument, name),
        _ => self.visit(*argument),
      },
      Syntax::CallExpr {
        optional_chaining,
        callee,
        arguments,
        ..
      } => {
        // Direct `eval` pins every enclosing scope's names.
        if !optional_chaining {
          if let Syntax::IdExpr { name } = &self.nodes[*callee].stx {
            if name == "eval" {
              let scope = self.nodes[n].scope;
              if self.scopes.find_binding(scope, name).is_none() {
                self.mark_dynamic_chain(scope);
              };
            };
          };
        };
        self.visit(*callee);
        for a in arguments {
          self.visit(*a);
        }
      }
      Syntax::CallArg { value, .. } => self.visit(*value),
      Syntax::CondExpr {
        test,
        consequent,
        alternate,
        ..
      } => {
        self.visit(*test);
        self.visit(*consequent);
        self.visit(*alternate);
      }
      Syntax::ComputedMemberExpr { object, member, .. } => {
        self.visit(*object);
        self.visit(*member);
      }
      Syntax::ImportCallExpr { module } => self.visit(*module),
      // The property name is not an identifier use.
      Syntax::MemberExpr { left, .. } => self.visit(*left),
      Syntax::ArrayLit { elements } => {
        for e in elements {
          match e {
            ArrayElement::Single(v) | ArrayElement::Rest(v) => self.visit(*v),
            ArrayElement::Empty => {}
          };
        }
      }
      Syntax::ObjectLit { members } => {
        for m in members {
          self.visit(*m);
        }
      }
      Syntax::ObjectMember { kind } => match kind {
        ObjectMemberKind::Valued { key, value } => {
          self.visit_member_key(key);
          self.visit_member_value(value);
        }
        // `{a}` reads `a`; recorded against the member node so the mangler
        // can expand it to `{a:<new>}`.
        ObjectMemberKind::Shorthand { name } => self.record_read(n, name),
        ObjectMemberKind::Rest { value } => self.visit(*value),
      },
      Syntax::TemplateLit { parts } => {
        for p in parts {
          if let TemplatePart::Substitution(sub) = p {
            self.visit(*sub);
          };
        }
      }
      Syntax::BlockStmt { body } | Syntax::TopLevel { body } => {
        for stmt in body {
          self.visit(*stmt);
        }
      }
      Syntax::DoWhileStmt { condition, body } | Syntax::WhileStmt { condition, body } => {
        self.visit(*condition);
        self.visit(*body);
      }
      Syntax::ExportDeclStmt { declaration, .. } => self.visit(*declaration),
      Syntax::ExportDefaultStmt { expression } | Syntax::ExprStmt { expression } => {
        self.visit(*expression)
      }
      Syntax::ExportListStmt { names, from } => {
        // `export … from` re-exports without touching this module's scope.
        if from.is_none() {
          if let ExportNames::Specific(names) = names {
            for e in names {
              self.record_read(n, &e.target);
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
              ForInit::Expression(n) | ForInit::Declaration(n) => self.visit(*n),
            };
            if let Some(condition) = condition {
              self.visit(*condition);
            };
            if let Some(post) = post {
              self.visit(*post);
            };
          }
          ForHeader::InOf { lhs, rhs, .. } => {
            match lhs {
              ForLhs::Declaration(decl) => self.visit(*decl),
              ForLhs::Pattern(pat) => self.visit_pattern(*pat, PatternUse::Assign),
            };
            self.visit(*rhs);
          }
        };
        self.visit(*body);
      }
      Syntax::IfStmt {
        test,
        consequent,
        alternate,
      } => {
        self.visit(*test);
        self.visit(*consequent);
        if let Some(alternate) = alternate {
          self.visit(*alternate);
        };
      }
      // Import aliases are declarations.
      Syntax::ImportStmt { .. } => {}
      Syntax::LabelStmt { statement, .. } => self.visit(*statement),
      Syntax::ReturnStmt { value } => {
        if let Some(value) = value {
          self.visit(*value);
        };
      }
      Syntax::SwitchStmt { test, branches } => {
        self.visit(*test);
        for b in branches {
          self.visit(*b);
        }
      }
      Syntax::SwitchBranch { case, body } => {
        if let Some(case) = case {
          self.visit(*case);
        };
        for stmt in body {
          self.visit(*stmt);
        }
      }
      Syntax::ThrowStmt { value } => self.visit(*value),
      Syntax::TryStmt {
        wrapped,
        catch,
        finally,
      } => {
        self.visit(*wrapped);
        if let Some(catch) = catch {
          self.visit(*catch);
        };
        if let Some(finally) = finally {
          self.visit(*finally);
        };
      }
      Syntax::CatchBlock { parameter, body } => {
        if let Some(parameter) = parameter {
          self.visit_pattern(*parameter, PatternUse::Declare);
        };
        self.visit(*body);
      }
      Syntax::VarStmt { declaration } => self.visit(*declaration),
      Syntax::BigIntLit { .. }
      | Syntax::BoolLit { .. }
      | Syntax::NullLit {}
      | Syntax::NumLit { .. }
      | Syntax::RegexLit {}
      | Syntax::StrLit { .. }
      | Syntax::UndefinedLit {}
      | Syntax::SuperExpr {}
      | Syntax::ThisExpr {}
      | Syntax::BreakStmt { .. }
      | Syntax::ContinueStmt { .. }
      | Syntax::DebuggerStmt {}
      | Syntax::EmptyStmt {} => {}
    };
  }
}
