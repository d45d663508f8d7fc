use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

use crate::ast::{NodeId, NodePool, Syntax, VarDeclKind, VarDeclarator};
use crate::minify::profit::{global_hoist_profit, HOISTED_NAME_LEN};
use crate::source::SourceRange;
use crate::symbol::{ScopeId, ScopeTree};
use crate::visit::walk;

/// Names that look like dot-accessed objects but must never be treated as
/// hoistable globals.
const NON_HOISTABLE_OBJECTS: &[&str] = &[
  "arguments",
  "this",
  "super",
  "undefined",
  "NaN",
  "Infinity",
  "null",
  "true",
  "false",
];

pub fn global_placeholder(i: usize) -> String {
  format!("__niu_global_{}__", i)
}

/// Hoists frequently dot-accessed free globals into `const` bindings:
/// `Array.isArray(x)||Array.from(x)` becomes `const a=Array;` plus two uses
/// of `a` once the mangler has shortened the placeholder. Returns whether the
/// tree changed.
pub fn hoist_globals(
  nodes: &mut NodePool,
  scopes: &ScopeTree,
  top_level_node: NodeId,
  top_level_scope: ScopeId,
) -> bool {
  // One walk collects both safety signals: `typeof G` guards (hoisting those
  // would turn a guard into a ReferenceError) and dot-access counts.
  let mut typeof_guarded = AHashSet::<String>::new();
  let mut dot_object_uses = AHashMap::<String, usize>::new();
  walk(nodes, top_level_node, &mut |n| match &nodes[n].stx {
    Syntax::UnaryExpr {
      operator: crate::operator::OpName::Typeof,
      argument,
      ..
    } => {
      if let Syntax::IdExpr { name } = &nodes[*argument].stx {
        typeof_guarded.insert(name.as_str().to_string());
      };
    }
    Syntax::MemberExpr { left, .. } => {
      if let Syntax::IdExpr { name } = &nodes[*left].stx {
        if !NON_HOISTABLE_OBJECTS.contains(&name.as_str()) {
          *dot_object_uses.entry(name.as_str().to_string()).or_insert(0) += 1;
        };
      };
    }
    _ => {}
  });

  // Most-used first; name as tiebreak for determinism (AHashMap order isn't).
  let candidates: Vec<(&String, &Vec<NodeId>)> = scopes
    .globals
    .iter()
    .filter(|(name, info)| {
      info.violations.is_empty()
        && !typeof_guarded.contains(*name)
        && dot_object_uses.get(*name).copied().unwrap_or(0) >= 2
        && global_hoist_profit(
          info.references.len() as i64,
          name.len() as i64,
          HOISTED_NAME_LEN,
          false,
        ) > 0
    })
    .map(|(name, info)| (name, &info.references))
    .sorted_by(|(an, ar), (bn, br)| br.len().cmp(&ar.len()).then(an.cmp(bn)))
    .collect();
  if candidates.is_empty() {
    return false;
  };

  let mut declarators = Vec::<VarDeclarator>::new();
  for (i, (name, references)) in candidates.iter().enumerate() {
    let placeholder = SourceRange::synthesised(global_placeholder(i));
    for &reference in references.iter() {
      nodes[reference].stx = Syntax::IdExpr {
        name: placeholder.clone(),
      };
    }
    let pattern = nodes.create_node(top_level_scope, placeholder.clone(), Syntax::IdPat {
      name: placeholder.clone(),
    });
    let global_loc = SourceRange::synthesised(name.as_bytes().to_vec());
    let initializer = nodes.create_node(top_level_scope, global_loc.clone(), Syntax::IdExpr {
      name: global_loc,
    });
    declarators.push(VarDeclarator {
      pattern,
      initializer: Some(initializer),
    });
  }

  let loc = SourceRange::synthesised(Vec::new());
  let declaration = nodes.create_node(top_level_scope, loc.clone(), Syntax::VarDecl {
    kind: VarDeclKind::Const,
    declarators,
  });
  let stmt = nodes.create_node(top_level_scope, loc, Syntax::VarStmt { declaration });
  match &mut nodes[top_level_node].stx {
    Syntax::TopLevel { body } => body.insert(0, stmt),
    _ => unreachable!(),
  };
  true
}
