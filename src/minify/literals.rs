use ahash::{AHashMap, AHashSet};

use crate::ast::{
  MemberKey, MemberValue, NodeId, NodePool, ObjectMemberKind, Syntax, VarDeclKind, VarDeclarator,
};
use crate::char::is_identifier_text;
use crate::minify::profit::{
  literal_hoist_profit, multi_decl_cost, num_repr_len, selective_string_profit, split_pack_cost,
  str_repr_len, StringProfit, FIRST_DECL_OVERHEAD, HOISTED_NAME_LEN,
};
use crate::num::JsNumber;
use crate::source::SourceRange;
use crate::symbol::ScopeId;
use crate::visit::walk;

pub fn literal_placeholder(i: usize) -> String {
  format!("__niu_literal_{}__", i)
}

/// The five shapes a string value occurs in. The first three all print the
/// full quoted literal and share one cost group; the key shapes pay the extra
/// computed-key brackets.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum StrUseKind {
  // `"s"` anywhere an expression goes.
  Literal,
  // `o["s"]`.
  BracketAccess,
  // `{["s"]:v}` or `class{["s"](){}}`.
  StringKey,
  // `o.s`.
  DotAccess,
  // `{s:v}`, non-shorthand, non-method.
  IdentifierKey,
  // Identifier-keyed class member other than `constructor`.
  ClassMember,
}

#[derive(Clone, Copy)]
struct StrUse {
  kind: StrUseKind,
  node: NodeId,
  // Which member of the class at `node`, for ClassMember uses.
  member_index: usize,
}

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
enum NonStrValue {
  Num(JsNumber),
  BigInt(String),
  Bool(bool),
  Null,
  Undefined,
}

#[derive(Default)]
struct Collected {
  strings: AHashMap<String, Vec<StrUse>>,
  // Insertion order of first sighting, for deterministic iteration.
  string_order: Vec<String>,
  non_strings: AHashMap<NonStrValue, Vec<NodeId>>,
  non_string_order: Vec<NonStrValue>,
}

impl Collected {
  fn record_str(&mut self, value: &str, use_: StrUse) {
    if !self.strings.contains_key(value) {
      self.string_order.push(value.to_string());
    };
    self.strings.entry(value.to_string()).or_default().push(use_);
  }

  fn record_non_str(&mut self, value: NonStrValue, node: NodeId) {
    if !self.non_strings.contains_key(&value) {
      self.non_string_order.push(value.clone());
    };
    self.non_strings.entry(value).or_default().push(node);
  }
}

fn is_hoistable_key(name: &SourceRange) -> bool {
  is_identifier_text(name.as_slice())
}

fn collect(nodes: &NodePool, top_level_node: NodeId) -> Collected {
  let mut collected = Collected::default();
  // A parent that consumes a string child (bracket member, computed key,
  // import path) claims it so the child visit doesn't double-count it.
  let mut claimed = AHashSet::<usize>::new();
  walk(nodes, top_level_node, &mut |n| match &nodes[n].stx {
    Syntax::StrLit { value } => {
      if !claimed.contains(&n.id()) {
        collected.record_str(value, StrUse {
          kind: StrUseKind::Literal,
          node: n,
          member_index: 0,
        });
      };
    }
    Syntax::NumLit { value } => {
      collected.record_non_str(NonStrValue::Num(*value), n);
    }
    Syntax::BigIntLit { digits } => {
      collected.record_non_str(NonStrValue::BigInt(digits.clone()), n);
    }
    Syntax::BoolLit { value } => {
      collected.record_non_str(NonStrValue::Bool(*value), n);
    }
    Syntax::NullLit {} => {
      collected.record_non_str(NonStrValue::Null, n);
    }
    // Only ever a read: the parser lexes `undefined` as a literal keyword, so
    // binder and key positions never produce this node.
    Syntax::UndefinedLit {} => {
      collected.record_non_str(NonStrValue::Undefined, n);
    }
    Syntax::ComputedMemberExpr { member, .. } => {
      if let Syntax::StrLit { value } = &nodes[*member].stx {
        claimed.insert(member.id());
        collected.record_str(value, StrUse {
          kind: StrUseKind::BracketAccess,
          node: *member,
          member_index: 0,
        });
      };
    }
    Syntax::MemberExpr { right, .. } => {
      // Private names stay as-is.
      if is_hoistable_key(right) {
        collected.record_str(right.as_str(), StrUse {
          kind: StrUseKind::DotAccess,
          node: n,
          member_index: 0,
        });
      };
    }
    Syntax::ObjectMember { kind } => match kind {
      ObjectMemberKind::Valued { key, value } => match (key, value) {
        (MemberKey::Computed(k), _) => {
          if let Syntax::StrLit { value } = &nodes[*k].stx {
            claimed.insert(k.id());
            collected.record_str(value, StrUse {
              kind: StrUseKind::StringKey,
              node: *k,
              member_index: 0,
            });
          };
        }
        // Methods and accessors keep their keys; only plain properties
        // qualify, and only identifier keys (string/number keys have
        // different printed costs).
        (MemberKey::Direct(name), MemberValue::Property { .. }) => {
          if is_hoistable_key(name) {
            collected.record_str(name.as_str(), StrUse {
              kind: StrUseKind::IdentifierKey,
              node: n,
              member_index: 0,
            });
          };
        }
        _ => {}
      },
      _ => {}
    },
    Syntax::ClassDecl { members, .. } | Syntax::ClassExpr { members, .. } => {
      for (i, m) in members.iter().enumerate() {
        match &m.key {
          MemberKey::Computed(k) => {
            if let Syntax::StrLit { value } = &nodes[*k].stx {
              claimed.insert(k.id());
              collected.record_str(value, StrUse {
                kind: StrUseKind::StringKey,
                node: *k,
                member_index: 0,
              });
            };
          }
          MemberKey::Direct(name) => {
            if is_hoistable_key(name) && name.as_str() != "constructor" {
              collected.record_str(name.as_str(), StrUse {
                kind: StrUseKind::ClassMember,
                node: n,
                member_index: i,
              });
            };
          }
        };
      }
    }
    // A module path must stay a literal.
    Syntax::ImportCallExpr { module } => {
      claimed.insert(module.id());
    }
    _ => {}
  });
  collected
}

struct StrCandidate {
  value: String,
  uses: Vec<StrUse>,
  profit: StringProfit,
}

struct NonStrCandidate {
  value: NonStrValue,
  uses: Vec<NodeId>,
}

/// Replaces duplicated literals (and long repeated property names) with
/// hoisted bindings, packing many strings into one `split` call when that is
/// cheaper. Returns whether the tree changed.
pub fn hoist_duplicate_literals(
  nodes: &mut NodePool,
  top_level_node: NodeId,
  top_level_scope: ScopeId,
) -> bool {
  let collected = collect(nodes, top_level_node);

  // Select strings: admit anything not clearly losing (> -2), since marginal
  // candidates become worthwhile inside a packed declaration.
  let mut profitable = Vec::<StrCandidate>::new();
  let mut marginal = Vec::<StrCandidate>::new();
  for value in &collected.string_order {
    let uses = &collected.strings[value];
    let literal_uses = uses
      .iter()
      .filter(|u| {
        matches!(
          u.kind,
          StrUseKind::Literal | StrUseKind::BracketAccess | StrUseKind::StringKey
        )
      })
      .count() as i64;
    let dot_uses = uses.iter().filter(|u| u.kind == StrUseKind::DotAccess).count() as i64;
    let key_uses = uses
      .iter()
      .filter(|u| matches!(u.kind, StrUseKind::IdentifierKey | StrUseKind::ClassMember))
      .count() as i64;
    let profit = selective_string_profit(
      value,
      literal_uses,
      dot_uses,
      key_uses,
      HOISTED_NAME_LEN,
      false,
    );
    if profit.effective < 2 || profit.profit <= -2 {
      continue;
    };
    let candidate = StrCandidate {
      value: value.clone(),
      uses: uses.clone(),
      profit,
    };
    if profit.profit > 0 {
      profitable.push(candidate);
    } else {
      marginal.push(candidate);
    };
  }
  let mut selected = if profitable.len() >= 7 {
    profitable
  } else if profitable.len() + marginal.len() >= 7 {
    profitable.extend(marginal);
    profitable
  } else {
    profitable
  };
  selected.sort_by_key(|c| std::cmp::Reverse(c.profit.effective));

  // The first hoisted declaration pays for its `const ` keyword; a candidate
  // that cannot recoup that on its own is deferred until some other candidate
  // has taken the first slot.
  let mut strings = Vec::<StrCandidate>::new();
  let mut deferred = Vec::<StrCandidate>::new();
  for candidate in selected {
    if strings.is_empty() && candidate.profit.profit - FIRST_DECL_OVERHEAD <= 0 {
      deferred.push(candidate);
    } else {
      strings.push(candidate);
    };
  }
  if !strings.is_empty() {
    strings.extend(deferred.into_iter().filter(|c| c.profit.profit > 0));
  };

  // Non-string literals: plain duplicate pooling, no categories. One- and
  // two-byte numbers can never win.
  let mut non_strings = Vec::<NonStrCandidate>::new();
  for value in &collected.non_string_order {
    let uses = &collected.non_strings[value];
    let repr_len = non_str_repr_len(value);
    if uses.len() < 2 {
      continue;
    };
    if matches!(value, NonStrValue::Num(_)) && repr_len <= 2 {
      continue;
    };
    if literal_hoist_profit(uses.len() as i64, repr_len, HOISTED_NAME_LEN, false) <= 0 {
      continue;
    };
    non_strings.push(NonStrCandidate {
      value: value.clone(),
      uses: uses.clone(),
    });
  }
  non_strings.sort_by_key(|c| std::cmp::Reverse(c.uses.len()));

  if strings.is_empty() && non_strings.is_empty() {
    return false;
  };

  // Rewrite uses, strings first so placeholder numbering matches emission
  // order.
  let mut placeholder_index = 0;
  let mut string_names = Vec::<SourceRange>::new();
  for candidate in &strings {
    let placeholder = SourceRange::synthesised(literal_placeholder(placeholder_index));
    placeholder_index += 1;
    string_names.push(placeholder.clone());
    for use_ in &candidate.uses {
      rewrite_str_use(nodes, use_, &candidate.profit, &placeholder);
    }
  }
  let mut non_string_names = Vec::<SourceRange>::new();
  for candidate in &non_strings {
    let placeholder = SourceRange::synthesised(literal_placeholder(placeholder_index));
    placeholder_index += 1;
    non_string_names.push(placeholder.clone());
    for &node in &candidate.uses {
      nodes[node].stx = Syntax::IdExpr {
        name: placeholder.clone(),
      };
    }
  }

  // Emit hoisted declarations at the top of the program.
  let mut prepended = Vec::<NodeId>::new();
  if !strings.is_empty() {
    prepended.push(emit_string_decls(nodes, top_level_scope, &strings, &string_names));
  };
  if !non_strings.is_empty() {
    prepended.push(emit_non_string_decls(
      nodes,
      top_level_scope,
      &non_strings,
      &non_string_names,
    ));
  };
  match &mut nodes[top_level_node].stx {
    Syntax::TopLevel { body } => {
      for (i, stmt) in prepended.into_iter().enumerate() {
        body.insert(i, stmt);
      }
    }
    _ => unreachable!(),
  };
  true
}

fn non_str_repr_len(value: &NonStrValue) -> i64 {
  match value {
    NonStrValue::Num(n) => num_repr_len(*n),
    NonStrValue::BigInt(digits) => digits.len() as i64 + 1,
    NonStrValue::Bool(true) => 4,
    NonStrValue::Bool(false) => 5,
    NonStrValue::Null => 4,
    NonStrValue::Undefined => 9,
  }
}

fn rewrite_str_use(
  nodes: &mut NodePool,
  use_: &StrUse,
  profit: &StringProfit,
  placeholder: &SourceRange,
) {
  match use_.kind {
    StrUseKind::Literal | StrUseKind::BracketAccess | StrUseKind::StringKey => {
      if profit.hoist_literals {
        nodes[use_.node].stx = Syntax::IdExpr {
          name: placeholder.clone(),
        };
      };
    }
    StrUseKind::DotAccess => {
      if !profit.hoist_access {
        return;
      };
      let scope = nodes[use_.node].scope;
      let (left, optional_chaining) = match &nodes[use_.node].stx {
        Syntax::MemberExpr {
          left,
          optional_chaining,
          ..
        } => (*left, *optional_chaining),
        _ => unreachable!(),
      };
      let member = nodes.create_node(scope, placeholder.clone(), Syntax::IdExpr {
        name: placeholder.clone(),
      });
      nodes[use_.node].stx = Syntax::ComputedMemberExpr {
        optional_chaining,
        object: left,
        member,
      };
    }
    StrUseKind::IdentifierKey => {
      if !profit.hoist_keys {
        return;
      };
      let scope = nodes[use_.node].scope;
      let key_node = nodes.create_node(scope, placeholder.clone(), Syntax::IdExpr {
        name: placeholder.clone(),
      });
      match &mut nodes[use_.node].stx {
        Syntax::ObjectMember {
          kind: ObjectMemberKind::Valued { key, .. },
        } => {
          *key = MemberKey::Computed(key_node);
        }
        _ => unreachable!(),
      };
    }
    StrUseKind::ClassMember => {
      if !profit.hoist_keys {
        return;
      };
      let scope = nodes[use_.node].scope;
      let key_node = nodes.create_node(scope, placeholder.clone(), Syntax::IdExpr {
        name: placeholder.clone(),
      });
      match &mut nodes[use_.node].stx {
        Syntax::ClassDecl { members, .. } | Syntax::ClassExpr { members, .. } => {
          members[use_.member_index].key = MemberKey::Computed(key_node);
        }
        _ => unreachable!(),
      };
    }
  };
}

/// Picks a one-byte delimiter that occurs in none of the values: first from
/// the preferred punctuation, then any printable ASCII that needs no string
/// escaping.
fn find_delimiter(values: &[&str]) -> Option<u8> {
  const PREFERRED: &[u8] = b",;:|!@#$%^&*~`<>?/-_=+.()[]{}";
  let unused = |d: u8| values.iter().all(|v| !v.as_bytes().contains(&d));
  PREFERRED.iter().copied().find(|&d| unused(d)).or_else(|| {
    (0x20..=0x7eu8)
      .filter(|&d| !matches!(d, b'"' | b'\'' | b'\\'))
      .find(|&d| unused(d))
  })
}

fn emit_string_decls(
  nodes: &mut NodePool,
  scope: ScopeId,
  strings: &[StrCandidate],
  names: &[SourceRange],
) -> NodeId {
  let loc = SourceRange::synthesised(Vec::new());
  // Split packing: only worthwhile at scale, and only if it actually beats
  // the plain declaration list under the cost model.
  if strings.len() >= 7 {
    let values: Vec<&str> = strings.iter().map(|c| c.value.as_str()).collect();
    if let Some(delimiter) = find_delimiter(&values) {
      let delimiter = (delimiter as char).to_string();
      let packed = values.join(&delimiter);
      let name_lens = vec![HOISTED_NAME_LEN; strings.len()];
      let decl_entries: Vec<(i64, i64)> = strings
        .iter()
        .map(|c| (HOISTED_NAME_LEN, str_repr_len(&c.value)))
        .collect();
      if split_pack_cost(&name_lens, &packed, &delimiter) < multi_decl_cost(&decl_entries) {
        let elements = names
          .iter()
          .map(|name| {
            let target = nodes.create_node(scope, name.clone(), Syntax::IdPat {
              name: name.clone(),
            });
            Some(crate::ast::ArrayPatElement {
              target,
              default_value: None,
            })
          })
          .collect();
        let pattern = nodes.create_node(scope, loc.clone(), Syntax::ArrayPat {
          elements,
          rest: None,
        });
        let packed_node = nodes.create_node(scope, loc.clone(), Syntax::StrLit {
          value: packed,
        });
        let split_callee = nodes.create_node(scope, loc.clone(), Syntax::MemberExpr {
          parenthesised: false,
          optional_chaining: false,
          left: packed_node,
          right: SourceRange::synthesised("split"),
        });
        let delimiter_node = nodes.create_node(scope, loc.clone(), Syntax::StrLit {
          value: delimiter,
        });
        let arg = nodes.create_node(scope, loc.clone(), Syntax::CallArg {
          spread: false,
          value: delimiter_node,
        });
        let call = nodes.create_node(scope, loc.clone(), Syntax::CallExpr {
          parenthesised: false,
          optional_chaining: false,
          callee: split_callee,
          arguments: vec![arg],
        });
        let declaration = nodes.create_node(scope, loc.clone(), Syntax::VarDecl {
          kind: VarDeclKind::Let,
          declarators: vec![VarDeclarator {
            pattern,
            initializer: Some(call),
          }],
        });
        return nodes.create_node(scope, loc, Syntax::VarStmt { declaration });
      };
    };
  };

  let declarators = strings
    .iter()
    .zip(names)
    .map(|(candidate, name)| {
      let pattern = nodes.create_node(scope, name.clone(), Syntax::IdPat { name: name.clone() });
      let initializer = nodes.create_node(scope, loc.clone(), Syntax::StrLit {
        value: candidate.value.clone(),
      });
      VarDeclarator {
        pattern,
        initializer: Some(initializer),
      }
    })
    .collect();
  let declaration = nodes.create_node(scope, loc.clone(), Syntax::VarDecl {
    kind: VarDeclKind::Const,
    declarators,
  });
  nodes.create_node(scope, loc, Syntax::VarStmt { declaration })
}

fn emit_non_string_decls(
  nodes: &mut NodePool,
  scope: ScopeId,
  candidates: &[NonStrCandidate],
  names: &[SourceRange],
) -> NodeId {
  let loc = SourceRange::synthesised(Vec::new());
  let declarators = candidates
    .iter()
    .zip(names)
    .map(|(candidate, name)| {
      let pattern = nodes.create_node(scope, name.clone(), Syntax::IdPat { name: name.clone() });
      let stx = match &candidate.value {
        NonStrValue::Num(n) => Syntax::NumLit { value: *n },
        NonStrValue::BigInt(digits) => Syntax::BigIntLit {
          digits: digits.clone(),
        },
        NonStrValue::Bool(value) => Syntax::BoolLit { value: *value },
        NonStrValue::Null => Syntax::NullLit {},
        NonStrValue::Undefined => Syntax::UndefinedLit {},
      };
      let initializer = nodes.create_node(scope, loc.clone(), stx);
      VarDeclarator {
        pattern,
        initializer: Some(initializer),
      }
    })
    .collect();
  let declaration = nodes.create_node(scope, loc.clone(), Syntax::VarDecl {
    kind: VarDeclKind::Const,
    declarators,
  });
  nodes.create_node(scope, loc, Syntax::VarStmt { declaration })
}
