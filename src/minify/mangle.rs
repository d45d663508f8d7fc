use ahash::{AHashMap, AHashSet};
use lazy_static::lazy_static;

use crate::ast::{MemberKey, MemberValue, NodeId, NodePool, ObjectMemberKind, Syntax};
use crate::source::SourceRange;
use crate::symbol::{Identifier, ScopeId, ScopeTree};
use crate::visit::walk;

/// Candidate name characters, most frequent English letters first so the
/// hottest bindings compress best, then uppercase, then `$` and `_`. No
/// digits: every generated name must be able to start an identifier, and the
/// generator treats all positions uniformly.
const NAME_ALPHABET: &[u8] = b"etaonirshldcumfpgwybvkxjqzETAONIRSHLDCUMFPGWYBVKXJQZ$_";

lazy_static! {
  /// Names the generator must never produce: keywords, contextual keywords,
  /// and the handful of globals whose capture would change behaviour.
  static ref RESERVED_WORDS: AHashSet<&'static [u8]> = AHashSet::from_iter([
    &b"break"[..], b"case", b"catch", b"continue", b"debugger", b"default", b"delete", b"do",
    b"else", b"finally", b"for", b"function", b"if", b"in", b"instanceof", b"new", b"return",
    b"switch", b"this", b"throw", b"try", b"typeof", b"var", b"void", b"while", b"with", b"class",
    b"const", b"enum", b"export", b"extends", b"import", b"super", b"implements", b"interface",
    b"let", b"package", b"private", b"protected", b"public", b"static", b"yield", b"null",
    b"true", b"false", b"undefined", b"NaN", b"Infinity", b"eval", b"arguments",
  ]);
}

/// Bijective encoding of an index into the name alphabet: the first 54
/// indices are the single characters in order, then `ee`, `et`, … Every
/// output is a distinct valid identifier.
pub fn minified_name(mut i: usize) -> Vec<u8> {
  let base = NAME_ALPHABET.len();
  let mut name = vec![NAME_ALPHABET[i % base]];
  while i >= base {
    i = i / base - 1;
    name.push(NAME_ALPHABET[i % base]);
  }
  name.reverse();
  name
}

/// Renames every binding to the shortest name still legal in its scope, most
/// referenced first. Must run on a freshly parsed and resolved tree, so that
/// hoisted placeholders are ordinary bindings.
pub fn mangle_names(nodes: &mut NodePool, scopes: &mut ScopeTree, top_level_node: NodeId) {
  // For each scope, the ancestor bindings referenced from inside it (or its
  // descendants), and the free global names in use there. Reusing one of
  // those names would capture the outer use.
  let mut inherited: Vec<AHashSet<(ScopeId, Identifier)>> = (0..scopes.len())
    .map(|_| AHashSet::new())
    .collect();
  let mut inherited_globals: Vec<AHashSet<Vec<u8>>> =
    (0..scopes.len()).map(|_| AHashSet::new()).collect();
  for owner in scopes.ids() {
    for name in scopes[owner].names().to_vec() {
      let binding = scopes[owner].get(&name).unwrap();
      for &use_node in binding.references.iter().chain(binding.violations.iter()) {
        let mut cur = Some(nodes[use_node].scope);
        while let Some(id) = cur {
          if id == owner {
            break;
          };
          inherited[id.id()].insert((owner, name.clone()));
          cur = scopes[id].parent;
        }
      }
    }
  }
  for (name, info) in scopes.globals.iter() {
    for &use_node in info.references.iter().chain(info.violations.iter()) {
      let mut cur = Some(nodes[use_node].scope);
      while let Some(id) = cur {
        inherited_globals[id.id()].insert(name.as_bytes().to_vec());
        cur = scopes[id].parent;
      }
    }
  }

  // Scope ids are created parents-first, so ancestors always have their names
  // assigned before any scope that inherits them.
  for scope_id in scopes.ids().collect::<Vec<_>>() {
    let mut taken = AHashSet::<Vec<u8>>::new();
    for (owner, name) in inherited[scope_id.id()].iter() {
      let binding = scopes[*owner].get(name).unwrap();
      let resolved = match &binding.new_name {
        Some(new_name) => new_name.as_slice().to_vec(),
        None => name.as_slice().to_vec(),
      };
      taken.insert(resolved);
    }
    taken.extend(inherited_globals[scope_id.id()].iter().cloned());

    // Rank by total use (declaration + reads + writes), declaration order as
    // the tiebreak.
    let mut ranked: Vec<(usize, Identifier)> = Vec::new();
    for name in scopes[scope_id].names().to_vec() {
      let binding = scopes[scope_id].get(&name).unwrap();
      ranked.push((binding.use_count(), name));
    }
    ranked.sort_by_key(|(count, _)| std::cmp::Reverse(*count));

    // Exported names are the module's public surface; dynamic scopes can be
    // observed by `eval`. Both keep their original names (placeholders are
    // this crate's own and are always renamed), and those names must be
    // off-limits before any new name is generated.
    let dynamic = scopes[scope_id].dynamic;
    let keeps_original = |name: &Identifier, binding: &crate::symbol::Binding| {
      binding.exported || (dynamic && !name.as_slice().starts_with(b"__niu_"))
    };
    for (_, name) in ranked.iter() {
      let binding = scopes[scope_id].get(name).unwrap();
      if keeps_original(name, binding) {
        taken.insert(name.as_slice().to_vec());
      };
    }
    let mut next_index = 0;
    for (_, name) in ranked {
      let binding = scopes[scope_id].get(&name).unwrap();
      if keeps_original(&name, binding) {
        continue;
      };
      let new_name = loop {
        let candidate = minified_name(next_index);
        next_index += 1;
        if RESERVED_WORDS.contains(candidate.as_slice()) || taken.contains(&candidate) {
          continue;
        };
        break candidate;
      };
      taken.insert(new_name.clone());
      scopes[scope_id].get_mut(&name).unwrap().new_name =
        Some(SourceRange::synthesised(new_name));
    }
  }

  apply_renames(nodes, scopes, top_level_node);
}

enum Rename {
  // IdExpr, IdPat, or ClassOrFnName: overwrite the identifier.
  SetName(NodeId),
  // `{a}` object member: expand to `a:<new>`.
  ExpandShorthandMember(NodeId),
  // `{a}` pattern property: expand to `a:<new>`.
  ExpandShorthandPatProp(NodeId),
  // `export{a as b}`: rewrite matching local targets.
  RewriteExportTargets(NodeId),
}

fn apply_renames(nodes: &mut NodePool, scopes: &ScopeTree, top_level_node: NodeId) {
  let mut actions = Vec::<(Rename, SourceRange, SourceRange)>::new();
  // Remember placeholder renames for the final sweep.
  let mut placeholder_names = AHashMap::<Vec<u8>, SourceRange>::new();

  for scope_id in scopes.ids() {
    for name in scopes[scope_id].names() {
      let binding = scopes[scope_id].get(name).unwrap();
      let Some(new_name) = binding.new_name.clone() else {
        continue;
      };
      if name.as_slice().starts_with(b"__niu_") {
        placeholder_names.insert(name.as_slice().to_vec(), new_name.clone());
      };
      let old_name = name.clone();
      for &n in binding
        .references
        .iter()
        .chain(binding.violations.iter())
        .chain(std::iter::once(&binding.declarator))
      {
        let action = match &nodes[n].stx {
          Syntax::IdExpr { .. } | Syntax::IdPat { .. } | Syntax::ClassOrFnName { .. } => {
            Rename::SetName(n)
          }
          Syntax::ObjectMember {
            kind: ObjectMemberKind::Shorthand { .. },
          } => Rename::ExpandShorthandMember(n),
          Syntax::ObjectPatProp { .. } => Rename::ExpandShorthandPatProp(n),
          Syntax::ExportListStmt { .. } => Rename::RewriteExportTargets(n),
          _ => unreachable!("unexpected rename site"),
        };
        actions.push((action, old_name.clone(), new_name.clone()));
      }
    }
  }

  for (action, old_name, new_name) in actions {
    match action {
      Rename::SetName(n) => {
        match &mut nodes[n].stx {
          Syntax::IdExpr { name } | Syntax::IdPat { name } | Syntax::ClassOrFnName { name } => {
            *name = new_name;
          }
          _ => unreachable!(),
        };
      }
      Rename::ExpandShorthandMember(n) => {
        let scope = nodes[n].scope;
        let value = nodes.create_node(scope, new_name.clone(), Syntax::IdExpr {
          name: new_name,
        });
        match &mut nodes[n].stx {
          Syntax::ObjectMember { kind } => {
            *kind = ObjectMemberKind::Valued {
              key: MemberKey::Direct(old_name),
              value: MemberValue::Property {
                initializer: Some(value),
              },
            };
          }
          _ => unreachable!(),
        };
      }
      Rename::ExpandShorthandPatProp(n) => {
        let scope = nodes[n].scope;
        let target = nodes.create_node(scope, new_name.clone(), Syntax::IdPat {
          name: new_name,
        });
        match &mut nodes[n].stx {
          Syntax::ObjectPatProp {
            target: target_slot @ None,
            ..
          } => {
            *target_slot = Some(target);
          }
          _ => {}
        };
      }
      Rename::RewriteExportTargets(n) => {
        match &mut nodes[n].stx {
          Syntax::ExportListStmt {
            names: crate::ast::ExportNames::Specific(names),
            ..
          } => {
            for e in names.iter_mut() {
              if e.target == old_name {
                e.target = new_name.clone();
              };
            }
          }
          _ => unreachable!(),
        };
      }
    };
  }

  if placeholder_names.is_empty() {
    return;
  };
  // Defensive sweep: no `__niu_` name may survive to the output, even if a
  // copy exists outside the recorded reference paths.
  let mut leftovers = Vec::<NodeId>::new();
  walk(nodes, top_level_node, &mut |n| match &nodes[n].stx {
    Syntax::IdExpr { name } | Syntax::IdPat { name } | Syntax::ClassOrFnName { name } => {
      if name.as_slice().starts_with(b"__niu_") {
        leftovers.push(n);
      };
    }
    _ => {}
  });
  for n in leftovers {
    match &mut nodes[n].stx {
      Syntax::IdExpr { name } | Syntax::IdPat { name } | Syntax::ClassOrFnName { name } => {
        if let Some(new_name) = placeholder_names.get(name.as_slice()) {
          *name = new_name.clone();
        };
      }
      _ => unreachable!(),
    };
  }
}
