use ahash::AHashMap;
use std::ops::{Index, IndexMut};

use crate::ast::NodeId;
use crate::source::SourceRange;

pub type Identifier = SourceRange;

/// A declared name. `references` and `violations` are filled by the resolver
/// after parsing: together they are exactly the identifier nodes that resolve
/// to this binding (reads and writes respectively).
#[derive(Debug)]
pub struct Binding {
  // IdPat, ObjectPatProp (shorthand), or ClassOrFnName node that declares it.
  pub declarator: NodeId,
  pub references: Vec<NodeId>,
  pub violations: Vec<NodeId>,
  // Declared by an `export` declaration; keeps its public name.
  pub exported: bool,
  // Assigned by the mangler.
  pub new_name: Option<SourceRange>,
}

impl Binding {
  pub fn new(declarator: NodeId) -> Binding {
    Binding {
      declarator,
      references: Vec::new(),
      violations: Vec::new(),
      exported: false,
      new_name: None,
    }
  }

  pub fn use_count(&self) -> usize {
    // Declaration counts once, then every read and write.
    1 + self.references.len() + self.violations.len()
  }
}

/// An identifier that resolved to no binding in any enclosing scope.
#[derive(Debug, Default)]
pub struct FreeGlobal {
  pub references: Vec<NodeId>,
  pub violations: Vec<NodeId>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ScopeKind {
  // The program scope. Owns top-level declarations (including `var`), so
  // hoisted placeholder bindings are real, mangleable bindings.
  TopLevel,
  Closure,
  Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
  pub fn id(&self) -> usize {
    self.0
  }
}

#[derive(Debug)]
pub struct Scope {
  pub kind: ScopeKind,
  pub parent: Option<ScopeId>,
  // Nearest enclosing closure-like scope, possibly self.
  closure: ScopeId,
  bindings: AHashMap<Identifier, Binding>,
  // Insertion order, for deterministic output.
  declaration_order: Vec<Identifier>,
  // A direct `eval` call can observe this scope; its bindings keep their
  // original names.
  pub dynamic: bool,
}

impl Scope {
  pub fn declare(&mut self, name: Identifier, binding: Binding) {
    // `var` and function redeclarations are legal; the first wins and later
    // declarators just resolve to it.
    if !self.bindings.contains_key(&name) {
      self.declaration_order.push(name.clone());
      self.bindings.insert(name, binding);
    };
  }

  pub fn get(&self, name: &Identifier) -> Option<&Binding> {
    self.bindings.get(name)
  }

  pub fn get_mut(&mut self, name: &Identifier) -> Option<&mut Binding> {
    self.bindings.get_mut(name)
  }

  pub fn names(&self) -> &[Identifier] {
    &self.declaration_order
  }

  pub fn closure(&self) -> ScopeId {
    self.closure
  }
}

/// Side table of scopes, rooted at the program scope. Scope ids are issued in
/// creation order, so iterating `0..len` always visits parents before
/// children. Rebuilt from scratch whenever the tree is re-parsed.
#[derive(Debug)]
pub struct ScopeTree {
  scopes: Vec<Scope>,
  // Free identifiers, keyed by name.
  pub globals: AHashMap<String, FreeGlobal>,
}

impl ScopeTree {
  pub fn new() -> ScopeTree {
    ScopeTree {
      scopes: Vec::new(),
      globals: AHashMap::new(),
    }
  }

  pub fn create_top_level_scope(&mut self) -> ScopeId {
    debug_assert!(self.scopes.is_empty());
    self.create(ScopeKind::TopLevel, None)
  }

  pub fn create_child_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
    self.create(kind, Some(parent))
  }

  fn create(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
    let id = ScopeId(self.scopes.len());
    let closure = match kind {
      ScopeKind::Block => self.scopes[parent.unwrap().0].closure,
      _ => id,
    };
    self.scopes.push(Scope {
      kind,
      parent,
      closure,
      bindings: AHashMap::new(),
      declaration_order: Vec::new(),
      dynamic: false,
    });
    id
  }

  /// Walks the scope chain from `from` and returns the scope owning `name`.
  pub fn find_binding(&self, from: ScopeId, name: &Identifier) -> Option<ScopeId> {
    let mut cur = Some(from);
    while let Some(id) = cur {
      if self.scopes[id.0].bindings.contains_key(name) {
        return Some(id);
      };
      cur = self.scopes[id.0].parent;
    }
    None
  }

  pub fn record_global_reference(&mut self, name: &Identifier, node: NodeId) {
    self
      .globals
      .entry(name.as_str().to_string())
      .or_default()
      .references
      .push(node);
  }

  pub fn record_global_violation(&mut self, name: &Identifier, node: NodeId) {
    self
      .globals
      .entry(name.as_str().to_string())
      .or_default()
      .violations
      .push(node);
  }

  pub fn len(&self) -> usize {
    self.scopes.len()
  }

  pub fn ids(&self) -> impl Iterator<Item = ScopeId> {
    (0..self.scopes.len()).map(ScopeId)
  }
}

impl Index<ScopeId> for ScopeTree {
  type Output = Scope;

  fn index(&self, index: ScopeId) -> &Scope {
    &self.scopes[index.0]
  }
}

impl IndexMut<ScopeId> for ScopeTree {
  fn index_mut(&mut self, index: ScopeId) -> &mut Scope {
    &mut self.scopes[index.0]
  }
}
