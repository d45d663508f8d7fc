use std::fmt::{self, Debug, Formatter};
use std::ops::{Index, IndexMut};

use crate::num::JsNumber;
use crate::operator::OpName;
use crate::source::SourceRange;
use crate::symbol::ScopeId;

/// One AST node: syntax, source range, and the scope its identifiers resolve
/// from. The scope created *by* a construct (function, block, `for` header)
/// is assigned to its children, never to the construct's own node.
pub struct Node {
  pub loc: SourceRange,
  pub stx: Syntax,
  pub scope: ScopeId,
}

impl Debug for Node {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self.stx)
  }
}

// Deliberately no Eq: two nodes can be structurally identical while being
// distinct nodes, and children are NodeIds anyway.
#[derive(Clone, Copy, Debug)]
pub struct NodeId(usize);

impl NodeId {
  pub fn new(id: usize) -> NodeId {
    NodeId(id)
  }

  pub fn id(&self) -> usize {
    self.0
  }
}

#[derive(Debug)]
pub struct NodePool {
  nodes: Vec<Node>,
}

impl NodePool {
  pub fn new() -> NodePool {
    NodePool { nodes: Vec::new() }
  }

  pub fn create_node(&mut self, scope: ScopeId, loc: SourceRange, stx: Syntax) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.nodes.push(Node { loc, stx, scope });
    id
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }
}

impl Index<NodeId> for NodePool {
  type Output = Node;

  fn index(&self, index: NodeId) -> &Node {
    &self.nodes[index.0]
  }
}

impl IndexMut<NodeId> for NodePool {
  fn index_mut(&mut self, index: NodeId) -> &mut Node {
    &mut self.nodes[index.0]
  }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum VarDeclKind {
  Const,
  Let,
  Var,
}

#[derive(Debug)]
pub enum ArrayElement {
  Single(NodeId),
  Rest(NodeId),
  Empty,
}

/// Key of a class member, object member, or object pattern property.
#[derive(Clone, Debug)]
pub enum MemberKey {
  // Identifier, keyword, private name, number, or string, as raw source.
  Direct(SourceRange),
  Computed(NodeId),
}

#[derive(Debug)]
pub enum MemberValue {
  Getter {
    body: NodeId,
  },
  Method {
    is_async: bool,
    generator: bool,
    signature: NodeId,
    body: NodeId,
  },
  Property {
    // Always Some for valued object members; shorthands are a separate kind.
    initializer: Option<NodeId>,
  },
  Setter {
    parameter: NodeId,
    body: NodeId,
  },
}

#[derive(Debug)]
pub struct ClassMember {
  pub key: MemberKey,
  pub statik: bool,
  pub value: MemberValue,
}

#[derive(Debug)]
pub enum ObjectMemberKind {
  Valued { key: MemberKey, value: MemberValue },
  Shorthand { name: SourceRange },
  Rest { value: NodeId },
}

#[derive(Debug)]
pub struct ArrayPatElement {
  pub target: NodeId,
  pub default_value: Option<NodeId>,
}

#[derive(Debug)]
pub struct ExportName {
  // Local name; rewritten when the binding it references is renamed.
  pub target: SourceRange,
  // External name, as an IdPat node. Never renamed.
  pub alias: NodeId,
}

#[derive(Debug)]
pub enum ExportNames {
  // `import * as x` / `export * [as x] from "m"`.
  All(Option<NodeId>),
  // `import {a, b as c}` / `export {a as default, b}`.
  Specific(Vec<ExportName>),
}

#[derive(Debug)]
pub struct VarDeclarator {
  pub pattern: NodeId,
  pub initializer: Option<NodeId>,
}

#[derive(Debug)]
pub enum ForInit {
  None,
  Expression(NodeId),
  Declaration(NodeId),
}

#[derive(Debug)]
pub enum ForLhs {
  Declaration(NodeId),
  Pattern(NodeId),
}

#[derive(Debug)]
pub enum ForHeader {
  Three {
    init: ForInit,
    condition: Option<NodeId>,
    post: Option<NodeId>,
  },
  InOf {
    of: bool,
    lhs: ForLhs,
    rhs: NodeId,
  },
}

#[derive(Debug)]
pub enum TemplatePart {
  Str(SourceRange),
  Substitution(NodeId),
}

#[derive(Debug)]
pub enum Syntax {
  // Patterns.
  IdPat {
    name: SourceRange,
  },
  ArrayPat {
    elements: Vec<Option<ArrayPatElement>>,
    rest: Option<NodeId>,
  },
  ObjectPat {
    // ObjectPatProp nodes.
    properties: Vec<NodeId>,
    // Must be an IdPat.
    rest: Option<NodeId>,
  },
  ObjectPatProp {
    key: MemberKey,
    // None iff shorthand (key is Direct and names the binding).
    target: Option<NodeId>,
    default_value: Option<NodeId>,
  },
  // Behaves like a pattern; kept separate so renaming can distinguish it.
  ClassOrFnName {
    name: SourceRange,
  },

  FnSignature {
    // ParamDecl nodes.
    parameters: Vec<NodeId>,
  },

  // Declarations.
  ClassDecl {
    name: Option<NodeId>,
    extends: Option<NodeId>,
    members: Vec<ClassMember>,
  },
  FnDecl {
    is_async: bool,
    generator: bool,
    name: Option<NodeId>,
    signature: NodeId,
    body: NodeId,
  },
  ParamDecl {
    rest: bool,
    pattern: NodeId,
    default_value: Option<NodeId>,
  },
  VarDecl {
    kind: VarDeclKind,
    declarators: Vec<VarDeclarator>,
  },

  // Expressions.
  ArrowFnExpr {
    is_async: bool,
    signature: NodeId,
    body: NodeId,
  },
  BinaryExpr {
    parenthesised: bool,
    operator: OpName,
    left: NodeId,
    right: NodeId,
  },
  CallExpr {
    parenthesised: bool,
    optional_chaining: bool,
    callee: NodeId,
    // CallArg nodes.
    arguments: Vec<NodeId>,
  },
  CallArg {
    spread: bool,
    value: NodeId,
  },
  ClassExpr {
    parenthesised: bool,
    name: Option<NodeId>,
    extends: Option<NodeId>,
    members: Vec<ClassMember>,
  },
  CondExpr {
    parenthesised: bool,
    test: NodeId,
    consequent: NodeId,
    alternate: NodeId,
  },
  ComputedMemberExpr {
    optional_chaining: bool,
    object: NodeId,
    member: NodeId,
  },
  FnExpr {
    parenthesised: bool,
    is_async: bool,
    generator: bool,
    name: Option<NodeId>,
    signature: NodeId,
    body: NodeId,
  },
  IdExpr {
    name: SourceRange,
  },
  ImportCallExpr {
    module: NodeId,
  },
  // `a.b` and `a?.b`; kept separate from ComputedMemberExpr so the literal
  // hoister can rewrite dot form into bracket form.
  MemberExpr {
    parenthesised: bool,
    optional_chaining: bool,
    left: NodeId,
    right: SourceRange,
  },
  SuperExpr {},
  ThisExpr {},
  UnaryExpr {
    parenthesised: bool,
    operator: OpName,
    argument: NodeId,
  },
  PostfixExpr {
    parenthesised: bool,
    operator: OpName,
    argument: NodeId,
  },

  // Literals.
  ArrayLit {
    elements: Vec<ArrayElement>,
  },
  BigIntLit {
    // Decimal digits, without the `n` suffix.
    digits: String,
  },
  BoolLit {
    value: bool,
  },
  NullLit {},
  NumLit {
    value: JsNumber,
  },
  ObjectLit {
    // ObjectMember nodes.
    members: Vec<NodeId>,
  },
  ObjectMember {
    kind: ObjectMemberKind,
  },
  RegexLit {},
  StrLit {
    value: String,
  },
  TemplateLit {
    parts: Vec<TemplatePart>,
  },
  UndefinedLit {},

  // Statements.
  BlockStmt {
    body: Vec<NodeId>,
  },
  BreakStmt {
    label: Option<SourceRange>,
  },
  ContinueStmt {
    label: Option<SourceRange>,
  },
  DebuggerStmt {},
  DoWhileStmt {
    condition: NodeId,
    body: NodeId,
  },
  EmptyStmt {},
  ExportDeclStmt {
    declaration: NodeId,
    default: bool,
  },
  ExportDefaultStmt {
    expression: NodeId,
  },
  ExportListStmt {
    names: ExportNames,
    from: Option<String>,
  },
  ExprStmt {
    expression: NodeId,
  },
  ForStmt {
    header: ForHeader,
    body: NodeId,
  },
  IfStmt {
    test: NodeId,
    consequent: NodeId,
    alternate: Option<NodeId>,
  },
  ImportStmt {
    // IdPat node.
    default: Option<NodeId>,
    names: Option<ExportNames>,
    module: String,
  },
  LabelStmt {
    name: SourceRange,
    statement: NodeId,
  },
  ReturnStmt {
    value: Option<NodeId>,
  },
  SwitchStmt {
    test: NodeId,
    // SwitchBranch nodes.
    branches: Vec<NodeId>,
  },
  SwitchBranch {
    // None for `default:`.
    case: Option<NodeId>,
    body: Vec<NodeId>,
  },
  ThrowStmt {
    value: NodeId,
  },
  TryStmt {
    wrapped: NodeId,
    catch: Option<NodeId>,
    finally: Option<NodeId>,
  },
  CatchBlock {
    parameter: Option<NodeId>,
    body: NodeId,
  },
  VarStmt {
    declaration: NodeId,
  },
  WhileStmt {
    condition: NodeId,
    body: NodeId,
  },

  TopLevel {
    body: Vec<NodeId>,
  },
}
