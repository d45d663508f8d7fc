use crate::ast::{NodeId, NodePool, Syntax, VarDeclKind};
use crate::visit::walk;

/// Rewrites every `const` declaration keyword to `let`, two bytes shorter.
/// The only pass that relaxes language semantics (assigning to a former
/// `const` no longer throws), which is why it is opt-in.
pub fn consts_to_lets(nodes: &mut NodePool, top_level_node: NodeId) {
  let mut decls = Vec::<NodeId>::new();
  walk(nodes, top_level_node, &mut |n| {
    if matches!(&nodes[n].stx, Syntax::VarDecl {
      kind: VarDeclKind::Const,
      ..
    }) {
      decls.push(n);
    };
  });
  for n in decls {
    match &mut nodes[n].stx {
      Syntax::VarDecl { kind, .. } => *kind = VarDeclKind::Let,
      _ => unreachable!(),
    };
  }
}
