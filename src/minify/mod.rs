pub mod globals;
pub mod lets;
pub mod literals;
pub mod mangle;
pub mod profit;
#[cfg(test)]
mod tests;

use crate::error::SyntaxResult;
use crate::parse::{parse, ParseOutput};
use crate::resolve::resolve;

pub use self::globals::hoist_globals;
pub use self::lets::consts_to_lets;
pub use self::literals::hoist_duplicate_literals;
pub use self::mangle::mangle_names;

#[derive(Clone, Debug)]
pub struct MinifyOptions {
  /// Hoist frequently dot-accessed free globals into `const` bindings.
  pub hoist_globals: bool,
  /// Hoist duplicated literals and long repeated property names.
  pub hoist_duplicate_literals: bool,
  /// Rewrite every `const` to `let` (changes reassignment semantics).
  pub consts_to_lets: bool,
}

impl Default for MinifyOptions {
  fn default() -> MinifyOptions {
    MinifyOptions {
      hoist_globals: true,
      hoist_duplicate_literals: true,
      consts_to_lets: false,
    }
  }
}

/// Runs the full pass pipeline over one program and returns the compact
/// output bytes. Mangling always runs; the hoisting passes and `const`→`let`
/// follow `options`.
pub fn minify_program(source: Vec<u8>, options: &MinifyOptions) -> SyntaxResult<Vec<u8>> {
  let ParseOutput {
    mut nodes,
    mut scopes,
    top_level_node,
    top_level_scope,
  } = parse(source)?;
  resolve(&nodes, &mut scopes, top_level_node);

  let mut hoisted = false;
  if options.hoist_globals {
    hoisted |= hoist_globals(&mut nodes, &scopes, top_level_node, top_level_scope);
  };
  if options.hoist_duplicate_literals {
    hoisted |= hoist_duplicate_literals(&mut nodes, top_level_node, top_level_scope);
  };

  // Print and re-parse after hoisting so the scope analysis sees the
  // placeholder bindings as genuine declarations. This is a correctness
  // device, not an optimisation: scope data is rebuilt, never patched.
  let (mut nodes, mut scopes, top_level_node) = if hoisted {
    let printed = crate::emit::emit(&nodes, top_level_node);
    let reparsed = parse(printed)?;
    (reparsed.nodes, reparsed.scopes, reparsed.top_level_node)
  } else {
    (nodes, scopes, top_level_node)
  };
  if hoisted {
    resolve(&nodes, &mut scopes, top_level_node);
  };

  mangle_names(&mut nodes, &mut scopes, top_level_node);
  if options.consts_to_lets {
    consts_to_lets(&mut nodes, top_level_node);
  };
  Ok(crate::emit::emit(&nodes, top_level_node))
}
