//! Byte accounting for hoist decisions. All costs are bytes of the compact
//! printed form; positive results are savings. The string and number sizing
//! goes through the emitter's own encoders, so the model cannot drift from
//! what actually gets printed.

use crate::emit::{quote_str, render_number};
use crate::num::JsNumber;

/// Uniform assumption for the length of a hoisted binding's final name: the
/// mangler runs afterwards and will pick single-character names for anything
/// referenced this often.
pub const HOISTED_NAME_LEN: i64 = 1;

/// Extra bytes the first hoisted declaration pays for its `const ` keyword
/// over a `,`-chained declarator.
pub const FIRST_DECL_OVERHEAD: i64 = 5;

/// Printed length of a string literal.
pub fn str_repr_len(value: &str) -> i64 {
  quote_str(value).len() as i64
}

/// Printed length of a non-string literal.
pub fn num_repr_len(value: JsNumber) -> i64 {
  render_number(value.0).len() as i64
}

/// `const X=V` costs `6+id+1+R` for the first declarator emitted; every later
/// declarator rides the same keyword for `1+id+1+R` (`,X=V`).
pub fn decl_cost(repr_len: i64, id_len: i64, first: bool) -> i64 {
  (if first { 6 } else { 1 }) + id_len + 1 + repr_len
}

/// Replacing `n` copies of a literal of printed length `repr_len` with a
/// binding of length `id_len`.
pub fn literal_hoist_profit(n: i64, repr_len: i64, id_len: i64, first: bool) -> i64 {
  n * repr_len - decl_cost(repr_len, id_len, first) - n * id_len
}

/// Replacing `n` uses of a free global of length `global_len` (hoisted
/// verbatim, no quoting).
pub fn global_hoist_profit(n: i64, global_len: i64, id_len: i64, first: bool) -> i64 {
  n * global_len - decl_cost(global_len, id_len, first) - n * id_len
}

/// `.p` → `[X]` pays per use only when the name is long enough.
pub fn dot_access_gate(name_len: i64, id_len: i64) -> bool {
  name_len > 1 + id_len
}

/// `k:` → `[X]:` pays per use only when the key is long enough.
pub fn identifier_key_gate(name_len: i64, id_len: i64) -> bool {
  name_len > 2 + id_len
}

#[derive(Debug, Clone, Copy)]
pub struct StringProfit {
  pub profit: i64,
  // Occurrences that survive the per-occurrence gates.
  pub effective: i64,
  pub hoist_literals: bool,
  pub hoist_access: bool,
  pub hoist_keys: bool,
}

/// Decides, per category, whether rewriting pays, then sums the winning
/// categories against one hoisted declaration. Literal occurrences always
/// participate; dot accesses and identifier keys only past their gates.
pub fn selective_string_profit(
  value: &str,
  literal_uses: i64,
  dot_access_uses: i64,
  identifier_key_uses: i64,
  id_len: i64,
  first: bool,
) -> StringProfit {
  let repr_len = str_repr_len(value);
  let name_len = value.len() as i64;
  let dot = if dot_access_gate(name_len, id_len) {
    dot_access_uses
  } else {
    0
  };
  let keys = if identifier_key_gate(name_len, id_len) {
    identifier_key_uses
  } else {
    0
  };
  let effective = literal_uses + dot + keys;
  let old = literal_uses * repr_len + dot * (1 + name_len) + keys * name_len;
  let new = decl_cost(repr_len, id_len, first)
    + literal_uses * id_len
    + dot * (2 + id_len)
    + keys * (2 + id_len);
  StringProfit {
    profit: old - new,
    effective,
    hoist_literals: literal_uses > 0,
    hoist_access: dot > 0,
    hoist_keys: keys > 0,
  }
}

/// Printed length of `let [a,b,…]="v0Dv1D…".split("D")`.
pub fn split_pack_cost(name_lens: &[i64], packed: &str, delimiter: &str) -> i64 {
  let names: i64 = name_lens.iter().sum::<i64>() + (name_lens.len() as i64 - 1);
  // `let ` + `[` names `]` + `=` + packed + `.split(` + delimiter + `)`.
  4 + 1 + names + 1 + 1 + str_repr_len(packed) + 7 + str_repr_len(delimiter) + 1
}

/// Printed length of `const a="v0",b="v1",…`.
pub fn multi_decl_cost(entries: &[(i64, i64)]) -> i64 {
  let mut total = 6;
  for (i, &(id_len, repr_len)) in entries.iter().enumerate() {
    if i > 0 {
      total += 1;
    };
    total += id_len + 1 + repr_len;
  }
  total
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decl_cost() {
    // `const a="xy"` = 12 bytes.
    assert_eq!(decl_cost(4, 1, true), 12);
    // `,a="xy"` = 7 bytes.
    assert_eq!(decl_cost(4, 1, false), 7);
  }

  #[test]
  fn test_literal_hoist_break_even() {
    // Three copies of `"abc"` only just pay for `,a="abc"`; no gain.
    assert_eq!(literal_hoist_profit(3, 5, 1, false), 3 * 5 - 8 - 3);
    assert!(literal_hoist_profit(3, 5, 1, false) <= 5);
    // Four copies win outright.
    assert!(literal_hoist_profit(4, 5, 1, false) > 5);
  }

  #[test]
  fn test_access_gates() {
    // `.xy` (3 bytes) vs `[a]` (3 bytes): no per-use gain.
    assert!(!dot_access_gate(2, 1));
    assert!(dot_access_gate(3, 1));
    // `xy:` vs `[a]:` loses a byte per use.
    assert!(!identifier_key_gate(3, 1));
    assert!(identifier_key_gate(4, 1));
  }

  #[test]
  fn test_selective_string_profit_gates_categories() {
    // Short name: dot accesses are zeroed, only literals count.
    let p = selective_string_profit("x", 3, 10, 0, 1, false);
    assert!(!p.hoist_access);
    assert_eq!(p.effective, 3);
    // Long name: both categories participate.
    let p = selective_string_profit("something", 0, 10, 0, 1, false);
    assert!(p.hoist_access);
    assert_eq!(p.effective, 10);
    assert!(p.profit > 0);
  }

  #[test]
  fn test_repr_lengths() {
    assert_eq!(str_repr_len("abc"), 5);
    assert_eq!(str_repr_len("a\"b"), 6);
    assert_eq!(num_repr_len(crate::num::JsNumber(1000.0)), 3);
    assert_eq!(num_repr_len(crate::num::JsNumber(0.5)), 2);
  }

  #[test]
  fn test_split_pack_cost_matches_printed_form() {
    // let [a,b]="x,y".split(",")  — 26 bytes.
    assert_eq!(split_pack_cost(&[1, 1], "x,y", ","), 26);
    // const a="x",b="y" — 17 bytes.
    assert_eq!(multi_decl_cost(&[(1, 3), (1, 3)]), 17);
  }
}
