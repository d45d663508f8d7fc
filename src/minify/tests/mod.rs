use crate::minify::{minify_program, MinifyOptions};

fn run(src: &str, options: &MinifyOptions) -> String {
  String::from_utf8(minify_program(src.as_bytes().to_vec(), options).unwrap()).unwrap()
}

fn literals_only() -> MinifyOptions {
  MinifyOptions {
    hoist_globals: false,
    hoist_duplicate_literals: true,
    consts_to_lets: false,
  }
}

fn count(haystack: &str, needle: &str) -> usize {
  haystack.matches(needle).count()
}

#[test]
fn test_string_hoist_break_even() {
  // Three copies only break even against `,X="abc"` plus the `const `
  // keyword, so nothing moves.
  let out = run("x=\"abc\";y=\"abc\";z=\"abc\"", &literals_only());
  assert_eq!(count(&out, "\"abc\""), 3);
  // A fourth copy pays for the declaration.
  let out = run("w=\"abc\";x=\"abc\";y=\"abc\";z=\"abc\"", &literals_only());
  assert_eq!(count(&out, "\"abc\""), 1);
  assert!(out.starts_with("const "));
}

#[test]
fn test_five_copy_literal() {
  let src = "console.log(\"hello\");console.log(\"hello\");console.log(\"hello\");\
             console.log(\"hello\");console.log(\"hello\")";
  let out = run(src, &literals_only());
  assert_eq!(count(&out, "\"hello\""), 1);
  // `const <single letter>="hello"` leads the output.
  let bytes = out.as_bytes();
  assert!(out.starts_with("const "));
  assert!(bytes[6].is_ascii_alphabetic());
  assert_eq!(&out[7..16], "=\"hello\";");
}

#[test]
fn test_dot_access_gate() {
  // A long property name pays per use once rewritten to a one-letter
  // computed access.
  let src = "obj.something;".repeat(10);
  let out = run(&src, &literals_only());
  assert_eq!(count(&out, "\"something\""), 1);
  assert_eq!(count(&out, "obj["), 10);
  assert_eq!(count(&out, "obj.something"), 0);

  // `obj.x` can never win: `[a]` is a byte longer than `.x`.
  let src = "obj.x;".repeat(10);
  let out = run(&src, &literals_only());
  assert_eq!(count(&out, "obj.x"), 10);
  assert_eq!(count(&out, "\"x\""), 0);
}

#[test]
fn test_split_packing_trigger() {
  let mut src = String::new();
  for i in 0..7 {
    for _ in 0..4 {
      src.push_str(&format!("g(\"str{}\");", i));
    }
  }
  let out = run(&src, &literals_only());
  assert!(out.contains(".split("), "expected split packing in: {}", out);
  for i in 0..7 {
    assert_eq!(count(&out, &format!("str{}", i)), 1);
  }
  // All seven bindings come from one packed string.
  assert_eq!(count(&out, "\""), 4);
}

#[test]
fn test_typeof_guarded_global_is_not_hoisted() {
  let src = "typeof G!==\"undefined\"&&G.foo();typeof G!==\"undefined\"&&G.foo();\
             typeof G!==\"undefined\"&&G.foo()";
  let out = run(src, &MinifyOptions::default());
  assert!(out.contains("typeof G"));
  assert!(!out.contains("=G;"));
  assert!(!out.contains("=G,"));
}

#[test]
fn test_global_hoisting() {
  let src = "JSON.parse(x);JSON.stringify(y);JSON.parse(z)";
  let out = run(src, &MinifyOptions::default());
  assert!(out.starts_with("const e=JSON;"), "got: {}", out);
  assert_eq!(count(&out, "JSON"), 1);
  assert!(out.contains("e.parse(x)"));
  assert!(out.contains("e.stringify(y)"));
}

#[test]
fn test_mangling_by_frequency() {
  let src = "function f(ppp, qqq) { return ppp+ppp+ppp+ppp+ppp+ppp+ppp+ppp+ppp+qqq; }";
  let out = run(src, &MinifyOptions::default());
  // Most referenced parameter gets the first alphabet letter.
  assert!(out.contains("(e,t)"), "got: {}", out);
  assert!(out.ends_with("return e+e+e+e+e+e+e+e+e+t}"));
}

#[test]
fn test_mangling_respects_shadowing() {
  let src = "let aaa = 1;\
             function f() { let bbb = aaa; { let aaa = 2; bbb += aaa; } return bbb; }\
             f(aaa);";
  let out = run(src, &MinifyOptions::default());
  assert_eq!(
    out,
    "let e=1;function t(){let t=e;{let e=2;t+=e}return t}t(e)"
  );
}

#[test]
fn test_shorthand_expansion_on_rename() {
  let src = "let value = f(); g({ value });";
  let out = run(src, &MinifyOptions::default());
  assert_eq!(out, "let e=f();g({value:e})");
}

#[test]
fn test_exported_bindings_keep_names() {
  let src = "export const api = 1; const hidden = 2; f(api, hidden, hidden);";
  let out = run(src, &MinifyOptions::default());
  assert!(out.contains("export const api=1"));
  assert!(!out.contains("hidden"));
}

#[test]
fn test_export_list_aliases_renamed_target() {
  let src = "const longname = 1; f(longname); export { longname };";
  let out = run(src, &MinifyOptions::default());
  assert!(out.contains("export{e as longname}"), "got: {}", out);
}

#[test]
fn test_direct_eval_pins_names() {
  let src = "function f() { let secret = 1; return eval(\"secret\") + secret; }";
  let out = run(src, &MinifyOptions::default());
  assert!(out.contains("let secret=1"), "got: {}", out);
}

#[test]
fn test_consts_to_lets() {
  let options = MinifyOptions {
    consts_to_lets: true,
    ..MinifyOptions::default()
  };
  let out = run("const x = 1; f(x);", &options);
  assert_eq!(out, "let e=1;f(e)");
}

#[test]
fn test_no_placeholder_leakage() {
  let sources = [
    "w=\"abc\";x=\"abc\";y=\"abc\";z=\"abc\"",
    "JSON.parse(x);JSON.stringify(y);JSON.parse(z)",
    "o.something;o.something;o.something;o.something",
  ];
  for src in sources {
    let out = run(src, &MinifyOptions::default());
    assert!(!out.contains("__niu_"), "placeholder leaked in: {}", out);
  }
}

#[test]
fn test_idempotence_bound() {
  let src = "console.log(\"hello\");console.log(\"hello\");console.log(\"hello\");\
             console.log(\"hello\");console.log(\"hello\")";
  let once = run(src, &MinifyOptions::default());
  let twice = run(&once, &MinifyOptions::default());
  assert!(twice.len() <= once.len());
}

#[test]
fn test_degenerate_inputs_are_no_ops() {
  let out = run("x=1", &MinifyOptions::default());
  assert_eq!(out, "x=1");
  let out = run("", &MinifyOptions::default());
  assert_eq!(out, "");
}

#[test]
fn test_non_string_literal_hoisting() {
  // `12345` three times: 3*5 - (1+1+1+5) - 3 = 4 > 0.
  let out = run("f(12345);f(12345);f(12345)", &literals_only());
  assert!(out.starts_with("const e=12345;"), "got: {}", out);
  assert_eq!(count(&out, "12345"), 1);
  // Two-byte numbers are never worth a binding.
  let out = run("f(42);f(42);f(42);f(42);f(42)", &literals_only());
  assert_eq!(count(&out, "42"), 5);
}

#[test]
fn test_undefined_hoisting() {
  let out = run(
    "f(undefined);f(undefined);f(undefined);f(undefined)",
    &literals_only(),
  );
  assert!(out.starts_with("const e=undefined;"), "got: {}", out);
  assert_eq!(count(&out, "undefined"), 1);
}

#[test]
fn test_identifier_key_hoisting() {
  // Non-shorthand long object keys become computed keys sharing one hoisted
  // string with the literal uses.
  let src = "a={something:1};b={something:2};c.something;d.something;e0.something";
  let out = run(src, &literals_only());
  assert_eq!(count(&out, "\"something\""), 1);
  assert_eq!(count(&out, "something"), 1);
}
