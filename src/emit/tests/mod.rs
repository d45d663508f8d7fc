use crate::emit::{emit, quote_str, render_number};
use crate::parse::parse;

fn check(src: &str, expected: &str) {
  let parsed = parse(src.as_bytes().to_vec()).unwrap();
  let out = emit(&parsed.nodes, parsed.top_level_node);
  assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_emit_var_declarations() {
  check("let x = 1;", "let x=1");
  check("const x = 1, y = \"a\";", "const x=1,y=\"a\"");
  check("var a = [1, , 2], { b, c: d = 3 } = e;", "var a=[1,,2],{b,c:d=3}=e");
}

#[test]
fn test_emit_expressions() {
  check("a = b + c * d;", "a=b+c*d");
  check("a = (b + c) * d;", "a=(b+c)*d");
  check("a = b ? c : d, e;", "a=b?c:d,e");
  check("x = a + +b;", "x=a+ +b");
  check("x = - -a;", "x=- -a");
  check("f(...args, 1);", "f(...args,1)");
  check("x = a?.b?.[c]?.(d);", "x=a?.b?.[c]?.(d)");
  check("x = 1.5.toString();", "x=1.5.toString()");
  check("x = (5).toString();", "x=5..toString()");
}

#[test]
fn test_emit_strings_requote() {
  check("x = 'a\"b';", "x=\"a\\\"b\"");
  check("x = \"a\\u0041b\";", "x=\"aAb\"");
  check("x = 'line\\nbreak';", "x=\"line\\nbreak\"");
}

#[test]
fn test_emit_numbers_shortest_form() {
  check("x = 1000000;", "x=1e6");
  check("x = 0.5;", "x=.5");
  check("x = 0x10;", "x=16");
  check("x = 123n;", "x=123n");
}

#[test]
fn test_emit_statements_and_separators() {
  check("if (x) { y() } else z();", "if(x){y()}else z()");
  check("if (x) y(); z();", "if(x)y();z()");
  check("for (let i = 0; i < 10; i++) f(i);", "for(let i=0;i<10;i++)f(i)");
  check("for (const k in o) f(k);", "for(const k in o)f(k)");
  check("do x(); while (y); z();", "do x();while(y);z()");
  check("for (;;); x();", "for(;;);x()");
  check(
    "try { a() } catch (e) { b(e) } finally { c() }",
    "try{a()}catch(e){b(e)}finally{c()}",
  );
  check(
    "switch (x) { case 1: a(); break; default: b() }",
    "switch(x){case 1:a();break;default:b()}",
  );
}

#[test]
fn test_emit_functions_and_classes() {
  check("function f(a, b = 1) { return a + b; }", "function f(a,b=1){return a+b}");
  check("async function g() { await h(); }", "async function g(){await h()}");
  check("x = function* () { yield 1; };", "x=function*(){yield 1}");
  check("f = (a) => a + 1;", "f=a=>a+1");
  check("f = async (a, b) => a;", "f=async(a,b)=>a");
  check("f = () => ({});", "f=()=>({})");
  check("(a => a + 1)(2);", "(a=>a+1)(2)");
  check("f = x => y => x + y;", "f=x=>y=>x+y");
  check(
    "class A extends B { constructor() { super(); } static x = 1; get y() { return 2 } #p = 3; }",
    "class A extends B{constructor(){super()}static x=1;get y(){return 2}#p=3}",
  );
  check("x = { a: 1, b, 'c d': 2, [e]: 3, f() {} };", "x={a:1,b,'c d':2,[e]:3,f(){}}");
}

#[test]
fn test_emit_object_pattern_assignment_statement() {
  check("({ a, b } = c);", "({a,b}=c)");
}

#[test]
fn test_emit_modules() {
  check(
    "import a, { b as c, d } from \"m\"; a(c, d);",
    "import a,{b as c,d}from\"m\";a(c,d)",
  );
  check("import * as ns from \"m\"; ns.f();", "import* as ns from\"m\";ns.f()");
  check("export { a as b, c };", "export{a as b,c}");
  check("export * from \"m\";", "export* from\"m\"");
  check("export default function () {}", "export default function(){}");
  check("export const x = 1;", "export const x=1");
  check("x = import(\"m\");", "x=import(\"m\")");
}

#[test]
fn test_emit_templates_and_regex() {
  check("x = `a${b}c`;", "x=`a${b}c`");
  check("x = /ab[/]c/gi;", "x=/ab[/]c/gi");
}

#[test]
fn test_quote_str() {
  assert_eq!(quote_str("abc"), "\"abc\"");
  assert_eq!(quote_str("a\"b\\c"), "\"a\\\"b\\\\c\"");
  assert_eq!(quote_str("a\nb\tc"), "\"a\\nb\\tc\"");
  assert_eq!(quote_str("\x01"), "\"\\u0001\"");
}

#[test]
fn test_render_number() {
  assert_eq!(render_number(0.0), "0");
  assert_eq!(render_number(42.0), "42");
  assert_eq!(render_number(0.25), ".25");
  assert_eq!(render_number(12300000.0), "123e5");
  assert_eq!(render_number(1e21), "1e21");
  assert_eq!(render_number(1e-7), "1e-7");
}
