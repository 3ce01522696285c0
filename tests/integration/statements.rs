//! Statement grammar of function bodies.

mod common;

use common::*;
use ifjc::diagnostics::ErrorKind;

#[test]
fn empty_main() {
    analyze_ok(&program("pub fn main() void {}"));
    analyze_ok(&program("pub fn main() void { return; }"));
}

#[test]
fn declarations() {
    let analysis = analyze_ok(&main_with(
        "const a: i32 = 1;\n\
         const b: ?f64 = null;\n\
         const c = 2.5;\n\
         var d: ?[]u8 = ifj.readstr();\n\
         d = null;\n\
         ifj.write(a); ifj.write(b); ifj.write(c); ifj.write(d);",
    ));
    let summary: Vec<_> = analysis
        .locals_of("main")
        .map(|l| (l.name.as_str(), l.variable.ty.to_string(), l.variable.is_const))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("a", "i32".to_string(), true),
            ("b", "?f64".to_string(), true),
            ("c", "f64".to_string(), true),
            ("d", "?[]u8".to_string(), false),
        ]
    );
}

#[test]
fn declaration_syntax_errors() {
    for stmt in [
        "const = 1;",
        "const x 1;",
        "const x: = 1;",
        "const x: void = 1;",
        "const x = 1",
        "var x;",
        "var x: i32;",
        "let x = 1;",
        "const while = 1;",
    ] {
        assert_eq!(error_kind(&main_with(stmt)), ErrorKind::Syntax, "{stmt}");
    }
}

#[test]
fn assignments() {
    analyze_ok(&main_with("var x: i32 = 0;\nx = x + 1;\nx = 7;\nifj.write(x);"));
    assert_eq!(error_kind(&main_with("var x: i32 = 0;\nx 1;\nifj.write(x);")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("var x: i32 = 0;\nx = 1\nifj.write(x);")), ErrorKind::Syntax);
}

#[test]
fn discard_statement() {
    analyze_ok(&main_with("_ = ifj.readi32();"));
    analyze_ok(&main_with("_ = 1 + 2;"));
    analyze_ok(&main_with("const x = 3;\n_ = x;"));
    assert_eq!(error_kind(&main_with("_ = ifj.write(1);")), ErrorKind::FunctionSignature);
    assert_eq!(error_kind(&main_with("_ ifj.readi32();")), ErrorKind::Syntax);
}

#[test]
fn call_statements() {
    analyze_ok(&program("pub fn main() void { greet(); }\npub fn greet() void { ifj.write(\"hi\\n\"); }"));
    assert_eq!(error_kind(&main_with("ifj.readi32();")), ErrorKind::FunctionSignature);
    assert_eq!(error_kind(&main_with("ifj.write(1)")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("ifj.write 1;")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("ifj write(1);")), ErrorKind::Syntax);
}

#[test]
fn call_arguments_are_terms() {
    analyze_ok(&main_with("const s = ifj.string(\"abc\");\nconst t = ifj.substr(s, 0, 1,);\nifj.write(t);"));
    assert_eq!(error_kind(&main_with("ifj.write((1));")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("ifj.write(1,,);")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("ifj.write(1 2);")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("const x = ifj.chr(ifj.ord(1));")), ErrorKind::Syntax);
}

#[test]
fn if_else() {
    analyze_ok(&main_with("const a = 1;\nif (a < 2) { ifj.write(a); } else { ifj.write(0); }"));
    analyze_ok(&main_with("const a = 1;\nif (a < 2) { ifj.write(a); }"));
    analyze_ok(&main_with("const a = 1;\nif ((a + 1) * 2 != 4) {} else {}"));
    assert_eq!(error_kind(&main_with("if 1 < 2 {}")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("if (1 < 2) ifj.write(1);")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("if (1 < 2) {} else ifj.write(1);")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("if (1 < 2) {} else if (2 < 3) {}")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("if () {}")), ErrorKind::Syntax);
}

#[test]
fn null_binding() {
    analyze_ok(&main_with("const v = ifj.readi32();\nif (v) |n| { ifj.write(n); } else { ifj.write(\"nothing\"); }"));
    analyze_ok(&main_with("var s = ifj.readstr();\nwhile (s) |line| { ifj.write(line); s = ifj.readstr(); }"));
    assert_eq!(error_kind(&main_with("const v = ifj.readi32();\nif (v) |n { ifj.write(n); }")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("const v = ifj.readi32();\nif (v) || { ifj.write(v); }")), ErrorKind::Syntax);
}

#[test]
fn while_loops() {
    analyze_ok(&main_with("var i = 0;\nwhile (i < 3) { i = i + 1; }"));
    analyze_ok(&main_with("var i = 0;\nwhile (i < 3) { i = i + 1; if (i == 2) { break; } else { continue; } }"));
    assert_eq!(error_kind(&main_with("while (1 < 2) { } else { }")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("while (1 < 2);")), ErrorKind::Syntax);
}

#[test]
fn nested_loops_and_jumps() {
    analyze_ok(&main_with(
        "var i = 0;\n\
         while (i < 3) {\n\
             var j = 0;\n\
             while (j < 3) { j = j + 1; if (j == i) { continue; } else {} }\n\
             i = i + 1;\n\
             if (i > 1) { break; } else {}\n\
         }",
    ));
}

#[test]
fn loop_jumps_outside_loops() {
    assert_eq!(error_kind(&main_with("break;")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("continue;")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("if (1 < 2) { break; } else {}")), ErrorKind::Syntax);
    assert_eq!(error_kind(&main_with("var i = 0;\nwhile (i < 1) { i = 1; break }")), ErrorKind::Syntax);
}

#[test]
fn returns() {
    analyze_ok(&program("pub fn main() void {}\npub fn one() i32 { return 1; }"));
    analyze_ok(&program("pub fn main() void {}\npub fn id(x: f64) f64 { return x; }"));
    analyze_ok(&program("pub fn main() void {}\npub fn twice(x: i32) i32 { return x * 2; }"));
    analyze_ok(&program("pub fn main() void {}\npub fn read() ?i32 { return ifj.readi32(); }"));
    analyze_ok(&program("pub fn main() void {}\npub fn wrap(x: i32) ?i32 { return x; }"));
    assert_eq!(error_kind(&program("pub fn main() void {}\npub fn one() i32 { return 1 }")), ErrorKind::Syntax);
}

#[test]
fn return_on_every_path() {
    analyze_ok(&program(
        "pub fn main() void {}\n\
         pub fn sign(x: i32) i32 { if (x < 0) { return 0 - 1; } else { if (x == 0) { return 0; } else { return 1; } } }",
    ));
    analyze_ok(&program("pub fn main() void {}\npub fn early(x: i32) i32 { if (x < 0) { return 0; } else {} return x; }"));
    let missing = analyze_err(&program("pub fn main() void {}\npub fn f(x: i32) i32 { while (x < 0) { return 1; } }"));
    assert_eq!(missing.kind(), ErrorKind::FunctionSignature);
    assert_eq!(missing.line(), 3);
}

#[test]
fn statements_after_return_are_parsed() {
    assert_eq!(error_kind(&main_with("return;\nconst = 1;")), ErrorKind::Syntax);
}

#[test]
fn block_scoping() {
    analyze_ok(&main_with(
        "const x: i32 = 1;\n\
         if (x < 2) { const y: i32 = x; ifj.write(y); } else { const y: f64 = 1.5; ifj.write(y); }",
    ));
    assert_eq!(
        error_kind(&main_with("const x = 1;\nif (x < 2) { const y = 2; ifj.write(y); } else {}\nifj.write(y);")),
        ErrorKind::Undefined
    );
}

#[test]
fn unclosed_function_body() {
    assert_eq!(error_kind(&program("pub fn main() void { ifj.write(1);")), ErrorKind::Syntax);
}

#[test]
fn top_level_statements_rejected() {
    assert_eq!(error_kind(&program("const x = 1;\npub fn main() void {}")), ErrorKind::Syntax);
}

#[test]
fn unexpected_statement_start() {
    for stmt in ["1 + 2;", "(x);", "{ }", "else {}", "null;", "i32 x = 1;"] {
        assert_eq!(error_kind(&main_with(stmt)), ErrorKind::Syntax, "{stmt}");
    }
}
