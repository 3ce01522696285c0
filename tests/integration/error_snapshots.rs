//! Snapshot tests for error message formatting.
//!
//! Uses insta inline snapshots to detect regressions in wording and line
//! numbers. Run `cargo insta review` to review changes.

mod common;

use common::*;
use insta::assert_snapshot;
use std::path::Path;

fn message(source: &str) -> String {
    analyze_err(source).to_string()
}

#[test]
fn lexical_error() {
    assert_snapshot!(message(&main_with("const x = 1 # 2;")), @"Lexical error on line 3: unexpected character '#'");
}

#[test]
fn missing_semicolon() {
    assert_snapshot!(
        message(&main_with("const x = 1\nifj.write(x);")),
        @"Syntax error on line 4: unexpected 'ifj' in expression"
    );
}

#[test]
fn bad_prolog() {
    assert_snapshot!(
        message("const ifj = @import(\"std.zig\");\npub fn main() void {}"),
        @r#"Syntax error on line 1: the prolog must import "ifj24.zig", found "std.zig""#
    );
}

#[test]
fn chained_comparison() {
    assert_snapshot!(
        message(&main_with("if ((1 < 2) == (3 < 4)) {} else {}")),
        @"Syntax error on line 3: an expression may contain at most one relational operator"
    );
}

#[test]
fn break_outside_loop() {
    assert_snapshot!(message(&main_with("break;")), @"Syntax error on line 3: 'break' outside of a loop");
}

#[test]
fn undefined_variable() {
    assert_snapshot!(message(&main_with("ifj.write(y);")), @"Undefined error on line 3: undefined variable 'y'");
}

#[test]
fn missing_main() {
    assert_snapshot!(
        message(&program("pub fn start() void {}")),
        @"Undefined error on line 2: program has no 'main' function"
    );
}

#[test]
fn argument_count_mismatch() {
    assert_snapshot!(
        message(&main_with("const s = ifj.substr(1, 2);\nifj.write(s);")),
        @"Function signature error on line 3: 'ifj.substr' takes 3 argument(s), 2 given"
    );
}

#[test]
fn argument_type_mismatch() {
    assert_snapshot!(
        message(&main_with("const f = ifj.i2f(1.5);\nifj.write(f);")),
        @"Function signature error on line 3: argument 'term' of 'ifj.i2f' expects i32, found f64"
    );
}

#[test]
fn missing_return_path() {
    assert_snapshot!(
        message(&program("pub fn main() void {}\npub fn f(a: i32) i32 {\nif (a < 0) { return 0; } else {}\n}")),
        @"Function signature error on line 5: function 'f' can reach its end without returning a i32"
    );
}

#[test]
fn assignment_to_constant() {
    assert_snapshot!(
        message(&main_with("const x = 1;\nx = 2;\nifj.write(x);")),
        @"Redefinition error on line 4: cannot assign to constant 'x'"
    );
}

#[test]
fn invalid_operands() {
    assert_snapshot!(
        message(&main_with("const s = ifj.string(\"a\");\nconst t = s + 1;\nifj.write(t);")),
        @"Type error on line 4: operator '+' cannot be applied to []u8 and i32"
    );
}

#[test]
fn null_initialiser() {
    assert_snapshot!(
        message(&main_with("const x = null;\nifj.write(x);")),
        @"Type inference error on line 3: cannot infer a type from 'null'"
    );
}

#[test]
fn var_never_modified() {
    assert_snapshot!(
        message(&main_with("var x = 1;\nifj.write(x);")),
        @"Unused variable error on line 3: variable 'x' is never modified, declare it with 'const'"
    );
}

#[test]
fn config_error() {
    let err = ifjc::config::Options::from_toml("scope_capacity = 100", Path::new("ifjc.toml")).unwrap_err();
    assert_snapshot!(err.to_string(), @"Config error: scope_capacity must be a prime of at least 5, got 100");
}
