//! Signature pre-pass: prolog, function headers, `main` and the built-ins.

mod common;

use common::*;
use ifjc::builtins::{self, Builtin};
use ifjc::diagnostics::{CompileError, ErrorKind};
use ifjc::lexer::lex;
use ifjc::parser::collect_signatures;
use ifjc::symtable::SymbolTable;
use ifjc::typeck::types::DataType;

fn signatures(source: &str) -> Result<SymbolTable, CompileError> {
    let mut buffer = lex(source)?;
    let mut table = SymbolTable::default();
    collect_signatures(&mut buffer, &mut table)?;
    Ok(table)
}

#[test]
fn headers_are_recorded_in_order_of_appearance() {
    let table = signatures(&program(
        "pub fn main() void {}\n\
         pub fn area(w: f64, h: f64) f64 { return w * h; }\n\
         pub fn name(id: i32, fallback: ?[]u8) ?[]u8 { return fallback; }\n",
    ))
    .unwrap();

    let area = table.lookup("area").and_then(|s| s.as_function()).unwrap();
    let names: Vec<_> = area.params().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["w", "h"]);
    assert_eq!(area.return_type(), DataType::Float);

    let name = table.lookup("name").and_then(|s| s.as_function()).unwrap();
    let types: Vec<_> = name.params().iter().map(|p| p.ty).collect();
    assert_eq!(types, vec![DataType::Int, DataType::NullableStr]);
    assert_eq!(name.return_type(), DataType::NullableStr);
    assert_eq!(name.span.line, 4);
}

#[test]
fn table_keeps_global_scope_open() {
    let table = signatures(&program("pub fn main() void {}")).unwrap();
    assert_eq!(table.depth(), 1);
}

#[test]
fn every_builtin_is_registered() {
    let table = signatures(&program("pub fn main() void {}")).unwrap();
    for builtin in builtins::ALL {
        let function = table
            .lookup(builtin.name())
            .and_then(|s| s.as_function())
            .unwrap_or_else(|| panic!("{} missing", builtin.name()));
        assert_eq!(function.as_builtin(), Some(builtin));
        assert_eq!(function.params().len(), builtin.params().len());
    }
}

#[test]
fn builtin_signatures() {
    assert_eq!(Builtin::ReadStr.return_type(), DataType::NullableStr);
    assert_eq!(Builtin::ReadI32.return_type(), DataType::NullableInt);
    assert_eq!(Builtin::ReadF64.return_type(), DataType::NullableFloat);
    assert_eq!(Builtin::Write.return_type(), DataType::Void);
    assert_eq!(Builtin::Substr.params().len(), 3);
    assert_eq!(Builtin::Substr.return_type(), DataType::NullableStr);
    assert_eq!(Builtin::Strcmp.return_type(), DataType::Int);
    assert_eq!(Builtin::Ord.return_type(), DataType::Int);
    assert_eq!(Builtin::Chr.return_type(), DataType::Str);
    assert!(Builtin::Write.accepts_string_literal());
    assert!(Builtin::String.accepts_string_literal());
    assert!(!Builtin::Length.accepts_string_literal());
}

#[test]
fn user_function_may_share_a_builtin_suffix() {
    let table = signatures(&program("pub fn main() void {}\npub fn write(x: i32) void {}")).unwrap();
    assert!(table.lookup("write").is_some());
    assert!(table.lookup("ifj.write").is_some());
}

#[test]
fn bodies_are_skipped_unchecked() {
    let table = signatures(&program("pub fn main() void { 1 2 3 ( } ] ; }")).unwrap();
    assert!(table.lookup("main").is_some());
}

#[test]
fn nested_braces_in_bodies() {
    let source = program(
        "pub fn main() void { if (1 < 2) { while (1 < 2) { } } else { } }\n\
         pub fn after() void {}",
    );
    assert!(signatures(&source).unwrap().lookup("after").is_some());
}

#[test]
fn trailing_comma_in_parameters() {
    let table = signatures(&program("pub fn main() void {}\npub fn f(a: i32,) void {}")).unwrap();
    assert_eq!(table.lookup("f").and_then(|s| s.as_function()).unwrap().params().len(), 1);
}

#[test]
fn prolog_errors() {
    let bad = [
        "pub fn main() void {}",
        "const ifj = @import(\"other.zig\");\npub fn main() void {}",
        "const ifj = @import(\"ifj24.zig\")\npub fn main() void {}",
        "const x = @import(\"ifj24.zig\");\npub fn main() void {}",
        "var ifj = @import(\"ifj24.zig\");\npub fn main() void {}",
    ];
    for source in bad {
        let err = signatures(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax, "{source}");
    }
}

#[test]
fn header_errors() {
    for header in [
        "fn f() void {}",
        "pub f() void {}",
        "pub fn () void {}",
        "pub fn f(a i32) void {}",
        "pub fn f(a: void) void {}",
        "pub fn f(a: i32 b: i32) void {}",
        "pub fn f() {}",
        "pub fn f() void;",
        "pub fn while() void {}",
    ] {
        let source = program(&format!("pub fn main() void {{}}\n{header}"));
        assert_eq!(signatures(&source).unwrap_err().kind(), ErrorKind::Syntax, "{header}");
    }
}

#[test]
fn main_requirements() {
    let missing = signatures(&program("pub fn start() void {}")).unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Undefined);
    assert_eq!(missing.exit_code(), 3);

    let params = signatures(&program("pub fn main(argc: i32) void {}")).unwrap_err();
    assert_eq!(params.kind(), ErrorKind::FunctionSignature);
    assert_eq!(params.exit_code(), 4);

    let returns = signatures(&program("pub fn main() ?i32 { return null; }")).unwrap_err();
    assert_eq!(returns.kind(), ErrorKind::FunctionSignature);
}

#[test]
fn duplicate_functions() {
    let err = signatures(&program("pub fn f() void {}\npub fn main() void {}\npub fn f(a: i32) i32 {}")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Redefinition);
    assert_eq!(err.exit_code(), 5);
    assert_eq!(err.line(), 4);
}

#[test]
fn unterminated_body() {
    let err = signatures(&program("pub fn main() void { if (1 < 2) { }")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn main_may_appear_anywhere() {
    analyze_ok(&program("pub fn first() void {}\npub fn main() void { first(); }\npub fn last() void {}"));
}
