#![allow(dead_code)]

use std::process::Command;

use ifjc::config::Options;
use ifjc::diagnostics::{CompileError, ErrorKind};
use ifjc::Analysis;

pub const PROLOG: &str = "const ifj = @import(\"ifj24.zig\");\n";

pub fn ifjc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ifjc"))
}

/// Prepends the prolog.
pub fn program(body: &str) -> String {
    format!("{PROLOG}{body}")
}

/// Wraps statements in `pub fn main() void { ... }`.
pub fn main_with(statements: &str) -> String {
    program(&format!("pub fn main() void {{\n{statements}\n}}\n"))
}

pub fn analyze_ok(source: &str) -> Analysis {
    match ifjc::analyze(source, &Options::default()) {
        Ok(analysis) => analysis,
        Err(err) => panic!("analysis failed: {err}\n--- source ---\n{source}"),
    }
}

pub fn analyze_err(source: &str) -> CompileError {
    match ifjc::analyze(source, &Options::default()) {
        Ok(_) => panic!("analysis should fail\n--- source ---\n{source}"),
        Err(err) => err,
    }
}

pub fn error_kind(source: &str) -> ErrorKind {
    analyze_err(source).kind()
}

pub fn compile_ok(source: &str) -> String {
    match ifjc::compile(source, &Options::default()) {
        Ok(code) => code,
        Err(err) => panic!("compilation failed: {err}\n--- source ---\n{source}"),
    }
}

/// Options with the unused-variable check disabled.
pub fn lenient() -> Options {
    Options { check_unused: false, ..Options::default() }
}

/// Writes `source` into `dir` as `prog.ifj24` and returns its path.
pub fn write_source(dir: &tempfile::TempDir, source: &str) -> std::path::PathBuf {
    let path = dir.path().join("prog.ifj24");
    std::fs::write(&path, source).unwrap();
    path
}
