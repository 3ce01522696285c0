pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod symtable;
pub mod builtins;
pub mod parser;
pub mod precedence;
pub mod typeck;
pub mod codegen;
pub mod config;

use serde::Serialize;

use codegen::{CodeSink, IfjCodeGen, NullSink};
use config::Options;
use diagnostics::CompileError;
use parser::LocalVariable;
use symtable::{Function, Symbol, SymbolTable};

/// Result of analysing a program without generating code.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Global scope after both passes (user functions and built-ins), by name.
    pub functions: Vec<Symbol>,
    /// Variables of every closed block scope, by id.
    pub locals: Vec<LocalVariable>,
}

impl Analysis {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|s| s.name == name).and_then(|s| s.as_function())
    }

    pub fn locals_of<'a>(&'a self, function: &'a str) -> impl Iterator<Item = &'a LocalVariable> + 'a {
        self.locals.iter().filter(move |l| l.function == function)
    }
}

/// Lex, collect signatures, then run the full parser into `sink`.
fn run_pipeline(
    source: &str,
    options: &Options,
    sink: &mut impl CodeSink,
) -> Result<(SymbolTable, Vec<LocalVariable>), CompileError> {
    options.validate(std::path::Path::new("<options>"))?;
    let mut buffer = lexer::lex(source)?;
    let mut table = SymbolTable::new(options.scope_capacity);
    parser::collect_signatures(&mut buffer, &mut table)?;
    let locals = parser::parse_program(&mut buffer, &mut table, sink, options)?;
    Ok((table, locals))
}

/// Check a program (lex → signatures → full parse) without emitting code.
pub fn analyze(source: &str, options: &Options) -> Result<Analysis, CompileError> {
    let (table, locals) = run_pipeline(source, options, &mut NullSink)?;
    let mut functions: Vec<Symbol> = table
        .global()
        .map(|scope| scope.symbols().cloned().collect())
        .unwrap_or_default();
    functions.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Analysis { functions, locals })
}

/// Compile a program to IFJcode24 text.
pub fn compile(source: &str, options: &Options) -> Result<String, CompileError> {
    let mut generator = IfjCodeGen::new();
    run_pipeline(source, options, &mut generator)?;
    Ok(generator.finish())
}
