//! Code generation seam. The full parser reports every recognised construct to
//! a [`CodeSink`]; [`IfjCodeGen`] lowers them to IFJcode24 text and
//! [`NullSink`] discards them for analysis-only runs.

pub mod lower;
pub mod runtime;

use serde::Serialize;

use crate::builtins::Builtin;
use crate::diagnostics::CompileError;
use crate::precedence::ExprTree;
use crate::symtable::SymbolTable;
use crate::typeck::types::DataType;
pub use lower::IfjCodeGen;

/// A declared variable as seen by the generator: source name plus the unique
/// symbol id, so shadowed names never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarRef {
    pub name: String,
    pub id: u32,
}

impl VarRef {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self { name: name.into(), id }
    }
}

/// A call argument: a variable or a literal term.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Var(VarRef),
    Int(i64),
    Float(f64),
    Str(Vec<u8>),
    Nil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee<'a> {
    User(&'a str),
    Builtin(Builtin),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopJump {
    Break,
    Continue,
}

/// Entry points consumed once per syntactic construct, in source order.
///
/// Values travel on the target's data stack: `expression` and non-void `call`
/// push one value, `store` and `return_value(true)` pop it.
pub trait CodeSink {
    fn function_prologue(&mut self, name: &str, params: &[VarRef]);
    fn function_epilogue(&mut self, name: &str, return_type: DataType);
    fn declare_variable(&mut self, var: &VarRef);
    /// Identifiers in `tree` are resolved against `table` at call time.
    fn expression(&mut self, tree: &ExprTree, table: &SymbolTable) -> Result<(), CompileError>;
    /// Pops the top value into `target`, or drops it for `_ =`.
    fn store(&mut self, target: Option<&VarRef>);
    fn call(&mut self, callee: Callee<'_>, args: &[Operand]);
    /// Consumes the condition value. With a binding the value is nullable and
    /// copied into `binding` when it is not null.
    fn if_begin(&mut self, id: u32, binding: Option<&VarRef>);
    fn if_else(&mut self, id: u32);
    fn if_end(&mut self, id: u32);
    /// Marks the loop head; the condition is emitted after this.
    fn while_begin(&mut self, id: u32);
    fn while_condition(&mut self, id: u32, binding: Option<&VarRef>);
    fn while_end(&mut self, id: u32);
    fn return_value(&mut self, has_value: bool);
    fn jump_loop(&mut self, id: u32, jump: LoopJump);
}

/// Sink for analysis-only runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CodeSink for NullSink {
    fn function_prologue(&mut self, _name: &str, _params: &[VarRef]) {}
    fn function_epilogue(&mut self, _name: &str, _return_type: DataType) {}
    fn declare_variable(&mut self, _var: &VarRef) {}
    fn expression(&mut self, _tree: &ExprTree, _table: &SymbolTable) -> Result<(), CompileError> {
        Ok(())
    }
    fn store(&mut self, _target: Option<&VarRef>) {}
    fn call(&mut self, _callee: Callee<'_>, _args: &[Operand]) {}
    fn if_begin(&mut self, _id: u32, _binding: Option<&VarRef>) {}
    fn if_else(&mut self, _id: u32) {}
    fn if_end(&mut self, _id: u32) {}
    fn while_begin(&mut self, _id: u32) {}
    fn while_condition(&mut self, _id: u32, _binding: Option<&VarRef>) {}
    fn while_end(&mut self, _id: u32) {}
    fn return_value(&mut self, _has_value: bool) {}
    fn jump_loop(&mut self, _id: u32, _jump: LoopJump) {}
}
