use serde::Serialize;

use crate::builtins::Builtin;
use crate::span::Span;
use crate::typeck::types::DataType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub ty: DataType,
    pub is_const: bool,
    pub is_param: bool,
    pub used: bool,
    pub modified: bool,
    /// Unique per symbol table, assigned once at insertion.
    pub id: u32,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: DataType,
}

/// Signature of a user or built-in function. The parameter list is fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    return_type: DataType,
    params: Vec<Param>,
    builtin: Option<Builtin>,
    pub span: Span,
}

impl Function {
    pub fn new(params: Vec<Param>, return_type: DataType, span: Span) -> Self {
        Self { return_type, params, builtin: None, span }
    }

    pub fn builtin(builtin: Builtin) -> Self {
        let params = builtin
            .params()
            .iter()
            .map(|(name, ty)| Param { name: (*name).to_string(), ty: *ty })
            .collect();
        Self { return_type: builtin.return_type(), params, builtin: Some(builtin), span: Span::dummy() }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn return_type(&self) -> DataType {
        self.return_type
    }

    pub fn as_builtin(&self) -> Option<Builtin> {
        self.builtin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SymbolKind {
    Variable(Variable),
    Function(Function),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.kind {
            SymbolKind::Variable(v) => Some(v),
            SymbolKind::Function(_) => None,
        }
    }

    pub fn as_variable_mut(&mut self) -> Option<&mut Variable> {
        match &mut self.kind {
            SymbolKind::Variable(v) => Some(v),
            SymbolKind::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match &self.kind {
            SymbolKind::Function(f) => Some(f),
            SymbolKind::Variable(_) => None,
        }
    }
}

/// What a caller hands to `SymbolTable::declare`; the table fills in the id.
#[derive(Debug, Clone)]
pub enum Declaration {
    Variable { ty: DataType, is_const: bool, is_param: bool },
    Function(Function),
}
