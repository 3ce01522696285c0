//! Scoped symbol storage shared by both parser passes.
//!
//! Scopes form a stack; the scope below another is its parent. Only the top
//! scope is written to, lookups walk from the top down to the global scope.

pub mod hashtable;
pub mod symbol;

use crate::builtins;
use crate::diagnostics::CompileError;
use crate::span::Span;
use hashtable::{InsertError, SymbolMap};
pub use symbol::{Declaration, Function, Param, Symbol, SymbolKind, Variable};

/// Default per-scope capacity (prime).
pub const DEFAULT_SCOPE_CAPACITY: usize = 127;

#[derive(Debug, Clone)]
pub struct Scope {
    id: u32,
    loop_body: bool,
    symbols: SymbolMap,
}

impl Scope {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_loop_body(&self) -> bool {
        self.loop_body
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.symbols.iter().filter_map(|s| s.as_variable().map(|v| (s.name.as_str(), v)))
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    capacity: usize,
    next_var_id: u32,
    next_scope_id: u32,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new(DEFAULT_SCOPE_CAPACITY)
    }
}

impl SymbolTable {
    /// Creates a table with no open scope; every scope gets `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self { scopes: Vec::new(), capacity, next_var_id: 0, next_scope_id: 0 }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Pushes a new empty scope and returns its id.
    pub fn open_scope(&mut self, is_loop_body: bool) -> u32 {
        let id = self.next_scope_id;
        self.next_scope_id += 1;
        self.scopes.push(Scope { id, loop_body: is_loop_body, symbols: SymbolMap::with_capacity(self.capacity) });
        tracing::trace!(scope = id, depth = self.scopes.len(), loop_body = is_loop_body, "open scope");
        id
    }

    /// Pops the top scope. With `check_unused`, fails if a variable of that scope
    /// was never read, or is a `var` that was never reassigned. The scope is
    /// released either way.
    pub fn close_scope(&mut self, check_unused: bool) -> Result<Scope, CompileError> {
        let scope = self
            .scopes
            .pop()
            .ok_or_else(|| CompileError::internal("close_scope on a symbol table with no open scope"))?;
        tracing::trace!(scope = scope.id, depth = self.scopes.len(), "close scope");
        if check_unused {
            let offender = scope
                .variables()
                .filter(|(_, v)| !v.is_param && (!v.used || !v.modified))
                .min_by_key(|(_, v)| v.span.start);
            if let Some((name, var)) = offender {
                let msg = if !var.used {
                    format!("variable '{name}' is never used")
                } else {
                    format!("variable '{name}' is never modified, declare it with 'const'")
                };
                return Err(CompileError::unused(msg, var.span));
            }
        }
        Ok(scope)
    }

    /// Inserts into the top scope only. Variables receive a fresh id and start
    /// unused; constants count as modified by their initialiser.
    pub fn declare(&mut self, name: &str, decl: Declaration, span: Span) -> Result<&mut Symbol, CompileError> {
        let capacity = self.capacity;
        let kind = match decl {
            Declaration::Variable { ty, is_const, is_param } => {
                let id = self.next_var_id;
                SymbolKind::Variable(Variable {
                    ty,
                    is_const,
                    is_param,
                    used: false,
                    modified: is_const || is_param,
                    id,
                    span,
                })
            }
            Declaration::Function(f) => SymbolKind::Function(f),
        };
        let is_var = matches!(kind, SymbolKind::Variable(_));
        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| CompileError::internal_at(format!("cannot declare '{name}': no open scope"), span))?;
        match scope.symbols.insert(Symbol { name: name.to_string(), kind }) {
            Ok(sym) => {
                if is_var {
                    self.next_var_id += 1;
                }
                Ok(sym)
            }
            Err(InsertError::Duplicate) => {
                Err(CompileError::redefinition(format!("'{name}' is already defined in this scope"), span))
            }
            Err(InsertError::Full) => Err(CompileError::internal_at(
                format!("scope is full ({capacity} symbols), cannot declare '{name}'"),
                span,
            )),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.symbols.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.scopes.iter_mut().rev().find_map(|scope| scope.symbols.get_mut(name))
    }

    /// Id of the nearest enclosing loop-body scope.
    pub fn innermost_loop_id(&self) -> Option<u32> {
        self.scopes.iter().rev().find(|s| s.loop_body).map(|s| s.id)
    }

    /// The bottom (global) scope, if any scope is open.
    pub fn global(&self) -> Option<&Scope> {
        self.scopes.first()
    }

    /// Adds every `ifj.*` built-in to the top scope.
    pub fn register_builtins(&mut self) -> Result<(), CompileError> {
        for builtin in builtins::ALL {
            self.declare(builtin.name(), Declaration::Function(Function::builtin(builtin)), Span::dummy())?;
        }
        Ok(())
    }
}
