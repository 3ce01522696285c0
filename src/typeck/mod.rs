//! Semantic checks over expression trees and the type rules shared with the
//! statement parser.

pub mod types;

use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenKind};
use crate::precedence::{ExprTree, NodeId};
use crate::span::Span;
use crate::symtable::{SymbolKind, SymbolTable};
use types::{DataType, ExprType};

/// Types every node of `tree` bottom-up, marks referenced variables as used and
/// flags i32 operands that must be widened to f64. Returns the root type.
pub fn check_expression(tree: &mut ExprTree, table: &mut SymbolTable) -> Result<ExprType, CompileError> {
    for id in tree.postorder() {
        let ty = if tree.node(id).is_leaf() {
            operand_type(&tree.node(id).token, table)?
        } else {
            binary_type(tree, id)?
        };
        tree.node_mut(id).ty = Some(ty);
    }
    tree.root_type()
        .ok_or_else(|| CompileError::internal("expression root left untyped"))
}

/// Type of a single term: identifier, literal or `null`. Identifiers are
/// marked used.
pub fn operand_type(token: &Token, table: &mut SymbolTable) -> Result<ExprType, CompileError> {
    match token.kind {
        TokenKind::IntLit => Ok(ExprType::Value(DataType::Int)),
        TokenKind::FloatLit => Ok(ExprType::Value(DataType::Float)),
        TokenKind::StringLit => Ok(ExprType::StrLiteral),
        TokenKind::Null => Ok(ExprType::Null),
        TokenKind::Ident => {
            let symbol = table
                .lookup_mut(&token.lexeme)
                .ok_or_else(|| CompileError::undefined(format!("undefined variable '{}'", token.lexeme), token.span))?;
            match &mut symbol.kind {
                SymbolKind::Variable(var) => {
                    var.used = true;
                    Ok(ExprType::Value(var.ty))
                }
                SymbolKind::Function(_) => Err(CompileError::type_err(
                    format!("function '{}' cannot be used as a value", token.lexeme),
                    token.span,
                )),
            }
        }
        _ => Err(CompileError::internal_at(format!("{token} is not an operand"), token.span)),
    }
}

fn binary_type(tree: &mut ExprTree, id: NodeId) -> Result<ExprType, CompileError> {
    let node = tree.node(id);
    let (Some(left), Some(right)) = (node.left, node.right) else {
        return Err(CompileError::internal("operator node with a missing operand"));
    };
    let op = node.token.kind;
    let span = node.token.span;
    let lexeme = node.token.lexeme.clone();
    let lt = tree.node(left).ty.ok_or_else(|| CompileError::internal("operand typed after its operator"))?;
    let rt = tree.node(right).ty.ok_or_else(|| CompileError::internal("operand typed after its operator"))?;

    if let Some(result) = numeric_result(lt, rt) {
        if result == DataType::Float {
            tree.node_mut(left).widen = lt.is(DataType::Int);
            tree.node_mut(right).widen = rt.is(DataType::Int);
        }
        return Ok(if op.is_relational() { ExprType::Bool } else { ExprType::Value(result) });
    }

    let nullable_equality = matches!(op, TokenKind::EqEq | TokenKind::BangEq) && comparable_with_null(lt, rt);
    if nullable_equality {
        return Ok(ExprType::Bool);
    }
    Err(CompileError::type_err(
        format!("operator '{lexeme}' cannot be applied to {lt} and {rt}"),
        span,
    ))
}

/// Result type of an arithmetic operation or numeric comparison, widening a
/// mixed i32/f64 pair to f64.
fn numeric_result(lt: ExprType, rt: ExprType) -> Option<DataType> {
    match (lt.numeric()?, rt.numeric()?) {
        (DataType::Int, DataType::Int) => Some(DataType::Int),
        _ => Some(DataType::Float),
    }
}

/// `==` / `!=` operands that are not both plain numbers: `null` against a
/// nullable value, or a nullable value against its base or itself.
fn comparable_with_null(lt: ExprType, rt: ExprType) -> bool {
    match (lt, rt) {
        (ExprType::Null, ExprType::Null) => true,
        (ExprType::Null, ExprType::Value(ty)) | (ExprType::Value(ty), ExprType::Null) => ty.is_nullable(),
        (ExprType::Value(a), ExprType::Value(b)) => {
            (a.is_nullable() || b.is_nullable()) && a.base() == b.base() && a.base() != DataType::Void
        }
        _ => false,
    }
}

/// Stores of a value into a slot declared `target` (initialisers, assignments,
/// returns, arguments).
pub fn check_assignable(value: ExprType, target: DataType, span: Span) -> Result<(), CompileError> {
    if value.assignable_to(target) {
        Ok(())
    } else {
        Err(CompileError::type_err(format!("expected {target}, found {value}"), span))
    }
}

/// Declared type of a `const`/`var` without an explicit annotation.
pub fn infer_declared(value: ExprType, span: Span) -> Result<DataType, CompileError> {
    match value {
        ExprType::Value(DataType::Void) => {
            Err(CompileError::signature("a void function result cannot initialise a variable", span))
        }
        ExprType::Value(ty) => Ok(ty),
        ExprType::Null => Err(CompileError::undetermined("cannot infer a type from 'null'", span)),
        ExprType::Bool => Err(CompileError::type_err("a comparison result cannot be stored in a variable", span)),
        ExprType::StrLiteral => Err(CompileError::type_err(
            "a string literal cannot be stored in a variable, use ifj.string",
            span,
        )),
    }
}

/// `if` / `while` condition. Without a binding the condition must be a
/// comparison; with `|id|` it must be nullable and the base type is returned
/// for the bound constant.
pub fn check_condition(value: ExprType, binding: bool, span: Span) -> Result<Option<DataType>, CompileError> {
    match (binding, value) {
        (false, ExprType::Bool) => Ok(None),
        (false, other) => Err(CompileError::type_err(format!("condition must be a comparison, found {other}"), span)),
        (true, ExprType::Value(ty)) if ty.is_nullable() => Ok(Some(ty.base())),
        (true, other) => Err(CompileError::type_err(
            format!("a null-binding condition must be nullable, found {other}"),
            span,
        )),
    }
}
