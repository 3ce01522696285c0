//! Recursive-descent parsing in two passes over one [`TokenBuffer`].
//!
//! [`collect_signatures`] only reads the prolog and function headers; after it
//! rewinds the buffer, [`parse_program`] parses every body and drives the
//! precedence engine, the type rules and a [`CodeSink`](crate::codegen::CodeSink).

pub mod body;
pub mod prepass;

use serde::Serialize;

use crate::diagnostics::CompileError;
use crate::lexer::{Literal, Token, TokenBuffer, TokenKind};
use crate::symtable::Variable;
use crate::typeck::types::DataType;
pub use body::parse_program;
pub use prepass::{collect_signatures, skip_body};

/// Required argument of `@import` in the prolog.
pub const IMPORT_PATH: &str = "ifj24.zig";

/// A block-scoped variable after its scope closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalVariable {
    pub function: String,
    pub name: String,
    #[serde(flatten)]
    pub variable: Variable,
}

/// `pub fn NAME ( PARAMS ) TYPE` as read by both passes.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub name: Token,
    pub params: Vec<(Token, DataType)>,
    pub return_type: DataType,
}

pub(crate) fn expect(buffer: &mut TokenBuffer, kind: TokenKind, what: &str) -> Result<Token, CompileError> {
    let token = buffer.peek();
    if token.kind == kind {
        Ok(buffer.advance().clone())
    } else {
        Err(CompileError::syntax(format!("expected {what}, found {token}"), token.span))
    }
}

pub(crate) fn expect_ident(buffer: &mut TokenBuffer) -> Result<Token, CompileError> {
    expect(buffer, TokenKind::Ident, "identifier")
}

pub(crate) fn eat(buffer: &mut TokenBuffer, kind: TokenKind) -> bool {
    if buffer.peek().is(kind) {
        buffer.advance();
        true
    } else {
        false
    }
}

/// A type spelling; `void` only where a return type is expected.
pub(crate) fn parse_type(buffer: &mut TokenBuffer, allow_void: bool) -> Result<DataType, CompileError> {
    let token = buffer.peek();
    match DataType::from_token(token.kind) {
        Some(DataType::Void) if !allow_void => {
            Err(CompileError::syntax("'void' is only allowed as a return type", token.span))
        }
        Some(ty) => {
            buffer.advance();
            Ok(ty)
        }
        None => Err(CompileError::syntax(format!("expected type, found {token}"), token.span)),
    }
}

/// `const ifj = @import("ifj24.zig");`
pub(crate) fn parse_prolog(buffer: &mut TokenBuffer) -> Result<(), CompileError> {
    expect(buffer, TokenKind::Const, "prolog 'const ifj = @import(\"ifj24.zig\");'")?;
    expect(buffer, TokenKind::Ifj, "'ifj'")?;
    expect(buffer, TokenKind::Eq, "'='")?;
    expect(buffer, TokenKind::AtImport, "'@import'")?;
    expect(buffer, TokenKind::LParen, "'('")?;
    let path = expect(buffer, TokenKind::StringLit, "import path")?;
    if path.value != Some(Literal::Str(IMPORT_PATH.as_bytes().to_vec())) {
        return Err(CompileError::syntax(
            format!("the prolog must import \"{IMPORT_PATH}\", found {path}"),
            path.span,
        ));
    }
    expect(buffer, TokenKind::RParen, "')'")?;
    expect(buffer, TokenKind::Semicolon, "';'")?;
    Ok(())
}

pub(crate) fn parse_header(buffer: &mut TokenBuffer) -> Result<Header, CompileError> {
    expect(buffer, TokenKind::Pub, "'pub fn'")?;
    expect(buffer, TokenKind::Fn, "'fn'")?;
    let name = expect_ident(buffer)?;
    expect(buffer, TokenKind::LParen, "'('")?;
    let mut params = Vec::new();
    while !buffer.peek().is(TokenKind::RParen) {
        let param = expect_ident(buffer)?;
        expect(buffer, TokenKind::Colon, "':'")?;
        let ty = parse_type(buffer, false)?;
        params.push((param, ty));
        if !eat(buffer, TokenKind::Comma) {
            break;
        }
    }
    expect(buffer, TokenKind::RParen, "')'")?;
    let return_type = parse_type(buffer, true)?;
    Ok(Header { name, params, return_type })
}
