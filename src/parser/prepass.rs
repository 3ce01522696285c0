use crate::diagnostics::CompileError;
use crate::lexer::{TokenBuffer, TokenKind};
use crate::symtable::{Declaration, Function, Param, SymbolTable};
use crate::typeck::types::DataType;

use super::{expect, parse_header, parse_prolog};

/// First pass: registers every function header in the global scope, checks
/// `main`, adds the built-ins and rewinds the buffer.
///
/// Opens the global scope if the table has none.
pub fn collect_signatures(buffer: &mut TokenBuffer, table: &mut SymbolTable) -> Result<(), CompileError> {
    buffer.rewind_to_start();
    if table.depth() == 0 {
        table.open_scope(false);
    }
    parse_prolog(buffer)?;
    let mut count = 0usize;
    while !buffer.peek().is(TokenKind::Eof) {
        let header = parse_header(buffer)?;
        let params = header
            .params
            .iter()
            .map(|(tok, ty)| Param { name: tok.lexeme.clone(), ty: *ty })
            .collect();
        let function = Function::new(params, header.return_type, header.name.span);
        table.declare(&header.name.lexeme, Declaration::Function(function), header.name.span)?;
        tracing::trace!(function = %header.name.lexeme, "signature");
        skip_body(buffer)?;
        count += 1;
    }
    check_main(buffer, table)?;
    table.register_builtins()?;
    tracing::debug!(functions = count, "signature pass done");
    buffer.rewind_to_start();
    Ok(())
}

fn check_main(buffer: &TokenBuffer, table: &SymbolTable) -> Result<(), CompileError> {
    let eof = buffer.peek().span;
    let main = table
        .lookup("main")
        .and_then(|s| s.as_function())
        .ok_or_else(|| CompileError::undefined("program has no 'main' function", eof))?;
    if !main.params().is_empty() || main.return_type() != DataType::Void {
        return Err(CompileError::signature("'main' must take no parameters and return void", main.span));
    }
    Ok(())
}

/// Skips `{ ... }` by brace counting, leaving the cursor just after the
/// matching `}`. The body's contents are not validated.
pub fn skip_body(buffer: &mut TokenBuffer) -> Result<(), CompileError> {
    expect(buffer, TokenKind::LBrace, "'{'")?;
    let mut depth = 1usize;
    while depth > 0 {
        let token = buffer.advance();
        match token.kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth -= 1,
            TokenKind::Eof => {
                return Err(CompileError::syntax("unexpected end of file in function body", token.span));
            }
            _ => {}
        }
    }
    Ok(())
}
