use crate::codegen::{Callee, CodeSink, LoopJump, Operand, VarRef};
use crate::config::Options;
use crate::diagnostics::CompileError;
use crate::lexer::{Literal, Token, TokenBuffer, TokenKind};
use crate::precedence::{parse_expression, Terminator};
use crate::span::Span;
use crate::symtable::{Declaration, SymbolKind, SymbolTable};
use crate::typeck::types::{DataType, ExprType};
use crate::typeck::{check_assignable, check_condition, check_expression, infer_declared, operand_type};

use super::{eat, expect, expect_ident, parse_header, parse_prolog, LocalVariable};

/// Second pass: parses every function body, checks it against the signatures
/// collected by the first pass and reports each construct to `sink`.
///
/// Returns the variables of every closed block scope, ordered by id.
pub fn parse_program(
    buffer: &mut TokenBuffer,
    table: &mut SymbolTable,
    sink: &mut impl CodeSink,
    options: &Options,
) -> Result<Vec<LocalVariable>, CompileError> {
    buffer.rewind_to_start();
    let mut parser = Parser {
        buffer,
        table,
        sink,
        check_unused: options.check_unused,
        function: None,
        locals: Vec::new(),
    };
    parser.program()?;
    let mut locals = parser.locals;
    locals.sort_by_key(|l| l.variable.id);
    tracing::debug!(locals = locals.len(), "full parse done");
    Ok(locals)
}

struct FunctionContext {
    name: String,
    return_type: DataType,
}

struct Parser<'a, S: CodeSink> {
    buffer: &'a mut TokenBuffer,
    table: &'a mut SymbolTable,
    sink: &'a mut S,
    check_unused: bool,
    function: Option<FunctionContext>,
    locals: Vec<LocalVariable>,
}

impl<S: CodeSink> Parser<'_, S> {
    fn peek(&self) -> &Token {
        self.buffer.peek()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.buffer.peek().is(kind)
    }

    fn advance(&mut self) -> Token {
        self.buffer.advance().clone()
    }

    fn program(&mut self) -> Result<(), CompileError> {
        parse_prolog(self.buffer)?;
        while !self.at(TokenKind::Eof) {
            self.function_def()?;
        }
        Ok(())
    }

    fn function_def(&mut self) -> Result<(), CompileError> {
        let header = parse_header(self.buffer)?;
        let name = header.name.lexeme.clone();
        self.table.open_scope(false);
        let mut params = Vec::with_capacity(header.params.len());
        for (token, ty) in &header.params {
            params.push(self.declare(token, *ty, true, true)?);
        }
        self.sink.function_prologue(&name, &params);
        self.function = Some(FunctionContext { name: name.clone(), return_type: header.return_type });

        expect(self.buffer, TokenKind::LBrace, "'{'")?;
        let returns = self.statements()?;
        let close = expect(self.buffer, TokenKind::RBrace, "'}'")?;
        if header.return_type != DataType::Void && !returns {
            return Err(CompileError::signature(
                format!("function '{name}' can reach its end without returning a {}", header.return_type),
                close.span,
            ));
        }
        self.close_scope()?;
        self.sink.function_epilogue(&name, header.return_type);
        self.function = None;
        Ok(())
    }

    /// Declares a variable in the top scope and returns its generator name.
    fn declare(&mut self, name: &Token, ty: DataType, is_const: bool, is_param: bool) -> Result<VarRef, CompileError> {
        let symbol = self
            .table
            .declare(&name.lexeme, Declaration::Variable { ty, is_const, is_param }, name.span)?;
        let id = symbol.as_variable().map(|v| v.id).unwrap_or_default();
        Ok(VarRef::new(name.lexeme.clone(), id))
    }

    fn close_scope(&mut self) -> Result<(), CompileError> {
        let scope = self.table.close_scope(self.check_unused)?;
        let function = self.function.as_ref().map(|f| f.name.clone()).unwrap_or_default();
        self.locals.extend(scope.variables().map(|(name, var)| LocalVariable {
            function: function.clone(),
            name: name.to_string(),
            variable: var.clone(),
        }));
        Ok(())
    }

    /// Statements up to the closing `}`. Returns whether every path through
    /// them ends in `return`.
    fn statements(&mut self) -> Result<bool, CompileError> {
        let mut returns = false;
        while !self.at(TokenKind::RBrace) {
            returns |= self.statement()?;
        }
        Ok(returns)
    }

    /// `{ statements }` in a scope opened by the caller.
    fn block(&mut self) -> Result<bool, CompileError> {
        expect(self.buffer, TokenKind::LBrace, "'{'")?;
        let returns = self.statements()?;
        expect(self.buffer, TokenKind::RBrace, "'}'")?;
        Ok(returns)
    }

    fn statement(&mut self) -> Result<bool, CompileError> {
        match self.peek().kind {
            TokenKind::Const | TokenKind::Var => self.declaration().map(|_| false),
            TokenKind::Ident if self.buffer.peek_nth(1).is(TokenKind::LParen) => self.call_statement().map(|_| false),
            TokenKind::Ident => self.assignment().map(|_| false),
            TokenKind::Ifj => self.call_statement().map(|_| false),
            TokenKind::Underscore => self.discard().map(|_| false),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement().map(|_| false),
            TokenKind::Return => self.return_statement().map(|_| true),
            TokenKind::Break | TokenKind::Continue => self.loop_jump().map(|_| false),
            TokenKind::Eof => {
                let token = self.peek();
                Err(CompileError::syntax("expected '}', found end of file", token.span))
            }
            _ => {
                let token = self.peek();
                Err(CompileError::syntax(format!("expected statement, found {token}"), token.span))
            }
        }
    }

    /// `const|var NAME [: TYPE] = RHS ;`
    fn declaration(&mut self) -> Result<(), CompileError> {
        let keyword = self.advance();
        let is_const = keyword.is(TokenKind::Const);
        let name = expect_ident(self.buffer)?;
        let declared = if eat(self.buffer, TokenKind::Colon) {
            Some(super::parse_type(self.buffer, false)?)
        } else {
            None
        };
        expect(self.buffer, TokenKind::Eq, "'='")?;
        let (value, span) = self.rhs()?;
        let ty = match declared {
            Some(ty) => {
                check_assignable(value, ty, span)?;
                ty
            }
            None => infer_declared(value, span)?,
        };
        expect(self.buffer, TokenKind::Semicolon, "';'")?;
        let var = self.declare(&name, ty, is_const, false)?;
        self.sink.declare_variable(&var);
        self.sink.store(Some(&var));
        Ok(())
    }

    /// `NAME = RHS ;`
    fn assignment(&mut self) -> Result<(), CompileError> {
        let name = self.advance();
        expect(self.buffer, TokenKind::Eq, "'='")?;
        let symbol = self
            .table
            .lookup_mut(&name.lexeme)
            .ok_or_else(|| CompileError::undefined(format!("undefined variable '{}'", name.lexeme), name.span))?;
        let (ty, id) = match &mut symbol.kind {
            SymbolKind::Variable(var) if var.is_const => {
                return Err(CompileError::redefinition(
                    format!("cannot assign to constant '{}'", name.lexeme),
                    name.span,
                ));
            }
            SymbolKind::Variable(var) => {
                var.modified = true;
                (var.ty, var.id)
            }
            SymbolKind::Function(_) => {
                return Err(CompileError::undefined(
                    format!("'{}' is a function, not a variable", name.lexeme),
                    name.span,
                ));
            }
        };
        let (value, span) = self.rhs()?;
        check_assignable(value, ty, span)?;
        expect(self.buffer, TokenKind::Semicolon, "';'")?;
        self.sink.store(Some(&VarRef::new(name.lexeme, id)));
        Ok(())
    }

    /// `_ = RHS ;`
    fn discard(&mut self) -> Result<(), CompileError> {
        self.advance();
        expect(self.buffer, TokenKind::Eq, "'='")?;
        self.rhs()?;
        expect(self.buffer, TokenKind::Semicolon, "';'")?;
        self.sink.store(None);
        Ok(())
    }

    /// `CALL ;` where the callee must return void.
    fn call_statement(&mut self) -> Result<(), CompileError> {
        let (return_type, span) = self.call()?;
        if return_type != DataType::Void {
            return Err(CompileError::signature(
                format!("result of type {return_type} is ignored, discard it with '_ ='"),
                span,
            ));
        }
        expect(self.buffer, TokenKind::Semicolon, "';'")?;
        Ok(())
    }

    /// Value position: a call (`NAME (` or `ifj .`) or an expression ending at `;`.
    fn rhs(&mut self) -> Result<(ExprType, Span), CompileError> {
        let first = self.peek().kind;
        let second = self.buffer.peek_nth(1).kind;
        let is_call = matches!((first, second), (TokenKind::Ident, TokenKind::LParen) | (TokenKind::Ifj, TokenKind::Dot));
        if !is_call {
            return self.expression(Terminator::Semicolon);
        }
        let (return_type, span) = self.call()?;
        if return_type == DataType::Void {
            return Err(CompileError::signature("a void function has no value", span));
        }
        Ok((ExprType::Value(return_type), span))
    }

    fn expression(&mut self, terminator: Terminator) -> Result<(ExprType, Span), CompileError> {
        let mut tree = parse_expression(self.buffer, terminator)?;
        let ty = check_expression(&mut tree, self.table)?;
        self.sink.expression(&tree, self.table)?;
        Ok((ty, tree.span()))
    }

    /// `[ifj .] NAME ( TERM, ... )`; returns the callee's return type.
    fn call(&mut self) -> Result<(DataType, Span), CompileError> {
        let (name, start) = if self.at(TokenKind::Ifj) {
            let ns = self.advance();
            expect(self.buffer, TokenKind::Dot, "'.'")?;
            let member = expect_ident(self.buffer)?;
            (format!("ifj.{}", member.lexeme), ns.span.to(member.span))
        } else {
            let name = expect_ident(self.buffer)?;
            (name.lexeme, name.span)
        };
        expect(self.buffer, TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        while !self.at(TokenKind::RParen) {
            let term = self.advance();
            if !matches!(
                term.kind,
                TokenKind::Ident | TokenKind::IntLit | TokenKind::FloatLit | TokenKind::StringLit | TokenKind::Null
            ) {
                return Err(CompileError::syntax(format!("expected argument, found {term}"), term.span));
            }
            args.push(term);
            if !eat(self.buffer, TokenKind::Comma) {
                break;
            }
        }
        let close = expect(self.buffer, TokenKind::RParen, "')'")?;
        let span = start.to(close.span);

        let function = match self.table.lookup(&name).map(|s| &s.kind) {
            Some(SymbolKind::Function(f)) => f.clone(),
            Some(SymbolKind::Variable(_)) => {
                return Err(CompileError::undefined(format!("'{name}' is a variable, not a function"), start));
            }
            None => return Err(CompileError::undefined(format!("undefined function '{name}'"), start)),
        };
        if function.params().len() != args.len() {
            return Err(CompileError::signature(
                format!("'{name}' takes {} argument(s), {} given", function.params().len(), args.len()),
                span,
            ));
        }
        let mut operands = Vec::with_capacity(args.len());
        for (arg, param) in args.iter().zip(function.params()) {
            let ty = operand_type(arg, self.table)?;
            let literal_ok = ty != ExprType::StrLiteral || function.as_builtin().is_some_and(|b| b.accepts_string_literal());
            if !literal_ok || !ty.assignable_to(param.ty) {
                return Err(CompileError::signature(
                    format!("argument '{}' of '{name}' expects {}, found {ty}", param.name, param.ty),
                    arg.span,
                ));
            }
            operands.push(self.operand(arg)?);
        }
        let callee = match function.as_builtin() {
            Some(builtin) => Callee::Builtin(builtin),
            None => Callee::User(&name),
        };
        self.sink.call(callee, &operands);
        Ok((function.return_type(), span))
    }

    fn operand(&self, term: &Token) -> Result<Operand, CompileError> {
        let operand = match (term.kind, &term.value) {
            (TokenKind::Ident, _) => {
                let id = self
                    .table
                    .lookup(&term.lexeme)
                    .and_then(|s| s.as_variable())
                    .map(|v| v.id)
                    .ok_or_else(|| CompileError::undefined(format!("undefined variable '{}'", term.lexeme), term.span))?;
                Operand::Var(VarRef::new(term.lexeme.clone(), id))
            }
            (TokenKind::Null, _) => Operand::Nil,
            (_, Some(Literal::Int(i))) => Operand::Int(*i),
            (_, Some(Literal::Float(f))) => Operand::Float(*f),
            (_, Some(Literal::Str(s))) => Operand::Str(s.clone()),
            _ => return Err(CompileError::internal_at(format!("{term} carries no literal value"), term.span)),
        };
        Ok(operand)
    }

    /// `( EXPR )` followed by an optional `|NAME|`.
    fn condition(&mut self) -> Result<(ExprType, Span, Option<Token>), CompileError> {
        expect(self.buffer, TokenKind::LParen, "'('")?;
        let (value, span) = self.expression(Terminator::CloseParen)?;
        expect(self.buffer, TokenKind::RParen, "')'")?;
        let binding = if eat(self.buffer, TokenKind::Pipe) {
            let name = expect_ident(self.buffer)?;
            expect(self.buffer, TokenKind::Pipe, "'|'")?;
            Some(name)
        } else {
            None
        };
        Ok((value, span, binding))
    }

    /// Declares the `|NAME|` constant of a null-binding condition.
    fn bind(&mut self, binding: Option<Token>, ty: Option<DataType>) -> Result<Option<VarRef>, CompileError> {
        match (binding, ty) {
            (Some(name), Some(ty)) => {
                let var = self.declare(&name, ty, true, false)?;
                self.sink.declare_variable(&var);
                Ok(Some(var))
            }
            _ => Ok(None),
        }
    }

    /// `if ( EXPR ) [|NAME|] { ... } [else { ... }]`
    fn if_statement(&mut self) -> Result<bool, CompileError> {
        self.advance();
        let (value, span, binding) = self.condition()?;
        let bound = check_condition(value, binding.is_some(), span)?;
        let id = self.table.open_scope(false);
        let var = self.bind(binding, bound)?;
        self.sink.if_begin(id, var.as_ref());
        let then_returns = self.block()?;
        self.close_scope()?;

        self.sink.if_else(id);
        let else_returns = if eat(self.buffer, TokenKind::Else) {
            self.table.open_scope(false);
            let returns = self.block()?;
            self.close_scope()?;
            returns
        } else {
            false
        };
        self.sink.if_end(id);
        Ok(then_returns && else_returns)
    }

    /// `while ( EXPR ) [|NAME|] { ... }`. The loop scope is opened before the
    /// condition so its id names the loop head.
    fn while_statement(&mut self) -> Result<(), CompileError> {
        self.advance();
        let id = self.table.open_scope(true);
        self.sink.while_begin(id);
        let (value, span, binding) = self.condition()?;
        let bound = check_condition(value, binding.is_some(), span)?;
        let var = self.bind(binding, bound)?;
        self.sink.while_condition(id, var.as_ref());
        self.block()?;
        self.close_scope()?;
        self.sink.while_end(id);
        Ok(())
    }

    /// `return [RHS] ;`
    fn return_statement(&mut self) -> Result<(), CompileError> {
        let keyword = self.advance();
        let (function, return_type) = match &self.function {
            Some(f) => (f.name.clone(), f.return_type),
            None => return Err(CompileError::internal_at("'return' outside of a function", keyword.span)),
        };
        if eat(self.buffer, TokenKind::Semicolon) {
            if return_type != DataType::Void {
                return Err(CompileError::signature(
                    format!("'{function}' must return a value of type {return_type}"),
                    keyword.span,
                ));
            }
            self.sink.return_value(false);
            return Ok(());
        }
        if return_type == DataType::Void {
            return Err(CompileError::signature(
                format!("void function '{function}' cannot return a value"),
                keyword.span,
            ));
        }
        let (value, span) = self.rhs()?;
        if !value.assignable_to(return_type) {
            return Err(CompileError::signature(
                format!("'{function}' returns {return_type}, found {value}"),
                span,
            ));
        }
        expect(self.buffer, TokenKind::Semicolon, "';'")?;
        self.sink.return_value(true);
        Ok(())
    }

    /// `break ;` / `continue ;` targeting the innermost loop.
    fn loop_jump(&mut self) -> Result<(), CompileError> {
        let keyword = self.advance();
        let jump = if keyword.is(TokenKind::Break) { LoopJump::Break } else { LoopJump::Continue };
        let id = self
            .table
            .innermost_loop_id()
            .ok_or_else(|| CompileError::syntax(format!("'{}' outside of a loop", keyword.lexeme), keyword.span))?;
        expect(self.buffer, TokenKind::Semicolon, "';'")?;
        self.sink.jump_loop(id, jump);
        Ok(())
    }
}
