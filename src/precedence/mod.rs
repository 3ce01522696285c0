//! Operator-precedence (shift/reduce) parser for expressions.
//!
//! The engine reads tokens from the shared [`TokenBuffer`] until it meets its
//! terminator, which it leaves unconsumed for the caller.

pub mod table;
pub mod tree;

use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenBuffer, TokenKind};
use table::{Action, Class};
pub use tree::{ExprNode, ExprTree, NodeId};

/// Where an expression ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `;` at bracket depth zero (declarations, assignments, `return`).
    Semicolon,
    /// An unmatched `)` (conditions of `if` / `while`).
    CloseParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackItem {
    /// Bottom sentinel `$`.
    Bottom,
    /// Handle start, the `<` of the precedence table.
    Shift,
    /// Operand or operator token, paired with its leaf node.
    Terminal(Class, NodeId),
    LParen,
    RParen,
    /// Reduced arithmetic / string expression.
    Expr(NodeId),
    /// Reduced single relational comparison.
    Rel(NodeId),
}

impl StackItem {
    fn terminal_class(self) -> Option<Class> {
        match self {
            StackItem::Bottom => Some(Class::Dollar),
            StackItem::Terminal(class, _) => Some(class),
            StackItem::LParen => Some(Class::LParen),
            StackItem::RParen => Some(Class::RParen),
            StackItem::Shift | StackItem::Expr(_) | StackItem::Rel(_) => None,
        }
    }
}

struct Engine<'b> {
    buffer: &'b mut TokenBuffer,
    terminator: Terminator,
    stack: Vec<StackItem>,
    nodes: Vec<ExprNode>,
    depth: usize,
    relations: usize,
}

/// Parses one expression and returns its tree. On error the partial stack and
/// every node built so far are dropped with the engine.
pub fn parse_expression(buffer: &mut TokenBuffer, terminator: Terminator) -> Result<ExprTree, CompileError> {
    let engine = Engine {
        buffer,
        terminator,
        stack: vec![StackItem::Bottom],
        nodes: Vec::new(),
        depth: 0,
        relations: 0,
    };
    engine.run()
}

impl Engine<'_> {
    fn run(mut self) -> Result<ExprTree, CompileError> {
        loop {
            let token = self.buffer.peek().clone();
            let input = self.classify(&token)?;
            let top = self.top_terminal()?;
            if top == Class::Dollar && input == Class::Dollar {
                return self.accept(&token);
            }
            match table::action(top, input) {
                Action::Shift => self.shift(token, input)?,
                Action::Equal => {
                    tracing::trace!(line = token.line, "match ')'");
                    self.depth -= 1;
                    self.stack.push(StackItem::RParen);
                    self.buffer.advance();
                }
                Action::Reduce => self.reduce(&token)?,
                Action::Error => {
                    return Err(CompileError::syntax(format!("unexpected {token} in expression"), token.span));
                }
            }
        }
    }

    /// Maps the lookahead token to its table class. The terminator becomes `$`.
    fn classify(&self, token: &Token) -> Result<Class, CompileError> {
        match token.kind {
            TokenKind::Ident
            | TokenKind::IntLit
            | TokenKind::FloatLit
            | TokenKind::StringLit
            | TokenKind::Null => Ok(Class::Id),
            TokenKind::LParen => Ok(Class::LParen),
            TokenKind::RParen if self.depth > 0 => Ok(Class::RParen),
            TokenKind::RParen => match self.terminator {
                Terminator::CloseParen => Ok(Class::Dollar),
                Terminator::Semicolon => Err(CompileError::syntax("unmatched ')' in expression", token.span)),
            },
            TokenKind::Semicolon if self.depth > 0 => {
                Err(CompileError::syntax("expected ')' before ';' in expression", token.span))
            }
            TokenKind::Semicolon => match self.terminator {
                Terminator::Semicolon => Ok(Class::Dollar),
                Terminator::CloseParen => Err(CompileError::syntax("expected ')' after condition", token.span)),
            },
            kind => Class::of_operator(kind)
                .ok_or_else(|| CompileError::syntax(format!("unexpected {token} in expression"), token.span)),
        }
    }

    fn top_terminal(&self) -> Result<Class, CompileError> {
        self.stack
            .iter()
            .rev()
            .find_map(|item| item.terminal_class())
            .ok_or_else(|| CompileError::internal("precedence stack lost its bottom marker"))
    }

    /// Inserts a shift marker just above the topmost terminal, then pushes the
    /// input.
    fn shift(&mut self, token: Token, class: Class) -> Result<(), CompileError> {
        if class.is_relational() {
            self.relations += 1;
            if self.relations > 1 {
                return Err(CompileError::syntax(
                    "an expression may contain at most one relational operator",
                    token.span,
                ));
            }
        }
        let at = self
            .stack
            .iter()
            .rposition(|item| item.terminal_class().is_some())
            .map_or(0, |i| i + 1);
        self.stack.insert(at, StackItem::Shift);
        tracing::trace!(lexeme = %token.lexeme, ?class, "shift");
        let item = match class {
            Class::LParen => {
                self.depth += 1;
                StackItem::LParen
            }
            _ => StackItem::Terminal(class, self.leaf(token)),
        };
        self.stack.push(item);
        self.buffer.advance();
        Ok(())
    }

    fn leaf(&mut self, token: Token) -> NodeId {
        self.nodes.push(ExprNode { token, left: None, right: None, ty: None, widen: false });
        self.nodes.len() - 1
    }

    /// Pops the handle above the last shift marker and pushes its nonterminal.
    fn reduce(&mut self, lookahead: &Token) -> Result<(), CompileError> {
        let marker = self
            .stack
            .iter()
            .rposition(|item| *item == StackItem::Shift)
            .ok_or_else(|| CompileError::syntax(format!("malformed expression before {lookahead}"), lookahead.span))?;
        let handle: Vec<StackItem> = self.stack.drain(marker..).skip(1).collect();
        let reduced = match handle.as_slice() {
            [StackItem::Terminal(Class::Id, node)] => StackItem::Expr(*node),
            [StackItem::Expr(left), StackItem::Terminal(op, node), StackItem::Expr(right)] if op.is_arithmetic() => {
                self.link(*node, *left, *right);
                StackItem::Expr(*node)
            }
            [StackItem::Expr(left), StackItem::Terminal(op, node), StackItem::Expr(right)] if op.is_relational() => {
                self.link(*node, *left, *right);
                StackItem::Rel(*node)
            }
            [StackItem::LParen, inner @ (StackItem::Expr(_) | StackItem::Rel(_)), StackItem::RParen] => *inner,
            _ => {
                return Err(CompileError::syntax(
                    format!("malformed expression before {lookahead}"),
                    lookahead.span,
                ));
            }
        };
        tracing::trace!(?reduced, "reduce");
        self.stack.push(reduced);
        Ok(())
    }

    fn link(&mut self, op: NodeId, left: NodeId, right: NodeId) {
        let node = &mut self.nodes[op];
        node.left = Some(left);
        node.right = Some(right);
    }

    fn accept(self, terminator: &Token) -> Result<ExprTree, CompileError> {
        match self.stack.as_slice() {
            [StackItem::Bottom, StackItem::Expr(root) | StackItem::Rel(root)] => {
                tracing::trace!(nodes = self.nodes.len(), "accept expression");
                Ok(ExprTree::new(self.nodes, *root))
            }
            [StackItem::Bottom] => Err(CompileError::syntax(
                format!("expected expression before {terminator}"),
                terminator.span,
            )),
            _ => Err(CompileError::syntax(
                format!("incomplete expression before {terminator}"),
                terminator.span,
            )),
        }
    }
}
