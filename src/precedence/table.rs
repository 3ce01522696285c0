//! Operator-precedence table over the 14 terminal classes of an expression.

use crate::lexer::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Plus,
    Minus,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    LParen,
    RParen,
    Id,
    Dollar,
}

impl Class {
    pub fn of_operator(kind: TokenKind) -> Option<Class> {
        let class = match kind {
            TokenKind::Plus => Class::Plus,
            TokenKind::Minus => Class::Minus,
            TokenKind::Star => Class::Mul,
            TokenKind::Slash => Class::Div,
            TokenKind::EqEq => Class::Eq,
            TokenKind::BangEq => Class::Ne,
            TokenKind::Lt => Class::Lt,
            TokenKind::Gt => Class::Gt,
            TokenKind::LtEq => Class::Le,
            TokenKind::GtEq => Class::Ge,
            _ => return None,
        };
        Some(class)
    }

    pub fn is_relational(self) -> bool {
        matches!(self, Class::Eq | Class::Ne | Class::Lt | Class::Gt | Class::Le | Class::Ge)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, Class::Plus | Class::Minus | Class::Mul | Class::Div)
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Input binds tighter than the stack top: push it.
    Shift,
    /// Stack top binds tighter: reduce the handle.
    Reduce,
    /// Matching parentheses.
    Equal,
    Error,
}

use Action::{Equal as Q, Error as X, Reduce as R, Shift as S};

/// Rows: topmost stack terminal. Columns: input terminal.
/// Order: + - * / == != < > <= >= ( ) id $
const TABLE: [[Action; 14]; 14] = [
    /* +   */ [R, R, S, S, R, R, R, R, R, R, S, R, S, R],
    /* -   */ [R, R, S, S, R, R, R, R, R, R, S, R, S, R],
    /* *   */ [R, R, R, R, R, R, R, R, R, R, S, R, S, R],
    /* /   */ [R, R, R, R, R, R, R, R, R, R, S, R, S, R],
    /* ==  */ [S, S, S, S, X, X, X, X, X, X, S, R, S, R],
    /* !=  */ [S, S, S, S, X, X, X, X, X, X, S, R, S, R],
    /* <   */ [S, S, S, S, X, X, X, X, X, X, S, R, S, R],
    /* >   */ [S, S, S, S, X, X, X, X, X, X, S, R, S, R],
    /* <=  */ [S, S, S, S, X, X, X, X, X, X, S, R, S, R],
    /* >=  */ [S, S, S, S, X, X, X, X, X, X, S, R, S, R],
    /* (   */ [S, S, S, S, S, S, S, S, S, S, S, Q, S, X],
    /* )   */ [R, R, R, R, R, R, R, R, R, R, X, R, X, R],
    /* id  */ [R, R, R, R, R, R, R, R, R, R, X, R, X, R],
    /* $   */ [S, S, S, S, S, S, S, S, S, S, S, X, S, X],
];

pub fn action(top: Class, input: Class) -> Action {
    TABLE[top.index()][input.index()]
}
