use super::token::{Token, TokenKind};
use crate::span::Span;

/// Every token of one compilation unit plus a movable cursor.
///
/// Append-only while scanning, read/rewind-only while parsing. Advancing past the
/// last token keeps yielding the end-of-stream token without moving the cursor;
/// retreating from the first token is a no-op.
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    pos: usize,
    end: Token,
}

impl Default for TokenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self { tokens: Vec::new(), pos: 0, end: Token::eof(Span::dummy()) }
    }

    pub fn append(&mut self, token: Token) {
        if token.is(TokenKind::Eof) {
            self.end = token.clone();
        }
        self.tokens.push(token);
    }

    /// Returns the current token and moves forward unless already at the end.
    pub fn advance(&mut self) -> &Token {
        if self.pos >= self.tokens.len() {
            return &self.end;
        }
        let idx = self.pos;
        if !self.tokens[idx].is(TokenKind::Eof) {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    /// Moves back one position, clamped at the first token.
    pub fn retreat(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn rewind_to_start(&mut self) {
        self.pos = 0;
    }

    /// The token `advance` would return next, without consuming it.
    pub fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// Looks `n` tokens past the cursor. Never looks beyond end of stream.
    pub fn peek_nth(&self, n: usize) -> &Token {
        for i in 0..=n {
            match self.tokens.get(self.pos + i) {
                None => return &self.end,
                Some(tok) if tok.is(TokenKind::Eof) || i == n => return tok,
                Some(_) => {}
            }
        }
        &self.end
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
