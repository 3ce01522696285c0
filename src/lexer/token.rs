use serde::{Serialize, Serializer};

use crate::span::Span;

/// Terminal categories produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Keywords
    Const,
    Var,
    Null,
    Fn,
    If,
    Else,
    Pub,
    Return,
    Void,
    While,
    Break,
    Continue,

    /// The reserved `ifj` namespace.
    Ifj,
    /// `@import`
    AtImport,
    /// The lone identifier `_`.
    Underscore,

    // Type spellings
    TypeInt,
    TypeFloat,
    TypeStr,
    TypeNullableInt,
    TypeNullableFloat,
    TypeNullableStr,

    // Literals
    IntLit,
    FloatLit,
    StringLit,

    Ident,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    BangEq,
    Eq,

    // Punctuation
    Colon,
    Semicolon,
    Comma,
    Dot,
    Pipe,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    Eof,
}

impl TokenKind {
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq | TokenKind::EqEq | TokenKind::BangEq
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash)
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::IntLit | TokenKind::FloatLit | TokenKind::StringLit | TokenKind::Null)
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            TokenKind::TypeInt
                | TokenKind::TypeFloat
                | TokenKind::TypeStr
                | TokenKind::TypeNullableInt
                | TokenKind::TypeNullableFloat
                | TokenKind::TypeNullableStr
        )
    }
}

/// Decoded value of a literal token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    /// Raw bytes; `\xNN` escapes may produce bytes that are not UTF-8.
    #[serde(serialize_with = "lossy_utf8")]
    Str(Vec<u8>),
}

fn lossy_utf8<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

/// One scanned token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text; empty for end of stream.
    pub lexeme: String,
    pub line: usize,
    pub span: Span,
    /// Present only for literal kinds.
    pub value: Option<Literal>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self { kind, lexeme: lexeme.into(), line: span.line, span, value: None }
    }

    pub fn literal(kind: TokenKind, lexeme: impl Into<String>, span: Span, value: Literal) -> Self {
        Self { kind, lexeme: lexeme.into(), line: span.line, span, value: Some(value) }
    }

    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, "", span)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Maps a maximal-munch word to its keyword or type kind, if it is reserved.
pub fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "const" => TokenKind::Const,
        "var" => TokenKind::Var,
        "null" => TokenKind::Null,
        "fn" => TokenKind::Fn,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "pub" => TokenKind::Pub,
        "return" => TokenKind::Return,
        "void" => TokenKind::Void,
        "while" => TokenKind::While,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "ifj" => TokenKind::Ifj,
        "i32" => TokenKind::TypeInt,
        "f64" => TokenKind::TypeFloat,
        "_" => TokenKind::Underscore,
        _ => return None,
    };
    Some(kind)
}

/// Returns true if the given word cannot be used as an identifier.
pub fn is_keyword(word: &str) -> bool {
    keyword(word).is_some()
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Const => write!(f, "const"),
            TokenKind::Var => write!(f, "var"),
            TokenKind::Null => write!(f, "null"),
            TokenKind::Fn => write!(f, "fn"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::Pub => write!(f, "pub"),
            TokenKind::Return => write!(f, "return"),
            TokenKind::Void => write!(f, "void"),
            TokenKind::While => write!(f, "while"),
            TokenKind::Break => write!(f, "break"),
            TokenKind::Continue => write!(f, "continue"),
            TokenKind::Ifj => write!(f, "ifj"),
            TokenKind::AtImport => write!(f, "@import"),
            TokenKind::Underscore => write!(f, "_"),
            TokenKind::TypeInt => write!(f, "i32"),
            TokenKind::TypeFloat => write!(f, "f64"),
            TokenKind::TypeStr => write!(f, "[]u8"),
            TokenKind::TypeNullableInt => write!(f, "?i32"),
            TokenKind::TypeNullableFloat => write!(f, "?f64"),
            TokenKind::TypeNullableStr => write!(f, "?[]u8"),
            TokenKind::IntLit => write!(f, "integer literal"),
            TokenKind::FloatLit => write!(f, "float literal"),
            TokenKind::StringLit => write!(f, "string literal"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::BangEq => write!(f, "!="),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "identifier '{}'", self.lexeme),
            TokenKind::IntLit | TokenKind::FloatLit | TokenKind::StringLit => write!(f, "{}", self.lexeme),
            TokenKind::Eof => write!(f, "end of file"),
            kind => write!(f, "'{kind}'"),
        }
    }
}
