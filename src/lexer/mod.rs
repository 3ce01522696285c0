//! Hand-written scanner: a character stream with one-character pushback feeding a
//! finite-state machine that produces one [`Token`] per call.

pub mod buffer;
pub mod token;

pub use buffer::TokenBuffer;
pub use token::{Literal, Token, TokenKind, is_keyword};

use crate::diagnostics::CompileError;
use crate::span::Span;

/// Sequential character source with a single character of pushback.
struct CharStream<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> CharStream<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0, line: 1 }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.source[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Pushes back the character most recently returned by `next_char`.
    fn unread(&mut self, c: char) {
        self.pos -= c.len_utf8();
        if c == '\n' {
            self.line -= 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Word,
    Zero,
    Int,
    FracStart,
    Frac,
    ExpStart,
    ExpSign,
    Exp,
    Str,
    StrEscape,
    StrHex,
    Slash,
    LineComment,
    Assign,
    Less,
    Greater,
    Bang,
    Question,
    LBracket,
    At,
}

pub struct Scanner<'a> {
    input: CharStream<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { input: CharStream::new(source) }
    }

    pub fn line(&self) -> usize {
        self.input.line
    }

    /// Scans the next token. End of input yields `Eof` on every further call.
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        let mut state = State::Start;
        let mut lexeme = String::new();
        let mut value = Vec::new();
        let mut hex = String::new();
        let mut start = self.input.pos;
        let mut line = self.input.line;

        loop {
            let c = self.input.next_char();
            match state {
                State::Start => {
                    start = self.input.pos - c.map_or(0, char::len_utf8);
                    line = self.input.line - usize::from(c == Some('\n'));
                    let Some(c) = c else {
                        return Ok(Token::eof(Span::point(self.input.pos, self.input.line)));
                    };
                    if c.is_whitespace() {
                        continue;
                    }
                    lexeme.push(c);
                    state = match c {
                        'a'..='z' | 'A'..='Z' | '_' => State::Word,
                        '0' => State::Zero,
                        '1'..='9' => State::Int,
                        '"' => State::Str,
                        '/' => State::Slash,
                        '=' => State::Assign,
                        '<' => State::Less,
                        '>' => State::Greater,
                        '!' => State::Bang,
                        '?' => State::Question,
                        '[' => State::LBracket,
                        '@' => State::At,
                        _ => {
                            let kind = single_char_kind(c).ok_or_else(|| {
                                CompileError::lexical(
                                    format!("unexpected character '{}'", c.escape_default()),
                                    Span::new(start, self.input.pos, line),
                                )
                            })?;
                            return Ok(self.finish(kind, lexeme, start, line));
                        }
                    };
                }
                State::Word => match c {
                    Some(c) if is_word_char(c) => lexeme.push(c),
                    other => {
                        self.pushback(other);
                        let kind = token::keyword(&lexeme).unwrap_or(TokenKind::Ident);
                        return Ok(self.finish(kind, lexeme, start, line));
                    }
                },
                State::Zero => match c {
                    Some('0'..='9') => {
                        return Err(self.error("leading zeros are not allowed in integer literals", start, line));
                    }
                    Some('.') => {
                        lexeme.push('.');
                        state = State::FracStart;
                    }
                    Some(e @ ('e' | 'E')) => {
                        lexeme.push(e);
                        state = State::ExpStart;
                    }
                    other => {
                        self.pushback(other);
                        return self.int_literal(lexeme, start, line);
                    }
                },
                State::Int => match c {
                    Some(d @ '0'..='9') => lexeme.push(d),
                    Some('.') => {
                        lexeme.push('.');
                        state = State::FracStart;
                    }
                    Some(e @ ('e' | 'E')) => {
                        lexeme.push(e);
                        state = State::ExpStart;
                    }
                    other => {
                        self.pushback(other);
                        return self.int_literal(lexeme, start, line);
                    }
                },
                State::FracStart => match c {
                    Some(d @ '0'..='9') => {
                        lexeme.push(d);
                        state = State::Frac;
                    }
                    _ => return Err(self.error("expected a digit after the decimal point", start, line)),
                },
                State::Frac => match c {
                    Some(d @ '0'..='9') => lexeme.push(d),
                    Some(e @ ('e' | 'E')) => {
                        lexeme.push(e);
                        state = State::ExpStart;
                    }
                    other => {
                        self.pushback(other);
                        return self.float_literal(lexeme, start, line);
                    }
                },
                State::ExpStart => match c {
                    Some(s @ ('+' | '-')) => {
                        lexeme.push(s);
                        state = State::ExpSign;
                    }
                    Some(d @ '0'..='9') => {
                        lexeme.push(d);
                        state = State::Exp;
                    }
                    _ => return Err(self.error("malformed exponent", start, line)),
                },
                State::ExpSign => match c {
                    Some(d @ '0'..='9') => {
                        lexeme.push(d);
                        state = State::Exp;
                    }
                    _ => return Err(self.error("exponent requires at least one digit", start, line)),
                },
                State::Exp => match c {
                    Some(d @ '0'..='9') => lexeme.push(d),
                    other => {
                        self.pushback(other);
                        return self.float_literal(lexeme, start, line);
                    }
                },
                State::Str => match c {
                    None => return Err(self.error("unterminated string literal", start, line)),
                    Some('"') => {
                        lexeme.push('"');
                        let span = Span::new(start, self.input.pos, line);
                        return Ok(Token::literal(TokenKind::StringLit, lexeme, span, Literal::Str(value)));
                    }
                    Some('\\') => {
                        lexeme.push('\\');
                        state = State::StrEscape;
                    }
                    Some(c) if (c as u32) < 32 => {
                        return Err(self.error("control character in string literal", start, line));
                    }
                    Some(c) => {
                        lexeme.push(c);
                        value.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes());
                    }
                },
                State::StrEscape => {
                    let Some(c) = c else {
                        return Err(self.error("unterminated string literal", start, line));
                    };
                    lexeme.push(c);
                    state = State::Str;
                    match c {
                        'n' => value.push(b'\n'),
                        'r' => value.push(b'\r'),
                        't' => value.push(b'\t'),
                        '\\' | '"' | '\'' => value.push(c as u8),
                        'x' => {
                            hex.clear();
                            state = State::StrHex;
                        }
                        other => {
                            return Err(self.error(
                                format!("invalid escape sequence '\\{}'", other.escape_default()),
                                start,
                                line,
                            ));
                        }
                    }
                }
                State::StrHex => match c {
                    Some(h) if h.is_ascii_hexdigit() => {
                        lexeme.push(h);
                        hex.push(h);
                        if hex.len() == 2 {
                            let byte = u8::from_str_radix(&hex, 16)
                                .map_err(|_| self.error("invalid hexadecimal escape", start, line))?;
                            value.push(byte);
                            state = State::Str;
                        }
                    }
                    _ => return Err(self.error("'\\x' must be followed by two hexadecimal digits", start, line)),
                },
                State::Slash => match c {
                    Some('/') => state = State::LineComment,
                    other => {
                        self.pushback(other);
                        return Ok(self.finish(TokenKind::Slash, lexeme, start, line));
                    }
                },
                State::LineComment => match c {
                    Some('\n') | None => {
                        self.pushback(c);
                        lexeme.clear();
                        state = State::Start;
                    }
                    Some(_) => {}
                },
                State::Assign => return Ok(self.one_or_two(c, lexeme, TokenKind::Eq, TokenKind::EqEq, start, line)),
                State::Less => return Ok(self.one_or_two(c, lexeme, TokenKind::Lt, TokenKind::LtEq, start, line)),
                State::Greater => return Ok(self.one_or_two(c, lexeme, TokenKind::Gt, TokenKind::GtEq, start, line)),
                State::Bang => match c {
                    Some('=') => {
                        lexeme.push('=');
                        return Ok(self.finish(TokenKind::BangEq, lexeme, start, line));
                    }
                    _ => return Err(self.error("'!' must be followed by '='", start, line)),
                },
                State::Question => {
                    let (rest, kind) = match c {
                        Some('i') => ("32", TokenKind::TypeNullableInt),
                        Some('f') => ("64", TokenKind::TypeNullableFloat),
                        Some('[') => ("]u8", TokenKind::TypeNullableStr),
                        _ => return Err(self.error("'?' must begin a nullable type", start, line)),
                    };
                    lexeme.extend(c);
                    self.expect_spelling(&mut lexeme, rest, start, line)?;
                    return Ok(self.finish(kind, lexeme, start, line));
                }
                State::LBracket => match c {
                    Some(']') => {
                        lexeme.push(']');
                        self.expect_spelling(&mut lexeme, "u8", start, line)?;
                        return Ok(self.finish(TokenKind::TypeStr, lexeme, start, line));
                    }
                    other => {
                        self.pushback(other);
                        return Ok(self.finish(TokenKind::LBracket, lexeme, start, line));
                    }
                },
                State::At => match c {
                    Some(c) if is_word_char(c) => lexeme.push(c),
                    other => {
                        self.pushback(other);
                        if lexeme != "@import" {
                            return Err(self.error(format!("unknown directive '{lexeme}'"), start, line));
                        }
                        return Ok(self.finish(TokenKind::AtImport, lexeme, start, line));
                    }
                },
            }
        }
    }

    fn pushback(&mut self, c: Option<char>) {
        if let Some(c) = c {
            self.input.unread(c);
        }
    }

    fn finish(&self, kind: TokenKind, lexeme: String, start: usize, line: usize) -> Token {
        Token::new(kind, lexeme, Span::new(start, self.input.pos, line))
    }

    fn error(&self, msg: impl Into<String>, start: usize, line: usize) -> CompileError {
        CompileError::lexical(msg, Span::new(start, self.input.pos.max(start), line))
    }

    fn one_or_two(
        &mut self,
        c: Option<char>,
        mut lexeme: String,
        single: TokenKind,
        double: TokenKind,
        start: usize,
        line: usize,
    ) -> Token {
        match c {
            Some('=') => {
                lexeme.push('=');
                self.finish(double, lexeme, start, line)
            }
            other => {
                self.pushback(other);
                self.finish(single, lexeme, start, line)
            }
        }
    }

    /// Consumes exactly `rest`, then requires that no word character follows.
    fn expect_spelling(&mut self, lexeme: &mut String, rest: &str, start: usize, line: usize) -> Result<(), CompileError> {
        for expected in rest.chars() {
            match self.input.next_char() {
                Some(c) if c == expected => lexeme.push(c),
                _ => return Err(self.error(format!("malformed type name '{lexeme}'"), start, line)),
            }
        }
        match self.input.next_char() {
            Some(c) if is_word_char(c) => Err(self.error(format!("malformed type name '{lexeme}{c}'"), start, line)),
            other => {
                self.pushback(other);
                Ok(())
            }
        }
    }

    fn int_literal(&self, lexeme: String, start: usize, line: usize) -> Result<Token, CompileError> {
        let n = lexeme
            .parse::<i64>()
            .map_err(|_| self.error(format!("integer literal '{lexeme}' is out of range"), start, line))?;
        let span = Span::new(start, self.input.pos, line);
        Ok(Token::literal(TokenKind::IntLit, lexeme, span, Literal::Int(n)))
    }

    fn float_literal(&self, lexeme: String, start: usize, line: usize) -> Result<Token, CompileError> {
        let f = lexeme
            .parse::<f64>()
            .map_err(|_| self.error(format!("malformed float literal '{lexeme}'"), start, line))?;
        let span = Span::new(start, self.input.pos, line);
        Ok(Token::literal(TokenKind::FloatLit, lexeme, span, Literal::Float(f)))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn single_char_kind(c: char) -> Option<TokenKind> {
    let kind = match c {
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        ':' => TokenKind::Colon,
        ';' => TokenKind::Semicolon,
        ',' => TokenKind::Comma,
        '.' => TokenKind::Dot,
        '|' => TokenKind::Pipe,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        ']' => TokenKind::RBracket,
        _ => return None,
    };
    Some(kind)
}

/// Decodes raw program bytes. A byte sequence that is not UTF-8 is a lexical
/// error on the line where it starts.
pub fn decode_source(bytes: &[u8]) -> Result<String, CompileError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_owned()),
        Err(err) => {
            let at = err.valid_up_to();
            let len = err.error_len().unwrap_or(bytes.len() - at);
            let line = bytes[..at].iter().filter(|&&b| b == b'\n').count() + 1;
            let shown = bytes.get(at).map_or_else(String::new, |b| format!(" 0x{b:02x}"));
            Err(CompileError::lexical(
                format!("invalid UTF-8 byte{shown} in source"),
                Span::new(at, at + len, line),
            ))
        }
    }
}

/// Scans the whole source into a buffer terminated by exactly one `Eof` token.
pub fn lex(source: &str) -> Result<TokenBuffer, CompileError> {
    let mut scanner = Scanner::new(source);
    let mut buffer = TokenBuffer::new();
    loop {
        let tok = scanner.next_token()?;
        let done = tok.is(TokenKind::Eof);
        buffer.append(tok);
        if done {
            break;
        }
    }
    tracing::debug!(tokens = buffer.len(), lines = scanner.line(), "scanned source");
    Ok(buffer)
}
