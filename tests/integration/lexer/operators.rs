use super::*;

#[test]
fn arithmetic() {
    assert_tokens("+ - * /", &[TokenKind::Plus, TokenKind::Minus, TokenKind::Star, TokenKind::Slash]);
}

#[test]
fn relational() {
    assert_tokens(
        "< > <= >= == !=",
        &[TokenKind::Lt, TokenKind::Gt, TokenKind::LtEq, TokenKind::GtEq, TokenKind::EqEq, TokenKind::BangEq],
    );
}

#[test]
fn maximal_munch() {
    assert_tokens("a<=b", &[TokenKind::Ident, TokenKind::LtEq, TokenKind::Ident]);
    assert_tokens("===", &[TokenKind::EqEq, TokenKind::Eq]);
    assert_tokens("<==", &[TokenKind::LtEq, TokenKind::Eq]);
    assert_tokens("= =", &[TokenKind::Eq, TokenKind::Eq]);
}

#[test]
fn punctuation() {
    assert_tokens(
        ": ; , . | ( ) { }",
        &[
            TokenKind::Colon,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Pipe,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
        ],
    );
}

#[test]
fn null_binding_pipes() {
    assert_tokens(
        "if (x) |y| {",
        &[
            TokenKind::If,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::Pipe,
            TokenKind::Ident,
            TokenKind::Pipe,
            TokenKind::LBrace,
        ],
    );
}

#[test]
fn operator_lexemes() {
    let lexemes: Vec<_> = lex_ok("!= >= =").into_iter().map(|t| t.lexeme).collect();
    assert_eq!(lexemes, vec!["!=", ">=", "="]);
}

#[test]
fn lone_bang_rejected() {
    lex_fails("!");
    lex_fails("!x");
    lex_fails("! =");
}
