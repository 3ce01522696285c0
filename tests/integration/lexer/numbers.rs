use super::*;

// ===== Integers =====

#[test]
fn integer_zero() {
    assert_eq!(literal("0"), Literal::Int(0));
}

#[test]
fn integer_plain() {
    assert_eq!(literal("1234567"), Literal::Int(1234567));
}

#[test]
fn minus_is_a_separate_token() {
    let tokens = lex_ok("-42");
    assert_eq!(tokens.len(), 2);
    assert!(tokens[0].is(TokenKind::Minus));
    assert_eq!(tokens[1].value, Some(Literal::Int(42)));
}

#[test]
fn integer_keeps_lexeme() {
    let tokens = lex_ok("987");
    assert_eq!(tokens[0].lexeme, "987");
    assert!(tokens[0].is(TokenKind::IntLit));
}

#[test]
fn integer_near_i64_max() {
    assert_eq!(literal("9223372036854775807"), Literal::Int(i64::MAX));
}

#[test]
fn integer_out_of_range() {
    lex_fails("9223372036854775808");
}

#[test]
fn leading_zero_rejected() {
    lex_fails("007");
    lex_fails("01");
}

#[test]
fn zero_followed_by_word_splits() {
    assert_tokens("0x1F", &[TokenKind::IntLit, TokenKind::Ident]);
}

// ===== Floats =====

#[test]
fn float_with_fraction() {
    assert_eq!(literal("3.25"), Literal::Float(3.25));
    assert_eq!(literal("0.5"), Literal::Float(0.5));
}

#[test]
fn float_with_exponent_only() {
    assert_eq!(literal("1e3"), Literal::Float(1000.0));
    assert_eq!(literal("2E2"), Literal::Float(200.0));
    assert_eq!(literal("0e0"), Literal::Float(0.0));
}

#[test]
fn float_with_signed_exponent() {
    assert_eq!(literal("2.5e-2"), Literal::Float(0.025));
    assert_eq!(literal("1.5E+1"), Literal::Float(15.0));
}

#[test]
fn float_token_kind() {
    assert_tokens("1.0 2e1", &[TokenKind::FloatLit, TokenKind::FloatLit]);
}

#[test]
fn trailing_dot_rejected() {
    lex_fails("1.");
    lex_fails("1.;");
}

#[test]
fn leading_dot_is_punctuation() {
    assert_tokens(".5", &[TokenKind::Dot, TokenKind::IntLit]);
}

#[test]
fn malformed_exponents_rejected() {
    lex_fails("1e");
    lex_fails("1e+");
    lex_fails("1.5e-");
    lex_fails("3ex");
}

#[test]
fn number_then_word() {
    assert_tokens("12abc", &[TokenKind::IntLit, TokenKind::Ident]);
}
