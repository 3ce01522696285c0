use super::*;

#[test]
fn comment_only() {
    assert!(lex_ok("// nothing here").is_empty());
}

#[test]
fn comment_until_end_of_line() {
    assert_tokens("a // b c d\ne", &[TokenKind::Ident, TokenKind::Ident]);
}

#[test]
fn comment_without_trailing_newline() {
    assert_tokens("x; // trailing", &[TokenKind::Ident, TokenKind::Semicolon]);
}

#[test]
fn comment_directly_after_token() {
    assert_tokens("x// glued", &[TokenKind::Ident]);
}

#[test]
fn consecutive_comment_lines() {
    let tokens = lex_ok("// one\n// two\n// three\nvalue");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].line, 4);
}

#[test]
fn comment_may_contain_anything() {
    assert_tokens("// \"unterminated $ # 01 ?x\nok", &[TokenKind::Ident]);
}

#[test]
fn single_slash_is_division() {
    assert_tokens("a / b", &[TokenKind::Ident, TokenKind::Slash, TokenKind::Ident]);
}

#[test]
fn block_comments_are_not_supported() {
    assert_tokens("/* x */", &[TokenKind::Slash, TokenKind::Star, TokenKind::Ident, TokenKind::Star, TokenKind::Slash]);
}
