use super::*;

fn string_bytes(source: &str) -> Vec<u8> {
    match literal(source) {
        Literal::Str(bytes) => bytes,
        other => panic!("expected a string literal, got {other:?}"),
    }
}

fn string_value(source: &str) -> String {
    String::from_utf8(string_bytes(source)).unwrap()
}

#[test]
fn empty_string() {
    assert_eq!(string_value(r#""""#), "");
}

#[test]
fn plain_string_keeps_quotes_in_lexeme() {
    let tokens = lex_ok(r#""hello world""#);
    assert!(tokens[0].is(TokenKind::StringLit));
    assert_eq!(tokens[0].lexeme, r#""hello world""#);
    assert_eq!(tokens[0].value, Some(Literal::Str("hello world".into())));
}

#[test]
fn simple_escapes() {
    assert_eq!(string_value(r#""a\nb""#), "a\nb");
    assert_eq!(string_value(r#""\t\r""#), "\t\r");
    assert_eq!(string_value(r#""\\""#), "\\");
    assert_eq!(string_value(r#""\"q\"""#), "\"q\"");
    assert_eq!(string_value(r#""it\'s""#), "it's");
}

#[test]
fn hex_escapes() {
    assert_eq!(string_value(r#""\x41\x62""#), "Ab");
    assert_eq!(string_value(r#""\x7e""#), "~");
    assert_eq!(string_value(r#""\x0A""#), "\n");
}

#[test]
fn high_hex_escapes_stay_single_bytes() {
    assert_eq!(string_bytes(r#""\xff""#), vec![0xff]);
    assert_eq!(string_bytes(r#""a\x80\xC3z""#), vec![b'a', 0x80, 0xc3, b'z']);
}

#[test]
fn hex_escape_needs_two_digits() {
    lex_fails(r#""\x4""#);
    lex_fails(r#""\xZZ""#);
    lex_fails(r#""\x"#);
}

#[test]
fn unknown_escape_rejected() {
    lex_fails(r#""\q""#);
    lex_fails(r#""\0""#);
}

#[test]
fn unterminated_string() {
    lex_fails(r#""abc"#);
    lex_fails(r#""abc\"#);
}

#[test]
fn raw_newline_in_string_rejected() {
    lex_fails("\"line one\nline two\"");
}

#[test]
fn non_ascii_passes_through() {
    assert_eq!(string_value("\"žluťoučký\""), "žluťoučký");
}

#[test]
fn comment_marker_inside_string() {
    let tokens = lex_ok(r#""// not a comment" x"#);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].value, Some(Literal::Str("// not a comment".into())));
}

#[test]
fn string_followed_by_punctuation() {
    assert_tokens(
        r#"ifj.write("hi");"#,
        &[
            TokenKind::Ifj,
            TokenKind::Dot,
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::StringLit,
            TokenKind::RParen,
            TokenKind::Semicolon,
        ],
    );
}
