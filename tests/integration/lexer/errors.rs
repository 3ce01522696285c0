use super::*;

#[test]
fn unknown_characters() {
    for src in ["#", "$", "%", "&", "^", "~", "'a'", "\\", "`"] {
        lex_fails(src);
    }
}

#[test]
fn non_ascii_outside_string() {
    lex_fails("č");
}

#[test]
fn error_after_valid_tokens() {
    lex_fails("const x = 1; #");
}

#[test]
fn error_reports_its_line() {
    let err = lex("a\nb\nc $").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lexical);
    assert_eq!(err.line(), 3);
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn error_message_names_the_character() {
    let err = lex("x = #;").unwrap_err();
    assert!(err.to_string().contains("unexpected character '#'"), "{err}");
}

#[test]
fn unterminated_string_reports_opening_line() {
    let err = lex("a\n\"open").unwrap_err();
    assert_eq!(err.line(), 2);
}

#[test]
fn scanner_stops_at_first_error() {
    let mut scanner = Scanner::new("ok $ never");
    assert!(scanner.next_token().unwrap().is(TokenKind::Ident));
    assert!(scanner.next_token().is_err());
}
