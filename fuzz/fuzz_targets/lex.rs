#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must scan or fail with a lexical error, never panic.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = ifjc::lexer::lex(s);
    }
});
