#![no_main]
use ifjc::config::Options;
use libfuzzer_sys::fuzz_target;

const PROLOG: &str = "const ifj = @import(\"ifj24.zig\");\n";

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };
    // Prefix the prolog so most inputs reach the function parser.
    let source = format!("{PROLOG}{body}");
    let options = Options { check_unused: false, ..Options::default() };
    let _ = ifjc::compile(&source, &options);
});
