//! Operand spelling and the helper routines backing built-ins that have no
//! single IFJcode24 instruction.

use std::fmt::Write as _;

use super::{Operand, VarRef};

/// Built-ins lowered to a call into a helper routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Helper {
    Substr,
    Strcmp,
    Ord,
}

impl Helper {
    pub fn label(self) -> &'static str {
        match self {
            Helper::Substr => "$$substr",
            Helper::Strcmp => "$$strcmp",
            Helper::Ord => "$$ord",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            Helper::Substr => SUBSTR,
            Helper::Strcmp => STRCMP,
            Helper::Ord => ORD,
        }
    }
}

// ifj.substr(s, i, j): null when i < 0, j < 0, i > j, i >= len or j > len.
const SUBSTR: &str = "\
LABEL $$substr
PUSHFRAME
DEFVAR LF@len
DEFVAR LF@cond
DEFVAR LF@res
DEFVAR LF@ch
STRLEN LF@len LF@%0
LT LF@cond LF@%1 int@0
JUMPIFEQ $$substr$nil LF@cond bool@true
LT LF@cond LF@%2 int@0
JUMPIFEQ $$substr$nil LF@cond bool@true
GT LF@cond LF@%1 LF@%2
JUMPIFEQ $$substr$nil LF@cond bool@true
LT LF@cond LF@%1 LF@len
JUMPIFEQ $$substr$nil LF@cond bool@false
GT LF@cond LF@%2 LF@len
JUMPIFEQ $$substr$nil LF@cond bool@true
MOVE LF@res string@
LABEL $$substr$loop
JUMPIFEQ $$substr$done LF@%1 LF@%2
GETCHAR LF@ch LF@%0 LF@%1
CONCAT LF@res LF@res LF@ch
ADD LF@%1 LF@%1 int@1
JUMP $$substr$loop
LABEL $$substr$done
PUSHS LF@res
POPFRAME
RETURN
LABEL $$substr$nil
PUSHS nil@nil
POPFRAME
RETURN
";

// ifj.strcmp(s1, s2): -1, 0 or 1.
const STRCMP: &str = "\
LABEL $$strcmp
PUSHFRAME
DEFVAR LF@cond
LT LF@cond LF@%0 LF@%1
JUMPIFEQ $$strcmp$less LF@cond bool@true
GT LF@cond LF@%0 LF@%1
JUMPIFEQ $$strcmp$greater LF@cond bool@true
PUSHS int@0
POPFRAME
RETURN
LABEL $$strcmp$less
PUSHS int@-1
POPFRAME
RETURN
LABEL $$strcmp$greater
PUSHS int@1
POPFRAME
RETURN
";

// ifj.ord(s, i): byte value at i, 0 when i is out of range.
const ORD: &str = "\
LABEL $$ord
PUSHFRAME
DEFVAR LF@len
DEFVAR LF@cond
DEFVAR LF@res
STRLEN LF@len LF@%0
LT LF@cond LF@%1 int@0
JUMPIFEQ $$ord$zero LF@cond bool@true
LT LF@cond LF@%1 LF@len
JUMPIFEQ $$ord$zero LF@cond bool@false
STRI2INT LF@res LF@%0 LF@%1
PUSHS LF@res
POPFRAME
RETURN
LABEL $$ord$zero
PUSHS int@0
POPFRAME
RETURN
";

/// `LF@name$id`
pub fn local(var: &VarRef) -> String {
    format!("LF@{}${}", var.name, var.id)
}

pub fn operand(op: &Operand) -> String {
    match op {
        Operand::Var(var) => local(var),
        Operand::Int(i) => format!("int@{i}"),
        Operand::Float(f) => format!("float@{}", hex_float(*f)),
        Operand::Str(s) => format!("string@{}", escape_string(s)),
        Operand::Nil => "nil@nil".to_string(),
    }
}

/// C99 `%a` spelling of a double, e.g. `0x1.8p+1` for 3.0.
pub fn hex_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_infinite() {
        return format!("{sign}inf");
    }
    if value == 0.0 {
        return format!("{sign}0x0p+0");
    }
    let bits = value.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i64;
    let mantissa = bits & ((1u64 << 52) - 1);
    let (lead, exp) = if exp_bits == 0 { (0, -1022) } else { (1, exp_bits - 1023) };
    let digits = format!("{mantissa:013x}");
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        format!("{sign}0x{lead}p{exp:+}")
    } else {
        format!("{sign}0x{lead}.{digits}p{exp:+}")
    }
}

/// Escapes whitespace, control characters, `#`, `\` and every non-ASCII
/// byte as `\ddd`.
pub fn escape_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        if byte <= 32 || byte == b'#' || byte == b'\\' || !byte.is_ascii() {
            let _ = write!(out, "\\{byte:03}");
        } else {
            out.push(char::from(byte));
        }
    }
    out
}
