//! The fixed `ifj.*` namespace: compiler-known functions registered into the
//! global scope after the signature pre-pass.

use serde::Serialize;

use crate::typeck::types::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Builtin {
    ReadStr,
    ReadI32,
    ReadF64,
    Write,
    I2F,
    F2I,
    String,
    Length,
    Concat,
    Substr,
    Strcmp,
    Ord,
    Chr,
}

pub const ALL: [Builtin; 13] = [
    Builtin::ReadStr,
    Builtin::ReadI32,
    Builtin::ReadF64,
    Builtin::Write,
    Builtin::I2F,
    Builtin::F2I,
    Builtin::String,
    Builtin::Length,
    Builtin::Concat,
    Builtin::Substr,
    Builtin::Strcmp,
    Builtin::Ord,
    Builtin::Chr,
];

impl Builtin {
    /// Fully qualified name as stored in the symbol table.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::ReadStr => "ifj.readstr",
            Builtin::ReadI32 => "ifj.readi32",
            Builtin::ReadF64 => "ifj.readf64",
            Builtin::Write => "ifj.write",
            Builtin::I2F => "ifj.i2f",
            Builtin::F2I => "ifj.f2i",
            Builtin::String => "ifj.string",
            Builtin::Length => "ifj.length",
            Builtin::Concat => "ifj.concat",
            Builtin::Substr => "ifj.substr",
            Builtin::Strcmp => "ifj.strcmp",
            Builtin::Ord => "ifj.ord",
            Builtin::Chr => "ifj.chr",
        }
    }

    pub fn params(self) -> &'static [(&'static str, DataType)] {
        use DataType::*;
        match self {
            Builtin::ReadStr | Builtin::ReadI32 | Builtin::ReadF64 => &[],
            Builtin::Write => &[("term", Any)],
            Builtin::I2F => &[("term", Int)],
            Builtin::F2I => &[("term", Float)],
            Builtin::String => &[("term", Any)],
            Builtin::Length => &[("s", Str)],
            Builtin::Concat => &[("s1", Str), ("s2", Str)],
            Builtin::Substr => &[("s", Str), ("i", Int), ("j", Int)],
            Builtin::Strcmp => &[("s1", Str), ("s2", Str)],
            Builtin::Ord => &[("s", Str), ("i", Int)],
            Builtin::Chr => &[("i", Int)],
        }
    }

    pub fn return_type(self) -> DataType {
        match self {
            Builtin::ReadStr => DataType::NullableStr,
            Builtin::ReadI32 => DataType::NullableInt,
            Builtin::ReadF64 => DataType::NullableFloat,
            Builtin::Write => DataType::Void,
            Builtin::I2F => DataType::Float,
            Builtin::F2I => DataType::Int,
            Builtin::String | Builtin::Concat | Builtin::Chr => DataType::Str,
            Builtin::Substr => DataType::NullableStr,
            Builtin::Length | Builtin::Strcmp | Builtin::Ord => DataType::Int,
        }
    }

    /// `ifj.string` is the only way to turn a literal into a `[]u8` value.
    pub fn accepts_string_literal(self) -> bool {
        matches!(self, Builtin::String | Builtin::Write)
    }
}
