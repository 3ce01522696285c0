use serde::Serialize;

use crate::lexer::TokenKind;

/// Declared type of a variable, parameter or function result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    Int,
    Float,
    Str,
    NullableInt,
    NullableFloat,
    NullableStr,
    /// Function result only.
    Void,
    /// Built-in parameters accepting every term.
    Any,
}

impl DataType {
    pub fn from_token(kind: TokenKind) -> Option<DataType> {
        let ty = match kind {
            TokenKind::TypeInt => DataType::Int,
            TokenKind::TypeFloat => DataType::Float,
            TokenKind::TypeStr => DataType::Str,
            TokenKind::TypeNullableInt => DataType::NullableInt,
            TokenKind::TypeNullableFloat => DataType::NullableFloat,
            TokenKind::TypeNullableStr => DataType::NullableStr,
            TokenKind::Void => DataType::Void,
            _ => return None,
        };
        Some(ty)
    }

    pub fn is_nullable(self) -> bool {
        matches!(self, DataType::NullableInt | DataType::NullableFloat | DataType::NullableStr)
    }

    /// `?T` -> `T`; other types are returned unchanged.
    pub fn base(self) -> DataType {
        match self {
            DataType::NullableInt => DataType::Int,
            DataType::NullableFloat => DataType::Float,
            DataType::NullableStr => DataType::Str,
            other => other,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Int => write!(f, "i32"),
            DataType::Float => write!(f, "f64"),
            DataType::Str => write!(f, "[]u8"),
            DataType::NullableInt => write!(f, "?i32"),
            DataType::NullableFloat => write!(f, "?f64"),
            DataType::NullableStr => write!(f, "?[]u8"),
            DataType::Void => write!(f, "void"),
            DataType::Any => write!(f, "any"),
        }
    }
}

/// Type of an evaluated expression or call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprType {
    Value(DataType),
    /// Result of one relational comparison.
    Bool,
    /// The `null` literal.
    Null,
    /// A string literal; only `ifj.string` and `ifj.write` take one.
    StrLiteral,
}

impl ExprType {
    pub fn is(self, ty: DataType) -> bool {
        self == ExprType::Value(ty)
    }

    pub fn numeric(self) -> Option<DataType> {
        match self {
            ExprType::Value(ty) if ty.is_numeric() => Some(ty),
            _ => None,
        }
    }

    /// Can a value of this type be stored into a slot declared `target`?
    pub fn assignable_to(self, target: DataType) -> bool {
        match (self, target) {
            (_, DataType::Any) => true,
            (ExprType::Value(DataType::Void), _) => false,
            (ExprType::Value(ty), target) if ty == target => true,
            (ExprType::Value(ty), target) => target.is_nullable() && !ty.is_nullable() && target.base() == ty,
            (ExprType::Null, target) => target.is_nullable(),
            (ExprType::Bool | ExprType::StrLiteral, _) => false,
        }
    }
}

impl std::fmt::Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprType::Value(ty) => write!(f, "{ty}"),
            ExprType::Bool => write!(f, "bool"),
            ExprType::Null => write!(f, "null"),
            ExprType::StrLiteral => write!(f, "string literal"),
        }
    }
}
