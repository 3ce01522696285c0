use crate::span::Span;
use std::path::PathBuf;
use thiserror::Error;

/// Error category, one per process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Undefined,
    FunctionSignature,
    Redefinition,
    TypeIncompatibility,
    TypeUndetermined,
    UnusedVariable,
    Internal,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Lexical => 1,
            ErrorKind::Syntax => 2,
            ErrorKind::Undefined => 3,
            ErrorKind::FunctionSignature => 4,
            ErrorKind::Redefinition => 5,
            ErrorKind::TypeIncompatibility => 7,
            ErrorKind::TypeUndetermined => 8,
            ErrorKind::UnusedVariable => 9,
            ErrorKind::Internal => 99,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "lexical",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Undefined => "undefined",
            ErrorKind::FunctionSignature => "function signature",
            ErrorKind::Redefinition => "redefinition",
            ErrorKind::TypeIncompatibility => "type",
            ErrorKind::TypeUndetermined => "type inference",
            ErrorKind::UnusedVariable => "unused variable",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Lexical error on line {}: {msg}", span.line)]
    Lexical { msg: String, span: Span },

    #[error("Syntax error on line {}: {msg}", span.line)]
    Syntax { msg: String, span: Span },

    #[error("Undefined error on line {}: {msg}", span.line)]
    Undefined { msg: String, span: Span },

    #[error("Function signature error on line {}: {msg}", span.line)]
    FunctionSignature { msg: String, span: Span },

    #[error("Redefinition error on line {}: {msg}", span.line)]
    Redefinition { msg: String, span: Span },

    #[error("Type error on line {}: {msg}", span.line)]
    TypeIncompatibility { msg: String, span: Span },

    #[error("Type inference error on line {}: {msg}", span.line)]
    TypeUndetermined { msg: String, span: Span },

    #[error("Unused variable error on line {}: {msg}", span.line)]
    UnusedVariable { msg: String, span: Span },

    #[error("Internal error: {msg}")]
    Internal { msg: String, span: Span },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexical(msg: impl Into<String>, span: Span) -> Self {
        Self::Lexical { msg: msg.into(), span }
    }

    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn undefined(msg: impl Into<String>, span: Span) -> Self {
        Self::Undefined { msg: msg.into(), span }
    }

    pub fn signature(msg: impl Into<String>, span: Span) -> Self {
        Self::FunctionSignature { msg: msg.into(), span }
    }

    pub fn redefinition(msg: impl Into<String>, span: Span) -> Self {
        Self::Redefinition { msg: msg.into(), span }
    }

    pub fn type_err(msg: impl Into<String>, span: Span) -> Self {
        Self::TypeIncompatibility { msg: msg.into(), span }
    }

    pub fn undetermined(msg: impl Into<String>, span: Span) -> Self {
        Self::TypeUndetermined { msg: msg.into(), span }
    }

    pub fn unused(msg: impl Into<String>, span: Span) -> Self {
        Self::UnusedVariable { msg: msg.into(), span }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal { msg: msg.into(), span: Span::dummy() }
    }

    /// Internal failure tied to a source construct, e.g. a full scope.
    pub fn internal_at(msg: impl Into<String>, span: Span) -> Self {
        Self::Internal { msg: msg.into(), span }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::Lexical { .. } => ErrorKind::Lexical,
            CompileError::Syntax { .. } => ErrorKind::Syntax,
            CompileError::Undefined { .. } => ErrorKind::Undefined,
            CompileError::FunctionSignature { .. } => ErrorKind::FunctionSignature,
            CompileError::Redefinition { .. } => ErrorKind::Redefinition,
            CompileError::TypeIncompatibility { .. } => ErrorKind::TypeIncompatibility,
            CompileError::TypeUndetermined { .. } => ErrorKind::TypeUndetermined,
            CompileError::UnusedVariable { .. } => ErrorKind::UnusedVariable,
            CompileError::Internal { .. } | CompileError::Config { .. } | CompileError::Io(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Source span of the offending construct, if the error has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Lexical { span, .. }
            | CompileError::Syntax { span, .. }
            | CompileError::Undefined { span, .. }
            | CompileError::FunctionSignature { span, .. }
            | CompileError::Redefinition { span, .. }
            | CompileError::TypeIncompatibility { span, .. }
            | CompileError::TypeUndetermined { span, .. }
            | CompileError::UnusedVariable { span, .. } => Some(*span),
            CompileError::Internal { span, .. } if span.line > 0 => Some(*span),
            CompileError::Internal { .. } | CompileError::Config { .. } | CompileError::Io(_) => None,
        }
    }

    /// 1-based source line, or 0 when the error is not tied to the source.
    pub fn line(&self) -> usize {
        self.span().map_or(0, |s| s.line)
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

/// Render a CompileError with ariadne for nice terminal output.
pub fn render_error(source: &str, filename: &str, err: &CompileError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match (err.span(), err) {
        (Some(span), _) => {
            let msg = match err {
                CompileError::Lexical { msg, .. }
                | CompileError::Syntax { msg, .. }
                | CompileError::Undefined { msg, .. }
                | CompileError::FunctionSignature { msg, .. }
                | CompileError::Redefinition { msg, .. }
                | CompileError::TypeIncompatibility { msg, .. }
                | CompileError::TypeUndetermined { msg, .. }
                | CompileError::UnusedVariable { msg, .. }
                | CompileError::Internal { msg, .. } => msg.as_str(),
                _ => "",
            };
            let start = span.start.min(source.len());
            let end = span.end.clamp(start, source.len());
            let printed = Report::build(ReportKind::Error, (), start)
                .with_message(format!("{} error in {filename} (line {})", err.kind().label(), span.line))
                .with_label(Label::new(start..end).with_message(msg))
                .finish()
                .eprint(Source::from(source));
            if printed.is_err() {
                eprintln!("error [{filename}]: {err}");
            }
        }
        (None, CompileError::Config { msg, path }) => {
            eprintln!("error[config]: {msg}");
            eprintln!("  --> {}", path.display());
        }
        (None, _) => {
            eprintln!("error: {err}");
        }
    }
}
