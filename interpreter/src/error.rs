use std::ops::Range;

use thiserror::Error;

/// What went wrong, independent of where.
///
/// Token payloads and expression trees have no source position, so their
/// operations report a bare `ErrorKind`. The lexer and parser attach the
/// offending span and report an [`Error`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// Numeric literal text that does not parse as a float.
    #[error("invalid token {0:?}")]
    InvalidToken(String),

    /// Text outside the fixed operator set.
    #[error("invalid operator {0:?}")]
    InvalidOperator(String),

    #[error("unmatched parenthesis, expected \")\"")]
    UnmatchedParenthesis,

    /// A token that is not allowed at its position in the grammar.
    #[error("unexpected token {0:?}")]
    UnexpectedToken(String),

    /// The operator has no semantic function taking this many operands.
    #[error("operator {symbol:?} does not take {arity} operand(s)")]
    UnsupportedArity { symbol: String, arity: usize },

    #[error("cannot {operation} token {token:?}")]
    UnsupportedOperation {
        operation: &'static str,
        token: String,
    },

    #[error("invalid operation on {0}")]
    InvalidOperation(String),

    #[error("unbound variable {0:?}")]
    UnboundVariable(String),
}

impl ErrorKind {
    pub fn at(self, span: Range<usize>) -> Error {
        Error::new(self, span)
    }
}

/// An [`ErrorKind`] together with the character span of the source it was
/// raised for.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {}..{}", .span.start, .span.end)]
pub struct Error {
    pub kind: ErrorKind,
    pub span: Range<usize>,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Range<usize>) -> Self {
        Error { kind, span }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn map(self, f: impl FnOnce(ErrorKind) -> ErrorKind) -> Error {
        Error {
            kind: f(self.kind),
            span: self.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_span() {
        let err = ErrorKind::UnexpectedToken("+".into()).at(2..3);
        assert_eq!(err.to_string(), "unexpected token \"+\" at 2..3");
    }

    #[test]
    fn map_keeps_span() {
        let err = ErrorKind::UnsupportedArity {
            symbol: "sin".into(),
            arity: 2,
        }
        .at(4..7)
        .map(|kind| match kind {
            ErrorKind::UnsupportedArity { symbol, .. } => ErrorKind::UnexpectedToken(symbol),
            other => other,
        });
        assert_eq!(err.kind(), &ErrorKind::UnexpectedToken("sin".into()));
        assert_eq!(err.span, 4..7);
    }

    fn _assert_send_sync_static<T: Send + Sync + 'static>() {}

    #[test]
    fn error_is_send_sync_static() {
        _assert_send_sync_static::<Error>();
    }
}
