//! Member evaluation errors.

use std::fmt;

use thiserror::Error;

/// Classification of a member evaluation failure.
///
/// Ignore rules match on this value rather than on concrete error types, so
/// any error model can be mapped onto it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The member's getter is not implemented.
    NotImplemented,
    /// The member cannot be read on this instance.
    NotSupported,
    /// The instance is in a state where the member is not meaningful.
    InvalidOperation,
    /// A caller-defined classification.
    Custom(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "not implemented"),
            Self::NotSupported => write!(f, "not supported"),
            Self::InvalidOperation => write!(f, "invalid operation"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Error raised while reading a member's value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct EvalError {
    kind: ErrorKind,
    message: String,
}

impl EvalError {
    /// Create an error with an explicit kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, message)
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotSupported, message)
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation, message)
    }

    /// Create an error with a caller-defined kind name.
    pub fn custom(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Custom(kind.into()), message)
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = EvalError::not_supported("stream is closed");
        assert_eq!(err.to_string(), "not supported: stream is closed");
    }

    #[test]
    fn custom_kind_display() {
        let err = EvalError::custom("Timeout", "backend slow");
        assert_eq!(err.kind(), &ErrorKind::Custom("Timeout".into()));
        assert_eq!(err.to_string(), "Timeout: backend slow");
    }
}
