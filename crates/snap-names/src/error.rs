//! Error types for type name resolution.

/// Errors that can occur while resolving a type name.
#[derive(Debug, thiserror::Error)]
pub enum NameError {
    /// The descriptor (or one nested in it) has no name to render.
    #[error("type has no accessible name: {0:?}")]
    Unnamed(String),
}

/// Convenience alias for name resolution results.
pub type NameResult<T> = Result<T, NameError>;
