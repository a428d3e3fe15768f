//! Error types for the driver.

use thiserror::Error;

/// Fatal failures of a serialization call. No partial output is returned.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A member getter failed with an error no rule marks as ignorable.
    #[error("failed to evaluate {type_name}.{member}: {source}")]
    MemberEvaluation {
        type_name: String,
        member: String,
        #[source]
        source: snap_types::EvalError,
    },

    /// A type in the graph has no name to render.
    #[error("type name resolution failed: {0}")]
    TypeName(#[from] snap_names::NameError),

    /// The JSON writer failed.
    #[error("json rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The writer produced bytes that are not UTF-8.
    #[error("rendered text is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The settings store could not produce a session.
    #[error("settings error: {0}")]
    Settings(#[from] snap_settings::SettingsError),

    /// The verifier rejected the text.
    #[error(transparent)]
    Verify(#[from] snap_verify::VerifyError),
}

/// Convenience alias for driver results.
pub type DriverResult<T> = Result<T, DriverError>;
