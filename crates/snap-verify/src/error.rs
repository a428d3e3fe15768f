//! Error types for verification.

use thiserror::Error;

/// Verification failures.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Received text differs from the approved text.
    #[error("received text does not match approved text:\n{diff}")]
    Mismatch { diff: String },

    /// The verifier could not complete, for reasons of its own.
    #[error("verifier failed: {0}")]
    Failed(String),
}
