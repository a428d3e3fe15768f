//! Verification contract for snapline.
//!
//! The serializer produces canonical text; deciding whether that text is
//! acceptable belongs to a [`Verifier`]. Storage of approved baselines, file
//! naming and diff tools live behind this trait.
//!
//! # Key Types
//!
//! - [`Verifier`] -- Pass/fail decision over received text
//! - [`Redaction`] -- Caller-supplied text transform applied before verifying
//! - [`Expect`] -- In-memory verifier with unified diff output

pub mod error;
pub mod expect;

pub use error::VerifyError;
pub use expect::Expect;

use std::sync::Arc;

/// Text transform applied to canonical text before verification.
pub type Redaction = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Decides whether received text matches the approved baseline.
pub trait Verifier: Send + Sync {
    fn verify(&self, received: &str) -> Result<(), VerifyError>;
}

impl<F> Verifier for F
where
    F: Fn(&str) -> Result<(), VerifyError> + Send + Sync,
{
    fn verify(&self, received: &str) -> Result<(), VerifyError> {
        self(received)
    }
}

/// Build a [`Redaction`] from a closure.
pub fn redaction<F>(transform: F) -> Redaction
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    Arc::new(transform)
}
