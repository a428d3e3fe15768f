//! Error types for the scrub crate.

/// Errors that can occur while configuring the scrubber.
#[derive(Debug, thiserror::Error)]
pub enum ScrubError {
    /// A timestamp format string contains an invalid strftime item.
    #[error("invalid timestamp format {0:?}")]
    InvalidFormat(String),
}

/// Convenience alias for scrub results.
pub type ScrubResult<T> = Result<T, ScrubError>;
