//! Error types for the settings crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring snapline.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An ignore rule does not denote a single member.
    #[error("invalid member {name:?} on {type_name}: {reason}")]
    InvalidMember {
        type_name: String,
        name: String,
        reason: String,
    },

    /// A timestamp format failed validation.
    #[error("invalid timestamp format: {0}")]
    InvalidFormat(#[from] snap_scrub::ScrubError),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`SnapConfig`](crate::SnapConfig).
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A thread panicked while holding the settings lock.
    #[error("settings lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience alias for settings results.
pub type SettingsResult<T> = Result<T, SettingsError>;
