//! TOML configuration.
//!
//! ```toml
//! threading_mode = "isolated"
//! scrub_guids = true
//! ignore_false = false
//! date_time_formats = ["%d/%m/%Y %H:%M"]
//!
//! [serializer]
//! indent = 4
//! type_tags = "always"
//! nullable_display = "wrapper"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};
use crate::flags::Flags;
use crate::options::SerializerOptions;
use crate::scope::ThreadingMode;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "SNAP_CONFIG";

/// File-level configuration. Every field is optional in the file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub threading_mode: ThreadingMode,
    #[serde(flatten)]
    pub flags: Flags,
    pub date_time_formats: Vec<String>,
    pub date_time_offset_formats: Vec<String>,
    pub serializer: SerializerOptions,
}

impl SnapConfig {
    pub fn from_toml_str(text: &str) -> SettingsResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load the file named by [`CONFIG_ENV`], or defaults when it is unset.
    pub fn from_env() -> SettingsResult<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
