//! Rendering options handed to the JSON writer.

use serde::{Deserialize, Serialize};
use snap_names::NullableDisplay;

/// When objects carry a `"$type"` entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTagMode {
    Never,
    /// Only when the runtime type differs from the declared type.
    #[default]
    Auto,
    Always,
}

/// Options for the serializer session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Spaces per indentation level.
    pub indent: usize,
    pub type_tags: TypeTagMode,
    pub nullable_display: NullableDisplay,
    /// Omit members whose value is null, `false`, zero, nil or the epoch.
    pub omit_defaults: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            type_tags: TypeTagMode::Auto,
            nullable_display: NullableDisplay::Marker,
            omit_defaults: true,
        }
    }
}
