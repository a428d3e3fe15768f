//! Settings store for snapline.
//!
//! Holds everything that configures a serialization call: ignore rules,
//! scrub toggles, extra timestamp formats, serializer options and the
//! extra-customization hook. The store's lifetime mode is chosen once at
//! construction:
//!
//! - **shared**: one settings instance visible to every thread
//! - **isolated**: each thread lazily receives a private copy of the seed
//!
//! # Key Types
//!
//! - [`SettingsStore`] -- Registration surface and session builder
//! - [`SettingsScope`] -- Lifetime strategy ([`SharedScope`], [`IsolatedScope`])
//! - [`Settings`] -- One complete configuration
//! - [`SessionConfig`] -- Immutable snapshot used by one serialization call
//! - [`Flags`] / [`Overrides`] -- Store-level toggles and per-call overrides
//! - [`SerializerOptions`] -- Rendering options
//! - [`SnapConfig`] -- TOML configuration file

pub mod config;
pub mod error;
pub mod flags;
pub mod options;
pub mod scope;
pub mod settings;
pub mod store;

pub use config::{SnapConfig, CONFIG_ENV};
pub use error::{SettingsError, SettingsResult};
pub use flags::{Flags, Overrides};
pub use options::{SerializerOptions, TypeTagMode};
pub use scope::{IsolatedScope, SettingsScope, SharedScope, ThreadingMode};
pub use settings::{default_rules, ExtraSettings, SessionConfig, Settings};
pub use store::SettingsStore;
