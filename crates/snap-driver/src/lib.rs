//! Serialization driver for snapline.
//!
//! One call builds a [`SessionConfig`](snap_settings::SessionConfig) from the
//! settings store, walks the target graph into a `serde_json::Value` tree
//! (members gated by the filter, volatile values scrubbed, type names
//! resolved), and renders the tree with serde_json's pretty printer.
//!
//! # Key Types
//!
//! - [`SerializationDriver`] -- `serialize` and `verify` against a settings store
//! - [`Walker`] -- One graph walk with session-scoped placeholder tables
//! - [`DriverError`] -- Fatal failures of a call

pub mod driver;
pub mod error;
pub mod render;
pub mod walker;

pub use driver::{serialize_with, to_value, SerializationDriver};
pub use error::{DriverError, DriverResult};
pub use render::render;
pub use walker::{Walker, TYPE_TAG};
