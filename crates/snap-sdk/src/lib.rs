//! High-level API for snapline.
//!
//! Snapshot testing serializes an object graph into canonical text and
//! compares it with an approved baseline. [`Approver`] owns the settings
//! store and the serialization driver, and is the entry point for test code.
//!
//! # Key Types
//!
//! - [`Approver`] -- Configure once, then `serialize` or `verify` any graph
//! - [`SdkError`] -- Every failure a call can surface

pub mod approver;
pub mod error;

#[cfg(test)]
mod scenarios;

pub use approver::Approver;
pub use error::{SdkError, SdkResult};

// Re-export key types
pub use snap_driver::TYPE_TAG;
pub use snap_names::NullableDisplay;
pub use snap_settings::{
    Overrides, SerializerOptions, SettingsStore, SnapConfig, ThreadingMode, TypeTagMode,
};
pub use snap_types::{
    inspect_enum, inspect_struct, Callable, ErrorKind, EvalError, Inspect, NamedValues, Node,
    ObjectBuilder, Sequence, TypeDescriptor,
};
pub use snap_verify::{redaction, Expect, Redaction, Verifier, VerifyError};
