//! Type name resolution for snapline.
//!
//! Turns a runtime [`TypeDescriptor`](snap_types::TypeDescriptor) into the
//! short name that appears in snapshots: namespaces stripped at every depth,
//! generic arguments resolved recursively, compiler-synthesized types
//! collapsed to a fixed token.
//!
//! # Key Types
//!
//! - [`TypeNameResolver`] -- Resolves descriptors to canonical names
//! - [`NullableDisplay`] -- How `Option<T>` is rendered
//! - [`NameError`] -- Resolution failures

pub mod error;
pub mod resolver;

pub use error::{NameError, NameResult};
pub use resolver::{NullableDisplay, TypeNameResolver, DYNAMIC_TOKEN};
