//! Foundation types for snapline.
//!
//! This crate provides the runtime type model and the introspection
//! capability the serialization engine walks. Every other snapline crate
//! depends on `snap-types`.
//!
//! # Key Types
//!
//! - [`TypeDescriptor`] -- Structured runtime type identity, parsed from `std::any::type_name`
//! - [`Inspect`] -- The capability a value implements to expose its structure
//! - [`Node`] -- Structural view of one value (leaf, sequence, map, or object)
//! - [`Member`] / [`MemberInfo`] -- A named member with a deferred, fallible read
//! - [`EvalError`] / [`ErrorKind`] -- Classified member evaluation failures
//! - [`Callable`] -- Identity of a function item or closure
//! - [`Sequence`] -- A captured, possibly runtime-generated sequence
//! - [`NamedValues`] -- Several values verified together under their own names

pub mod callable;
pub mod descriptor;
pub mod error;
pub mod impls;
pub mod inspect;
pub mod named;
mod parse;
pub mod sequence;

pub use callable::Callable;
pub use descriptor::{TypeDescriptor, TypeFlags, TypeKind};
pub use error::{ErrorKind, EvalError};
pub use inspect::{Inspect, Member, MemberInfo, Node, ObjectBuilder, Reading};
pub use named::NamedValues;
pub use sequence::Sequence;
