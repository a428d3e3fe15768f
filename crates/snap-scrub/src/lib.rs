//! Volatile value scrubbing for snapline.
//!
//! Identifiers and timestamps change on every run. The scrubber replaces each
//! distinct value with a numbered placeholder (`Guid_1`, `DateTime_2`, ...)
//! assigned in first-seen order, so repeated runs over equivalent data render
//! identically while equal values stay visibly equal.
//!
//! # Key Types
//!
//! - [`ValueScrubber`] -- Session-scoped scrubber for native and textual values
//! - [`Placeholders`] -- First-seen numbering for one family of values
//! - [`TimestampFormats`] -- Extra strftime formats tried when parsing text
//! - [`ScrubCategory`] / [`Volatile`] -- What kind of value is being scrubbed

pub mod error;
pub mod formats;
pub mod placeholder;
pub mod scrubber;

pub use error::{ScrubError, ScrubResult};
pub use formats::TimestampFormats;
pub use placeholder::Placeholders;
pub use scrubber::{ScrubCategory, ValueScrubber, Volatile};
