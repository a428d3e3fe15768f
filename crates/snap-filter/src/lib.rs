//! Member filtering for snapline.
//!
//! Decides which members of an object reach the output. Rules are evaluated
//! in a fixed order, first match wins:
//!
//! 1. deprecated members
//! 2. members declared on, or holding values of, an ignored type
//! 3. explicit `(declaring type, name)` rules, honouring base types
//! 4. instance predicates over the evaluated value
//! 5. empty collections (emission time)
//! 6. `false` booleans (emission time)
//!
//! Members whose evaluation fails are judged against the ignorable-error
//! rules before any of the above can see a value.
//!
//! # Key Types
//!
//! - [`IgnoreRule`] / [`ErrorRule`] -- Registered exclusions
//! - [`RuleSet`] -- Ordered rule collection owned by the settings store
//! - [`MemberFilter`] -- The policy applied during one walk
//! - [`Verdict`] / [`Exclusion`] -- Outcome of a check and its reason

pub mod policy;
pub mod rule;

pub use policy::{Exclusion, MemberFilter, Verdict};
pub use rule::{ErrorPredicate, ErrorRule, IgnoreRule, InstancePredicate, RuleSet};
