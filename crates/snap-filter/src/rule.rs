//! Ignore rules.

use std::fmt;
use std::sync::Arc;

use snap_types::{ErrorKind, EvalError, Inspect, MemberInfo, TypeDescriptor};

/// Predicate over an evaluated member value.
pub type InstancePredicate = Arc<dyn Fn(&dyn Inspect) -> bool + Send + Sync>;

/// Predicate over a member evaluation failure.
pub type ErrorPredicate = Arc<dyn Fn(&EvalError) -> bool + Send + Sync>;

/// Classifies member evaluation failures as ignorable.
#[derive(Clone)]
pub enum ErrorRule {
    /// Exact kind match.
    Kind(ErrorKind),
    Predicate(ErrorPredicate),
}

impl ErrorRule {
    pub fn matches(&self, error: &EvalError) -> bool {
        match self {
            ErrorRule::Kind(kind) => error.kind() == kind,
            ErrorRule::Predicate(predicate) => predicate(error),
        }
    }
}

impl fmt::Debug for ErrorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorRule::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            ErrorRule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// One registered exclusion.
#[derive(Clone)]
pub enum IgnoreRule {
    /// A member by name on a type or any type assignable to it.
    Member {
        declaring_type: TypeDescriptor,
        name: String,
    },
    /// Members declared on, or whose value type is assignable to, this type.
    Type(TypeDescriptor),
    /// Values of this type for which the predicate holds.
    Instance {
        value_type: TypeDescriptor,
        predicate: InstancePredicate,
    },
    /// Member evaluation failures that drop the member instead of failing.
    Error(ErrorRule),
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreRule::Member {
                declaring_type,
                name,
            } => f
                .debug_struct("Member")
                .field("declaring_type", &declaring_type.to_string())
                .field("name", name)
                .finish(),
            IgnoreRule::Type(ty) => f.debug_tuple("Type").field(&ty.to_string()).finish(),
            IgnoreRule::Instance { value_type, .. } => f
                .debug_struct("Instance")
                .field("value_type", &value_type.to_string())
                .finish_non_exhaustive(),
            IgnoreRule::Error(rule) => f.debug_tuple("Error").field(rule).finish(),
        }
    }
}

/// Ordered collection of ignore rules.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<IgnoreRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: IgnoreRule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &IgnoreRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` if the member's declaring type or value type is
    /// covered by a [`IgnoreRule::Type`] rule.
    pub fn ignores_type_of(&self, info: &MemberInfo) -> bool {
        self.rules.iter().any(|rule| match rule {
            IgnoreRule::Type(ignored) => {
                info.declaring_type.is_assignable_to(ignored)
                    || info.value_type.is_assignable_to(ignored)
            }
            _ => false,
        })
    }

    /// Returns `true` if a [`IgnoreRule::Member`] rule names this member.
    pub fn ignores_member(&self, info: &MemberInfo) -> bool {
        self.rules.iter().any(|rule| match rule {
            IgnoreRule::Member {
                declaring_type,
                name,
            } => *name == info.name && info.declaring_type.is_assignable_to(declaring_type),
            _ => false,
        })
    }

    /// Returns `true` if an instance predicate registered for the value's
    /// type holds. `declared` is the member's static type.
    pub fn ignores_instance(&self, declared: &TypeDescriptor, value: &dyn Inspect) -> bool {
        let runtime = value.descriptor();
        self.rules.iter().any(|rule| match rule {
            IgnoreRule::Instance {
                value_type,
                predicate,
            } => {
                (runtime.is_assignable_to(value_type) || declared.is_assignable_to(value_type))
                    && predicate(value)
            }
            _ => false,
        })
    }

    /// Returns `true` if an error rule classifies the failure as ignorable.
    pub fn is_ignorable(&self, error: &EvalError) -> bool {
        self.rules.iter().any(|rule| match rule {
            IgnoreRule::Error(rule) => rule.matches(error),
            _ => false,
        })
    }
}

impl Extend<IgnoreRule> for RuleSet {
    fn extend<I: IntoIterator<Item = IgnoreRule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}
