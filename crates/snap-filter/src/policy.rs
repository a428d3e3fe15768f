//! The per-member inclusion policy.
//!
//! Checks are split by what they need: [`MemberFilter::admit`] runs on static
//! member facts before evaluation, [`MemberFilter::admit_value`] on the
//! evaluated value, and [`MemberFilter::emission`] on the value's shape right
//! before it is written.

use snap_types::{EvalError, Inspect, MemberInfo, Node};
use tracing::debug;

use crate::rule::RuleSet;

/// Why a member was left out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exclusion {
    Deprecated,
    IgnoredType,
    IgnoredMember,
    IgnoredInstance,
    EmptyCollection,
    FalseBoolean,
}

/// Outcome of one check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Include,
    Exclude(Exclusion),
}

impl Verdict {
    pub fn is_include(self) -> bool {
        self == Verdict::Include
    }
}

/// Member inclusion policy for one serialization call.
#[derive(Clone, Copy, Debug)]
pub struct MemberFilter<'r> {
    rules: &'r RuleSet,
    ignore_empty_collections: bool,
    ignore_false: bool,
}

impl<'r> MemberFilter<'r> {
    pub fn new(rules: &'r RuleSet, ignore_empty_collections: bool, ignore_false: bool) -> Self {
        Self {
            rules,
            ignore_empty_collections,
            ignore_false,
        }
    }

    /// Checks that need no value: deprecation, ignored types, ignored names.
    pub fn admit(&self, info: &MemberInfo) -> Verdict {
        let verdict = if info.deprecated {
            Verdict::Exclude(Exclusion::Deprecated)
        } else if self.rules.ignores_type_of(info) {
            Verdict::Exclude(Exclusion::IgnoredType)
        } else if self.rules.ignores_member(info) {
            Verdict::Exclude(Exclusion::IgnoredMember)
        } else {
            Verdict::Include
        };
        trace_exclusion(info, verdict);
        verdict
    }

    /// Instance predicates over the evaluated value.
    pub fn admit_value(&self, info: &MemberInfo, value: &dyn Inspect) -> Verdict {
        let verdict = if self.rules.ignores_instance(&info.value_type, value) {
            Verdict::Exclude(Exclusion::IgnoredInstance)
        } else {
            Verdict::Include
        };
        trace_exclusion(info, verdict);
        verdict
    }

    /// The full inclusion contract: [`admit`](Self::admit) then
    /// [`admit_value`](Self::admit_value).
    pub fn should_include(&self, info: &MemberInfo, value: &dyn Inspect) -> bool {
        self.admit(info).is_include() && self.admit_value(info, value).is_include()
    }

    /// Emission-time suppression of empty collections and `false`.
    ///
    /// A null collection is left to default-value handling.
    pub fn emission(&self, info: &MemberInfo, node: &Node<'_>) -> Verdict {
        let verdict = match node {
            Node::Seq(_) | Node::Map(_)
                if self.ignore_empty_collections
                    && info.value_type.is_collection()
                    && node.is_empty_collection() =>
            {
                Verdict::Exclude(Exclusion::EmptyCollection)
            }
            Node::Bool(false) if self.ignore_false => Verdict::Exclude(Exclusion::FalseBoolean),
            _ => Verdict::Include,
        };
        trace_exclusion(info, verdict);
        verdict
    }

    /// Returns `true` if the failure drops the member instead of the call.
    pub fn is_ignorable(&self, error: &EvalError) -> bool {
        self.rules.is_ignorable(error)
    }
}

fn trace_exclusion(info: &MemberInfo, verdict: Verdict) {
    if let Verdict::Exclude(reason) = verdict {
        debug!(
            member = %info.name,
            declaring_type = %info.declaring_type,
            ?reason,
            "member excluded"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::sync::Arc;

    use snap_types::{ErrorKind, TypeDescriptor};

    use super::*;
    use crate::rule::{ErrorRule, IgnoreRule};

    struct Owner;

    fn info<T: Inspect>(name: &'static str) -> MemberInfo {
        MemberInfo {
            name: Cow::Borrowed(name),
            declaring_type: TypeDescriptor::of::<Owner>(),
            value_type: T::describe(),
            deprecated: false,
        }
    }

    #[test]
    fn deprecated_wins_over_everything() {
        let rules = RuleSet::new();
        let filter = MemberFilter::new(&rules, true, true);
        let mut member = info::<i32>("Old");
        member.deprecated = true;
        assert_eq!(filter.admit(&member), Verdict::Exclude(Exclusion::Deprecated));
    }

    #[test]
    fn ignored_type_checked_before_member_name() {
        let mut rules = RuleSet::new();
        rules.push(IgnoreRule::Member {
            declaring_type: TypeDescriptor::of::<Owner>(),
            name: "Id".into(),
        });
        rules.push(IgnoreRule::Type(TypeDescriptor::of::<String>()));
        let filter = MemberFilter::new(&rules, true, true);
        assert_eq!(
            filter.admit(&info::<String>("Id")),
            Verdict::Exclude(Exclusion::IgnoredType)
        );
        assert_eq!(
            filter.admit(&info::<i32>("Id")),
            Verdict::Exclude(Exclusion::IgnoredMember)
        );
        assert_eq!(filter.admit(&info::<i32>("Count")), Verdict::Include);
    }

    #[test]
    fn instance_predicate_applies_to_value() {
        let mut rules = RuleSet::new();
        rules.push(IgnoreRule::Instance {
            value_type: TypeDescriptor::of::<String>(),
            predicate: Arc::new(|v: &dyn Inspect| {
                v.as_any()
                    .and_then(|a| a.downcast_ref::<String>())
                    .is_some_and(|s| s.is_empty())
            }),
        });
        let filter = MemberFilter::new(&rules, true, true);
        let member = info::<String>("Nick");
        assert!(!filter.should_include(&member, &String::new()));
        assert!(filter.should_include(&member, &String::from("Jo")));
    }

    #[test]
    fn empty_collections_suppressed_only_when_enabled() {
        let rules = RuleSet::new();
        let member = info::<Vec<i32>>("Items");
        let empty: Vec<i32> = Vec::new();

        let on = MemberFilter::new(&rules, true, true);
        assert_eq!(
            on.emission(&member, &empty.inspect()),
            Verdict::Exclude(Exclusion::EmptyCollection)
        );
        assert_eq!(on.emission(&member, &vec![1].inspect()), Verdict::Include);
        assert_eq!(on.emission(&member, &Node::Null), Verdict::Include);

        let off = MemberFilter::new(&rules, false, true);
        assert_eq!(off.emission(&member, &empty.inspect()), Verdict::Include);
    }

    #[test]
    fn strings_are_not_collections() {
        let rules = RuleSet::new();
        let filter = MemberFilter::new(&rules, true, true);
        let member = info::<String>("Name");
        assert_eq!(filter.emission(&member, &Node::Seq(Vec::new())), Verdict::Include);
    }

    #[test]
    fn false_booleans_suppressed_only_when_enabled() {
        let rules = RuleSet::new();
        let member = info::<bool>("Active");
        let on = MemberFilter::new(&rules, true, true);
        let off = MemberFilter::new(&rules, true, false);
        assert_eq!(
            on.emission(&member, &Node::Bool(false)),
            Verdict::Exclude(Exclusion::FalseBoolean)
        );
        assert_eq!(on.emission(&member, &Node::Bool(true)), Verdict::Include);
        assert_eq!(off.emission(&member, &Node::Bool(false)), Verdict::Include);
    }

    #[test]
    fn ignorable_errors_follow_rules() {
        let mut rules = RuleSet::new();
        rules.push(IgnoreRule::Error(ErrorRule::Kind(ErrorKind::NotSupported)));
        let filter = MemberFilter::new(&rules, true, true);
        assert!(filter.is_ignorable(&EvalError::not_supported("x")));
        assert!(!filter.is_ignorable(&EvalError::not_implemented("x")));
    }
}
