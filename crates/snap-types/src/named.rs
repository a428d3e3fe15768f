//! Ad-hoc groups of named values.

use crate::descriptor::TypeDescriptor;
use crate::inspect::{Inspect, Node, Reading};

/// Values verified together under caller-chosen names.
///
/// Inspects as a map whose entries keep the order they were given in.
pub struct NamedValues<'a> {
    entries: Vec<(&'a str, &'a dyn Inspect)>,
}

impl<'a> NamedValues<'a> {
    pub fn new(entries: &[(&'a str, &'a dyn Inspect)]) -> Self {
        Self {
            entries: entries.to_vec(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// The first name given more than once, if any.
    pub fn duplicate(&self) -> Option<&'a str> {
        self.entries
            .iter()
            .enumerate()
            .find(|(i, (name, _))| self.entries[..*i].iter().any(|(seen, _)| seen == name))
            .map(|(_, (name, _))| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Inspect for NamedValues<'_> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::path("snap_types::named::NamedValues")
    }

    fn inspect(&self) -> Node<'_> {
        Node::Map(
            self.entries
                .iter()
                .map(|(name, value)| (name.to_string(), Reading::Borrowed(*value)))
                .collect(),
        )
    }
}
