//! First-seen placeholder numbering.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

/// Assigns `Prefix_N` tokens to distinct values, numbered from 1 in the order
/// values are first seen. The same value always gets the same token.
#[derive(Clone, Debug)]
pub struct Placeholders<K> {
    prefix: &'static str,
    assigned: HashMap<K, usize>,
}

impl<K: Eq + Hash> Placeholders<K> {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            assigned: HashMap::new(),
        }
    }

    /// Token for `value`, allocating the next index on first sight.
    pub fn token(&mut self, value: K) -> String {
        let next = self.assigned.len() + 1;
        let index = *self.assigned.entry(value).or_insert_with(|| {
            debug!(prefix = self.prefix, index = next, "allocated placeholder");
            next
        });
        format!("{}_{}", self.prefix, index)
    }

    /// Number of distinct values seen so far.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_in_first_seen_order() {
        let mut p = Placeholders::new("Guid");
        assert_eq!(p.token("b"), "Guid_1");
        assert_eq!(p.token("a"), "Guid_2");
        assert_eq!(p.token("b"), "Guid_1");
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn starts_empty() {
        let p: Placeholders<u32> = Placeholders::new("DateTime");
        assert!(p.is_empty());
    }
}
