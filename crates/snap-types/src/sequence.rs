//! Captured iterator output.

use crate::descriptor::TypeDescriptor;
use crate::inspect::{Inspect, Node, Reading};

/// Items drained from an iterator, remembering the iterator's type.
///
/// Iterators are consumed by walking them, so the items are collected up
/// front. The descriptor is the iterator's own, flagged synthesized when the
/// pipeline involves closures, so its name resolves through the iterator
/// interface rather than the adapter chain.
#[derive(Debug)]
pub struct Sequence<T> {
    descriptor: TypeDescriptor,
    items: Vec<T>,
}

impl<T> Sequence<T> {
    pub fn capture<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            descriptor: TypeDescriptor::of_iter::<I::IntoIter>(),
            items: iter.into_iter().collect(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: Inspect> Inspect for Sequence<T> {
    fn descriptor(&self) -> TypeDescriptor {
        self.descriptor.clone()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Seq(
            self.items
                .iter()
                .map(|item| Reading::Borrowed(item as &dyn Inspect))
                .collect(),
        )
    }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::path("core::iter::Iterator")
            .with_generic_args(vec![T::describe()])
            .collection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_of_mapped_iterator_is_synthesized() {
        let seq = Sequence::capture((1..4).map(|n: i64| n * 10));
        assert_eq!(seq.items(), &[10, 20, 30]);
        let d = Inspect::descriptor(&seq);
        assert!(d.is_synthesized());
        assert_eq!(d.item_type().map(|t| t.name()), Some("i64"));
    }

    #[test]
    fn capture_of_plain_range_is_not_synthesized() {
        let seq = Sequence::capture(0u8..2);
        assert!(!Inspect::descriptor(&seq).is_synthesized());
        assert!(Sequence::<u8>::describe().is_collection());
    }
}
