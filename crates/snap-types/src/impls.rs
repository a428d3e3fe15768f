//! [`Inspect`] for std, chrono and uuid types.
//!
//! Smart pointers and `Option` are transparent: they report the runtime type
//! of what they hold. Hash-ordered containers are emitted in sorted order so
//! that output does not depend on the hasher's seed.

use std::any::Any;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt::Display;
use std::io;
use std::rc::{self, Rc};
use std::sync::{self, Arc};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::callable::Callable;
use crate::descriptor::TypeDescriptor;
use crate::inspect::{Inspect, Node, ObjectBuilder, Reading};

macro_rules! inspect_scalar {
    ($variant:ident as $repr:ty: $($ty:ty),*) => {
        $(
            impl Inspect for $ty {
                fn descriptor(&self) -> TypeDescriptor {
                    TypeDescriptor::of::<$ty>()
                }

                fn inspect(&self) -> Node<'_> {
                    Node::$variant(<$repr>::from(*self))
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    Some(self)
                }
            }
        )*
    };
}

inspect_scalar!(I64 as i64: i8, i16, i32, i64);
inspect_scalar!(U64 as u64: u8, u16, u32, u64);
inspect_scalar!(F64 as f64: f32, f64);
inspect_scalar!(Bool as bool: bool);
inspect_scalar!(Char as char: char);

impl Inspect for isize {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<isize>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::I64(*self as i64)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for usize {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<usize>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::U64(*self as u64)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for () {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<()>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Null
    }
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

impl Inspect for str {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<str>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Str(Cow::Borrowed(self))
    }
}

impl Inspect for String {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<String>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Str(Cow::Borrowed(self.as_str()))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for Cow<'_, str> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<String>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Str(Cow::Borrowed(self.as_ref()))
    }
}

// ---------------------------------------------------------------------------
// Transparent wrappers
// ---------------------------------------------------------------------------

impl<T: Inspect> Inspect for Option<T> {
    fn descriptor(&self) -> TypeDescriptor {
        match self {
            Some(value) => value.descriptor(),
            None => TypeDescriptor::of::<Self>(),
        }
    }

    fn inspect(&self) -> Node<'_> {
        match self {
            Some(value) => value.inspect(),
            None => Node::Null,
        }
    }

    fn identity(&self) -> Option<usize> {
        self.as_ref().and_then(Inspect::identity)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        self.as_ref().and_then(Inspect::as_any)
    }
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn descriptor(&self) -> TypeDescriptor {
        (**self).descriptor()
    }

    fn inspect(&self) -> Node<'_> {
        (**self).inspect()
    }

    fn identity(&self) -> Option<usize> {
        (**self).identity()
    }

    fn as_any(&self) -> Option<&dyn Any> {
        (**self).as_any()
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn descriptor(&self) -> TypeDescriptor {
        (**self).descriptor()
    }

    fn inspect(&self) -> Node<'_> {
        (**self).inspect()
    }

    fn identity(&self) -> Option<usize> {
        (**self).identity()
    }

    fn as_any(&self) -> Option<&dyn Any> {
        (**self).as_any()
    }
}

macro_rules! inspect_shared {
    ($ptr:ident, $weak:ty) => {
        impl<T: Inspect + ?Sized> Inspect for $ptr<T> {
            fn descriptor(&self) -> TypeDescriptor {
                (**self).descriptor()
            }

            fn inspect(&self) -> Node<'_> {
                (**self).inspect()
            }

            fn identity(&self) -> Option<usize> {
                Some($ptr::as_ptr(self).cast::<()>() as usize)
            }

            fn as_any(&self) -> Option<&dyn Any> {
                (**self).as_any()
            }
        }

        impl<T: Inspect> Inspect for $weak {
            fn descriptor(&self) -> TypeDescriptor {
                match self.upgrade() {
                    Some(strong) => strong.descriptor(),
                    None => TypeDescriptor::of::<T>(),
                }
            }

            fn inspect(&self) -> Node<'_> {
                match self.upgrade() {
                    Some(strong) => Node::Indirect(Reading::owned(strong)),
                    None => Node::Null,
                }
            }

            fn identity(&self) -> Option<usize> {
                (self.strong_count() > 0).then(|| self.as_ptr().cast::<()>() as usize)
            }
        }
    };
}

inspect_shared!(Rc, rc::Weak<T>);
inspect_shared!(Arc, sync::Weak<T>);

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

fn borrowed<T: Inspect>(item: &T) -> Reading<'_> {
    Reading::Borrowed(item)
}

macro_rules! inspect_seq {
    ($($ty:ty),*) => {
        $(
            impl<T: Inspect> Inspect for $ty {
                fn descriptor(&self) -> TypeDescriptor {
                    TypeDescriptor::of::<Self>()
                }

                fn inspect(&self) -> Node<'_> {
                    Node::Seq(self.iter().map(borrowed).collect())
                }
            }
        )*
    };
}

inspect_seq!(Vec<T>, VecDeque<T>, LinkedList<T>, BTreeSet<T>, [T]);

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Seq(self.iter().map(borrowed).collect())
    }
}

impl<T: Inspect + Ord, S> Inspect for HashSet<T, S> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn inspect(&self) -> Node<'_> {
        let mut items: Vec<&T> = self.iter().collect();
        items.sort();
        Node::Seq(items.into_iter().map(borrowed).collect())
    }
}

impl<T: Inspect + Ord> Inspect for BinaryHeap<T> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn inspect(&self) -> Node<'_> {
        let mut items: Vec<&T> = self.iter().collect();
        items.sort();
        Node::Seq(items.into_iter().map(borrowed).collect())
    }
}

impl<K: Display, V: Inspect, S> Inspect for HashMap<K, V, S> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn inspect(&self) -> Node<'_> {
        let mut entries: Vec<(String, Reading<'_>)> = self
            .iter()
            .map(|(key, value)| (key.to_string(), borrowed(value)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Node::Map(entries)
    }
}

impl<K: Display, V: Inspect> Inspect for BTreeMap<K, V> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Map(
            self.iter()
                .map(|(key, value)| (key.to_string(), borrowed(value)))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Identifiers, timestamps and reflection values
// ---------------------------------------------------------------------------

impl Inspect for Uuid {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Uuid>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Uuid(*self)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for NaiveDateTime {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<NaiveDateTime>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Instant(*self)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for DateTime<FixedOffset> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::OffsetInstant(*self)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for DateTime<Utc> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::OffsetInstant(self.fixed_offset())
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for TypeDescriptor {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<TypeDescriptor>()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Type(self.clone())
    }
}

impl Inspect for Callable {
    fn descriptor(&self) -> TypeDescriptor {
        self.descriptor().clone()
    }

    fn inspect(&self) -> Node<'_> {
        Node::Callable(self.clone())
    }
}

/// Errors expose their kind and message; the raw OS code is a computed
/// member that only exists for OS errors.
impl Inspect for io::Error {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<io::Error>()
    }

    fn inspect(&self) -> Node<'_> {
        ObjectBuilder::new(TypeDescriptor::of::<io::Error>())
            .computed("Kind", move || Ok(format!("{:?}", self.kind())))
            .computed("Message", move || Ok(self.to_string()))
            .computed("RawOsError", move || Ok(self.raw_os_error()))
            .build()
    }
}
