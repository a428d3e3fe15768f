//! The reflection surface the serializer walks.
//!
//! A value exposes itself through [`Inspect`]: a runtime [`TypeDescriptor`]
//! and a [`Node`] describing its shape. Object members are read lazily via
//! [`Member`], so a failing getter surfaces as an [`EvalError`] for the
//! member filter to judge instead of aborting the whole walk.

use std::any::Any;
use std::borrow::Cow;
use std::ops::Deref;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::callable::Callable;
use crate::descriptor::TypeDescriptor;
use crate::error::EvalError;

/// A value that can be walked by the serializer.
pub trait Inspect {
    /// Runtime type of this value.
    fn descriptor(&self) -> TypeDescriptor;

    /// Shape of this value.
    fn inspect(&self) -> Node<'_>;

    /// Address identifying a shared allocation, used for cycle detection.
    fn identity(&self) -> Option<usize> {
        None
    }

    /// Access to the concrete value for typed instance predicates.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }

    /// Static descriptor of the implementing type.
    fn describe() -> TypeDescriptor
    where
        Self: Sized,
    {
        TypeDescriptor::of::<Self>()
    }
}

/// Shape of an inspected value.
pub enum Node<'a> {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Char(char),
    Str(Cow<'a, str>),
    Uuid(Uuid),
    /// Date-time without offset.
    Instant(NaiveDateTime),
    /// Date-time with a fixed UTC offset.
    OffsetInstant(DateTime<FixedOffset>),
    /// A type used as a value.
    Type(TypeDescriptor),
    /// A function value.
    Callable(Callable),
    /// A fieldless enum variant, rendered by name.
    Variant(Cow<'static, str>),
    /// Transparent forwarding to another value (weak references, guards).
    Indirect(Reading<'a>),
    Seq(Vec<Reading<'a>>),
    /// Key-ordered entries.
    Map(Vec<(String, Reading<'a>)>),
    /// Named members in declaration order.
    Object(Vec<Member<'a>>),
}

impl Node<'_> {
    /// Returns `true` for the default value of the node's kind: null, `false`,
    /// zero, the nil UUID and the Unix epoch.
    pub fn is_default(&self) -> bool {
        match self {
            Node::Null => true,
            Node::Bool(b) => !b,
            Node::I64(n) => *n == 0,
            Node::U64(n) => *n == 0,
            Node::F64(n) => *n == 0.0,
            Node::Char(c) => *c == '\0',
            Node::Uuid(u) => u.is_nil(),
            Node::Instant(t) => *t == DateTime::<Utc>::UNIX_EPOCH.naive_utc(),
            Node::OffsetInstant(t) => t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0,
            _ => false,
        }
    }

    /// Returns `true` for a sequence or map with no items.
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Node::Seq(items) => items.is_empty(),
            Node::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

/// A borrowed or owned inspectable value.
pub enum Reading<'a> {
    Borrowed(&'a dyn Inspect),
    Owned(Box<dyn Inspect + 'a>),
}

impl<'a> Reading<'a> {
    pub fn owned<T: Inspect + 'a>(value: T) -> Self {
        Reading::Owned(Box::new(value))
    }
}

impl<'a> Deref for Reading<'a> {
    type Target = dyn Inspect + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Reading::Borrowed(value) => *value,
            Reading::Owned(value) => value.as_ref(),
        }
    }
}

impl<'a> From<&'a dyn Inspect> for Reading<'a> {
    fn from(value: &'a dyn Inspect) -> Self {
        Reading::Borrowed(value)
    }
}

/// Static facts about a member, available before it is evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: Cow<'static, str>,
    /// Type that declares the member.
    pub declaring_type: TypeDescriptor,
    /// Declared type of the member value.
    pub value_type: TypeDescriptor,
    /// Marked obsolete; never serialized.
    pub deprecated: bool,
}

type Getter<'a> = Box<dyn FnOnce() -> Result<Reading<'a>, EvalError> + 'a>;

/// A named member whose value is read on demand.
pub struct Member<'a> {
    info: MemberInfo,
    read: Getter<'a>,
}

impl<'a> Member<'a> {
    pub fn new<F>(info: MemberInfo, read: F) -> Self
    where
        F: FnOnce() -> Result<Reading<'a>, EvalError> + 'a,
    {
        Self {
            info,
            read: Box::new(read),
        }
    }

    pub fn info(&self) -> &MemberInfo {
        &self.info
    }

    /// Run the getter.
    pub fn evaluate(self) -> (MemberInfo, Result<Reading<'a>, EvalError>) {
        let value = (self.read)();
        (self.info, value)
    }
}

impl std::fmt::Debug for Member<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member").field("info", &self.info).finish_non_exhaustive()
    }
}

/// Builds the member list of an [`Node::Object`].
pub struct ObjectBuilder<'a> {
    declaring_type: TypeDescriptor,
    members: Vec<Member<'a>>,
}

impl<'a> ObjectBuilder<'a> {
    pub fn new(declaring_type: TypeDescriptor) -> Self {
        Self {
            declaring_type,
            members: Vec::new(),
        }
    }

    /// A stored field, borrowed from the owner.
    pub fn field<T: Inspect>(self, name: &'static str, value: &'a T) -> Self {
        let value_type = T::describe();
        self.push(name, value_type, move || Ok(Reading::Borrowed(value)))
    }

    /// A computed member. The getter may fail.
    pub fn computed<T, F>(self, name: &'static str, read: F) -> Self
    where
        T: Inspect + 'a,
        F: FnOnce() -> Result<T, EvalError> + 'a,
    {
        let value_type = T::describe();
        self.push(name, value_type, move || read().map(Reading::owned))
    }

    /// Mark the most recently added member as deprecated.
    pub fn deprecated(mut self) -> Self {
        if let Some(last) = self.members.last_mut() {
            last.info.deprecated = true;
        }
        self
    }

    /// Add a prepared member as is.
    pub fn member(mut self, member: Member<'a>) -> Self {
        self.members.push(member);
        self
    }

    pub fn build(self) -> Node<'a> {
        Node::Object(self.members)
    }

    fn push<F>(mut self, name: &'static str, value_type: TypeDescriptor, read: F) -> Self
    where
        F: FnOnce() -> Result<Reading<'a>, EvalError> + 'a,
    {
        let info = MemberInfo {
            name: Cow::Borrowed(name),
            declaring_type: self.declaring_type.clone(),
            value_type,
            deprecated: false,
        };
        self.members.push(Member::new(info, read));
        self
    }
}

/// Implement [`Inspect`] for a struct by listing its fields.
///
/// ```
/// use snap_types::inspect_struct;
///
/// struct Point { x: i32, y: i32 }
/// inspect_struct!(Point { x => "X", y => "Y" });
/// ```
///
/// Fields listed without a rename use their Rust name.
#[macro_export]
macro_rules! inspect_struct {
    (@impl $ty:ty, $(($field:ident, $name:expr))*) => {
        impl $crate::Inspect for $ty {
            fn descriptor(&self) -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::of::<Self>()
            }

            fn inspect(&self) -> $crate::Node<'_> {
                $crate::ObjectBuilder::new($crate::TypeDescriptor::of::<Self>())
                    $(.field($name, &self.$field))*
                    .build()
            }

            fn as_any(&self) -> Option<&dyn ::std::any::Any> {
                Some(self)
            }
        }
    };
    ($ty:ty { $($field:ident => $name:literal),* $(,)? }) => {
        $crate::inspect_struct!(@impl $ty, $(($field, $name))*);
    };
    ($ty:ty { $($field:ident),* $(,)? }) => {
        $crate::inspect_struct!(@impl $ty, $(($field, stringify!($field)))*);
    };
}

/// Implement [`Inspect`] for a fieldless enum. Values render as the
/// variant's name.
///
/// ```
/// use snap_types::inspect_enum;
///
/// enum Title { Mr, Mrs, Ms }
/// inspect_enum!(Title { Mr, Mrs, Ms });
/// ```
///
/// Listing `Variant => "Name"` pairs renames every variant instead.
#[macro_export]
macro_rules! inspect_enum {
    (@impl $ty:ty, $(($variant:ident, $name:expr))*) => {
        impl $crate::Inspect for $ty {
            fn descriptor(&self) -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::of::<Self>()
            }

            fn inspect(&self) -> $crate::Node<'_> {
                let name: &'static str = match self {
                    $(Self::$variant => $name,)*
                };
                $crate::Node::Variant(::std::borrow::Cow::Borrowed(name))
            }

            fn as_any(&self) -> Option<&dyn ::std::any::Any> {
                Some(self)
            }
        }
    };
    ($ty:ty { $($variant:ident => $name:literal),* $(,)? }) => {
        $crate::inspect_enum!(@impl $ty, $(($variant, $name))*);
    };
    ($ty:ty { $($variant:ident),* $(,)? }) => {
        $crate::inspect_enum!(@impl $ty, $(($variant, stringify!($variant)))*);
    };
}
