//! Structured runtime type identity.
//!
//! A [`TypeDescriptor`] is usually obtained with [`TypeDescriptor::of`], which
//! parses the compiler's `std::any::type_name` output into namespace, bare
//! name, generic arguments and element types. Descriptors can also be built
//! by hand for types whose identity is only known at runtime.
//!
//! # Invariants
//!
//! - Two descriptors with the same qualified rendering denote the same type.
//! - Parsing never fails: text the parser does not understand is kept as an
//!   [`TypeKind::Opaque`] descriptor.

use std::collections::BTreeSet;
use std::fmt;

use crate::parse;

/// Names of the std containers treated as collections.
const COLLECTION_NAMES: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashMap",
    "BTreeMap",
    "HashSet",
    "BTreeSet",
    "BinaryHeap",
];

/// Containers whose items are their first generic argument.
const SEQUENCE_NAMES: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "BinaryHeap",
    "Iterator",
];

/// Pointer-like wrappers that are transparent for assignability.
const WRAPPER_NAMES: &[&str] = &["Box", "Rc", "Arc", "Weak"];

/// Shape of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A path type, possibly generic: `alloc::vec::Vec<i32>`.
    Named,
    /// `&T` or `&mut T`; the referent is the element.
    Reference { mutable: bool },
    /// `*const T` or `*mut T`; the pointee is the element.
    Pointer { mutable: bool },
    /// `[T; N]`.
    Array { len: String },
    /// `[T]`.
    Slice,
    /// `(A, B, ..)`; members are the generic arguments.
    Tuple,
    /// `dyn Trait + Bound`; the principal trait is the element, extra bounds
    /// are the generic arguments.
    TraitObject,
    /// `fn(A, B) -> R`; parameters are the generic arguments, the return type
    /// is the element.
    FnPointer,
    /// Text the parser could not structure.
    Opaque(String),
}

/// Boolean properties of a type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeFlags {
    /// `Option<T>`-like wrapper around its first generic argument.
    pub nullable: bool,
    /// Compiler-synthesized (closures, anonymous pipelines).
    pub synthesized: bool,
    /// Explicitly marked as a collection.
    pub collection: bool,
}

/// Runtime identity of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    namespace: Option<String>,
    name: String,
    kind: TypeKind,
    generic_args: Vec<TypeDescriptor>,
    element: Option<Box<TypeDescriptor>>,
    enumerable: Option<Box<TypeDescriptor>>,
    flags: TypeFlags,
    bases: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Descriptor of `T`, parsed from `std::any::type_name::<T>()`.
    pub fn of<T: ?Sized>() -> Self {
        Self::parse(std::any::type_name::<T>())
    }

    /// Descriptor of an iterator type, carrying its `Iterator<Item>` interface.
    ///
    /// Iterators whose type mentions a closure are anonymous pipelines and are
    /// flagged as synthesized.
    pub fn of_iter<I>() -> Self
    where
        I: Iterator + ?Sized,
    {
        let mut descriptor = Self::of::<I>();
        if descriptor.mentions_synthesized() {
            descriptor.flags.synthesized = true;
        }
        let interface = Self::path("core::iter::Iterator").with_generic_args(vec![Self::of::<I::Item>()]);
        descriptor.with_enumerable(interface)
    }

    /// Parse any type-name text. Unparseable text yields an opaque descriptor.
    pub fn parse(raw: &str) -> Self {
        parse::parse_type(raw).unwrap_or_else(|| Self::opaque(raw))
    }

    /// A named type from a `::`-separated path, without generic arguments.
    pub fn path(path: &str) -> Self {
        let (namespace, name) = match path.rfind("::") {
            Some(idx) => (Some(path[..idx].to_string()), &path[idx + 2..]),
            None => (None, path),
        };
        Self::named(namespace, name)
    }

    /// A named type from an explicit namespace and bare name.
    pub fn named(namespace: Option<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let nullable = name == "Option"
            && matches!(
                namespace.as_deref(),
                None | Some("core::option") | Some("std::option")
            );
        let synthesized = name.starts_with("{{");
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()),
            name,
            kind: TypeKind::Named,
            generic_args: Vec::new(),
            element: None,
            enumerable: None,
            flags: TypeFlags {
                nullable,
                synthesized,
                collection: false,
            },
            bases: Vec::new(),
        }
    }

    /// A structural type (`&T`, `[T]`, `[T; N]`, ...) around an element.
    pub fn wrapping(kind: TypeKind, element: TypeDescriptor) -> Self {
        Self {
            namespace: None,
            name: String::new(),
            kind,
            generic_args: Vec::new(),
            element: Some(Box::new(element)),
            enumerable: None,
            flags: TypeFlags::default(),
            bases: Vec::new(),
        }
    }

    /// A tuple of the given members.
    pub fn tuple(members: Vec<TypeDescriptor>) -> Self {
        Self {
            namespace: None,
            name: String::new(),
            kind: TypeKind::Tuple,
            generic_args: members,
            element: None,
            enumerable: None,
            flags: TypeFlags::default(),
            bases: Vec::new(),
        }
    }

    /// A function pointer type with the given parameters.
    pub fn fn_pointer(params: Vec<TypeDescriptor>) -> Self {
        Self {
            kind: TypeKind::FnPointer,
            ..Self::tuple(params)
        }
    }

    /// A descriptor that keeps unparsed text.
    pub fn opaque(raw: &str) -> Self {
        Self {
            namespace: None,
            name: raw.to_string(),
            kind: TypeKind::Opaque(raw.to_string()),
            generic_args: Vec::new(),
            element: None,
            enumerable: None,
            flags: TypeFlags::default(),
            bases: Vec::new(),
        }
    }

    // ---------------------------------------------------------------
    // Builders
    // ---------------------------------------------------------------

    pub fn with_generic_args(mut self, args: Vec<TypeDescriptor>) -> Self {
        self.generic_args = args;
        self
    }

    pub fn with_element(mut self, element: TypeDescriptor) -> Self {
        self.element = Some(Box::new(element));
        self
    }

    /// Attach the enumerable interface (`Iterator<Item>`) this type implements.
    pub fn with_enumerable(mut self, interface: TypeDescriptor) -> Self {
        self.enumerable = Some(Box::new(interface));
        self
    }

    /// Declare that values of this type are also values of `base`.
    pub fn with_base(mut self, base: TypeDescriptor) -> Self {
        self.bases.push(base);
        self
    }

    pub fn synthesized(mut self) -> Self {
        self.flags.synthesized = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.flags.nullable = true;
        self
    }

    pub fn collection(mut self) -> Self {
        self.flags.collection = true;
        self
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Bare name without namespace or generic arguments.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn generic_args(&self) -> &[TypeDescriptor] {
        &self.generic_args
    }

    pub fn element(&self) -> Option<&TypeDescriptor> {
        self.element.as_deref()
    }

    pub fn enumerable(&self) -> Option<&TypeDescriptor> {
        self.enumerable.as_deref()
    }

    pub fn bases(&self) -> &[TypeDescriptor] {
        &self.bases
    }

    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    pub fn is_nullable(&self) -> bool {
        self.flags.nullable
    }

    pub fn is_synthesized(&self) -> bool {
        self.flags.synthesized
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Returns `true` if both descriptors denote the same type.
    pub fn same_type(&self, other: &TypeDescriptor) -> bool {
        self.to_string() == other.to_string()
    }

    /// The type directly inside a transparent wrapper (`Option`, `Box`, `Rc`,
    /// `Arc`, `Weak`, references), if this is one.
    pub fn wrapped(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            TypeKind::Reference { .. } => self.element(),
            TypeKind::Named if self.flags.nullable || WRAPPER_NAMES.contains(&self.name.as_str()) => {
                self.generic_args.first()
            }
            _ => None,
        }
    }

    /// Strip every transparent wrapper.
    pub fn unwrapped(&self) -> &TypeDescriptor {
        let mut current = self;
        while let Some(inner) = current.wrapped() {
            current = inner;
        }
        current
    }

    /// Returns `true` if a value of this type can stand where `target` is
    /// expected: same type, a declared base, or through a transparent wrapper.
    pub fn is_assignable_to(&self, target: &TypeDescriptor) -> bool {
        if self.same_type(target) {
            return true;
        }
        if self.bases.iter().any(|base| base.is_assignable_to(target)) {
            return true;
        }
        self.wrapped()
            .is_some_and(|inner| inner.is_assignable_to(target))
    }

    /// Returns `true` for collection types. Text types never are.
    pub fn is_collection(&self) -> bool {
        let inner = self.unwrapped();
        if inner.flags.collection {
            return true;
        }
        match &inner.kind {
            TypeKind::Array { .. } | TypeKind::Slice => true,
            TypeKind::Named => COLLECTION_NAMES.contains(&inner.name.as_str()),
            _ => false,
        }
    }

    /// Returns `true` for `Fn(A, B) -> R` style bounds, whose single generic
    /// argument is the parameter tuple.
    pub fn is_fn_sugar(&self) -> bool {
        parse::is_fn_sugar(self)
    }

    /// Declared type of the items of a sequence or the values of a map.
    pub fn item_type(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            TypeKind::Array { .. } | TypeKind::Slice => self.element(),
            TypeKind::Named if SEQUENCE_NAMES.contains(&self.name.as_str()) => {
                self.generic_args.first()
            }
            TypeKind::Named if matches!(self.name.as_str(), "HashMap" | "BTreeMap") => {
                self.generic_args.get(1)
            }
            _ => self.enumerable().and_then(|e| e.item_type()),
        }
    }

    /// Returns `true` if this type or anything nested in it is synthesized.
    pub fn mentions_synthesized(&self) -> bool {
        self.flags.synthesized
            || self.generic_args.iter().any(Self::mentions_synthesized)
            || self.element().is_some_and(Self::mentions_synthesized)
    }

    /// Every distinct namespace appearing in this type, its generic arguments
    /// and element types.
    pub fn namespaces(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        self.collect_namespaces(&mut found);
        found
    }

    fn collect_namespaces(&self, found: &mut BTreeSet<String>) {
        if let TypeKind::Opaque(raw) = &self.kind {
            found.extend(parse::path_prefixes(raw));
        }
        if let Some(ns) = &self.namespace {
            found.insert(ns.clone());
        }
        if let Some(element) = &self.element {
            element.collect_namespaces(found);
        }
        for arg in &self.generic_args {
            arg.collect_namespaces(found);
        }
    }
}

/// Qualified rendering, namespaces included.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = |f: &mut fmt::Formatter<'_>| match &self.element {
            Some(e) => write!(f, "{e}"),
            None => write!(f, "()"),
        };
        match &self.kind {
            TypeKind::Named => {
                if let Some(ns) = &self.namespace {
                    write!(f, "{ns}::")?;
                }
                write!(f, "{}", self.name)?;
                if self.is_fn_sugar() {
                    write!(f, "(")?;
                    write_list(f, "", self.generic_args[0].generic_args(), "")?;
                    write!(f, ")")?;
                    if let Some(ret) = &self.element {
                        write!(f, " -> {ret}")?;
                    }
                    return Ok(());
                }
                write_list(f, "<", &self.generic_args, ">")
            }
            TypeKind::Reference { mutable } => {
                write!(f, "{}", if *mutable { "&mut " } else { "&" })?;
                element(f)
            }
            TypeKind::Pointer { mutable } => {
                write!(f, "{}", if *mutable { "*mut " } else { "*const " })?;
                element(f)
            }
            TypeKind::Array { len } => {
                write!(f, "[")?;
                element(f)?;
                write!(f, "; {len}]")
            }
            TypeKind::Slice => {
                write!(f, "[")?;
                element(f)?;
                write!(f, "]")
            }
            TypeKind::Tuple => {
                if self.generic_args.len() == 1 {
                    return write!(f, "({},)", self.generic_args[0]);
                }
                write!(f, "(")?;
                write_list(f, "", &self.generic_args, "")?;
                write!(f, ")")
            }
            TypeKind::TraitObject => {
                write!(f, "dyn ")?;
                element(f)?;
                for bound in &self.generic_args {
                    write!(f, " + {bound}")?;
                }
                Ok(())
            }
            TypeKind::FnPointer => {
                write!(f, "fn(")?;
                write_list(f, "", &self.generic_args, "")?;
                write!(f, ")")?;
                if let Some(ret) = &self.element {
                    write!(f, " -> {ret}")?;
                }
                Ok(())
            }
            TypeKind::Opaque(raw) => write!(f, "{raw}"),
        }
    }
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: &[TypeDescriptor],
    close: &str,
) -> fmt::Result {
    if items.is_empty() && !open.is_empty() {
        return Ok(());
    }
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;

    struct Marker;

    #[test]
    fn of_vec_parses_generic_argument() {
        let d = TypeDescriptor::of::<Vec<i32>>();
        assert_eq!(d.name(), "Vec");
        assert_eq!(d.namespace(), Some("alloc::vec"));
        assert_eq!(d.generic_args().len(), 1);
        assert_eq!(d.generic_args()[0].name(), "i32");
    }

    #[test]
    fn fn_sugar_detected_on_bounds_only() {
        assert!(TypeDescriptor::parse("core::ops::function::Fn(i32, bool)").is_fn_sugar());
        assert!(!TypeDescriptor::of::<Vec<(i32, bool)>>().is_fn_sugar());
        assert!(!TypeDescriptor::of::<fn(i32) -> bool>().is_fn_sugar());
    }

    #[test]
    fn option_is_nullable() {
        let d = TypeDescriptor::of::<Option<u8>>();
        assert!(d.is_nullable());
        assert_eq!(d.unwrapped().name(), "u8");
    }

    #[test]
    fn display_roundtrips_type_name() {
        let raw = std::any::type_name::<Vec<Option<String>>>();
        assert_eq!(TypeDescriptor::of::<Vec<Option<String>>>().to_string(), raw);
    }

    #[test]
    fn closures_are_synthesized() {
        fn descriptor_of<F>(_: &F) -> TypeDescriptor {
            TypeDescriptor::of::<F>()
        }
        let f = |x: i32| x + 1;
        assert!(descriptor_of(&f).is_synthesized());
    }

    #[test]
    fn of_iter_with_closure_is_synthesized() {
        let iter = vec![1, 2].into_iter().map(|x| x * 2);
        fn descriptor_of<I: Iterator>(_: &I) -> TypeDescriptor {
            TypeDescriptor::of_iter::<I>()
        }
        let d = descriptor_of(&iter);
        assert!(d.is_synthesized());
        assert_eq!(d.item_type().map(|t| t.name()), Some("i32"));
    }

    #[test]
    fn collections_detected_through_wrappers() {
        assert!(TypeDescriptor::of::<Vec<String>>().is_collection());
        assert!(TypeDescriptor::of::<Option<HashMap<i32, String>>>().is_collection());
        assert!(TypeDescriptor::of::<[u8; 4]>().is_collection());
        assert!(!TypeDescriptor::of::<String>().is_collection());
        assert!(!TypeDescriptor::of::<&str>().is_collection());
        assert!(TypeDescriptor::of::<Marker>().collection().is_collection());
    }

    #[test]
    fn assignable_through_wrappers_and_bases() {
        let marker = TypeDescriptor::of::<Marker>();
        assert!(TypeDescriptor::of::<Option<Marker>>().is_assignable_to(&marker));
        assert!(TypeDescriptor::of::<Rc<Marker>>().is_assignable_to(&marker));
        assert!(!TypeDescriptor::of::<Vec<Marker>>().is_assignable_to(&marker));

        let derived = TypeDescriptor::path("app::Derived").with_base(marker.clone());
        assert!(derived.is_assignable_to(&marker));
        assert!(!marker.is_assignable_to(&derived));
    }

    #[test]
    fn item_type_of_map_is_value_type() {
        let d = TypeDescriptor::of::<HashMap<String, u64>>();
        assert_eq!(d.item_type().map(|t| t.name()), Some("u64"));
    }

    #[test]
    fn namespaces_cover_generic_closure() {
        let d = TypeDescriptor::parse("alloc::vec::Vec<app::model::Person>");
        let ns = d.namespaces();
        assert!(ns.contains("alloc::vec"));
        assert!(ns.contains("app::model"));
        assert_eq!(ns.len(), 2);
    }
}
