//! Canonical type names.
//!
//! Names are built from bare type names, so most namespaces never reach the
//! output. Text kept verbatim from the compiler (opaque descriptors) can still
//! carry paths; a final pass removes every namespace found anywhere in the
//! descriptor's generic closure, longest first.

use serde::{Deserialize, Serialize};
use snap_types::{TypeDescriptor, TypeKind};
use tracing::trace;

use crate::error::{NameError, NameResult};

/// Name emitted for compiler-synthesized types with no iterator interface.
pub const DYNAMIC_TOKEN: &str = "dynamic";

/// How `Option<T>` is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullableDisplay {
    /// `i32?`
    #[default]
    Marker,
    /// `i32`
    Underlying,
    /// `Option<i32>`
    Wrapper,
}

/// Resolves descriptors to short, environment-independent names.
#[derive(Clone, Copy, Debug, Default)]
pub struct TypeNameResolver {
    nullable: NullableDisplay,
}

impl TypeNameResolver {
    pub fn new(nullable: NullableDisplay) -> Self {
        Self { nullable }
    }

    pub fn nullable_display(&self) -> NullableDisplay {
        self.nullable
    }

    /// Resolve a descriptor to its canonical name.
    ///
    /// Synthesized types resolve through their iterator interface when they
    /// have one (`Iterator<Person>`), and to [`DYNAMIC_TOKEN`] otherwise.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> NameResult<String> {
        let mut name = String::new();
        self.render(descriptor, &mut name)?;

        let mut namespaces: Vec<String> = descriptor.namespaces().into_iter().collect();
        namespaces.sort_by_key(|ns| std::cmp::Reverse(ns.len()));
        for ns in &namespaces {
            name = name.replace(&format!("{ns}::"), "");
        }

        trace!(raw = %descriptor, resolved = %name, "resolved type name");
        Ok(name)
    }

    fn render(&self, d: &TypeDescriptor, out: &mut String) -> NameResult<()> {
        if d.is_synthesized() {
            return match d.enumerable() {
                Some(interface) => self.render(interface, out),
                None => {
                    out.push_str(DYNAMIC_TOKEN);
                    Ok(())
                }
            };
        }

        match d.kind() {
            TypeKind::Named if d.is_nullable() => self.render_nullable(d, out),
            TypeKind::Named => {
                if d.name().is_empty() {
                    return Err(NameError::Unnamed(d.to_string()));
                }
                out.push_str(d.name());
                if d.is_fn_sugar() {
                    out.push('(');
                    self.render_list(d.generic_args()[0].generic_args(), out)?;
                    out.push(')');
                    return self.render_return(d, out);
                }
                if !d.generic_args().is_empty() {
                    out.push('<');
                    self.render_list(d.generic_args(), out)?;
                    out.push('>');
                }
                Ok(())
            }
            TypeKind::Reference { mutable } => {
                out.push_str(if *mutable { "&mut " } else { "&" });
                self.render_element(d, out)
            }
            TypeKind::Pointer { mutable } => {
                out.push_str(if *mutable { "*mut " } else { "*const " });
                self.render_element(d, out)
            }
            TypeKind::Array { len } => {
                out.push('[');
                self.render_element(d, out)?;
                out.push_str("; ");
                out.push_str(len);
                out.push(']');
                Ok(())
            }
            TypeKind::Slice => {
                out.push('[');
                self.render_element(d, out)?;
                out.push(']');
                Ok(())
            }
            TypeKind::Tuple => {
                out.push('(');
                self.render_list(d.generic_args(), out)?;
                if d.generic_args().len() == 1 {
                    out.push(',');
                }
                out.push(')');
                Ok(())
            }
            TypeKind::TraitObject => {
                out.push_str("dyn ");
                self.render_element(d, out)?;
                for bound in d.generic_args() {
                    out.push_str(" + ");
                    self.render(bound, out)?;
                }
                Ok(())
            }
            TypeKind::FnPointer => {
                out.push_str("fn(");
                self.render_list(d.generic_args(), out)?;
                out.push(')');
                self.render_return(d, out)
            }
            TypeKind::Opaque(raw) => {
                if raw.trim().is_empty() {
                    return Err(NameError::Unnamed(raw.clone()));
                }
                out.push_str(raw);
                Ok(())
            }
        }
    }

    fn render_nullable(&self, d: &TypeDescriptor, out: &mut String) -> NameResult<()> {
        let Some(inner) = d.generic_args().first() else {
            out.push_str(d.name());
            return Ok(());
        };
        match self.nullable {
            NullableDisplay::Marker => {
                self.render(inner, out)?;
                out.push('?');
            }
            NullableDisplay::Underlying => self.render(inner, out)?,
            NullableDisplay::Wrapper => {
                out.push_str(d.name());
                out.push('<');
                self.render(inner, out)?;
                out.push('>');
            }
        }
        Ok(())
    }

    fn render_element(&self, d: &TypeDescriptor, out: &mut String) -> NameResult<()> {
        match d.element() {
            Some(element) => self.render(element, out),
            None => Err(NameError::Unnamed(d.to_string())),
        }
    }

    fn render_return(&self, d: &TypeDescriptor, out: &mut String) -> NameResult<()> {
        if let Some(ret) = d.element() {
            out.push_str(" -> ");
            self.render(ret, out)?;
        }
        Ok(())
    }

    fn render_list(&self, items: &[TypeDescriptor], out: &mut String) -> NameResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.render(item, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::rc::Rc;

    use snap_types::{Inspect, Sequence};

    use super::*;

    struct Person;

    fn resolve(d: &TypeDescriptor) -> String {
        TypeNameResolver::default().resolve(d).unwrap()
    }

    fn resolve_with(nullable: NullableDisplay, d: &TypeDescriptor) -> String {
        TypeNameResolver::new(nullable).resolve(d).unwrap()
    }

    #[test]
    fn strips_namespaces_at_every_depth() {
        assert_eq!(resolve(&TypeDescriptor::of::<Person>()), "Person");
        assert_eq!(
            resolve(&TypeDescriptor::of::<HashMap<String, Vec<Person>>>()),
            "HashMap<String, Vec<Person>>"
        );
        assert_eq!(resolve(&TypeDescriptor::of::<Rc<Person>>()), "Rc<Person>");
    }

    #[test]
    fn structural_types_use_rust_syntax() {
        assert_eq!(resolve(&TypeDescriptor::of::<[Person; 2]>()), "[Person; 2]");
        assert_eq!(resolve(&TypeDescriptor::of::<&[u8]>()), "&[u8]");
        assert_eq!(resolve(&TypeDescriptor::of::<(i32, Person)>()), "(i32, Person)");
        assert_eq!(resolve(&TypeDescriptor::of::<fn(Person) -> bool>()), "fn(Person) -> bool");
        assert_eq!(
            resolve(&TypeDescriptor::of::<Box<dyn Fn(i32) -> String + Send>>()),
            "Box<dyn Fn(i32) -> String + Send>"
        );
    }

    #[test]
    fn nullable_display_policies() {
        let d = TypeDescriptor::of::<Vec<Option<i32>>>();
        assert_eq!(resolve_with(NullableDisplay::Marker, &d), "Vec<i32?>");
        assert_eq!(resolve_with(NullableDisplay::Underlying, &d), "Vec<i32>");
        assert_eq!(resolve_with(NullableDisplay::Wrapper, &d), "Vec<Option<i32>>");
    }

    #[test]
    fn closures_resolve_to_dynamic() {
        fn descriptor_of<F>(_: &F) -> TypeDescriptor {
            TypeDescriptor::of::<F>()
        }
        let f = || 1;
        assert_eq!(resolve(&descriptor_of(&f)), DYNAMIC_TOKEN);
    }

    #[test]
    fn synthesized_sequences_resolve_through_iterator() {
        let seq = Sequence::capture(vec![1u32, 2].into_iter().map(|n| n + 1));
        assert_eq!(resolve(&seq.descriptor()), "Iterator<u32>");
    }

    #[test]
    fn opaque_text_is_stripped() {
        let d = TypeDescriptor::parse("dyn core::iter::Iterator<Item = app::Person>");
        assert_eq!(resolve(&d), "dyn Iterator<Item = Person>");
    }

    #[test]
    fn unnamed_types_are_errors() {
        let d = TypeDescriptor::named(None, "");
        assert!(matches!(
            TypeNameResolver::default().resolve(&d),
            Err(NameError::Unnamed(_))
        ));
    }

    #[test]
    fn structurally_equal_descriptors_resolve_identically() {
        let a = TypeDescriptor::parse("alloc::vec::Vec<app::Person>");
        let b = TypeDescriptor::path("other::vec::Vec")
            .with_generic_args(vec![TypeDescriptor::path("app::Person")]);
        assert_eq!(resolve(&a), resolve(&b));
    }

    #[test]
    fn nullable_display_deserializes_lowercase() {
        let d: NullableDisplay = serde_json::from_str("\"wrapper\"").unwrap();
        assert_eq!(d, NullableDisplay::Wrapper);
    }
}
