//! Recursive-descent parser for `std::any::type_name` output.
//!
//! The grammar covers what the compiler prints for concrete types: paths with
//! generic arguments, references, raw pointers, arrays, slices, tuples, trait
//! objects, function pointers and `Fn(..) -> R` sugar. Anything else makes the
//! parser give up and the caller falls back to an opaque descriptor.

use crate::descriptor::{TypeDescriptor, TypeKind};

const FN_TRAITS: &[&str] = &["Fn", "FnMut", "FnOnce"];

/// Parse a complete type. Returns `None` if any input is left over.
pub(crate) fn parse_type(raw: &str) -> Option<TypeDescriptor> {
    let mut parser = Parser { src: raw, pos: 0 };
    let ty = parser.ty()?;
    parser.skip_ws();
    parser.at_end().then_some(ty)
}

/// Every `a::b` prefix of every `a::b::C` path in `raw`.
pub(crate) fn path_prefixes(raw: &str) -> Vec<String> {
    raw.split(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | ':' | '{' | '}')))
        .filter_map(|token| token.rfind("::").map(|idx| token[..idx].to_string()))
        .filter(|prefix| !prefix.is_empty())
        .collect()
}

/// Returns `true` if `d` is `Fn(A) -> R` sugar rather than a generic path.
pub(crate) fn is_fn_sugar(d: &TypeDescriptor) -> bool {
    *d.kind() == TypeKind::Named
        && FN_TRAITS.contains(&d.name())
        && d.generic_args().len() == 1
        && *d.generic_args()[0].kind() == TypeKind::Tuple
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Eat a keyword only when it is followed by a non-identifier character.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        if !rest.starts_with(keyword) {
            return false;
        }
        let next = rest[keyword.len()..].chars().next();
        if next.is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return false;
        }
        self.pos += keyword.len();
        true
    }

    fn ident(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map_or(rest.len(), |(i, _)| i);
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    /// `{{closure}}`-style segment, braces balanced.
    fn braced_segment(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let mut depth = 0usize;
        for (i, c) in rest.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        self.pos += i + 1;
                        return Some(&rest[..=i]);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn lifetime(&mut self) -> bool {
        self.skip_ws();
        if self.peek() != Some('\'') {
            return false;
        }
        self.pos += 1;
        self.ident().is_some()
    }

    fn ty(&mut self) -> Option<TypeDescriptor> {
        self.skip_ws();
        if self.eat("&") {
            self.lifetime();
            let mutable = self.eat_keyword("mut");
            let element = self.ty()?;
            return Some(TypeDescriptor::wrapping(TypeKind::Reference { mutable }, element));
        }
        if self.eat("*") {
            let mutable = if self.eat_keyword("mut") {
                true
            } else if self.eat_keyword("const") {
                false
            } else {
                return None;
            };
            let element = self.ty()?;
            return Some(TypeDescriptor::wrapping(TypeKind::Pointer { mutable }, element));
        }
        if self.eat("[") {
            let element = self.ty()?;
            if self.eat(";") {
                let rest = self.rest();
                let end = rest.find(']')?;
                let len = rest[..end].trim().to_string();
                self.pos += end + 1;
                return Some(TypeDescriptor::wrapping(TypeKind::Array { len }, element));
            }
            if !self.eat("]") {
                return None;
            }
            return Some(TypeDescriptor::wrapping(TypeKind::Slice, element));
        }
        if self.eat("(") {
            let (members, trailing) = self.list(")")?;
            if members.len() == 1 && !trailing {
                return members.into_iter().next();
            }
            return Some(TypeDescriptor::tuple(members));
        }
        if self.eat_keyword("dyn") {
            return self.trait_object();
        }
        if self.eat_keyword("fn") {
            if !self.eat("(") {
                return None;
            }
            let (params, _) = self.list(")")?;
            let d = TypeDescriptor::fn_pointer(params);
            return Some(match self.ret()? {
                Some(ret) => d.with_element(ret),
                None => d,
            });
        }
        if self.eat("!") {
            return Some(TypeDescriptor::named(None, "!"));
        }
        self.path()
    }

    fn trait_object(&mut self) -> Option<TypeDescriptor> {
        let mut bounds = Vec::new();
        loop {
            if !self.lifetime() {
                bounds.push(self.path()?);
            }
            if !self.eat("+") {
                break;
            }
        }
        let mut bounds = bounds.into_iter();
        let principal = bounds.next()?;
        Some(TypeDescriptor::wrapping(TypeKind::TraitObject, principal).with_generic_args(bounds.collect()))
    }

    /// Optional `-> R`. Outer `None` is a parse error.
    fn ret(&mut self) -> Option<Option<TypeDescriptor>> {
        if self.eat("->") {
            self.ty().map(Some)
        } else {
            Some(None)
        }
    }

    /// Comma-separated types up to `close`. Reports whether a trailing comma
    /// was present. Lifetimes in the list are dropped.
    fn list(&mut self, close: &str) -> Option<(Vec<TypeDescriptor>, bool)> {
        let mut items = Vec::new();
        let mut trailing = false;
        loop {
            if self.eat(close) {
                return Some((items, trailing));
            }
            if !self.lifetime() {
                items.push(self.ty()?);
            }
            trailing = self.eat(",");
            if !trailing {
                return self.eat(close).then_some((items, false));
            }
        }
    }

    fn path(&mut self) -> Option<TypeDescriptor> {
        self.skip_ws();
        let mut segments: Vec<&'a str> = Vec::new();
        let mut args: Vec<TypeDescriptor>;
        loop {
            let segment = if self.rest().starts_with('{') {
                self.braced_segment()?
            } else {
                self.ident()?
            };
            segments.push(segment);
            args = if self.eat("<") {
                // `Item = T` bindings are not modelled.
                if self.binding_ahead() {
                    return None;
                }
                self.list(">")?.0
            } else {
                Vec::new()
            };
            if !self.eat("::") {
                break;
            }
        }
        let name = segments.pop()?;
        let namespace = (!segments.is_empty()).then(|| segments.join("::"));
        let mut d = TypeDescriptor::named(namespace, name).with_generic_args(args);
        if FN_TRAITS.contains(&name) && self.eat("(") {
            let (params, _) = self.list(")")?;
            d = d.with_generic_args(vec![TypeDescriptor::tuple(params)]);
            if let Some(ret) = self.ret()? {
                d = d.with_element(ret);
            }
        }
        Some(d)
    }

    /// Returns `true` if an `Ident =` binding starts at the cursor.
    fn binding_ahead(&self) -> bool {
        let mut ahead = Parser {
            src: self.src,
            pos: self.pos,
        };
        ahead.ident().is_some() && ahead.eat("=") && !ahead.rest().starts_with('=')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> TypeDescriptor {
        parse_type(raw).unwrap_or_else(|| panic!("failed to parse {raw}"))
    }

    #[test]
    fn parses_nested_generics() {
        let d = parsed("alloc::vec::Vec<core::option::Option<alloc::string::String>>");
        assert_eq!(d.name(), "Vec");
        let inner = &d.generic_args()[0];
        assert!(inner.is_nullable());
        assert_eq!(inner.generic_args()[0].name(), "String");
    }

    #[test]
    fn parses_structural_kinds() {
        assert_eq!(*parsed("&mut i32").kind(), TypeKind::Reference { mutable: true });
        assert_eq!(*parsed("*const u8").kind(), TypeKind::Pointer { mutable: false });
        assert_eq!(*parsed("[u8; 16]").kind(), TypeKind::Array { len: "16".into() });
        assert_eq!(*parsed("[u8]").kind(), TypeKind::Slice);
        assert_eq!(parsed("(i32, bool)").generic_args().len(), 2);
        assert_eq!(parsed("(i32,)").to_string(), "(i32,)");
        assert_eq!(parsed("()").to_string(), "()");
    }

    #[test]
    fn parses_trait_objects_and_fn_sugar() {
        let raw = "dyn core::ops::function::Fn(i32) -> bool + core::marker::Send";
        let d = parsed(raw);
        assert_eq!(*d.kind(), TypeKind::TraitObject);
        assert_eq!(d.element().map(|e| e.name()), Some("Fn"));
        assert_eq!(d.to_string(), raw);
    }

    #[test]
    fn parses_fn_pointer() {
        let d = parsed("fn(i32, &str) -> usize");
        assert_eq!(*d.kind(), TypeKind::FnPointer);
        assert_eq!(d.generic_args().len(), 2);
        assert_eq!(d.to_string(), "fn(i32, &str) -> usize");
    }

    #[test]
    fn closure_segment_is_synthesized() {
        let d = parsed("app::main::{{closure}}");
        assert!(d.is_synthesized());
        assert_eq!(d.namespace(), Some("app::main"));
    }

    #[test]
    fn qualified_paths_and_bindings_fall_back() {
        assert!(parse_type("<T as core::iter::Iterator>::Item").is_none());
        assert!(parse_type("dyn core::iter::Iterator<Item = i32>").is_none());
        let opaque = TypeDescriptor::parse("dyn core::iter::Iterator<Item = i32>");
        assert!(matches!(opaque.kind(), TypeKind::Opaque(_)));
        assert!(opaque.namespaces().contains("core::iter"));
    }

    #[test]
    fn path_prefixes_found_in_raw_text() {
        let prefixes = path_prefixes("<a::B as c::d::E>::F");
        assert!(prefixes.contains(&"a".to_string()));
        assert!(prefixes.contains(&"c::d".to_string()));
    }
}
