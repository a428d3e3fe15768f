//! The graph walk.
//!
//! A [`Walker`] turns an [`Inspect`] graph into a `serde_json::Value` tree.
//! Per object member the order of decisions is fixed:
//!
//! 1. static filter checks (deprecated, ignored types, ignored names)
//! 2. evaluation; ignorable failures drop the member, others abort the walk
//! 3. instance predicates over the evaluated value
//! 4. cycle check against the identities currently being walked
//! 5. emission checks (empty collections, `false`)
//! 6. default-value omission; `false` is exempt while `ignore_false` is off
//!
//! The walker owns the session's placeholder tables, so numbering restarts
//! with every walk.

use serde_json::{Map, Number, Value};
use snap_filter::MemberFilter;
use snap_names::TypeNameResolver;
use snap_scrub::{ValueScrubber, Volatile};
use snap_settings::{SerializerOptions, SessionConfig, TypeTagMode};
use snap_types::{Callable, Inspect, Member, Node, TypeDescriptor};
use tracing::debug;

use crate::error::{DriverError, DriverResult};

/// Key of the runtime type entry written first in tagged objects.
pub const TYPE_TAG: &str = "$type";

/// One walk over one object graph.
pub struct Walker<'s> {
    options: &'s SerializerOptions,
    filter: MemberFilter<'s>,
    scrubber: ValueScrubber<'s>,
    names: TypeNameResolver,
    keep_false: bool,
    stack: Vec<usize>,
}

impl<'s> Walker<'s> {
    pub fn new(session: &'s SessionConfig) -> Self {
        let flags = session.flags;
        Self {
            options: &session.options,
            filter: MemberFilter::new(
                &session.rules,
                flags.ignore_empty_collections,
                flags.ignore_false,
            ),
            scrubber: ValueScrubber::new(flags.scrub_guids, flags.scrub_date_times, &session.formats),
            names: TypeNameResolver::new(session.options.nullable_display),
            keep_false: !flags.ignore_false,
            stack: Vec::new(),
        }
    }

    /// Walk `root`. The root's declared type is its runtime type, so it is
    /// only tagged when tags are always on.
    pub fn walk(&mut self, root: &dyn Inspect) -> DriverResult<Value> {
        let declared = root.descriptor();
        self.descend(root, root.inspect(), &declared)
    }

    /// Convert `node`, keeping `value`'s identity on the stack meanwhile.
    fn descend(
        &mut self,
        value: &dyn Inspect,
        node: Node<'_>,
        declared: &TypeDescriptor,
    ) -> DriverResult<Value> {
        let identity = value.identity();
        if let Some(id) = identity {
            self.stack.push(id);
        }
        let result = self.convert(value, node, declared);
        if identity.is_some() {
            self.stack.pop();
        }
        result
    }

    fn on_stack(&self, value: &dyn Inspect) -> bool {
        value.identity().is_some_and(|id| self.stack.contains(&id))
    }

    fn convert(
        &mut self,
        value: &dyn Inspect,
        node: Node<'_>,
        declared: &TypeDescriptor,
    ) -> DriverResult<Value> {
        Ok(match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(b),
            Node::I64(n) => Value::from(n),
            Node::U64(n) => Value::from(n),
            Node::F64(n) => match Number::from_f64(n) {
                Some(number) => Value::Number(number),
                None => Value::String(n.to_string()),
            },
            Node::Char(c) => Value::String(c.to_string()),
            Node::Str(text) => match self.scrubber.scrub_str(&text) {
                Some(token) => Value::String(token),
                None => Value::String(text.into_owned()),
            },
            Node::Uuid(id) => Value::String(self.scrubber.scrub(Volatile::UniqueId(id))),
            Node::Instant(t) => Value::String(self.scrubber.scrub(Volatile::Instant(t))),
            Node::OffsetInstant(t) => {
                Value::String(self.scrubber.scrub(Volatile::OffsetInstant(t)))
            }
            Node::Type(ty) => Value::String(self.names.resolve(&ty)?),
            Node::Callable(callable) => self.callable(&callable)?,
            Node::Variant(name) => Value::String(name.into_owned()),
            Node::Indirect(inner) => {
                let inner_node = inner.inspect();
                self.convert(&*inner, inner_node, declared)?
            }
            Node::Seq(items) => {
                let item_declared = declared.unwrapped().item_type().cloned();
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if self.on_stack(&*item) {
                        debug!("cycle in sequence element skipped");
                        continue;
                    }
                    let item_type = item_declared.clone().unwrap_or_else(|| item.descriptor());
                    out.push(self.descend(&*item, item.inspect(), &item_type)?);
                }
                Value::Array(out)
            }
            Node::Map(entries) => {
                let item_declared = declared.unwrapped().item_type().cloned();
                let mut out = Map::new();
                for (key, item) in entries {
                    if self.on_stack(&*item) {
                        debug!(key = %key, "cycle in map entry skipped");
                        continue;
                    }
                    let item_type = item_declared.clone().unwrap_or_else(|| item.descriptor());
                    out.insert(key, self.descend(&*item, item.inspect(), &item_type)?);
                }
                Value::Object(out)
            }
            Node::Object(members) => self.object(value, members, declared)?,
        })
    }

    fn object(
        &mut self,
        value: &dyn Inspect,
        members: Vec<Member<'_>>,
        declared: &TypeDescriptor,
    ) -> DriverResult<Value> {
        let mut out = Map::new();
        let runtime = value.descriptor();
        if self.tagged(&runtime, declared) {
            out.insert(TYPE_TAG.to_string(), Value::String(self.names.resolve(&runtime)?));
        }

        for member in members {
            if !self.filter.admit(member.info()).is_include() {
                continue;
            }
            let (info, read) = member.evaluate();
            let reading = match read {
                Ok(reading) => reading,
                Err(error) if self.filter.is_ignorable(&error) => {
                    debug!(member = %info.name, %error, "ignorable member failure");
                    continue;
                }
                Err(error) => {
                    return Err(DriverError::MemberEvaluation {
                        type_name: self.names.resolve(&info.declaring_type)?,
                        member: info.name.into_owned(),
                        source: error,
                    });
                }
            };
            if !self.filter.admit_value(&info, &*reading).is_include() {
                continue;
            }
            if self.on_stack(&*reading) {
                debug!(member = %info.name, "cycle skipped");
                continue;
            }
            let node = reading.inspect();
            if !self.filter.emission(&info, &node).is_include() {
                continue;
            }
            if self.omits(&node) {
                continue;
            }
            let converted = self.descend(&*reading, node, &info.value_type)?;
            out.insert(info.name.into_owned(), converted);
        }
        Ok(Value::Object(out))
    }

    /// Default-value omission. A kept `false` is governed by the
    /// `ignore_false` flag alone.
    fn omits(&self, node: &Node<'_>) -> bool {
        if self.keep_false && matches!(node, Node::Bool(false)) {
            return false;
        }
        self.options.omit_defaults && node.is_default()
    }

    fn tagged(&self, runtime: &TypeDescriptor, declared: &TypeDescriptor) -> bool {
        match self.options.type_tags {
            TypeTagMode::Never => false,
            TypeTagMode::Always => true,
            TypeTagMode::Auto => !declared.unwrapped().same_type(runtime.unwrapped()),
        }
    }

    fn callable(&self, callable: &Callable) -> DriverResult<Value> {
        let mut out = Map::new();
        out.insert(
            "Type".to_string(),
            Value::String(self.names.resolve(callable.descriptor())?),
        );
        if let Some(target) = callable.target() {
            out.insert("Target".to_string(), Value::String(self.names.resolve(target)?));
        }
        out.insert("Method".to_string(), Value::String(callable.method().to_string()));
        Ok(Value::Object(out))
    }
}
