//! Function values.

use crate::descriptor::TypeDescriptor;

/// A function value: its type, the item it is defined on, and its name.
///
/// For `app::Person::greet` the target is `app::Person` and the method is
/// `greet`. Closures report `{{closure}}` as their method and the enclosing
/// function as their target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Callable {
    descriptor: TypeDescriptor,
    target: Option<TypeDescriptor>,
    method: String,
}

impl Callable {
    /// Capture a function item, function pointer or closure.
    pub fn of<F>(_function: &F) -> Self {
        let descriptor = TypeDescriptor::of::<F>();
        let target = descriptor
            .namespace()
            .map(TypeDescriptor::path);
        let method = descriptor.name().to_string();
        Self {
            descriptor,
            target,
            method,
        }
    }

    pub fn new(descriptor: TypeDescriptor, target: Option<TypeDescriptor>, method: impl Into<String>) -> Self {
        Self {
            descriptor,
            target,
            method: method.into(),
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn target(&self) -> Option<&TypeDescriptor> {
        self.target.as_ref()
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}
