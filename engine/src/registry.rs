//! Explicit sum-type registrations.
//!
//! Some types (typically interfaces) are closed sums over a known list of
//! concrete types. Registering them lets derivation emit a `oneOf` with one
//! member per concrete type instead of inferring from fields.
//!
//! The registry is filled before it is handed to a
//! [`SchemaEngine`](crate::SchemaEngine), which only reads it afterwards.

use std::collections::HashMap;

use openapi_schema_core::{Describe, TypeDescriptor};

/// Map from a sum type's name to its concrete variant types.
///
/// # Examples
///
/// ```
/// use openapi_schema_core::TypeDescriptor;
/// use openapi_schema_engine::SumTypeRegistry;
///
/// let mut registry = SumTypeRegistry::new();
/// registry.register(
///     "Shape",
///     vec![TypeDescriptor::string().named("Circle"), TypeDescriptor::bool().named("Dot")],
/// );
/// assert_eq!(registry.variants("Shape").map(|v| v.len()), Some(2));
/// assert!(registry.variants("Line").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SumTypeRegistry {
    entries: HashMap<String, Vec<TypeDescriptor>>,
}

impl SumTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as a sum over `variants`, in order.
    ///
    /// Returns the previous variants if `name` was already registered.
    pub fn register(
        &mut self,
        name: &str,
        variants: Vec<TypeDescriptor>,
    ) -> Option<Vec<TypeDescriptor>> {
        let previous = self.entries.insert(name.to_string(), variants);
        if previous.is_some() {
            tracing::debug!(ty = name, "replacing sum type registration");
        }
        previous
    }

    /// Registers `T` (by its described name) as a sum over `variants`.
    pub fn register_type<T: Describe>(
        &mut self,
        variants: Vec<TypeDescriptor>,
    ) -> Option<Vec<TypeDescriptor>> {
        self.register(&T::describe().name, variants)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: &str, variants: Vec<TypeDescriptor>) -> Self {
        self.register(name, variants);
        self
    }

    pub fn variants(&self, name: &str) -> Option<&[TypeDescriptor]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
