//! Capability hooks a type may provide to customize its own schema.
//!
//! A [`TypeDescriptor`](crate::TypeDescriptor) optionally carries a
//! [`SchemaHooks`] implementation. Every method has a no-op default, so an
//! implementation only overrides the capabilities it actually has. The engine
//! consults them in a fixed priority order; a caller-supplied constraint
//! always beats a hook.

use serde_json::Value;

use crate::schema::{ExternalDocs, Schema};

/// Optional per-type customizations of the derived schema.
///
/// # Examples
///
/// ```
/// use openapi_schema_core::{Format, SchemaHooks};
///
/// struct Email;
///
/// impl SchemaHooks for Email {
///     fn format(&self) -> Option<String> {
///         Some(Format::Email.to_string())
///     }
///
///     fn max_string_length(&self) -> Option<u64> {
///         Some(254)
///     }
/// }
///
/// assert_eq!(Email.format().as_deref(), Some("email"));
/// assert!(Email.schema().is_none());
/// ```
pub trait SchemaHooks: Send + Sync {
    /// Replaces the derived schema entirely.
    fn schema(&self) -> Option<Schema> {
        None
    }

    fn external_docs(&self) -> Option<ExternalDocs> {
        None
    }

    fn example(&self) -> Option<Value> {
        None
    }

    fn format(&self) -> Option<String> {
        None
    }

    /// The list of possibilities for an enum of constants.
    fn enum_values(&self) -> Option<Vec<Value>> {
        None
    }

    fn min_string_length(&self) -> Option<u64> {
        None
    }

    fn max_string_length(&self) -> Option<u64> {
        None
    }

    fn min_array_length(&self) -> Option<u64> {
        None
    }

    fn max_array_length(&self) -> Option<u64> {
        None
    }

    fn min_map_length(&self) -> Option<u64> {
        None
    }

    fn max_map_length(&self) -> Option<u64> {
        None
    }

    fn minimum(&self) -> Option<f64> {
        None
    }

    fn maximum(&self) -> Option<f64> {
        None
    }

    /// Marks a date-time value, derived as a `date-time` string.
    fn is_temporal(&self) -> bool {
        false
    }

    /// Marks a type that renders to a string, usable as a map key.
    fn is_stringifiable(&self) -> bool {
        false
    }
}

/// Plain-data [`SchemaHooks`] implementation.
///
/// Convenient when hooks are known up front rather than computed.
///
/// # Examples
///
/// ```
/// use openapi_schema_core::{Hooks, SchemaHooks};
/// use serde_json::json;
///
/// let hooks = Hooks::default()
///     .with_example(json!(true))
///     .with_format("flag");
/// assert_eq!(hooks.example(), Some(json!(true)));
/// assert_eq!(hooks.format().as_deref(), Some("flag"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Hooks {
    pub schema: Option<Schema>,
    pub external_docs: Option<ExternalDocs>,
    pub example: Option<Value>,
    pub format: Option<String>,
    pub enum_values: Option<Vec<Value>>,
    pub min_string_length: Option<u64>,
    pub max_string_length: Option<u64>,
    pub min_array_length: Option<u64>,
    pub max_array_length: Option<u64>,
    pub min_map_length: Option<u64>,
    pub max_map_length: Option<u64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub temporal: bool,
    pub stringifiable: bool,
}

impl Hooks {
    /// Sets a schema override.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_external_docs(mut self, docs: ExternalDocs) -> Self {
        self.external_docs = Some(docs);
        self
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Marks as stringifiable (see [`SchemaHooks::is_stringifiable`]).
    pub fn stringifiable(mut self) -> Self {
        self.stringifiable = true;
        self
    }
}

impl SchemaHooks for Hooks {
    fn schema(&self) -> Option<Schema> {
        self.schema.clone()
    }

    fn external_docs(&self) -> Option<ExternalDocs> {
        self.external_docs.clone()
    }

    fn example(&self) -> Option<Value> {
        self.example.clone()
    }

    fn format(&self) -> Option<String> {
        self.format.clone()
    }

    fn enum_values(&self) -> Option<Vec<Value>> {
        self.enum_values.clone()
    }

    fn min_string_length(&self) -> Option<u64> {
        self.min_string_length
    }

    fn max_string_length(&self) -> Option<u64> {
        self.max_string_length
    }

    fn min_array_length(&self) -> Option<u64> {
        self.min_array_length
    }

    fn max_array_length(&self) -> Option<u64> {
        self.max_array_length
    }

    fn min_map_length(&self) -> Option<u64> {
        self.min_map_length
    }

    fn max_map_length(&self) -> Option<u64> {
        self.max_map_length
    }

    fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    fn is_temporal(&self) -> bool {
        self.temporal
    }

    fn is_stringifiable(&self) -> bool {
        self.stringifiable
    }
}
