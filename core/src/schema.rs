//! Schema tree produced by derivation.
//!
//! A [`Schema`] is a closed set of variants mirroring the OpenAPI Schema
//! Object: [`Primitive`], [`Object`], [`Array`], [`OneOf`] and [`AllOf`].
//! Every variant except the combinators carries a [`Shared`] block holding the
//! type tag, format, bounds, enum, title, example and external docs. When
//! serialized, the [`Shared`] fields are spliced into the schema object itself.
//!
//! Schemas have no identity: derivation builds a fresh tree on every call and
//! the assembler embeds it verbatim.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON type tag of a schema.
///
/// Integers are reported as `number` with an `int32`/`int64` format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Object,
    Array,
    Number,
    Boolean,
}

/// Well-known formats.
///
/// This list doesn't attempt to be exhaustive; [`Shared::format`] accepts any
/// string.
///
/// # Examples
///
/// ```
/// use openapi_schema_core::Format;
///
/// assert_eq!(Format::DateTime.as_str(), "date-time");
/// assert_eq!(Format::Int64.to_string(), "int64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    DateTime,
    Date,
    Time,
    Duration,
    Email,
    IdnEmail,
    Hostname,
    IdnHostname,
    Uri,
    Regex,
    Binary,
    Int32,
    Int64,
    Float,
    Double,
    Byte,
    Password,
}

impl Format {
    /// Returns the OpenAPI spelling of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::DateTime => "date-time",
            Format::Date => "date",
            Format::Time => "time",
            Format::Duration => "duration",
            Format::Email => "email",
            Format::IdnEmail => "idn-email",
            Format::Hostname => "hostname",
            Format::IdnHostname => "idn-hostname",
            Format::Uri => "uri",
            Format::Regex => "regex",
            Format::Binary => "binary",
            Format::Int32 => "int32",
            Format::Int64 => "int64",
            Format::Float => "float",
            Format::Double => "double",
            Format::Byte => "byte",
            Format::Password => "password",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to documentation hosted elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocs {
    /// Short description of the target documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL of the target documentation.
    pub url: String,
}

impl ExternalDocs {
    /// Creates a reference with a description.
    pub fn new(description: &str, url: &str) -> Self {
        Self {
            description: Some(description.to_string()),
            url: url.to_string(),
        }
    }
}

/// Descriptive data shared by [`Primitive`], [`Object`] and [`Array`].
///
/// Bounds are passed through as given; nothing checks that e.g.
/// `min_length` is only set on string schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shared {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// `None` only for the empty schema `{}` (e.g. an interface type).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

impl Shared {
    /// Creates a block with only the type tag set.
    pub fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Shared::default()
    }
}

/// A leaf schema: boolean, number, string, or the empty schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Primitive {
    #[serde(flatten)]
    pub shared: Shared,
}

/// An object, either with well-known properties or used as a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    #[serde(flatten)]
    pub shared: Shared,
    /// Names of required properties. Order is not significant.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Well-known properties, keyed by public name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    /// Schema of the values of any property not listed in `properties`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Schema>>,
}

impl Object {
    /// Creates an empty object schema with `type: object`.
    pub fn new() -> Self {
        Self {
            shared: Shared::typed(SchemaType::Object),
            ..Default::default()
        }
    }

    /// Inserts a property, replacing any earlier property of the same name.
    ///
    /// The required set follows the last insertion, so `required` always
    /// stays a subset of the property names.
    pub fn insert_property(&mut self, name: &str, schema: Schema, required: bool) {
        self.properties.insert(name.to_string(), schema);
        let position = self.required.iter().position(|n| n == name);
        match (required, position) {
            (true, None) => self.required.push(name.to_string()),
            (false, Some(index)) => {
                self.required.remove(index);
            }
            _ => {}
        }
    }

    /// Returns `true` if `name` is a required property.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|n| n == name)
    }

    /// Returns the required property names as a set.
    pub fn required_set(&self) -> BTreeSet<&str> {
        self.required.iter().map(String::as_str).collect()
    }
}

/// An array of homogeneous items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Array {
    #[serde(flatten)]
    pub shared: Shared,
    pub items: Box<Schema>,
}

/// Sum type: the value matches exactly one member.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OneOf {
    #[serde(rename = "oneOf")]
    pub one_of: Vec<Schema>,
}

/// Intersection type: the value matches every member.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllOf {
    #[serde(rename = "allOf")]
    pub all_of: Vec<Schema>,
}

/// A JSON schema.
///
/// # Examples
///
/// ```
/// use openapi_schema_core::{Schema, SchemaType};
///
/// let schema = Schema::primitive(SchemaType::Boolean);
/// assert_eq!(serde_json::to_value(&schema).unwrap(), serde_json::json!({"type": "boolean"}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Schema {
    Primitive(Primitive),
    Object(Object),
    Array(Array),
    OneOf(OneOf),
    AllOf(AllOf),
}

impl Schema {
    /// Creates a primitive of the given type.
    pub fn primitive(schema_type: SchemaType) -> Self {
        Schema::Primitive(Primitive {
            shared: Shared::typed(schema_type),
        })
    }

    /// Creates an array schema.
    pub fn array(items: Schema) -> Self {
        Schema::Array(Array {
            shared: Shared::typed(SchemaType::Array),
            items: Box::new(items),
        })
    }

    /// Creates a `oneOf` combinator.
    pub fn one_of(variants: Vec<Schema>) -> Self {
        Schema::OneOf(OneOf { one_of: variants })
    }

    /// Returns the shared block, or `None` for combinators.
    pub fn shared(&self) -> Option<&Shared> {
        match self {
            Schema::Primitive(p) => Some(&p.shared),
            Schema::Object(o) => Some(&o.shared),
            Schema::Array(a) => Some(&a.shared),
            Schema::OneOf(_) | Schema::AllOf(_) => None,
        }
    }

    /// Returns the type tag, if any.
    pub fn schema_type(&self) -> Option<SchemaType> {
        self.shared().and_then(|s| s.schema_type)
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Schema::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Schema::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_one_of(&self) -> Option<&[Schema]> {
        match self {
            Schema::OneOf(o) => Some(&o.one_of),
            _ => None,
        }
    }

    /// Structural equality that treats `required` lists as sets.
    ///
    /// Member order of `oneOf`/`allOf` is significant.
    ///
    /// # Examples
    ///
    /// ```
    /// use openapi_schema_core::{Object, Schema, SchemaType};
    ///
    /// let mut a = Object::new();
    /// a.insert_property("x", Schema::primitive(SchemaType::String), true);
    /// a.insert_property("y", Schema::primitive(SchemaType::String), true);
    /// let mut b = a.clone();
    /// b.required.reverse();
    ///
    /// assert_ne!(Schema::Object(a.clone()), Schema::Object(b.clone()));
    /// assert!(Schema::Object(a).equivalent(&Schema::Object(b)));
    /// ```
    pub fn equivalent(&self, other: &Schema) -> bool {
        match (self, other) {
            (Schema::Primitive(a), Schema::Primitive(b)) => a.shared == b.shared,
            (Schema::Object(a), Schema::Object(b)) => {
                a.shared == b.shared
                    && a.required_set() == b.required_set()
                    && a.properties.len() == b.properties.len()
                    && a.properties.iter().all(|(name, schema)| {
                        b.properties
                            .get(name)
                            .is_some_and(|other| schema.equivalent(other))
                    })
                    && match (&a.additional_properties, &b.additional_properties) {
                        (None, None) => true,
                        (Some(x), Some(y)) => x.equivalent(y),
                        _ => false,
                    }
            }
            (Schema::Array(a), Schema::Array(b)) => {
                a.shared == b.shared && a.items.equivalent(&b.items)
            }
            (Schema::OneOf(a), Schema::OneOf(b)) => all_equivalent(&a.one_of, &b.one_of),
            (Schema::AllOf(a), Schema::AllOf(b)) => all_equivalent(&a.all_of, &b.all_of),
            _ => false,
        }
    }
}

fn all_equivalent(a: &[Schema], b: &[Schema]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equivalent(y))
}

impl From<Object> for Schema {
    fn from(object: Object) -> Self {
        Schema::Object(object)
    }
}
