//! Error and diagnostic types for schema derivation.
//!
//! Failures inside a struct are wrapped on the way out with the field and
//! container they occurred in ([`SchemaError::InField`],
//! [`SchemaError::InVariant`], [`SchemaError::InElement`]), so the final
//! error reads as a path from the root type down to the failing field.

use std::fmt;

use openapi_schema_core::TagError;
use thiserror::Error;

/// Errors that can occur while deriving a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field has no tag for the active name key.
    #[error("field `{field}` of `{container}` has no public name, expecting a tag `{name_key}`")]
    MissingPublicName {
        container: String,
        field: String,
        name_key: String,
    },

    /// No schema can be derived for the kind and no hook overrides it.
    #[error(
        "no schema for `{ty}` ({kind}), implement a schema hook or register it as a sum type"
    )]
    UnsupportedKind { ty: String, kind: &'static str },

    /// Map key is neither string-like nor stringifiable.
    #[error("map `{ty}` has unsupported key type `{key}`")]
    UnsupportedMapKey { ty: String, key: String },

    /// A flattened field is neither a struct nor a string-keyed map.
    #[error(
        "field `{field}` of `{container}` is marked as flattened but `{found}` is neither a struct nor a string-keyed map"
    )]
    InvalidFlattenTarget {
        container: String,
        field: String,
        found: String,
    },

    /// The field tag could not be parsed.
    #[error("invalid tag: {0}")]
    TagParse(#[from] TagError),

    /// A struct declares exactly one variant (strict mode only).
    #[error("struct `{ty}` declares the single variant `{variant}`, the `variant` tag seems misapplied")]
    MisplacedVariantTag { ty: String, variant: String },

    /// A type contains itself, directly or through flattening.
    #[error("cyclic type graph: {path}")]
    CyclicType { ty: String, path: String },

    /// Nesting exceeds [`EngineConfig::max_depth`](crate::EngineConfig::max_depth).
    #[error("type nesting deeper than {limit} levels at `{ty}`")]
    DepthExceeded { ty: String, limit: usize },

    /// Failure while deriving a field.
    #[error("in field `{field}` of `{container}`: {source}")]
    InField {
        container: String,
        field: String,
        source: Box<SchemaError>,
    },

    /// Failure while deriving one member of a sum type.
    #[error("in variant `{variant}` of `{container}`: {source}")]
    InVariant {
        container: String,
        variant: String,
        source: Box<SchemaError>,
    },

    /// Failure while deriving the elements of an array or the values of a map.
    #[error("in elements of `{container}`: {source}")]
    InElement {
        container: String,
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    pub(crate) fn in_field(container: &str, field: &str, source: SchemaError) -> Self {
        SchemaError::InField {
            container: container.to_string(),
            field: field.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn in_variant(container: &str, variant: &str, source: SchemaError) -> Self {
        SchemaError::InVariant {
            container: container.to_string(),
            variant: variant.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn in_element(container: &str, source: SchemaError) -> Self {
        SchemaError::InElement {
            container: container.to_string(),
            source: Box::new(source),
        }
    }

    fn inner(&self) -> Option<&SchemaError> {
        match self {
            SchemaError::InField { source, .. }
            | SchemaError::InVariant { source, .. }
            | SchemaError::InElement { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns the innermost error, past every breadcrumb wrapper.
    ///
    /// # Examples
    ///
    /// ```
    /// use openapi_schema_engine::SchemaError;
    ///
    /// let err = SchemaError::UnsupportedKind { ty: "Handle".into(), kind: "opaque" };
    /// assert_eq!(err.root_cause(), &err);
    /// ```
    pub fn root_cause(&self) -> &SchemaError {
        let mut current = self;
        while let Some(inner) = current.inner() {
            current = inner;
        }
        current
    }

    /// Renders the path of wrappers, e.g. `Outer.inner > Inner.value`.
    pub fn breadcrumb(&self) -> String {
        let mut segments = Vec::new();
        let mut current = self;
        loop {
            match current {
                SchemaError::InField {
                    container, field, ..
                } => segments.push(format!("{container}.{field}")),
                SchemaError::InVariant {
                    container, variant, ..
                } => segments.push(format!("{container}<{variant}>")),
                SchemaError::InElement { container, .. } => segments.push(format!("{container}[]")),
                _ => break,
            }
            match current.inner() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        segments.join(" > ")
    }
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Non-fatal findings reported alongside a derived schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A struct declares exactly one variant; the tag was ignored.
    MisplacedVariantTag { ty: String, variant: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MisplacedVariantTag { ty, variant } => write!(
                f,
                "struct `{ty}` declares the single variant `{variant}`, treated as a plain object"
            ),
        }
    }
}
