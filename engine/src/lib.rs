//! Derivation of OpenAPI schemas from type descriptors.
//!
//! [`SchemaEngine`] walks a [`TypeDescriptor`](openapi_schema_core::TypeDescriptor)
//! and produces a [`Schema`](openapi_schema_core::Schema):
//!
//! - primitives get their type tag and default format (`int32`, `double`, ...),
//! - structs become objects whose properties are named by a tag key
//!   (`json` by default), with fields flattened in on `flatten`,
//! - structs whose fields carry `variant` tags become `oneOf` sum types,
//! - types registered in a [`SumTypeRegistry`] become `oneOf` over their
//!   registered variants,
//! - [`SchemaHooks`](openapi_schema_core::SchemaHooks) on a type can override
//!   or decorate its schema.
//!
//! Errors ([`SchemaError`]) carry the path of fields leading to the failure.
//! Non-fatal findings are reported as [`Diagnostic`]s through
//! [`SchemaEngine::derive_with_report`] and logged with `tracing`.
//!
//! # Example
//!
//! ```
//! use openapi_schema_core::{Describe, Field, TypeDescriptor};
//! use openapi_schema_engine::{EngineConfig, SchemaEngine};
//! use serde_json::json;
//!
//! struct Reply {
//!     status: u16,
//!     value: String,
//!     error: String,
//! }
//!
//! impl Describe for Reply {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::structure(
//!             "Reply",
//!             vec![
//!                 Field::of::<u16>("status", r#"json:"status""#),
//!                 Field::of::<String>("value", r#"json:"value" variant:"ok""#),
//!                 Field::of::<String>("error", r#"json:"error" variant:"failed""#),
//!             ],
//!         )
//!     }
//! }
//!
//! let engine = SchemaEngine::new(EngineConfig::default());
//! let schema = engine.derive_for::<Reply>().unwrap();
//! let members = schema.as_one_of().unwrap();
//! assert_eq!(members.len(), 2);
//! assert_eq!(
//!     serde_json::to_value(&members[0]).unwrap()["properties"]["error"],
//!     json!({"type": "string"})
//! );
//! ```

mod config;
mod engine;
mod error;
mod fields;
mod registry;
mod resolve;
mod variants;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Derivation, FieldSchema, SchemaEngine};
pub use error::{Diagnostic, Result, SchemaError};
pub use registry::SumTypeRegistry;
