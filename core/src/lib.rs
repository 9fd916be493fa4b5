//! Core types for deriving OpenAPI schemas from type descriptions.
//!
//! This crate defines the data exchanged with the derivation engine:
//!
//! - [`Schema`]: the output tree ([`Primitive`], [`Object`], [`Array`],
//!   [`OneOf`], [`AllOf`]) with its [`Shared`] descriptive block.
//! - [`TypeDescriptor`]: the structural shape of an input type: its
//!   [`Kind`], struct [`Field`]s and optional [`SchemaHooks`].
//! - [`TagMetadata`]: parsed field tags (public names, flatten, variants,
//!   defaults and free-form annotations).
//! - [`Describe`]: maps Rust types to descriptors.
//!
//! # Example
//!
//! ```
//! use openapi_schema_core::*;
//!
//! let pair = TypeDescriptor::structure(
//!     "Pair",
//!     vec![
//!         Field::of::<i32>("A", r#"json:"a""#),
//!         Field::of::<Option<String>>("B", r#"json:"b" default:"""#),
//!     ],
//! );
//!
//! let tags = TagMetadata::parse(&pair.fields().unwrap()[1].tag).unwrap();
//! assert_eq!(tags.public_name("json"), Some("b"));
//! assert!(tags.is_optional());
//! ```

mod describe;
mod descriptor;
mod hooks;
mod schema;
mod tags;

pub use describe::Describe;
pub use descriptor::{Field, FieldType, FloatKind, IntKind, Kind, TypeDescriptor};
pub use hooks::{Hooks, SchemaHooks};
pub use schema::*;
pub use tags::{TagError, TagMetadata};
