//! The schema derivation engine.
//!
//! [`SchemaEngine`] owns its configuration and sum-type registry and is
//! read-only once built, so one engine can serve any number of threads.
//! Each call runs a fresh [`Walk`] that tracks the types currently being
//! derived (for cycle detection), the nesting depth and the diagnostics
//! collected along the way.
//!
//! A cycle is the same Rust type being described again while its own
//! derivation is still in progress. Types are told apart by the `TypeId`
//! that deferred fields carry, never by display name, so two distinct
//! structs both called `Item` nest freely. Registered sum types are keyed by
//! name in the registry, and re-entering one by name is a cycle as well.
//!
//! Resolution order for one descriptor:
//!
//! 1. schema override hook, returned verbatim
//! 2. registered sum type, one `oneOf` member per registered variant
//! 3. caller constraints, then the remaining hooks, first writer wins
//! 4. temporal types, as `date-time` strings
//! 5. the structural kind

use std::any::TypeId;
use std::collections::BTreeMap;

use openapi_schema_core::{
    Array, Describe, Field, Format, Kind, Object, Primitive, Schema, SchemaType, Shared,
    TagMetadata, TypeDescriptor,
};

use crate::config::EngineConfig;
use crate::error::{Diagnostic, Result, SchemaError};
use crate::registry::SumTypeRegistry;
use crate::resolve;
use crate::variants::VariantPartition;

/// Derives OpenAPI schemas from type descriptors.
///
/// # Examples
///
/// ```
/// use openapi_schema_core::{Field, IntKind, TypeDescriptor};
/// use openapi_schema_engine::{EngineConfig, SchemaEngine};
/// use serde_json::json;
///
/// let pair = TypeDescriptor::structure(
///     "Pair",
///     vec![
///         Field::new("A", TypeDescriptor::int(IntKind::I32), r#"json:"a""#),
///         Field::new("B", TypeDescriptor::string(), r#"json:"b" default:"x""#),
///     ],
/// );
///
/// let engine = SchemaEngine::new(EngineConfig::default());
/// let schema = engine.derive(&pair, "json", None).unwrap();
/// assert_eq!(
///     serde_json::to_value(&schema).unwrap(),
///     json!({
///         "type": "object",
///         "required": ["a"],
///         "properties": {
///             "a": {"type": "number", "format": "int32"},
///             "b": {"type": "string"}
///         }
///     })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaEngine {
    config: EngineConfig,
    registry: SumTypeRegistry,
}

/// A derived schema together with the non-fatal findings of the derivation.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

/// Schema of a single struct field, as used for parameter extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Public name under the requested key, if the tag declares one.
    pub public_name: Option<String>,
    pub schema: Schema,
    pub required: bool,
    pub deprecated: bool,
}

impl SchemaEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: SumTypeRegistry::new(),
        }
    }

    /// Replaces the sum-type registry.
    pub fn with_registry(mut self, registry: SumTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &SumTypeRegistry {
        &self.registry
    }

    /// Derives the schema of `ty`, reading public names from `name_key` tags.
    ///
    /// `constraints` are applied on top of the derived schema and take
    /// precedence over anything the type's hooks provide.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if any part of the type graph has no schema.
    /// Errors inside structs are wrapped with the field they occurred in, see
    /// [`SchemaError::breadcrumb`].
    pub fn derive(
        &self,
        ty: &TypeDescriptor,
        name_key: &str,
        constraints: Option<&Shared>,
    ) -> Result<Schema> {
        self.derive_with_report(ty, name_key, constraints)
            .map(|derivation| derivation.schema)
    }

    /// Like [`derive`](Self::derive), also returning the diagnostics.
    pub fn derive_with_report(
        &self,
        ty: &TypeDescriptor,
        name_key: &str,
        constraints: Option<&Shared>,
    ) -> Result<Derivation> {
        let mut walk = Walk::new(self, name_key);
        let empty = Shared::default();
        let schema = walk.derive(ty, constraints.unwrap_or(&empty))?;
        Ok(Derivation {
            schema,
            diagnostics: walk.diagnostics,
        })
    }

    /// Derives the schema of `T` using the configured default name key.
    pub fn derive_for<T: Describe>(&self) -> Result<Schema> {
        self.derive(&T::describe(), &self.config.default_name_key, None)
    }

    /// Derives the schema of one field of `container`, with the constraints
    /// declared in its tag.
    ///
    /// Unlike struct derivation, a missing public name is not an error here.
    pub fn derive_field(&self, container: &str, field: &Field, name_key: &str) -> Result<FieldSchema> {
        let tags = TagMetadata::parse(&field.tag)
            .map_err(|err| SchemaError::in_field(container, &field.name, err.into()))?;
        let mut walk = Walk::new(self, name_key);
        let schema = walk.field_schema(container, field, &tags)?;
        Ok(FieldSchema {
            public_name: tags.public_name(name_key).map(str::to_string),
            schema,
            required: !tags.is_optional(),
            deprecated: tags.is_deprecated(),
        })
    }
}

/// A struct or registered sum type being derived.
struct Frame {
    name: String,
    registered: bool,
}

/// A deferred field type being derived.
struct Pending {
    id: TypeId,
    /// Struct declaring the field.
    container: String,
    /// Length of the frame stack when the field was entered.
    frames: usize,
}

/// State of a single derivation call.
pub(crate) struct Walk<'e> {
    engine: &'e SchemaEngine,
    pub(crate) name_key: &'e str,
    /// Outermost first.
    stack: Vec<Frame>,
    pending: Vec<Pending>,
    depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'e> Walk<'e> {
    fn new(engine: &'e SchemaEngine, name_key: &'e str) -> Self {
        Self {
            engine,
            name_key,
            stack: Vec::new(),
            pending: Vec::new(),
            depth: 0,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn derive(&mut self, ty: &TypeDescriptor, constraints: &Shared) -> Result<Schema> {
        let limit = self.engine.config.max_depth;
        if self.depth >= limit {
            return Err(SchemaError::DepthExceeded {
                ty: ty.name.clone(),
                limit,
            });
        }
        self.depth += 1;
        let result = self.derive_inner(ty, constraints);
        self.depth -= 1;
        result
    }

    fn derive_inner(&mut self, ty: &TypeDescriptor, constraints: &Shared) -> Result<Schema> {
        tracing::trace!(ty = %ty.name, kind = ty.kind.label(), depth = self.depth, "deriving schema");

        if let Some(schema) = resolve::override_schema(ty) {
            return Ok(schema);
        }

        let engine = self.engine;
        if let Some(variants) = engine.registry.variants(&ty.name) {
            tracing::debug!(ty = %ty.name, variants = variants.len(), "deriving registered sum type");
            return self.framed(&ty.name, true, |walk| {
                let mut members = Vec::with_capacity(variants.len());
                for variant in variants {
                    let member = walk
                        .derive(variant, &Shared::default())
                        .map_err(|err| SchemaError::in_variant(&ty.name, &variant.name, err))?;
                    members.push(member);
                }
                Ok(Schema::one_of(members))
            });
        }

        let mut shared = constraints.clone();
        resolve::apply_hooks(ty, &mut shared);

        if ty.has_temporal_hook() {
            return Ok(temporal(shared));
        }

        match &ty.kind {
            // The wrapper is transparent: only the pointee's hooks count.
            Kind::Pointer(inner) => self.derive(inner, constraints),
            Kind::Interface => Ok(Schema::Primitive(Primitive { shared })),
            Kind::Bool => Ok(primitive(shared, SchemaType::Boolean, None)),
            Kind::Int(kind) => Ok(primitive(shared, SchemaType::Number, Some(kind.format()))),
            Kind::Float(kind) => Ok(primitive(shared, SchemaType::Number, Some(kind.format()))),
            Kind::String => Ok(primitive(shared, SchemaType::String, None)),
            Kind::Temporal => Ok(temporal(shared)),
            Kind::Slice(element) | Kind::Array { element, .. } => {
                let items = self
                    .derive(element, &Shared::default())
                    .map_err(|err| SchemaError::in_element(&ty.name, err))?;
                shared.schema_type = Some(SchemaType::Array);
                Ok(Schema::Array(Array {
                    shared,
                    items: Box::new(items),
                }))
            }
            Kind::Map { key, value } => {
                if !key.is_stringifiable() {
                    return Err(SchemaError::UnsupportedMapKey {
                        ty: ty.name.clone(),
                        key: key.name.clone(),
                    });
                }
                let values = self
                    .derive(value, &Shared::default())
                    .map_err(|err| SchemaError::in_element(&ty.name, err))?;
                shared.schema_type = Some(SchemaType::Object);
                Ok(Schema::Object(Object {
                    shared,
                    required: Vec::new(),
                    properties: BTreeMap::new(),
                    additional_properties: Some(Box::new(values)),
                }))
            }
            Kind::Struct(fields) => {
                self.framed(&ty.name, false, |walk| walk.derive_struct(ty, fields, shared))
            }
            Kind::Opaque => Err(SchemaError::UnsupportedKind {
                ty: ty.name.clone(),
                kind: ty.kind.label(),
            }),
        }
    }

    /// Runs `f` with `name` pushed on the frame stack.
    ///
    /// Only registered sum types are checked here: their expansion depends
    /// on the name alone.
    fn framed<T>(
        &mut self,
        name: &str,
        registered: bool,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let repeated = registered
            .then(|| {
                self.stack
                    .iter()
                    .position(|frame| frame.registered && frame.name == name)
            })
            .flatten();
        if let Some(start) = repeated {
            let mut path = self.frame_names(start);
            path.push(name);
            return Err(SchemaError::CyclicType {
                ty: name.to_string(),
                path: path.join(" -> "),
            });
        }
        self.stack.push(Frame {
            name: name.to_string(),
            registered,
        });
        let result = f(self);
        self.stack.pop();
        result
    }

    /// Runs `f` for a field of `container` whose type has identity `id`.
    ///
    /// Entering the same identity again before it is left is a cycle.
    pub(crate) fn resolving<T>(
        &mut self,
        id: Option<TypeId>,
        container: &str,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let Some(id) = id else {
            return f(self);
        };
        if let Some(entry) = self.pending.iter().find(|entry| entry.id == id) {
            let mut path = vec![entry.container.as_str()];
            path.extend(self.frame_names(entry.frames));
            return Err(SchemaError::CyclicType {
                ty: container.to_string(),
                path: path.join(" -> "),
            });
        }
        self.pending.push(Pending {
            id,
            container: container.to_string(),
            frames: self.stack.len(),
        });
        let result = f(self);
        self.pending.pop();
        result
    }

    fn frame_names(&self, from: usize) -> Vec<&str> {
        self.stack[from..].iter().map(|frame| frame.name.as_str()).collect()
    }

    fn derive_struct(
        &mut self,
        ty: &TypeDescriptor,
        fields: &[Field],
        shared: Shared,
    ) -> Result<Schema> {
        let partition = VariantPartition::scan(&ty.name, fields)?;

        if let Some(variant) = partition.single_variant() {
            tracing::warn!(
                ty = %ty.name,
                variant,
                "struct declares a single variant, the `variant` tag seems misapplied"
            );
            if self.engine.config.strict_variants {
                return Err(SchemaError::MisplacedVariantTag {
                    ty: ty.name.clone(),
                    variant: variant.to_string(),
                });
            }
            self.diagnostics.push(Diagnostic::MisplacedVariantTag {
                ty: ty.name.clone(),
                variant: variant.to_string(),
            });
        }

        if partition.len() < 2 {
            return self.build_object(ty, fields, None, shared).map(Schema::Object);
        }

        let mut members = Vec::with_capacity(partition.len());
        for (variant, restriction) in partition.restrictions() {
            let member = self
                .build_object(ty, fields, Some(&restriction), shared.clone())
                .map_err(|err| SchemaError::in_variant(&ty.name, variant, err))?;
            members.push(Schema::Object(member));
        }
        Ok(Schema::one_of(members))
    }
}

fn temporal(mut shared: Shared) -> Schema {
    shared.schema_type = Some(SchemaType::String);
    shared
        .format
        .get_or_insert_with(|| Format::DateTime.to_string());
    Schema::Primitive(Primitive { shared })
}

fn primitive(mut shared: Shared, schema_type: SchemaType, format: Option<Format>) -> Schema {
    shared.schema_type = Some(schema_type);
    if let Some(format) = format {
        shared.format.get_or_insert_with(|| format.to_string());
    }
    Schema::Primitive(Primitive { shared })
}
