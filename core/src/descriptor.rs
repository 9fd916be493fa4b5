//! Type descriptors: the structural shape of a type, as seen by derivation.
//!
//! A [`TypeDescriptor`] pairs a type name with a [`Kind`] and optional
//! [`SchemaHooks`]. Struct kinds carry an ordered list of [`Field`]s, each with
//! its own type, raw tag string and visibility.
//!
//! Field types may be [`FieldType::Deferred`]: a function that builds the
//! descriptor on demand, tagged with the [`TypeId`] of the Rust type it
//! describes. This keeps recursive types (a `Node` with a `Vec<Node>` field)
//! finite at construction time, and lets derivation tell two distinct types
//! apart even when they share a display name.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::describe::Describe;
use crate::hooks::SchemaHooks;
use crate::schema::Format;

/// Integer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntKind {
    /// Returns the default format: `int32` for signed kinds of at most 32
    /// bits, `int64` for everything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use openapi_schema_core::{Format, IntKind};
    ///
    /// assert_eq!(IntKind::I16.format(), Format::Int32);
    /// assert_eq!(IntKind::U8.format(), Format::Int64);
    /// ```
    pub fn format(self) -> Format {
        match self {
            IntKind::I8 | IntKind::I16 | IntKind::I32 => Format::Int32,
            IntKind::I64
            | IntKind::Isize
            | IntKind::U8
            | IntKind::U16
            | IntKind::U32
            | IntKind::U64
            | IntKind::Usize => Format::Int64,
        }
    }
}

/// Floating-point kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    pub fn format(self) -> Format {
        match self {
            FloatKind::F32 => Format::Float,
            FloatKind::F64 => Format::Double,
        }
    }
}

/// Structural kind of a type.
#[derive(Debug, Clone)]
pub enum Kind {
    Bool,
    Int(IntKind),
    Float(FloatKind),
    String,
    /// A point in time.
    Temporal,
    Struct(Vec<Field>),
    Slice(Box<TypeDescriptor>),
    Array {
        element: Box<TypeDescriptor>,
        len: usize,
    },
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// Pointer or optional wrapper around another type.
    Pointer(Box<TypeDescriptor>),
    /// Dynamically typed value ("any").
    Interface,
    /// A type with no structural mapping (functions, channels, ...).
    Opaque,
}

impl Kind {
    /// Short human-readable label, used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int(_) => "int",
            Kind::Float(_) => "float",
            Kind::String => "string",
            Kind::Temporal => "temporal",
            Kind::Struct(_) => "struct",
            Kind::Slice(_) => "slice",
            Kind::Array { .. } => "array",
            Kind::Map { .. } => "map",
            Kind::Pointer(_) => "pointer",
            Kind::Interface => "interface",
            Kind::Opaque => "opaque",
        }
    }
}

/// Structural description of a type.
///
/// # Examples
///
/// ```
/// use openapi_schema_core::{Field, IntKind, Kind, TypeDescriptor};
///
/// let pair = TypeDescriptor::structure(
///     "Pair",
///     vec![
///         Field::new("A", TypeDescriptor::int(IntKind::I32), r#"json:"a""#),
///         Field::new("B", TypeDescriptor::pointer(TypeDescriptor::string()), r#"json:"b""#),
///     ],
/// );
/// assert_eq!(pair.name, "Pair");
/// assert_eq!(pair.fields().map(|f| f.len()), Some(2));
/// assert!(matches!(pair.kind, Kind::Struct(_)));
/// ```
#[derive(Clone)]
pub struct TypeDescriptor {
    /// Type name, used for diagnostics, cycle detection and registry lookups.
    pub name: String,
    pub kind: Kind,
    hooks: Option<Arc<dyn SchemaHooks>>,
}

impl TypeDescriptor {
    pub fn new(name: &str, kind: Kind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            hooks: None,
        }
    }

    pub fn bool() -> Self {
        Self::new("bool", Kind::Bool)
    }

    pub fn int(kind: IntKind) -> Self {
        let name = format!("{kind:?}").to_lowercase();
        Self::new(&name, Kind::Int(kind))
    }

    pub fn float(kind: FloatKind) -> Self {
        let name = format!("{kind:?}").to_lowercase();
        Self::new(&name, Kind::Float(kind))
    }

    pub fn string() -> Self {
        Self::new("String", Kind::String)
    }

    pub fn temporal(name: &str) -> Self {
        Self::new(name, Kind::Temporal)
    }

    pub fn structure(name: &str, fields: Vec<Field>) -> Self {
        Self::new(name, Kind::Struct(fields))
    }

    pub fn slice(element: TypeDescriptor) -> Self {
        let name = format!("[{}]", element.name);
        Self::new(&name, Kind::Slice(Box::new(element)))
    }

    pub fn array(element: TypeDescriptor, len: usize) -> Self {
        let name = format!("[{}; {len}]", element.name);
        Self::new(
            &name,
            Kind::Array {
                element: Box::new(element),
                len,
            },
        )
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        let name = format!("Map<{}, {}>", key.name, value.name);
        Self::new(
            &name,
            Kind::Map {
                key: Box::new(key),
                value: Box::new(value),
            },
        )
    }

    pub fn pointer(inner: TypeDescriptor) -> Self {
        let name = format!("*{}", inner.name);
        Self::new(&name, Kind::Pointer(Box::new(inner)))
    }

    pub fn interface(name: &str) -> Self {
        Self::new(name, Kind::Interface)
    }

    pub fn opaque(name: &str) -> Self {
        Self::new(name, Kind::Opaque)
    }

    /// Renames the descriptor, e.g. for a named alias of a primitive.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Attaches capability hooks, replacing any previous ones.
    pub fn with_hooks(mut self, hooks: impl SchemaHooks + 'static) -> Self {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    pub fn hooks(&self) -> Option<&dyn SchemaHooks> {
        self.hooks.as_deref()
    }

    /// Returns the struct fields, or `None` for non-struct kinds.
    pub fn fields(&self) -> Option<&[Field]> {
        match &self.kind {
            Kind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Strips every pointer layer.
    pub fn unwrap_pointers(&self) -> &TypeDescriptor {
        let mut current = self;
        while let Kind::Pointer(inner) = &current.kind {
            current = &**inner;
        }
        current
    }

    /// Returns `true` if the hooks mark this type as a point in time,
    /// whatever its kind.
    pub fn has_temporal_hook(&self) -> bool {
        self.hooks().is_some_and(|h| h.is_temporal())
    }

    pub fn is_string_like(&self) -> bool {
        matches!(self.kind, Kind::String)
    }

    /// Returns `true` if values of this type can be used as JSON object keys.
    pub fn is_stringifiable(&self) -> bool {
        self.is_string_like() || self.hooks().is_some_and(|h| h.is_stringifiable())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

/// Type of a struct field, either built or built on demand.
#[derive(Debug, Clone)]
pub enum FieldType {
    Inline(TypeDescriptor),
    /// Built by `build`, which describes the Rust type identified by `id`.
    Deferred {
        id: TypeId,
        build: fn() -> TypeDescriptor,
    },
}

impl FieldType {
    pub fn resolve(&self) -> Cow<'_, TypeDescriptor> {
        match self {
            FieldType::Inline(ty) => Cow::Borrowed(ty),
            FieldType::Deferred { build, .. } => Cow::Owned(build()),
        }
    }

    /// Identity of the described Rust type. Inline descriptors have none.
    pub fn identity(&self) -> Option<TypeId> {
        match self {
            FieldType::Inline(_) => None,
            FieldType::Deferred { id, .. } => Some(*id),
        }
    }
}

/// A struct field.
#[derive(Debug, Clone)]
pub struct Field {
    /// Internal (source) name of the field.
    pub name: String,
    pub ty: FieldType,
    /// Raw tag string, parsed by [`TagMetadata`](crate::TagMetadata).
    pub tag: String,
    /// Non-exported fields are invisible to derivation.
    pub exported: bool,
}

impl Field {
    /// Creates an exported field with an already built type.
    pub fn new(name: &str, ty: TypeDescriptor, tag: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: FieldType::Inline(ty),
            tag: tag.to_string(),
            exported: true,
        }
    }

    /// Creates an exported field whose type is described on demand by `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use openapi_schema_core::{Field, Kind};
    ///
    /// let field = Field::of::<Vec<String>>("Tags", r#"json:"tags""#);
    /// assert!(matches!(field.ty.resolve().kind, Kind::Slice(_)));
    /// ```
    pub fn of<T: Describe + 'static>(name: &str, tag: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: FieldType::Deferred {
                id: TypeId::of::<T>(),
                build: T::describe,
            },
            tag: tag.to_string(),
            exported: true,
        }
    }

    /// Marks the field as not exported.
    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }
}
