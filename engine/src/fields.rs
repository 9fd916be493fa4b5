//! Field walk: builds an object's properties from a struct's fields.
//!
//! Fields are processed from a queue seeded with the struct's direct fields.
//! A flattened struct field contributes no property of its own; its fields
//! are appended to the queue instead, so promoted fields are visited after
//! the direct ones. A flattened string-keyed map becomes the object's
//! `additionalProperties`.
//!
//! Each queued field remembers which deferred types were spliced on the way
//! to it, so a struct that flattens itself (directly or through others) is
//! reported as a cycle instead of growing the queue forever.

use std::any::TypeId;
use std::collections::{BTreeSet, VecDeque};

use openapi_schema_core::{Field, Kind, Object, Schema, SchemaType, Shared, TagMetadata, TypeDescriptor};

use crate::engine::Walk;
use crate::error::{Result, SchemaError};
use crate::resolve;

struct WorkItem {
    field: Field,
    /// Struct names from the derived type down to the one declaring `field`.
    ancestry: Vec<String>,
    /// Flattened field types spliced along `ancestry`, each with the
    /// ancestry length at the point it was spliced.
    spliced: Vec<(TypeId, usize)>,
}

impl WorkItem {
    fn container(&self) -> &str {
        self.ancestry.last().map(String::as_str).unwrap_or_default()
    }
}

impl Walk<'_> {
    /// Builds the object schema of struct `ty`.
    ///
    /// With a `restriction`, only the direct fields it names are considered;
    /// fields promoted by flattening are never filtered.
    pub(crate) fn build_object(
        &mut self,
        ty: &TypeDescriptor,
        fields: &[Field],
        restriction: Option<&BTreeSet<String>>,
        shared: Shared,
    ) -> Result<Object> {
        let mut object = Object {
            shared,
            ..Object::new()
        };
        object.shared.schema_type = Some(SchemaType::Object);

        let mut queue: VecDeque<WorkItem> = fields
            .iter()
            .filter(|field| restriction.is_none_or(|names| names.contains(&field.name)))
            .map(|field| WorkItem {
                field: field.clone(),
                ancestry: vec![ty.name.clone()],
                spliced: Vec::new(),
            })
            .collect();

        while let Some(item) = queue.pop_front() {
            if !item.field.exported {
                continue;
            }
            let container = item.container();
            let field = &item.field;
            let tags = TagMetadata::parse(&field.tag)
                .map_err(|err| SchemaError::in_field(container, &field.name, err.into()))?;

            if tags.is_flattened() {
                self.flatten(&item, &mut queue, &mut object)?;
                continue;
            }

            let Some(name) = tags.public_name(self.name_key) else {
                return Err(SchemaError::MissingPublicName {
                    container: container.to_string(),
                    field: field.name.clone(),
                    name_key: self.name_key.to_string(),
                });
            };
            let schema = self.field_schema(container, field, &tags)?;
            if object.properties.contains_key(name) {
                tracing::debug!(
                    ty = %ty.name,
                    property = name,
                    field = %field.name,
                    "property replaced by a later field"
                );
            }
            object.insert_property(name, schema, !tags.is_optional());
        }

        Ok(object)
    }

    fn flatten(
        &mut self,
        item: &WorkItem,
        queue: &mut VecDeque<WorkItem>,
        object: &mut Object,
    ) -> Result<()> {
        let container = item.container();
        let field = &item.field;
        let resolved = field.ty.resolve();
        let target = resolved.unwrap_pointers();

        match &target.kind {
            Kind::Struct(inner) => {
                let identity = field.ty.identity();
                let repeated = identity
                    .and_then(|id| item.spliced.iter().find(|(seen, _)| *seen == id));
                if let Some(&(_, at)) = repeated {
                    let mut path = item.ancestry[at..].to_vec();
                    path.push(target.name.clone());
                    return Err(SchemaError::in_field(
                        container,
                        &field.name,
                        SchemaError::CyclicType {
                            ty: target.name.clone(),
                            path: path.join(" -> "),
                        },
                    ));
                }
                tracing::debug!(
                    container,
                    field = %field.name,
                    ty = %target.name,
                    fields = inner.len(),
                    "splicing flattened fields"
                );
                let mut spliced = item.spliced.clone();
                if let Some(id) = identity {
                    spliced.push((id, item.ancestry.len()));
                }
                let mut ancestry = item.ancestry.clone();
                ancestry.push(target.name.clone());
                queue.extend(inner.iter().map(|promoted| WorkItem {
                    field: promoted.clone(),
                    ancestry: ancestry.clone(),
                    spliced: spliced.clone(),
                }));
                Ok(())
            }
            Kind::Map { key, value } if key.is_string_like() => {
                let values = self
                    .resolving(field.ty.identity(), container, |walk| {
                        walk.derive(value, &Shared::default())
                            .map_err(|err| SchemaError::in_element(&target.name, err))
                    })
                    .map_err(|err| SchemaError::in_field(container, &field.name, err))?;
                object.additional_properties = Some(Box::new(values));
                Ok(())
            }
            _ => Err(SchemaError::InvalidFlattenTarget {
                container: container.to_string(),
                field: field.name.clone(),
                found: target.name.clone(),
            }),
        }
    }

    /// Derives the schema of `field` with the constraints from its tag.
    pub(crate) fn field_schema(
        &mut self,
        container: &str,
        field: &Field,
        tags: &TagMetadata,
    ) -> Result<Schema> {
        let in_field = |err: SchemaError| SchemaError::in_field(container, &field.name, err);
        let constraints = resolve::field_constraints(tags).map_err(|err| in_field(err.into()))?;
        let ty = field.ty.resolve();
        self.resolving(field.ty.identity(), container, |walk| walk.derive(&ty, &constraints))
            .map_err(in_field)
    }
}
