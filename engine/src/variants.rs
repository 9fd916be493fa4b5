//! Sum-type partitioning of a struct's direct fields.
//!
//! Fields tagged `variant:"a,b"` belong to the named variants only; untagged
//! fields belong to every variant. A struct with two or more variant names
//! derives to a `oneOf` with one member per variant.

use std::collections::{BTreeMap, BTreeSet};

use openapi_schema_core::{Field, TagMetadata};

use crate::error::{Result, SchemaError};

/// Variant membership of a struct's direct fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct VariantPartition {
    shared: BTreeSet<String>,
    variants: BTreeMap<String, BTreeSet<String>>,
}

impl VariantPartition {
    /// Classifies the direct fields of `container`.
    pub(crate) fn scan(container: &str, fields: &[Field]) -> Result<Self> {
        let mut partition = Self::default();
        for field in fields {
            let tags = TagMetadata::parse(&field.tag)
                .map_err(|err| SchemaError::in_field(container, &field.name, err.into()))?;
            match tags.variants() {
                Some(names) => {
                    for name in names {
                        partition
                            .variants
                            .entry(name.to_string())
                            .or_default()
                            .insert(field.name.clone());
                    }
                }
                None => {
                    partition.shared.insert(field.name.clone());
                }
            }
        }
        Ok(partition)
    }

    pub(crate) fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns the variant name if exactly one is declared.
    pub(crate) fn single_variant(&self) -> Option<&str> {
        match self.variants.keys().next() {
            Some(name) if self.variants.len() == 1 => Some(name),
            _ => None,
        }
    }

    /// Yields `(variant, fields)` in variant-name order, where `fields` is the
    /// variant's own fields plus the shared ones.
    pub(crate) fn restrictions(&self) -> impl Iterator<Item = (&str, BTreeSet<String>)> + '_ {
        self.variants.iter().map(|(name, own)| {
            let fields = own.union(&self.shared).cloned().collect();
            (name.as_str(), fields)
        })
    }
}
