//! Constraint resolution: caller constraints from field tags, then hooks.
//!
//! Every source fills the [`Shared`] block first-writer-wins, so the order in
//! which sources are consulted is the priority order. Caller constraints are
//! applied before hooks and always win.

use openapi_schema_core::{Schema, SchemaHooks, Shared, TagError, TagMetadata, TypeDescriptor};
use serde_json::Value;

type HookRule = fn(&dyn SchemaHooks, &mut Shared);

/// Hook rules in priority order. The schema override is not listed here: it
/// replaces the whole schema and is checked before any rule runs.
const HOOK_RULES: &[(&str, HookRule)] = &[
    ("external_docs", external_docs),
    ("example", example),
    ("format", format),
    ("enum", enum_values),
    ("min_string_length", min_string_length),
    ("max_string_length", max_string_length),
    ("min_array_length", min_array_length),
    ("max_array_length", max_array_length),
    ("min_map_length", min_map_length),
    ("max_map_length", max_map_length),
    ("minimum", minimum),
    ("maximum", maximum),
];

fn fill_with<T>(slot: &mut Option<T>, value: impl FnOnce() -> Option<T>) {
    if slot.is_none() {
        *slot = value();
    }
}

fn external_docs(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.external_docs, || hooks.external_docs());
}

fn example(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.example, || hooks.example());
}

fn format(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.format, || hooks.format());
}

fn enum_values(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.enum_values, || hooks.enum_values());
}

fn min_string_length(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.min_length, || hooks.min_string_length());
}

fn max_string_length(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.max_length, || hooks.max_string_length());
}

fn min_array_length(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.min_items, || hooks.min_array_length());
}

fn max_array_length(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.max_items, || hooks.max_array_length());
}

fn min_map_length(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.min_properties, || hooks.min_map_length());
}

fn max_map_length(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.max_properties, || hooks.max_map_length());
}

fn minimum(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.minimum, || hooks.minimum());
}

fn maximum(hooks: &dyn SchemaHooks, shared: &mut Shared) {
    fill_with(&mut shared.maximum, || hooks.maximum());
}

/// Returns the schema override of `ty`, if its hooks provide one.
pub(crate) fn override_schema(ty: &TypeDescriptor) -> Option<Schema> {
    ty.hooks().and_then(|hooks| hooks.schema())
}

/// Runs every hook rule of `ty` against `shared`.
pub(crate) fn apply_hooks(ty: &TypeDescriptor, shared: &mut Shared) {
    let Some(hooks) = ty.hooks() else {
        return;
    };
    for (name, rule) in HOOK_RULES {
        tracing::trace!(ty = %ty.name, rule = *name, "applying schema hook");
        rule(hooks, shared);
    }
}

/// Reads the constraint keys of a field tag.
///
/// # Errors
///
/// Returns [`TagError::InvalidValue`] if a numeric key does not parse.
pub(crate) fn field_constraints(tags: &TagMetadata) -> Result<Shared, TagError> {
    let string = |key: &str| tags.lookup(key).map(str::to_string);

    let mut shared = Shared {
        title: string("title"),
        description: string("description"),
        format: string("format"),
        pattern: string("pattern"),
        example: string("example").map(Value::String),
        ..Default::default()
    };

    for (slot, key) in [
        (&mut shared.exclusive_maximum, "exclusiveMaximum"),
        (&mut shared.exclusive_minimum, "exclusiveMinimum"),
        (&mut shared.minimum, "minimum"),
        (&mut shared.maximum, "maximum"),
        (&mut shared.multiple_of, "multipleOf"),
    ] {
        *slot = tags.lookup_f64(key)?;
    }

    for (slot, key) in [
        (&mut shared.max_items, "maxItems"),
        (&mut shared.min_items, "minItems"),
        (&mut shared.max_length, "maxLength"),
        (&mut shared.min_length, "minLength"),
        (&mut shared.max_properties, "maxProperties"),
        (&mut shared.min_properties, "minProperties"),
    ] {
        *slot = tags.lookup_u64(key)?;
    }

    if tags.is_deprecated() {
        shared.deprecated = Some(true);
    }
    Ok(shared)
}
