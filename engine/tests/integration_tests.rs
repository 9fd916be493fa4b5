use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use openapi_schema_core::{
    Describe, ExternalDocs, Field, FloatKind, Format, Hooks, IntKind, Schema, SchemaType,
    TypeDescriptor,
};
use openapi_schema_engine::{
    Diagnostic, EngineConfig, SchemaEngine, SchemaError, SumTypeRegistry,
};
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn engine() -> SchemaEngine {
    SchemaEngine::new(EngineConfig::default())
}

fn derive(ty: &TypeDescriptor) -> Schema {
    engine().derive(ty, "json", None).unwrap()
}

fn derive_err(ty: &TypeDescriptor) -> SchemaError {
    engine().derive(ty, "json", None).unwrap_err()
}

fn to_json(schema: &Schema) -> Value {
    serde_json::to_value(schema).unwrap()
}

struct SimpleStruct;

impl Describe for SimpleStruct {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::structure(
            "SimpleStruct",
            vec![
                Field::of::<String>("Foo", r#"json:"foo""#),
                Field::of::<String>("Bar", r#"json:"bar""#),
            ],
        )
    }
}

struct BoolWithExternalDocs;

impl Describe for BoolWithExternalDocs {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::bool()
            .named("BoolWithExternalDocs")
            .with_hooks(Hooks::default().with_external_docs(ExternalDocs::new(
                "Look, there's something interesting over there",
                "http://www.example.org",
            )))
    }
}

struct ComplexStruct;

impl Describe for ComplexStruct {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::structure(
            "ComplexStruct",
            vec![
                Field::of::<Vec<BoolWithExternalDocs>>("Booleans", r#"json:"booleans""#),
                Field::of::<SimpleStruct>("Inline", r#"flatten:"""#),
                Field::of::<SimpleStruct>("Outline", r#"json:"outline""#),
                Field::of::<HashMap<String, SimpleStruct>>("StringMap", r#"json:"string_map""#),
                Field::of::<HashMap<String, SimpleStruct>>("InlineStringMap", r#"flatten:"""#),
            ],
        )
    }
}

fn simple_struct_json() -> Value {
    json!({
        "type": "object",
        "required": ["foo", "bar"],
        "properties": {
            "foo": {"type": "string"},
            "bar": {"type": "string"}
        }
    })
}

// ---------------------------------------------------------------------------
// Primitives and hooks
// ---------------------------------------------------------------------------

#[test]
fn test_named_bool_is_boolean() {
    let my_bool = TypeDescriptor::bool().named("MyBool");
    assert_eq!(to_json(&derive(&my_bool)), json!({"type": "boolean"}));
}

#[test]
fn test_schema_override_is_verbatim() {
    let ty = TypeDescriptor::bool()
        .named("BoolWithEmptySchema")
        .with_hooks(Hooks::default().with_schema(Schema::one_of(vec![])));
    assert_eq!(to_json(&derive(&ty)), json!({"oneOf": []}));
}

#[test]
fn test_example_hook() {
    let ty = TypeDescriptor::bool()
        .named("BoolWithExample")
        .with_hooks(Hooks::default().with_example(json!(true)));
    assert_eq!(
        to_json(&derive(&ty)),
        json!({"example": true, "type": "boolean"})
    );
}

#[test]
fn test_external_docs_hook() {
    assert_eq!(
        to_json(&derive(&BoolWithExternalDocs::describe())),
        json!({
            "externalDocs": {
                "description": "Look, there's something interesting over there",
                "url": "http://www.example.org"
            },
            "type": "boolean"
        })
    );
}

#[test]
fn test_enum_and_bounds_hooks() {
    let level = TypeDescriptor::string().named("Level").with_hooks(
        Hooks {
            max_string_length: Some(5),
            ..Default::default()
        }
        .with_enum(vec![json!("low"), json!("high")]),
    );
    assert_eq!(
        to_json(&derive(&level)),
        json!({"type": "string", "enum": ["low", "high"], "maxLength": 5})
    );
}

#[test]
fn test_tag_format_beats_format_hook() {
    let email = TypeDescriptor::string()
        .named("Email")
        .with_hooks(Hooks::default().with_format(Format::Email.as_str()));
    let contact = TypeDescriptor::structure(
        "Contact",
        vec![
            Field::new("Primary", email.clone(), r#"json:"primary" format:"idn-email""#),
            Field::new("Backup", email, r#"json:"backup""#),
        ],
    );

    let schema = derive(&contact);
    assert_eq!(
        to_json(&schema)["properties"],
        json!({
            "primary": {"type": "string", "format": "idn-email"},
            "backup": {"type": "string", "format": "email"}
        })
    );
}

#[test]
fn test_field_tag_constraints_and_example() {
    let query = TypeDescriptor::structure(
        "Query",
        vec![
            Field::of::<u32>("Limit", r#"json:"limit" minimum:"1" maximum:"100" default:"10""#),
            Field::of::<String>("Term", r#"json:"term" example:"rust" minLength:"2" deprecated:"""#),
        ],
    );

    assert_eq!(
        to_json(&derive(&query)),
        json!({
            "type": "object",
            "required": ["term"],
            "properties": {
                "limit": {"type": "number", "format": "int64", "minimum": 1.0, "maximum": 100.0},
                "term": {"type": "string", "example": "rust", "minLength": 2, "deprecated": true}
            }
        })
    );
}

#[test]
fn test_interface_field_is_empty_schema() {
    let payload = TypeDescriptor::structure(
        "Payload",
        vec![Field::of::<Value>("Body", r#"json:"body""#)],
    );
    assert_eq!(to_json(&derive(&payload))["properties"]["body"], json!({}));
}

#[test]
fn test_chrono_types_are_temporal() {
    let event = TypeDescriptor::structure(
        "Event",
        vec![
            Field::of::<DateTime<Utc>>("At", r#"json:"at""#),
            Field::of::<Option<NaiveDate>>("Day", r#"json:"day" default:"""#),
        ],
    );
    assert_eq!(
        to_json(&derive(&event)),
        json!({
            "type": "object",
            "required": ["at"],
            "properties": {
                "at": {"type": "string", "format": "date-time"},
                "day": {"type": "string", "format": "date"}
            }
        })
    );
}

// ---------------------------------------------------------------------------
// Structs, flattening and maps
// ---------------------------------------------------------------------------

#[test]
fn test_pair_end_to_end() {
    let pair = TypeDescriptor::structure(
        "Pair",
        vec![
            Field::new("A", TypeDescriptor::int(IntKind::I32), r#"json:"a""#),
            Field::new(
                "B",
                TypeDescriptor::pointer(TypeDescriptor::string()),
                r#"json:"b" default:"""#,
            ),
        ],
    );

    assert_eq!(
        to_json(&derive(&pair)),
        json!({
            "type": "object",
            "required": ["a"],
            "properties": {
                "a": {"type": "number", "format": "int32"},
                "b": {"type": "string"}
            }
        })
    );
}

#[test]
fn test_untagged_pointer_field_is_required() {
    let pair = TypeDescriptor::structure(
        "Pair",
        vec![
            Field::new("A", TypeDescriptor::int(IntKind::I32), r#"json:"a""#),
            Field::new("B", TypeDescriptor::pointer(TypeDescriptor::string()), r#"json:"b""#),
        ],
    );

    let schema = derive(&pair);
    assert_eq!(
        to_json(&schema)["properties"]["b"],
        json!({"type": "string"})
    );
    assert_eq!(schema.as_object().unwrap().required, vec!["a", "b"]);
}

#[test]
fn test_required_computation() {
    let ty = TypeDescriptor::structure(
        "Settings",
        vec![
            Field::of::<bool>("Plain", r#"json:"plain""#),
            Field::of::<Option<bool>>("Pointer", r#"json:"pointer""#),
            Field::of::<bool>("Defaulted", r#"json:"defaulted" default:"false""#),
            Field::of::<bool>("Ready", r#"json:"ready" initialized:"""#),
            Field::of::<bool>("Computed", r#"json:"computed" method:"Compute""#),
        ],
    );

    let schema = derive(&ty);
    let object = schema.as_object().unwrap();
    assert_eq!(object.properties.len(), 5);
    assert_eq!(
        object.required_set().into_iter().collect::<Vec<_>>(),
        vec!["plain", "pointer"]
    );
    assert!(!object.is_required("defaulted"));
}

#[test]
fn test_flatten_matches_direct_declaration() {
    let outer = TypeDescriptor::structure(
        "Outer",
        vec![Field::of::<SimpleStruct>("Inner", r#"flatten:"""#)],
    );
    let direct = SimpleStruct::describe().named("Direct");

    let flattened = derive(&outer);
    assert!(flattened.equivalent(&derive(&direct)));
    let object = flattened.as_object().unwrap();
    assert!(!object.properties.contains_key("Inner"));
    assert!(!object.properties.contains_key("inner"));
}

#[test]
fn test_flatten_through_pointer_and_nesting() {
    let middle = TypeDescriptor::structure(
        "Middle",
        vec![
            Field::of::<bool>("Flag", r#"json:"flag""#),
            Field::of::<Box<SimpleStruct>>("Deep", r#"flatten:"""#),
        ],
    );
    let outer = TypeDescriptor::structure(
        "Outer",
        vec![
            Field::new("Middle", TypeDescriptor::pointer(middle), r#"flatten:"""#),
            Field::of::<i64>("Id", r#"json:"id""#),
        ],
    );

    let schema = derive(&outer);
    let object = schema.as_object().unwrap();
    assert_eq!(
        object.properties.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["bar", "flag", "foo", "id"]
    );
    assert_eq!(object.required, vec!["id", "flag", "foo", "bar"]);
}

#[test]
fn test_map_schema() {
    let ty = HashMap::<String, bool>::describe();
    let schema = derive(&ty);

    let object = schema.as_object().unwrap();
    assert!(object.properties.is_empty());
    assert!(object.required.is_empty());
    assert_eq!(
        to_json(&schema),
        json!({"type": "object", "additionalProperties": {"type": "boolean"}})
    );
}

#[test]
fn test_map_with_stringifiable_key() {
    let user_id = TypeDescriptor::int(IntKind::U64)
        .named("UserId")
        .with_hooks(Hooks::default().stringifiable());
    let ty = TypeDescriptor::map(user_id, TypeDescriptor::string());
    assert_eq!(
        to_json(&derive(&ty)),
        json!({"type": "object", "additionalProperties": {"type": "string"}})
    );
}

#[test]
fn test_map_with_unsupported_key() {
    let err = derive_err(&HashMap::<u32, bool>::describe());
    assert_eq!(
        err,
        SchemaError::UnsupportedMapKey {
            ty: "HashMap<u32, bool>".into(),
            key: "u32".into(),
        }
    );
}

#[test]
fn test_complex_struct() {
    let schema = derive(&ComplexStruct::describe());
    assert_eq!(
        to_json(&schema),
        json!({
            "type": "object",
            "required": ["booleans", "outline", "string_map", "foo", "bar"],
            "properties": {
                "booleans": {
                    "type": "array",
                    "items": {
                        "externalDocs": {
                            "description": "Look, there's something interesting over there",
                            "url": "http://www.example.org"
                        },
                        "type": "boolean"
                    }
                },
                "outline": simple_struct_json(),
                "string_map": {
                    "type": "object",
                    "additionalProperties": simple_struct_json()
                },
                "foo": {"type": "string"},
                "bar": {"type": "string"}
            },
            "additionalProperties": simple_struct_json()
        })
    );
}

#[test]
fn test_derivation_is_idempotent() {
    let engine = engine();
    let ty = ComplexStruct::describe();
    let first = engine.derive(&ty, "json", None).unwrap();
    let second = engine.derive(&ty, "json", None).unwrap();
    assert!(first.equivalent(&second));
}

#[test]
fn test_name_key_selects_public_names() {
    let ty = TypeDescriptor::structure(
        "Search",
        vec![Field::of::<String>("Term", r#"json:"term" query:"q""#)],
    );
    let schema = engine().derive(&ty, "query", None).unwrap();
    assert!(schema.as_object().unwrap().properties.contains_key("q"));
}

// ---------------------------------------------------------------------------
// Sum types
// ---------------------------------------------------------------------------

fn unflattened(ok: TypeDescriptor, error: TypeDescriptor) -> TypeDescriptor {
    TypeDescriptor::structure(
        "Unflattened",
        vec![
            Field::of::<String>("Comments", r#"json:"comments""#),
            Field::new("Ok", TypeDescriptor::pointer(ok), r#"json:"ok" variant:"ok""#),
            Field::new(
                "Error",
                TypeDescriptor::pointer(error),
                r#"json:"error" variant:"error""#,
            ),
        ],
    )
}

fn flattened(ok: TypeDescriptor, error: TypeDescriptor) -> TypeDescriptor {
    TypeDescriptor::structure(
        "Flattened",
        vec![
            Field::of::<String>("Comments", r#"json:"comments""#),
            Field::new(
                "Ok",
                TypeDescriptor::pointer(ok),
                r#"flatten:"" variant:"ok""#,
            ),
            Field::new(
                "Error",
                TypeDescriptor::pointer(error),
                r#"flatten:"" variant:"error""#,
            ),
        ],
    )
}

fn single_field(name: &str, public: &str, ty: TypeDescriptor) -> TypeDescriptor {
    let tag = format!(r#"json:"{public}""#);
    TypeDescriptor::structure(name, vec![Field::new(name, ty, &tag)])
}

#[test]
fn test_unflattened_sum_type() {
    let ty = unflattened(TypeDescriptor::int(IntKind::I32), TypeDescriptor::bool());
    assert_eq!(
        to_json(&derive(&ty)),
        json!({"oneOf": [
            {
                "type": "object",
                "required": ["comments", "error"],
                "properties": {"comments": {"type": "string"}, "error": {"type": "boolean"}}
            },
            {
                "type": "object",
                "required": ["comments", "ok"],
                "properties": {
                    "comments": {"type": "string"},
                    "ok": {"type": "number", "format": "int32"}
                }
            }
        ]})
    );
}

#[test]
fn test_flattened_sum_type() {
    let ty = flattened(
        single_field("Success", "success", TypeDescriptor::string()),
        single_field("Failure", "failure", TypeDescriptor::bool()),
    );
    assert_eq!(
        to_json(&derive(&ty)),
        json!({"oneOf": [
            {
                "type": "object",
                "required": ["comments", "failure"],
                "properties": {"comments": {"type": "string"}, "failure": {"type": "boolean"}}
            },
            {
                "type": "object",
                "required": ["comments", "success"],
                "properties": {"comments": {"type": "string"}, "success": {"type": "string"}}
            }
        ]})
    );
}

#[test]
fn test_flattened_sum_type_with_colliding_names() {
    let ty = flattened(
        single_field("Success", "result", TypeDescriptor::string()),
        single_field("Failure", "result", TypeDescriptor::bool()),
    );
    let schema = derive(&ty);
    let members = schema.as_one_of().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(
        to_json(&members[0])["properties"]["result"],
        json!({"type": "boolean"})
    );
    assert_eq!(
        to_json(&members[1])["properties"]["result"],
        json!({"type": "string"})
    );
}

#[test]
fn test_fully_flattened_sum_type() {
    let ty = TypeDescriptor::structure(
        "Sum",
        vec![
            Field::new(
                "Int",
                TypeDescriptor::pointer(single_field("Int", "field", TypeDescriptor::int(IntKind::I32))),
                r#"variant:"int" flatten:"""#,
            ),
            Field::new(
                "String",
                TypeDescriptor::pointer(single_field("String", "field", TypeDescriptor::string())),
                r#"variant:"string" flatten:"""#,
            ),
        ],
    );
    assert_eq!(
        to_json(&derive(&ty)),
        json!({"oneOf": [
            {
                "type": "object",
                "required": ["field"],
                "properties": {"field": {"type": "number", "format": "int32"}}
            },
            {
                "type": "object",
                "required": ["field"],
                "properties": {"field": {"type": "string"}}
            }
        ]})
    );
}

#[test]
fn test_variant_members_have_shared_plus_own_fields() {
    let ty = TypeDescriptor::structure(
        "Job",
        vec![
            Field::of::<String>("Id", r#"json:"id""#),
            Field::of::<u64>("Started", r#"json:"started" variant:"running,done""#),
            Field::of::<u64>("Finished", r#"json:"finished" variant:"done""#),
            Field::of::<String>("Reason", r#"json:"reason" variant:"failed""#),
        ],
    );

    let schema = derive(&ty);
    let names: Vec<Vec<&str>> = schema
        .as_one_of()
        .unwrap()
        .iter()
        .map(|member| {
            member
                .as_object()
                .unwrap()
                .properties
                .keys()
                .map(String::as_str)
                .collect()
        })
        .collect();
    assert_eq!(
        names,
        vec![
            vec!["finished", "id", "started"],
            vec!["id", "reason"],
            vec!["id", "started"],
        ]
    );
}

#[test]
fn test_single_variant_falls_back_to_object() {
    let ty = TypeDescriptor::structure(
        "Lonely",
        vec![
            Field::of::<String>("A", r#"json:"a" variant:"only""#),
            Field::of::<String>("B", r#"json:"b""#),
        ],
    );

    let derivation = engine().derive_with_report(&ty, "json", None).unwrap();
    let object = derivation.schema.as_object().unwrap();
    assert_eq!(object.properties.len(), 2);
    assert_eq!(
        derivation.diagnostics,
        vec![Diagnostic::MisplacedVariantTag {
            ty: "Lonely".into(),
            variant: "only".into(),
        }]
    );

    let strict = SchemaEngine::new(EngineConfig {
        strict_variants: true,
        ..Default::default()
    });
    assert_eq!(
        strict.derive(&ty, "json", None).unwrap_err(),
        SchemaError::MisplacedVariantTag {
            ty: "Lonely".into(),
            variant: "only".into(),
        }
    );
}

#[test]
fn test_registered_sum_type() {
    let circle = single_field("Circle", "radius", TypeDescriptor::float(FloatKind::F64));
    let square = single_field("Square", "side", TypeDescriptor::float(FloatKind::F64));
    let registry = SumTypeRegistry::new().with("Shape", vec![square, circle]);
    let engine = SchemaEngine::new(EngineConfig::default()).with_registry(registry);

    let drawing = TypeDescriptor::structure(
        "Drawing",
        vec![Field::new(
            "Shapes",
            TypeDescriptor::slice(TypeDescriptor::interface("Shape")),
            r#"json:"shapes""#,
        )],
    );
    let schema = engine.derive(&drawing, "json", None).unwrap();
    assert_eq!(
        to_json(&schema)["properties"]["shapes"]["items"],
        json!({"oneOf": [
            {"type": "object", "required": ["side"], "properties": {"side": {"type": "number", "format": "double"}}},
            {"type": "object", "required": ["radius"], "properties": {"radius": {"type": "number", "format": "double"}}}
        ]})
    );

    // Unregistered, an interface is the empty schema.
    assert_eq!(
        to_json(&derive(&drawing))["properties"]["shapes"]["items"],
        json!({})
    );
}

#[test]
fn test_registered_variant_errors_name_the_variant() {
    let registry = SumTypeRegistry::new().with("Handle", vec![TypeDescriptor::opaque("RawFd")]);
    let engine = SchemaEngine::new(EngineConfig::default()).with_registry(registry);

    let err = engine
        .derive(&TypeDescriptor::interface("Handle"), "json", None)
        .unwrap_err();
    assert_eq!(err.breadcrumb(), "Handle<RawFd>");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

struct Node;

impl Describe for Node {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::structure(
            "Node",
            vec![
                Field::of::<String>("Label", r#"json:"label""#),
                Field::of::<Vec<Node>>("Children", r#"json:"children""#),
            ],
        )
    }
}

#[test]
fn test_recursive_type_is_rejected() {
    let err = engine().derive_for::<Node>().unwrap_err();
    assert_eq!(err.breadcrumb(), "Node.Children > Vec<Node>[] > Node.Children");
    assert_eq!(
        err.root_cause(),
        &SchemaError::CyclicType {
            ty: "Node".into(),
            path: "Node -> Node".into(),
        }
    );
}

#[test]
fn test_mutually_recursive_types_are_rejected() {
    struct Author;
    struct Book;
    impl Describe for Author {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure(
                "Author",
                vec![Field::of::<Vec<Book>>("Books", r#"json:"books""#)],
            )
        }
    }
    impl Describe for Book {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure(
                "Book",
                vec![Field::of::<Author>("Author", r#"json:"author""#)],
            )
        }
    }

    let err = engine().derive_for::<Author>().unwrap_err();
    assert_eq!(
        err.root_cause(),
        &SchemaError::CyclicType {
            ty: "Author".into(),
            path: "Author -> Book -> Author".into(),
        }
    );
}

#[test]
fn test_namesake_types_are_not_cycles() {
    let inline = TypeDescriptor::structure(
        "Item",
        vec![Field::new(
            "Sub",
            TypeDescriptor::structure("Item", vec![Field::of::<String>("Id", r#"json:"id""#)]),
            r#"json:"sub""#,
        )],
    );
    assert_eq!(
        to_json(&derive(&inline)),
        json!({
            "type": "object",
            "required": ["sub"],
            "properties": {
                "sub": {"type": "object", "required": ["id"], "properties": {"id": {"type": "string"}}}
            }
        })
    );

    struct Line;
    struct Order;
    impl Describe for Line {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure("Item", vec![Field::of::<u32>("Qty", r#"json:"qty""#)])
        }
    }
    impl Describe for Order {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure(
                "Item",
                vec![Field::of::<Vec<Line>>("Lines", r#"json:"lines""#)],
            )
        }
    }
    let schema = engine().derive_for::<Order>().unwrap();
    assert_eq!(
        to_json(&schema)["properties"]["lines"]["items"]["properties"]["qty"],
        json!({"type": "number", "format": "int64"})
    );
}

#[test]
fn test_repeated_sibling_types_are_not_cycles() {
    let ty = TypeDescriptor::structure(
        "Route",
        vec![
            Field::of::<SimpleStruct>("From", r#"json:"from""#),
            Field::of::<SimpleStruct>("To", r#"json:"to""#),
        ],
    );
    let schema = derive(&ty);
    assert_eq!(schema.as_object().unwrap().properties.len(), 2);
}

#[test]
fn test_breadcrumb_through_nested_fields() {
    struct Inner;
    impl Describe for Inner {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure(
                "Inner",
                vec![Field::new("Handle", TypeDescriptor::opaque("Handle"), r#"json:"handle""#)],
            )
        }
    }
    let outer = TypeDescriptor::structure(
        "Outer",
        vec![Field::of::<Vec<Inner>>("Items", r#"json:"items""#)],
    );

    let err = derive_err(&outer);
    assert_eq!(err.breadcrumb(), "Outer.Items > Vec<Inner>[] > Inner.Handle");
    assert_eq!(
        err.root_cause(),
        &SchemaError::UnsupportedKind {
            ty: "Handle".into(),
            kind: "opaque",
        }
    );
}

#[test]
fn test_tag_errors_propagate() {
    let malformed = TypeDescriptor::structure(
        "Broken",
        vec![Field::of::<String>("A", r#"json:"a"#)],
    );
    let err = derive_err(&malformed);
    assert_eq!(err.breadcrumb(), "Broken.A");
    assert!(matches!(err.root_cause(), SchemaError::TagParse(_)));

    let bad_number = TypeDescriptor::structure(
        "Limits",
        vec![Field::of::<String>("Name", r#"json:"name" maxLength:"long""#)],
    );
    let err = derive_err(&bad_number);
    assert_eq!(err.breadcrumb(), "Limits.Name");
    assert!(err.to_string().contains("maxLength"));
}

#[test]
fn test_missing_public_name_in_variant() {
    let ty = TypeDescriptor::structure(
        "Reply",
        vec![
            Field::of::<String>("Value", r#"json:"value" variant:"ok""#),
            Field::of::<String>("Error", r#"variant:"error""#),
        ],
    );
    let err = derive_err(&ty);
    assert_eq!(err.breadcrumb(), "Reply<error>");
    assert!(matches!(
        err.root_cause(),
        SchemaError::MissingPublicName { field, .. } if field == "Error"
    ));
}

// ---------------------------------------------------------------------------
// Field entry point
// ---------------------------------------------------------------------------

#[test]
fn test_derive_field() {
    let field = Field::of::<u32>("Limit", r#"query:"limit" minimum:"1" default:"10" deprecated:"""#);
    let result = engine().derive_field("ListParams", &field, "query").unwrap();

    assert_eq!(result.public_name.as_deref(), Some("limit"));
    assert!(!result.required);
    assert!(result.deprecated);
    assert_eq!(
        to_json(&result.schema),
        json!({"type": "number", "format": "int64", "minimum": 1.0, "deprecated": true})
    );

    let unnamed = Field::of::<bool>("Verbose", "");
    let result = engine().derive_field("ListParams", &unnamed, "query").unwrap();
    assert!(result.public_name.is_none());
    assert!(result.required);
    assert_eq!(result.schema.schema_type(), Some(SchemaType::Boolean));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_config_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.yaml");

    let config = EngineConfig {
        default_name_key: "form".into(),
        max_depth: 16,
        strict_variants: true,
    };
    config.save(&path).unwrap();
    assert_eq!(EngineConfig::load(&path).unwrap(), config);
}

#[test]
fn test_config_drives_derive_for() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.yaml");
    std::fs::write(&path, "default_name_key: form\n").unwrap();

    struct Login;
    impl Describe for Login {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::structure(
                "Login",
                vec![Field::of::<String>("User", r#"json:"user" form:"username""#)],
            )
        }
    }

    let engine = SchemaEngine::new(EngineConfig::load(&path).unwrap());
    let schema = engine.derive_for::<Login>().unwrap();
    assert!(schema.as_object().unwrap().properties.contains_key("username"));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(EngineConfig::load(dir.path().join("absent.yaml")).is_err());
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn test_engine_shared_across_threads() {
    let engine = engine();
    let expected = derive(&ComplexStruct::describe());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.derive_for::<ComplexStruct>().unwrap()))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().equivalent(&expected));
        }
    });
}
