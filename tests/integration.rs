use richschema::{JSONSchema, SpecialFields, ValidationError, ValidationOptions};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use test_case::test_case;

/// `$`-prefixed keys are tags, `type`/`kind` are discriminators, `name` identifies.
fn special_fields_extractor(object: &Map<String, Value>) -> SpecialFields {
    SpecialFields {
        tags: object
            .keys()
            .filter(|key| key.starts_with('$'))
            .cloned()
            .collect(),
        discriminators: object
            .keys()
            .filter(|key| key.as_str() == "type" || key.as_str() == "kind")
            .cloned()
            .collect(),
        identifications: object
            .keys()
            .filter(|key| key.as_str() == "name")
            .cloned()
            .collect(),
    }
}

fn validate(schema: &Value, instance: Value) -> Result<Value, ValidationError> {
    JSONSchema::compile(schema).expect("A valid schema").validate(instance)
}

fn validate_with_extractor(schema: &Value, instance: Value) -> Result<Value, ValidationError> {
    JSONSchema::compile(schema).expect("A valid schema").validate_with(
        instance,
        ValidationOptions::new().with_special_fields(Arc::new(special_fields_extractor)),
    )
}

#[test]
fn scenario_type_mismatch_at_root() {
    let error = validate(&json!({"type": "boolean"}), json!(0)).unwrap_err();
    assert_eq!(error.rule(), "type");
    assert_eq!(error.rendered_path(), "data");
    assert_eq!(error.message(), "must be boolean, but is a: int");
    assert_eq!(error.to_string(), "data must be boolean, but is a: int");
}

#[test]
fn scenario_positional_items_exclusive_maximum() {
    let schema = json!({
        "type": "array",
        "items": [
            {"type": "number", "maximum": 10, "exclusiveMaximum": true},
            {"type": "string", "enum": ["hello", "world"]},
        ],
    });
    let error = validate(&schema, json!([10, "world"])).unwrap_err();
    assert_eq!(error.rule(), "maximum");
    assert_eq!(error.path().to_string(), "/0");
    assert_eq!(error.rendered_path(), "data[0]");
    assert_eq!(error.message(), "must be smaller than 10");
    assert_eq!(error.instance(), &json!(10));
    assert_eq!(
        error.definition(),
        &json!({"type": "number", "maximum": 10, "exclusiveMaximum": true})
    );
    assert_eq!(error.rule_definition(), Some(&json!(10)));
}

fn defaulted_schema() -> Value {
    json!({
        "type": "object",
        "required": ["a", "b"],
        "properties": {
            "a": {"type": "string"},
            "b": {"type": "string"},
            "c": {"type": "string", "default": "abc"},
        },
        "additionalProperties": {"type": "string"},
    })
}

#[test]
fn scenario_defaults_are_merged_into_the_returned_value() {
    let value = validate(&defaulted_schema(), json!({"a": "a", "b": "b", "d": "d"})).unwrap();
    assert_eq!(value, json!({"a": "a", "b": "b", "c": "abc", "d": "d"}));
}

#[test]
fn scenario_missing_required_with_allowed_extras() {
    let error = validate(&defaulted_schema(), json!({"a": "a", "x": "x", "y": "y"})).unwrap_err();
    assert_eq!(error.rule(), "required-additionalProperties");
    assert_eq!(error.missing_fields(), &["b".to_string()]);
    assert!(error.extra_fields().is_empty());
    // the default was inserted before the fused check ran
    assert_eq!(
        error.instance(),
        &json!({"a": "a", "x": "x", "y": "y", "c": "abc"})
    );
}

fn tagged_union_schema() -> Value {
    let branch = |tag: &str| {
        json!({
            "type": "object",
            "properties": {
                tag: {"type": "number"},
                "value": {"type": "number"}
            },
            "required": [tag, "value"],
            "additionalProperties": false
        })
    };
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "taggedType": {"$ref": "#/definitions/TaggedType"},
            "discriminatedType": {"$ref": "#/definitions/DiscriminatedType"},
            "namedTypeArray": {"$ref": "#/definitions/NamedTypeArray"}
        },
        "additionalProperties": false,
        "definitions": {
            "TaggedType": {
                "anyOf": [branch("$tagOne"), branch("$tagTwo"), branch("$tagThree")]
            },
            "DiscriminatedType": {
                "anyOf": [
                    {
                        "type": "object",
                        "properties": {
                            "kind": {"type": "string", "enum": ["one"]},
                            "value": {"type": "number"}
                        },
                        "required": ["kind", "value"],
                        "additionalProperties": false
                    },
                    {
                        "type": "object",
                        "properties": {
                            "kind": {"type": "string", "enum": ["two"]},
                            "value": {"type": "number"}
                        },
                        "required": ["kind", "value"],
                        "additionalProperties": false
                    },
                    {
                        "type": "object",
                        "properties": {
                            "kind": {"type": "string", "enum": ["three"]},
                            "value": {"type": "number"}
                        },
                        "required": ["kind", "value"],
                        "additionalProperties": false
                    }
                ]
            },
            "NamedTypeArray": {
                "type": "array",
                "items": {"$ref": "#/definitions/NamedType"}
            },
            "NamedType": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "content": {
                        "type": "object",
                        "properties": {"value": {"type": "number"}},
                        "required": ["value"],
                        "additionalProperties": false
                    }
                },
                "required": ["name", "content"],
                "additionalProperties": false
            }
        }
    })
}

#[test_case(
    json!({"taggedType": {"$tagOne": 1}}),
    "required-additionalProperties",
    "data.taggedType<$tagOne>";
    "known tag missing required field"
)]
#[test_case(
    json!({"taggedType": {"$tagOne": "str"}}),
    "type",
    "data.taggedType<$tagOne>.$tagOne";
    "known tag with wrong tag value"
)]
#[test_case(
    json!({"taggedType": {"$tagOne": "str", "value": 1}}),
    "type",
    "data.taggedType<$tagOne>.$tagOne";
    "known tag wrong value complete object"
)]
#[test_case(
    json!({"taggedType": {"$tagInvalid": "str", "value": 1}}),
    "unknownTags",
    "data.taggedType<$tagInvalid>";
    "unknown tag"
)]
#[test_case(
    json!({"taggedType": {"$tagOne": 1, "value": "str"}}),
    "type",
    "data.taggedType<$tagOne>.value";
    "known tag wrong payload"
)]
#[test_case(
    json!({"discriminatedType": {"kind": "one"}}),
    "required-additionalProperties",
    "data.discriminatedType<kind=one>";
    "known discriminator missing field"
)]
#[test_case(
    json!({"discriminatedType": {"kind": 1, "value": 1}}),
    "badDiscriminators",
    "data.discriminatedType<kind=1>";
    "discriminator of a wrong type"
)]
#[test_case(
    json!({"discriminatedType": {"kind": "invalid", "value": 1}}),
    "badDiscriminators",
    "data.discriminatedType<kind=invalid>";
    "unknown discriminator value"
)]
#[test_case(
    json!({"discriminatedType": {"kind": "one", "value": "str"}}),
    "type",
    "data.discriminatedType<kind=one>.value";
    "known discriminator wrong payload"
)]
#[test_case(
    json!({"namedTypeArray": [
        {"name": "one", "content": {"value": 1}},
        {"name": "two", "content": "str"},
        {"name": "three", "content": {"value": 1}}
    ]}),
    "type",
    "data.namedTypeArray[1]<name=two>.content";
    "identification fields locate array elements"
)]
#[test_case(
    json!({"namedTypeArray": [
        {"name": "one", "content": {"value": 1}},
        {"name": "two", "content": {"value": "str"}},
        {"name": "three", "content": {"value": 1}}
    ]}),
    "type",
    "data.namedTypeArray[1]<name=two>.content.value";
    "identification fields on nested failure"
)]
fn special_fields_reporting(instance: Value, rule: &str, rendered_path: &str) {
    let error = validate_with_extractor(&tagged_union_schema(), instance).unwrap_err();
    assert_eq!(error.rule(), rule);
    assert_eq!(error.rendered_path(), rendered_path);
}

#[test]
fn special_fields_annotate_refs_and_nested_objects() {
    let schema = json!({
        "definitions": {
            "SomeType": {
                "type": "object",
                "properties": {
                    "$print": {"type": "string"},
                    "str": {"type": "string"},
                },
            },
            "NamedType": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "str": {"type": "string"},
                },
            },
        },
        "type": "object",
        "properties": {
            "kind": {"type": "string"},
            "prop1": {"$ref": "#/definitions/SomeType"},
            "named": {"$ref": "#/definitions/NamedType"},
        }
    });
    let error = validate_with_extractor(
        &schema,
        json!({"kind": "text", "prop1": {"$print": "a", "str": 1}}),
    )
    .unwrap_err();
    assert_eq!(error.message(), "must be string, but is a: int");
    assert_eq!(error.rendered_path(), "data<kind=text>.prop1<$print>.str");

    let error = validate_with_extractor(
        &schema,
        json!({"kind": "text", "named": {"name": "obj", "str": 1}}),
    )
    .unwrap_err();
    assert_eq!(error.message(), "must be string, but is a: int");
    assert_eq!(error.rendered_path(), "data<kind=text>.named<name=obj>.str");
}

fn integration_schema() -> Value {
    json!({
        "type": "array",
        "items": [
            {
                "type": "number",
                "maximum": 10,
                "exclusiveMaximum": true,
            },
            {
                "type": "string",
                "enum": ["hello", "world"],
            },
            {
                "type": "array",
                "minItems": 1,
                "maxItems": 3,
                "items": [
                    {"type": "number"},
                    {"type": "string"},
                    {"type": "boolean"},
                ],
            },
            {
                "type": "object",
                "required": ["a", "b"],
                "minProperties": 3,
                "properties": {
                    "a": {"type": ["null", "string"]},
                    "b": {"type": ["null", "string"]},
                    "c": {"type": ["null", "string"], "default": "abc"}
                },
                "additionalProperties": {"type": "string"},
            },
            {"not": {"type": ["null"]}},
            {"oneOf": [
                {"type": "number", "multipleOf": 3},
                {"type": "number", "multipleOf": 5},
            ]},
        ],
    })
}

#[test_case(
    json!([9, "hello", [1, "a", true], {"a": "a", "b": "b", "d": "d"}, 42, 3]),
    json!([9, "hello", [1, "a", true], {"a": "a", "b": "b", "c": "abc", "d": "d"}, 42, 3])
)]
#[test_case(
    json!([9, "world", [1], {"a": "a", "b": "b", "d": "d"}, 42, 3]),
    json!([9, "world", [1], {"a": "a", "b": "b", "c": "abc", "d": "d"}, 42, 3])
)]
#[test_case(
    json!([9, "world", [1], {"a": "a", "b": "b", "c": "xy"}, 42, 3]),
    json!([9, "world", [1], {"a": "a", "b": "b", "c": "xy"}, 42, 3])
)]
#[test_case(
    json!([9, "world", [1], {"a": "a", "b": "b", "c": "xy"}, "str", 5, "any"]),
    json!([9, "world", [1], {"a": "a", "b": "b", "c": "xy"}, "str", 5, "any"])
)]
fn integration_accepts(instance: Value, expected: Value) {
    assert_eq!(validate(&integration_schema(), instance).unwrap(), expected);
}

#[test_case(
    json!([10, "world", [1], {"a": "a", "b": "b", "c": "xy"}, "str", 5]),
    "maximum", "data[0]", "must be smaller than 10"
)]
#[test_case(
    json!([9, "xxx", [1], {"a": "a", "b": "b", "c": "xy"}, "str", 5]),
    "enum", "data[1]", r#"must be one of ["hello","world"]"#
)]
#[test_case(
    json!([9, "hello", [], {"a": "a", "b": "b", "c": "xy"}, "str", 5]),
    "minItems", "data[2]", "must contain at least 1 items"
)]
#[test_case(
    json!([9, "hello", [1, 2, 3], {"a": "a", "b": "b", "c": "xy"}, "str", 5]),
    "type", "data[2][1]", "must be string, but is a: int"
)]
#[test_case(
    json!([9, "hello", [1], {}, "str", 5]),
    "minProperties", "data[3]", "must contain at least 3 properties"
)]
#[test_case(
    json!([9, "hello", [1], {"a": "a", "b": "b", "x": "x"}, null, 5]),
    "not", "data[4]", "must not be valid by not definition"
)]
#[test_case(
    json!([9, "hello", [1], {"a": "a", "b": "b", "x": "x"}, 42, 15]),
    "oneOf", "data[5]", "must be valid exactly by one of oneOf definition"
)]
fn integration_rejects(instance: Value, rule: &str, rendered_path: &str, message: &str) {
    let error = validate(&integration_schema(), instance).unwrap_err();
    assert_eq!(error.rule(), rule);
    assert_eq!(error.rendered_path(), rendered_path);
    assert_eq!(error.message(), message);
}

#[test]
fn integration_missing_required_inside_array() {
    let error = validate(
        &integration_schema(),
        json!([9, "hello", [1], {"a": "a", "x": "x", "y": "y"}, "str", 5]),
    )
    .unwrap_err();
    assert_eq!(error.rule(), "required-additionalProperties");
    assert_eq!(error.missing_fields(), &["b".to_string()]);
    assert_eq!(error.rendered_path(), "data[3]");
    assert_eq!(
        error.instance(),
        &json!({"a": "a", "x": "x", "y": "y", "c": "abc"})
    );
}

#[test]
fn any_of_with_patterns() {
    let schema = json!({
        "type": "object",
        "properties": {
            "hash": {
                "anyOf": [
                    {"type": "string", "pattern": "^AAA"},
                    {"type": "string", "pattern": "^BBB"}
                ]
            }
        }
    });
    assert_eq!(
        validate(&schema, json!({"hash": "AAAXXX"})).unwrap(),
        json!({"hash": "AAAXXX"})
    );
}

#[test]
fn returned_object_preserves_present_values() {
    // defaults only fill absent keys; everything present round-trips untouched
    let schema = json!({
        "type": "object",
        "properties": {
            "kept": {"type": "number", "default": 0},
        },
    });
    let value = validate(&schema, json!({"kept": 7, "free": [1, {"x": null}]})).unwrap();
    assert_eq!(value, json!({"kept": 7, "free": [1, {"x": null}]}));
}

#[test]
fn subtree_validation_prefixes_rendered_paths() {
    let root = json!({"config": {"port": "not-a-number"}});
    let subtree = root["config"].clone();
    let schema = json!({"type": "object", "properties": {"port": {"type": "number"}}});
    let error = JSONSchema::compile(&schema)
        .unwrap()
        .validate_with(
            subtree,
            ValidationOptions::new()
                .with_root(root)
                .with_root_path(richschema::JSONPointer::from(&["config"][..])),
        )
        .unwrap_err();
    assert_eq!(error.rendered_path(), "data.config.port");
    assert_eq!(error.path().to_string(), "/config/port");
}
