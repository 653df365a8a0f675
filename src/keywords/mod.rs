pub(crate) mod additional_items;
pub(crate) mod additional_properties;
pub(crate) mod all_of;
pub(crate) mod any_of;
pub(crate) mod boolean;
pub(crate) mod const_;
pub(crate) mod contains;
pub(crate) mod dependencies;
pub(crate) mod enum_;
pub(crate) mod exclusive_maximum;
pub(crate) mod exclusive_minimum;
pub(crate) mod format;
pub(crate) mod helpers;
pub(crate) mod items;
pub(crate) mod max_items;
pub(crate) mod max_length;
pub(crate) mod max_properties;
pub(crate) mod maximum;
pub(crate) mod min_items;
pub(crate) mod min_length;
pub(crate) mod min_properties;
pub(crate) mod minimum;
pub(crate) mod multiple_of;
pub(crate) mod not;
pub(crate) mod one_of;
pub(crate) mod pattern;
pub(crate) mod pattern_properties;
pub(crate) mod properties;
pub(crate) mod property_names;
pub(crate) mod ref_;
pub(crate) mod required;
pub(crate) mod type_;
pub(crate) mod unique_items;

use crate::{
    compilation::JSONSchema,
    error::CompilationError,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::Value;

pub(crate) type BoxedValidator = Box<dyn Validate + Send + Sync>;
pub(crate) type CompilationResult = Result<BoxedValidator, CompilationError>;
pub(crate) type Validators = Vec<BoxedValidator>;

/// Run every validator of a sub-schema in order; the first failure wins.
#[inline]
pub(crate) fn validate_each(
    schema: &JSONSchema,
    validators: &[BoxedValidator],
    instance: &mut Value,
    instance_path: &InstancePath<'_>,
    context: &ValidationContext<'_>,
) -> ValidationResult {
    for validator in validators {
        validator.validate(schema, instance, instance_path, context)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::compilation::JSONSchema;
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(json!({"type": "boolean"}), json!(0), "must be boolean, but is a: int", "type")]
    #[test_case(json!({"type": "boolean"}), json!(null), "must be boolean, but is a: null", "type")]
    #[test_case(json!({"type": "null"}), json!("abc"), "must be null, but is a: str", "type")]
    #[test_case(json!({"type": "object"}), json!([]), "must be object, but is a: list", "type")]
    #[test_case(json!({"type": "string"}), json!({}), "must be string, but is a: dict", "type")]
    #[test_case(json!({"type": "string"}), json!(true), "must be string, but is a: bool", "type")]
    #[test_case(json!({"type": "integer"}), json!(1.0), "must be integer, but is a: float", "type")]
    #[test_case(json!({"type": "number"}), json!("abc"), "must be number, but is a: str", "type")]
    #[test_case(json!({"type": ["number", "string"]}), json!(null), "must be number or string, but is a: null", "type")]
    #[test_case(json!({"enum": [1, 2, "a"]}), json!(12), r#"must be one of [1,2,"a"]"#, "enum")]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-06/schema", "const": 42}), json!(0), "must be const 42 but is: 0", "const")]
    #[test_case(json!({"type": "number", "maximum": 10}), json!(11), "must be smaller than or equal to 10", "maximum")]
    #[test_case(json!({"type": "number", "maximum": 10, "exclusiveMaximum": true}), json!(10), "must be smaller than 10", "maximum")]
    #[test_case(json!({"type": "number", "minimum": 10}), json!(9), "must be bigger than or equal to 10", "minimum")]
    #[test_case(json!({"type": "number", "minimum": 10, "exclusiveMinimum": true}), json!(10), "must be bigger than 10", "minimum")]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-06/schema", "exclusiveMaximum": 3}), json!(3), "must be smaller than 3", "exclusiveMaximum")]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-06/schema", "exclusiveMinimum": 3}), json!(3), "must be bigger than 3", "exclusiveMinimum")]
    #[test_case(json!({"multipleOf": 3}), json!(7), "must be multiple of 3", "multipleOf")]
    #[test_case(json!({"multipleOf": 0.0001}), json!(0.00751), "must be multiple of 0.0001", "multipleOf")]
    #[test_case(json!({"minLength": 2}), json!("f"), "must be longer than or equal to 2 characters", "minLength")]
    #[test_case(json!({"maxLength": 5}), json!("qwertz"), "must be shorter than or equal to 5 characters", "maxLength")]
    #[test_case(json!({"pattern": "^a*$"}), json!("abc"), "must match pattern ^a*$", "pattern")]
    #[test_case(json!({"minItems": 1}), json!([]), "must contain at least 1 items", "minItems")]
    #[test_case(json!({"maxItems": 2}), json!([1, 2, 3]), "must contain less than or equal to 2 items", "maxItems")]
    #[test_case(json!({"uniqueItems": true}), json!([1, 1]), "must contain unique items", "uniqueItems")]
    #[test_case(json!({"items": [{}, {}], "additionalItems": false}), json!([1, 2, 3]), "must contain only specified items", "additionalItems")]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-06/schema", "contains": {"minimum": 5}}), json!([2, 3, 4]), "must contain one of contains definition", "contains")]
    #[test_case(json!({"minProperties": 1}), json!({}), "must contain at least 1 properties", "minProperties")]
    #[test_case(json!({"maxProperties": 1}), json!({"a": 1, "b": 2}), "must contain less than or equal to 1 properties", "maxProperties")]
    #[test_case(json!({"not": {"type": "number"}}), json!(0), "must not be valid by not definition", "not")]
    #[test_case(json!({"oneOf": [{"type": "number", "multipleOf": 5}, {"type": "number", "multipleOf": 3}]}), json!(2), "must be valid exactly by one of oneOf definition", "oneOf")]
    #[test_case(json!({"oneOf": [{"type": "number", "multipleOf": 5}, {"type": "number", "multipleOf": 3}]}), json!(15), "must be valid exactly by one of oneOf definition", "oneOf")]
    #[test_case(json!({"anyOf": [{"type": "string"}, {"type": "number"}]}), json!(null), "must be string, but is a: null", "type")]
    #[test_case(json!({"allOf": [{"type": "string"}, {"maxLength": 5}]}), json!("qwertz"), "must be shorter than or equal to 5 characters", "maxLength")]
    #[test_case(json!({"properties": {"x": false}}), json!({"x": 1}), "must not be there", "false")]
    #[test_case(json!({"dependencies": {"bar": ["foo"]}}), json!({"bar": 1}), "must contain [foo] properties", "dependencies")]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-06/schema", "propertyNames": {"maxLength": 2}}), json!({"abc": 1}), "must be named by propertyName definition", "propertyNames")]
    fn error_message(schema: Value, instance: Value, expected: &str, rule: &str) {
        let error = tests_util::expect_error(&schema, &instance);
        assert_eq!(error.message(), expected);
        assert_eq!(error.rule(), rule);
    }

    // Keywords must ignore values of other primitive kinds; the type check alone gates them.
    #[test_case(json!({"maximum": 2}))]
    #[test_case(json!({"minimum": 2}))]
    #[test_case(json!({"multipleOf": 2}))]
    #[test_case(json!({"minLength": 2}))]
    #[test_case(json!({"maxLength": 2}))]
    #[test_case(json!({"pattern": "^a"}))]
    #[test_case(json!({"minItems": 2}))]
    #[test_case(json!({"maxItems": 2}))]
    #[test_case(json!({"uniqueItems": true}))]
    #[test_case(json!({"items": {"type": "string"}}))]
    #[test_case(json!({"minProperties": 2}))]
    #[test_case(json!({"maxProperties": 2}))]
    #[test_case(json!({"required": ["a"]}))]
    #[test_case(json!({"properties": {"a": {"type": "number"}}}))]
    #[test_case(json!({"patternProperties": {"a": {"type": "number"}}}))]
    #[test_case(json!({"additionalProperties": false}))]
    #[test_case(json!({"dependencies": {"bar": ["foo"]}}))]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-06/schema", "propertyNames": {"maxLength": 3}}))]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-06/schema", "contains": {"minimum": 5}}))]
    fn is_valid_another_type(schema: Value) {
        tests_util::is_valid(&schema, &json!(null));
    }

    #[test]
    fn validators_run_in_declaration_order_not_schema_order() {
        // `maximum` is checked before `multipleOf` regardless of key order in the schema
        let schema = json!({"multipleOf": 3, "maximum": 5});
        let error = tests_util::expect_error(&schema, &json!(7));
        assert_eq!(error.rule(), "maximum");
        // and `type` always comes first
        let schema = json!({"multipleOf": 3, "type": "string"});
        let error = tests_util::expect_error(&schema, &json!(7));
        assert_eq!(error.rule(), "type");
    }

    #[test]
    fn boolean_root_schemas() {
        assert!(JSONSchema::compile(&json!(true)).unwrap().is_valid(&json!(1)));
        let compiled = JSONSchema::compile(&json!(false)).unwrap();
        let error = compiled.validate(json!(1)).unwrap_err();
        assert_eq!(error.rule(), "false");
    }
}
