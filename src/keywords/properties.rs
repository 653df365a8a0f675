use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::CompilationError,
    keywords::{validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::fmt;

struct Property {
    name: String,
    validators: Validators,
    default: Option<Value>,
}

pub(crate) struct PropertiesValidator {
    properties: Vec<Property>,
}

impl PropertiesValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        match schema {
            Value::Object(map) => {
                let mut properties = Vec::with_capacity(map.len());
                for (name, subschema) in map {
                    properties.push(Property {
                        name: name.clone(),
                        validators: compile_validators(subschema, context)?,
                        default: subschema.get("default").cloned(),
                    });
                }
                Ok(Box::new(PropertiesValidator { properties }))
            }
            _ => Err(CompilationError::SchemaError),
        }
    }
}

impl Validate for PropertiesValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Object(map) = instance {
            for property in &self.properties {
                if map.contains_key(&property.name) {
                    if let Some(item) = map.get_mut(&property.name) {
                        let property_path = instance_path.push(property.name.as_str());
                        validate_each(schema, &property.validators, item, &property_path, context)?;
                    }
                } else if let Some(default) = &property.default {
                    // a deep copy of the default fills the absent key; the copy itself
                    // is not re-validated
                    map.insert(property.name.clone(), default.clone());
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for PropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "properties: {{{}}}",
            self.properties
                .iter()
                .map(|property| format!(
                    "{}: {}",
                    property.name,
                    format_validators(&property.validators)
                ))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(PropertiesValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::compilation::JSONSchema;
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": {"type": "number"},
                "b": {"type": "string"},
            },
        })
    }

    #[test_case(json!({}))]
    #[test_case(json!({"a": 1}))]
    #[test_case(json!({"a": 1, "b": ""}))]
    #[test_case(json!({"a": 1, "b": "", "any": true}); "unknown keys are allowed")]
    fn valid(instance: Value) {
        tests_util::is_valid(&schema(), &instance);
    }

    #[test]
    fn per_property_failure_carries_the_key_path() {
        let error = tests_util::expect_error(&schema(), &json!({"a": 1, "b": 2}));
        assert_eq!(error.rule(), "type");
        assert_eq!(error.message(), "must be string, but is a: int");
        assert_eq!(error.path().to_string(), "/b");
    }

    #[test]
    fn defaults_fill_absent_keys_only() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {"type": "string"},
                "c": {"type": "string", "default": "abc"},
            },
        });
        let compiled = JSONSchema::compile(&schema).unwrap();
        assert_eq!(
            compiled.validate(json!({"a": "x"})).unwrap(),
            json!({"a": "x", "c": "abc"})
        );
        // present keys keep their value
        assert_eq!(
            compiled.validate(json!({"a": "x", "c": "kept"})).unwrap(),
            json!({"a": "x", "c": "kept"})
        );
    }

    #[test]
    fn default_is_a_deep_copy() {
        let schema = json!({
            "type": "object",
            "properties": {
                "nested": {"default": {"inner": [1, 2]}},
            },
        });
        let compiled = JSONSchema::compile(&schema).unwrap();
        let first = compiled.validate(json!({})).unwrap();
        assert_eq!(first, json!({"nested": {"inner": [1, 2]}}));
        let second = compiled.validate(json!({})).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_properties_definition() {
        let schema = json!({"properties": {"item": ["wrong"]}});
        assert!(JSONSchema::compile(&schema).is_err());
    }
}
