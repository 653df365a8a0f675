use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::CompilationError,
    keywords::{pattern::compile_pattern, validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_validators, Validate, ValidationContext, ValidationResult},
};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;

pub(crate) struct PatternPropertiesValidator {
    patterns: Vec<(String, Regex, Validators)>,
}

impl PatternPropertiesValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        match schema {
            Value::Object(map) => {
                let mut patterns = Vec::with_capacity(map.len());
                for (pattern, subschema) in map {
                    patterns.push((
                        pattern.clone(),
                        compile_pattern(pattern)?,
                        compile_validators(subschema, context)?,
                    ));
                }
                Ok(Box::new(PatternPropertiesValidator { patterns }))
            }
            _ => Err(CompilationError::SchemaError),
        }
    }
}

impl Validate for PatternPropertiesValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Object(map) = instance {
            for (_, pattern, validators) in &self.patterns {
                for (key, value) in map.iter_mut() {
                    if pattern.is_match(key) {
                        let property_path = instance_path.push(key.as_str());
                        validate_each(schema, validators, value, &property_path, context)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for PatternPropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "patternProperties: {{{}}}",
            self.patterns
                .iter()
                .map(|(pattern, _, validators)| format!("{}: {}", pattern, format_validators(validators)))
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
    Some(PatternPropertiesValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn schema() -> Value {
        json!({
            "type": "object",
            "patternProperties": {
                "a": {"type": "number"},
                "b": {"type": "string"},
            },
        })
    }

    #[test_case(json!({}))]
    #[test_case(json!({"a": 1}))]
    #[test_case(json!({"xa": 1}); "matches anywhere in the key")]
    #[test_case(json!({"xbx": ""}))]
    #[test_case(json!({"other": null}); "non matching keys are free")]
    fn valid(instance: Value) {
        tests_util::is_valid(&schema(), &instance);
    }

    #[test]
    fn matching_key_with_wrong_value() {
        let error = tests_util::expect_error(&schema(), &json!({"xa": ""}));
        assert_eq!(error.rule(), "type");
        assert_eq!(error.message(), "must be number, but is a: str");
        assert_eq!(error.path().to_string(), "/xa");
    }

    #[test]
    fn key_matching_several_patterns_satisfies_all() {
        let schema = json!({
            "patternProperties": {
                "^a": {"type": "number"},
                "b$": {"minimum": 3},
            },
        });
        tests_util::is_valid(&schema, &json!({"ab": 3}));
        tests_util::is_not_valid(&schema, &json!({"ab": 1}));
    }
}
