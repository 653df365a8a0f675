use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::ValidationError,
    keywords::{validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct PropertyNamesValidator {
    validators: Validators,
    definition: Arc<Value>,
}

impl PropertyNamesValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(PropertyNamesValidator {
            validators: compile_validators(schema, context)?,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for PropertyNamesValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Object(map) = &*instance {
            for key in map.keys() {
                // every key is validated as a string value
                let mut name = Value::String(key.clone());
                if validate_each(schema, &self.validators, &mut name, instance_path, context).is_err() {
                    return Err(ValidationError::property_names(
                        instance_path.into(),
                        &name,
                        Arc::clone(&self.definition),
                        key.clone(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for PropertyNamesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "propertyNames: {}", format_validators(&self.validators))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(PropertyNamesValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn draft6(mut schema: Value) -> Value {
        schema["$schema"] = json!("http://json-schema.org/draft-06/schema");
        schema
    }

    #[test_case(json!({"propertyNames": {"maxLength": 3}}), json!({}))]
    #[test_case(json!({"propertyNames": {"maxLength": 3}}), json!({"ab": 1, "abc": 2}))]
    #[test_case(json!({"propertyNames": false}), json!({}))]
    fn valid(schema: Value, instance: Value) {
        tests_util::is_valid(&draft6(schema), &instance);
    }

    #[test_case(json!({"propertyNames": {"maxLength": 3}}), json!({"abcd": 1}))]
    #[test_case(json!({"propertyNames": false}), json!({"a": 1}))]
    fn invalid(schema: Value, instance: Value) {
        let error = tests_util::expect_error(&draft6(schema), &instance);
        assert_eq!(error.rule(), "propertyNames");
    }
}
