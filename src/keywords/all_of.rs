use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::CompilationError,
    keywords::{validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_vec_of_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::fmt;

pub(crate) struct AllOfValidator {
    schemas: Vec<Validators>,
}

impl AllOfValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        if let Value::Array(items) = schema {
            let mut schemas = Vec::with_capacity(items.len());
            for item in items {
                schemas.push(compile_validators(item, context)?);
            }
            Ok(Box::new(AllOfValidator { schemas }))
        } else {
            Err(CompilationError::SchemaError)
        }
    }
}

impl Validate for AllOfValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        // declaration order, first failure wins
        for validators in &self.schemas {
            validate_each(schema, validators, instance, instance_path, context)?;
        }
        Ok(())
    }
}

impl fmt::Display for AllOfValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allOf: [{}]", format_vec_of_validators(&self.schemas))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(AllOfValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn first_failure_wins() {
        let schema = json!({"allOf": [{"type": "string"}, {"maxLength": 5}]});
        tests_util::is_valid(&schema, &json!("qwert"));
        let error = tests_util::expect_error(&schema, &json!("qwertz"));
        assert_eq!(error.rule(), "maxLength");
        let error = tests_util::expect_error(&schema, &json!(42));
        assert_eq!(error.rule(), "type");
    }
}
