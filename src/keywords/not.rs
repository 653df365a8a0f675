use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::ValidationError,
    keywords::{validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct NotValidator {
    validators: Validators,
    definition: Arc<Value>,
}

impl NotValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(NotValidator {
            validators: compile_validators(schema, context)?,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for NotValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        match validate_each(schema, &self.validators, instance, instance_path, context) {
            Ok(()) => Err(ValidationError::not(
                instance_path.into(),
                instance,
                Arc::clone(&self.definition),
            )),
            Err(_) => Ok(()),
        }
    }
}

impl fmt::Display for NotValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not: {}", format_validators(&self.validators))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(NotValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(json!({"not": {"type": "number"}}), json!("abc"))]
    #[test_case(json!({"not": {"type": ["null"]}}), json!(42))]
    fn valid(schema: Value, instance: Value) {
        tests_util::is_valid(&schema, &instance);
    }

    #[test_case(json!({"not": {"type": "number"}}), json!(0))]
    #[test_case(json!({"not": {"type": ["null"]}}), json!(null))]
    fn invalid(schema: Value, instance: Value) {
        tests_util::is_not_valid(&schema, &instance);
    }
}
