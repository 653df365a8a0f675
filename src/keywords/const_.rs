use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::ValidationError,
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct ConstValidator {
    expected: Value,
    definition: Arc<Value>,
}

impl ConstValidator {
    #[inline]
    pub(crate) fn compile(expected: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(ConstValidator {
            expected: expected.clone(),
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for ConstValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if self.expected == *instance {
            Ok(())
        } else {
            Err(ValidationError::constant(
                instance_path.into(),
                instance,
                Arc::clone(&self.definition),
                &self.expected,
            ))
        }
    }
}

impl fmt::Display for ConstValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "const: {}", self.expected)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(ConstValidator::compile(schema, context))
}
