use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::ValidationError,
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::Value;
use std::{fmt, sync::Arc};

pub(crate) struct FalseValidator {
    definition: Arc<Value>,
}

impl FalseValidator {
    #[inline]
    pub(crate) fn compile(context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(FalseValidator {
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for FalseValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        Err(ValidationError::false_schema(
            instance_path.into(),
            instance,
            Arc::clone(&self.definition),
        ))
    }
}

impl fmt::Display for FalseValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("false")
    }
}

#[inline]
pub(crate) fn compile(value: bool, context: &CompilationContext<'_>) -> Option<CompilationResult> {
    if value {
        None
    } else {
        Some(FalseValidator::compile(context))
    }
}
