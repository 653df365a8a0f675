use crate::{
    compilation::{context::CompilationContext, options::FormatCheck, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct FormatValidator {
    format: String,
    check: Arc<FormatCheck>,
    definition: Arc<Value>,
}

impl FormatValidator {
    #[inline]
    pub(crate) fn compile(format: &str, check: Arc<FormatCheck>, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(FormatValidator {
            format: format.to_string(),
            check,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for FormatValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::String(item) = &*instance {
            if !(self.check)(item) {
                return Err(ValidationError::format(
                    instance_path.into(),
                    instance,
                    Arc::clone(&self.definition),
                    &self.format,
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for FormatValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "format: {}", self.format)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    if let Value::String(format) = schema {
        // formats without a registered handler are silently accepted
        context
            .config
            .format(format)
            .map(|check| FormatValidator::compile(format, Arc::clone(check), context))
    } else {
        Some(Err(CompilationError::SchemaError))
    }
}
