use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct MinPropertiesValidator {
    limit: u64,
    definition: Arc<Value>,
}

impl MinPropertiesValidator {
    #[inline]
    pub(crate) fn compile(limit: u64, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(MinPropertiesValidator {
            limit,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for MinPropertiesValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Object(item) = &*instance {
            if (item.len() as u64) < self.limit {
                return Err(ValidationError::min_properties(
                    instance_path.into(),
                    instance,
                    Arc::clone(&self.definition),
                    self.limit,
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for MinPropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "minProperties: {}", self.limit)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    if let Some(limit) = schema.as_u64() {
        Some(MinPropertiesValidator::compile(limit, context))
    } else {
        Some(Err(CompilationError::SchemaError))
    }
}
