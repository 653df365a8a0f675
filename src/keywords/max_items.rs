use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct MaxItemsValidator {
    limit: u64,
    definition: Arc<Value>,
}

impl MaxItemsValidator {
    #[inline]
    pub(crate) fn compile(limit: u64, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(MaxItemsValidator {
            limit,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for MaxItemsValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Array(items) = &*instance {
            if (items.len() as u64) > self.limit {
                return Err(ValidationError::max_items(
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

impl fmt::Display for MaxItemsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "maxItems: {}", self.limit)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    if let Some(limit) = schema.as_u64() {
        Some(MaxItemsValidator::compile(limit, context))
    } else {
        Some(Err(CompilationError::SchemaError))
    }
}
