use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::{helpers, CompilationResult},
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Number, Value};
use std::{fmt, sync::Arc};

pub(crate) struct ExclusiveMinimumValidator {
    limit: Number,
    definition: Arc<Value>,
}

impl ExclusiveMinimumValidator {
    #[inline]
    pub(crate) fn compile(limit: Number, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(ExclusiveMinimumValidator {
            limit,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for ExclusiveMinimumValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Number(item) = &*instance {
            if !helpers::num_gt(item, &self.limit) {
                return Err(ValidationError::exclusive_minimum(
                    instance_path.into(),
                    instance,
                    Arc::clone(&self.definition),
                    self.limit.clone(),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ExclusiveMinimumValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exclusiveMinimum: {}", self.limit)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    match schema {
        Value::Number(limit) => Some(ExclusiveMinimumValidator::compile(limit.clone(), context)),
        // the draft-04 boolean form is handled by the `minimum` compiler
        Value::Bool(_) => None,
        _ => Some(Err(CompilationError::SchemaError)),
    }
}
