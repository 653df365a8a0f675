use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::{helpers, CompilationResult},
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Number, Value};
use std::{fmt, sync::Arc};

pub(crate) struct ExclusiveMaximumValidator {
    limit: Number,
    definition: Arc<Value>,
}

impl ExclusiveMaximumValidator {
    #[inline]
    pub(crate) fn compile(limit: Number, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(ExclusiveMaximumValidator {
            limit,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for ExclusiveMaximumValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Number(item) = &*instance {
            if !helpers::num_lt(item, &self.limit) {
                return Err(ValidationError::exclusive_maximum(
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

impl fmt::Display for ExclusiveMaximumValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exclusiveMaximum: {}", self.limit)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    match schema {
        Value::Number(limit) => Some(ExclusiveMaximumValidator::compile(limit.clone(), context)),
        // the draft-04 boolean form is handled by the `maximum` compiler
        Value::Bool(_) => None,
        _ => Some(Err(CompilationError::SchemaError)),
    }
}
