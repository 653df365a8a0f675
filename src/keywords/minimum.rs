use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::{helpers, CompilationResult},
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Number, Value};
use std::{fmt, sync::Arc};

pub(crate) struct MinimumValidator {
    limit: Number,
    exclusive: bool,
    definition: Arc<Value>,
}

impl MinimumValidator {
    #[inline]
    pub(crate) fn compile(limit: Number, exclusive: bool, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(MinimumValidator {
            limit,
            exclusive,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for MinimumValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Number(item) = &*instance {
            let valid = if self.exclusive {
                helpers::num_gt(item, &self.limit)
            } else {
                helpers::num_ge(item, &self.limit)
            };
            if !valid {
                return Err(ValidationError::minimum(
                    instance_path.into(),
                    instance,
                    Arc::clone(&self.definition),
                    self.limit.clone(),
                    self.exclusive,
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for MinimumValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exclusive {
            write!(f, "minimum: {} (exclusive)", self.limit)
        } else {
            write!(f, "minimum: {}", self.limit)
        }
    }
}

#[inline]
pub(crate) fn compile(
    parent: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    if let Value::Number(limit) = schema {
        // the boolean draft-04 form; the numeric form is a standalone keyword
        let exclusive = matches!(parent.get("exclusiveMinimum"), Some(Value::Bool(true)));
        Some(MinimumValidator::compile(limit.clone(), exclusive, context))
    } else {
        Some(Err(CompilationError::SchemaError))
    }
}
