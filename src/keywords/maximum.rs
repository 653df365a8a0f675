use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::{helpers, CompilationResult},
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Number, Value};
use std::{fmt, sync::Arc};

pub(crate) struct MaximumValidator {
    limit: Number,
    exclusive: bool,
    definition: Arc<Value>,
}

impl MaximumValidator {
    #[inline]
    pub(crate) fn compile(limit: Number, exclusive: bool, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(MaximumValidator {
            limit,
            exclusive,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for MaximumValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Number(item) = &*instance {
            let valid = if self.exclusive {
                helpers::num_lt(item, &self.limit)
            } else {
                helpers::num_le(item, &self.limit)
            };
            if !valid {
                return Err(ValidationError::maximum(
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

impl fmt::Display for MaximumValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exclusive {
            write!(f, "maximum: {} (exclusive)", self.limit)
        } else {
            write!(f, "maximum: {}", self.limit)
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
        let exclusive = matches!(parent.get("exclusiveMaximum"), Some(Value::Bool(true)));
        Some(MaximumValidator::compile(limit.clone(), exclusive, context))
    } else {
        Some(Err(CompilationError::SchemaError))
    }
}
