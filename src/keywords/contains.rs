use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::ValidationError,
    keywords::{validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct ContainsValidator {
    validators: Validators,
    definition: Arc<Value>,
}

impl ContainsValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(ContainsValidator {
            validators: compile_validators(schema, context)?,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for ContainsValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Array(items) = instance {
            for (idx, item) in items.iter_mut().enumerate() {
                let item_path = instance_path.push(idx);
                if validate_each(schema, &self.validators, item, &item_path, context).is_ok() {
                    return Ok(());
                }
            }
            return Err(ValidationError::contains(
                instance_path.into(),
                instance,
                Arc::clone(&self.definition),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ContainsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contains: {}", format_validators(&self.validators))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(ContainsValidator::compile(schema, context))
}
