use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::{validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_vec_of_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct OneOfValidator {
    schemas: Vec<Validators>,
    definition: Arc<Value>,
}

impl OneOfValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        if let Value::Array(items) = schema {
            let mut schemas = Vec::with_capacity(items.len());
            for item in items {
                schemas.push(compile_validators(item, context)?);
            }
            Ok(Box::new(OneOfValidator {
                schemas,
                definition: Arc::clone(&context.definition),
            }))
        } else {
            Err(CompilationError::SchemaError)
        }
    }
}

impl Validate for OneOfValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        // all branches are evaluated, left to right, to detect multi-match
        let mut matched = 0usize;
        for validators in &self.schemas {
            if validate_each(schema, validators, instance, instance_path, context).is_ok() {
                matched += 1;
            }
        }
        if matched == 1 {
            Ok(())
        } else {
            Err(ValidationError::one_of(
                instance_path.into(),
                instance,
                Arc::clone(&self.definition),
            ))
        }
    }
}

impl fmt::Display for OneOfValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oneOf: [{}]", format_vec_of_validators(&self.schemas))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(OneOfValidator::compile(schema, context))
}
