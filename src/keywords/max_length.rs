use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct MaxLengthValidator {
    limit: u64,
    definition: Arc<Value>,
}

impl MaxLengthValidator {
    #[inline]
    pub(crate) fn compile(limit: u64, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(MaxLengthValidator {
            limit,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for MaxLengthValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::String(item) = &*instance {
            // code points, not bytes
            if (bytecount::num_chars(item.as_bytes()) as u64) > self.limit {
                return Err(ValidationError::max_length(
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

impl fmt::Display for MaxLengthValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "maxLength: {}", self.limit)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    if let Some(limit) = schema.as_u64() {
        Some(MaxLengthValidator::compile(limit, context))
    } else {
        Some(Err(CompilationError::SchemaError))
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(json!({"maxLength": 5}), json!("qwert"))]
    #[test_case(json!({"maxLength": 2}), json!("äö"))]
    fn valid(schema: Value, instance: Value) {
        tests_util::is_valid(&schema, &instance);
    }

    #[test_case(json!({"maxLength": 5}), json!("qwertz"))]
    fn invalid(schema: Value, instance: Value) {
        tests_util::is_not_valid(&schema, &instance);
    }
}
