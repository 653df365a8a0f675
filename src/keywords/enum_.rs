use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct EnumValidator {
    options: Value,
    items: Vec<Value>,
    definition: Arc<Value>,
}

impl EnumValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, items: &[Value], context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(EnumValidator {
            options: schema.clone(),
            items: items.to_vec(),
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for EnumValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        // structural equality, every JSON kind included
        if self.items.iter().any(|item| item == &*instance) {
            Ok(())
        } else {
            Err(ValidationError::enumeration(
                instance_path.into(),
                instance,
                Arc::clone(&self.definition),
                &self.options,
            ))
        }
    }
}

impl fmt::Display for EnumValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enum: {}", self.options)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    if let Value::Array(items) = schema {
        Some(EnumValidator::compile(schema, items, context))
    } else {
        Some(Err(CompilationError::SchemaError))
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(json!({"enum": [1, 2, "a"]}), json!(1))]
    #[test_case(json!({"enum": [1, 2, "a"]}), json!("a"))]
    #[test_case(json!({"enum": [[1, 2]]}), json!([1, 2]))]
    #[test_case(json!({"enum": [{"x": 1}]}), json!({"x": 1}))]
    fn valid(schema: Value, instance: Value) {
        tests_util::is_valid(&schema, &instance);
    }

    #[test_case(json!({"enum": [1, 2, "a"]}), json!(12))]
    #[test_case(json!({"enum": [1, 2, "a"]}), json!("aa"))]
    #[test_case(json!({"enum": [[1, 2]]}), json!([2, 1]))]
    #[test_case(json!({"enum": [{"x": 1}]}), json!({"x": 2}))]
    fn invalid(schema: Value, instance: Value) {
        tests_util::is_not_valid(&schema, &instance);
    }
}
