use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::CompilationError,
    keywords::{validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_validators, format_vec_of_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::fmt;

pub(crate) struct ItemsObjectValidator {
    validators: Validators,
}

impl ItemsObjectValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(ItemsObjectValidator {
            validators: compile_validators(schema, context)?,
        }))
    }
}

impl Validate for ItemsObjectValidator {
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
                validate_each(schema, &self.validators, item, &item_path, context)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ItemsObjectValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "items: {}", format_validators(&self.validators))
    }
}

pub(crate) struct ItemsArrayValidator {
    items: Vec<Validators>,
}

impl ItemsArrayValidator {
    #[inline]
    pub(crate) fn compile(schemas: &[Value], context: &CompilationContext<'_>) -> CompilationResult {
        let mut items = Vec::with_capacity(schemas.len());
        for item in schemas {
            items.push(compile_validators(item, context)?);
        }
        Ok(Box::new(ItemsArrayValidator { items }))
    }
}

impl Validate for ItemsArrayValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Array(items) = instance {
            for (idx, (item, validators)) in items.iter_mut().zip(self.items.iter()).enumerate() {
                let item_path = instance_path.push(idx);
                validate_each(schema, validators, item, &item_path, context)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ItemsArrayValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "items: [{}]", format_vec_of_validators(&self.items))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    match schema {
        Value::Array(items) => Some(ItemsArrayValidator::compile(items, context)),
        Value::Object(_) => Some(ItemsObjectValidator::compile(schema, context)),
        Value::Bool(value) => {
            if *value {
                None
            } else {
                Some(ItemsObjectValidator::compile(schema, context))
            }
        }
        _ => Some(Err(CompilationError::SchemaError)),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(json!({"items": {"type": "integer"}}), json!([1, 2, 3]))]
    #[test_case(json!({"items": {"type": "integer"}}), json!([]))]
    #[test_case(json!({"items": [{"type": "integer"}, {"type": "string"}]}), json!([1, "a"]))]
    #[test_case(json!({"items": [{"type": "integer"}, {"type": "string"}]}), json!([1]); "shorter than positional schemas")]
    #[test_case(json!({"items": [{"type": "integer"}]}), json!([1, "anything"]); "tail allowed by default")]
    #[test_case(json!({"items": true}), json!([1, "a"]))]
    fn valid(schema: Value, instance: Value) {
        tests_util::is_valid(&schema, &instance);
    }

    #[test]
    fn every_element_is_checked() {
        let schema = json!({"items": {"type": "integer"}});
        let error = tests_util::expect_error(&schema, &json!([1, 2, "3"]));
        assert_eq!(error.rule(), "type");
        assert_eq!(error.path().to_string(), "/2");
    }

    #[test]
    fn positional_schemas_apply_in_order() {
        let schema = json!({"items": [{"type": "integer"}, {"type": "string"}]});
        let error = tests_util::expect_error(&schema, &json!(["a", "b"]));
        assert_eq!(error.path().to_string(), "/0");
        let error = tests_util::expect_error(&schema, &json!([1, 2]));
        assert_eq!(error.path().to_string(), "/1");
    }

    #[test]
    fn items_false_rejects_any_element() {
        let schema = json!({"items": false});
        tests_util::is_valid(&schema, &json!([]));
        tests_util::is_not_valid(&schema, &json!([1]));
    }
}
