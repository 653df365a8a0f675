use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::{validate_each, CompilationResult, Validators},
    paths::InstancePath,
    validator::{format_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct AdditionalItemsObjectValidator {
    validators: Validators,
    items_count: usize,
}

impl AdditionalItemsObjectValidator {
    #[inline]
    pub(crate) fn compile(
        schema: &Value,
        items_count: usize,
        context: &CompilationContext<'_>,
    ) -> CompilationResult {
        Ok(Box::new(AdditionalItemsObjectValidator {
            validators: compile_validators(schema, context)?,
            items_count,
        }))
    }
}

impl Validate for AdditionalItemsObjectValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Array(items) = instance {
            for (idx, item) in items.iter_mut().enumerate().skip(self.items_count) {
                let item_path = instance_path.push(idx);
                validate_each(schema, &self.validators, item, &item_path, context)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for AdditionalItemsObjectValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "additionalItems: {}", format_validators(&self.validators))
    }
}

pub(crate) struct AdditionalItemsBooleanValidator {
    items_count: usize,
    definition: Arc<Value>,
}

impl AdditionalItemsBooleanValidator {
    #[inline]
    pub(crate) fn compile(items_count: usize, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(AdditionalItemsBooleanValidator {
            items_count,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for AdditionalItemsBooleanValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Array(items) = &*instance {
            if items.len() > self.items_count {
                return Err(ValidationError::additional_items(
                    instance_path.into(),
                    instance,
                    Arc::clone(&self.definition),
                    self.items_count,
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for AdditionalItemsBooleanValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("additionalItems: false")
    }
}

#[inline]
pub(crate) fn compile(
    parent: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    // only meaningful next to positional `items`; a single-schema `items` already
    // covers the whole array
    if let Some(Value::Array(items)) = parent.get("items") {
        let items_count = items.len();
        match schema {
            Value::Object(_) => Some(AdditionalItemsObjectValidator::compile(
                schema,
                items_count,
                context,
            )),
            Value::Bool(false) => Some(AdditionalItemsBooleanValidator::compile(items_count, context)),
            Value::Bool(true) => None,
            _ => Some(Err(CompilationError::SchemaError)),
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(json!({"items": [{}, {}, {}], "additionalItems": false}), json!([1, 2, 3]))]
    #[test_case(json!({"items": [{}], "additionalItems": {"type": "integer"}}), json!(["anything", 2, 3]))]
    #[test_case(json!({"items": {"type": "integer"}, "additionalItems": false}), json!([1, 2, 3, 4]); "ignored next to single schema items")]
    fn valid(schema: Value, instance: Value) {
        tests_util::is_valid(&schema, &instance);
    }

    #[test]
    fn forbidden_tail() {
        let schema = json!({"items": [{}, {}, {}], "additionalItems": false});
        let error = tests_util::expect_error(&schema, &json!([1, 2, 3, 4]));
        assert_eq!(error.rule(), "additionalItems");
        assert_eq!(error.message(), "must contain only specified items");
    }

    #[test]
    fn validated_tail() {
        let schema = json!({"items": [{}], "additionalItems": {"type": "integer"}});
        let error = tests_util::expect_error(&schema, &json!([null, 2, 3, "foo"]));
        assert_eq!(error.rule(), "type");
        assert_eq!(error.path().to_string(), "/3");
    }
}
