use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::CompilationError,
    keywords::{
        pattern::compile_pattern, required::RequiredAdditionalPropertiesValidator, validate_each,
        CompilationResult, Validators,
    },
    paths::InstancePath,
    validator::{format_validators, Validate, ValidationContext, ValidationResult},
};
use ahash::AHashSet;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;

/// `additionalProperties` as a schema: validates the value of every key that is neither
/// a declared property nor matched by a `patternProperties` regex.
pub(crate) struct AdditionalPropertiesValidator {
    properties: AHashSet<String>,
    patterns: Vec<Regex>,
    validators: Validators,
}

impl AdditionalPropertiesValidator {
    #[inline]
    pub(crate) fn compile(
        parent: &Map<String, Value>,
        schema: &Value,
        context: &CompilationContext<'_>,
    ) -> CompilationResult {
        let mut properties = AHashSet::new();
        if let Some(Value::Object(map)) = parent.get("properties") {
            properties.extend(map.keys().cloned());
        }
        let mut patterns = Vec::new();
        if let Some(Value::Object(map)) = parent.get("patternProperties") {
            for pattern in map.keys() {
                patterns.push(compile_pattern(pattern)?);
            }
        }
        Ok(Box::new(AdditionalPropertiesValidator {
            properties,
            patterns,
            validators: compile_validators(schema, context)?,
        }))
    }

    fn is_known(&self, key: &str) -> bool {
        self.properties.contains(key) || self.patterns.iter().any(|pattern| pattern.is_match(key))
    }
}

impl Validate for AdditionalPropertiesValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Object(map) = instance {
            for (key, value) in map.iter_mut() {
                if !self.is_known(key) {
                    let property_path = instance_path.push(key.as_str());
                    validate_each(schema, &self.validators, value, &property_path, context)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for AdditionalPropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "additionalProperties: {}", format_validators(&self.validators))
    }
}

#[inline]
pub(crate) fn compile(
    parent: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    match schema {
        Value::Bool(true) => None,
        Value::Bool(false) => {
            if parent.contains_key("required") {
                // the fused check compiled for `required` already rejects extras
                None
            } else {
                Some(RequiredAdditionalPropertiesValidator::compile(
                    parent,
                    Vec::new(),
                    context,
                ))
            }
        }
        Value::Object(_) => Some(AdditionalPropertiesValidator::compile(parent, schema, context)),
        _ => Some(Err(CompilationError::SchemaError)),
    }
}
