use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::{pattern::compile_pattern, CompilationResult},
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use ahash::AHashSet;
use regex::Regex;
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

/// Keys an object may carry when `additionalProperties` is `false`: the declared
/// `properties` plus anything matching a `patternProperties` regex.
pub(crate) struct AllowedKeys {
    properties: AHashSet<String>,
    patterns: Vec<Regex>,
}

impl AllowedKeys {
    fn from_parent(parent: &Map<String, Value>) -> Result<AllowedKeys, CompilationError> {
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
        Ok(AllowedKeys { properties, patterns })
    }

    fn contains(&self, key: &str) -> bool {
        self.properties.contains(key) || self.patterns.iter().any(|pattern| pattern.is_match(key))
    }
}

/// The fused `required`/`additionalProperties` check.
///
/// One pass computes both the required keys that are absent and the present keys that
/// are not allowed, and reports them in a single diagnostic. It runs after `properties`,
/// so a required key satisfied by a `default` is not reported missing.
pub(crate) struct RequiredAdditionalPropertiesValidator {
    required: Vec<String>,
    allowed: Option<AllowedKeys>,
    definition: Arc<Value>,
}

impl RequiredAdditionalPropertiesValidator {
    #[inline]
    pub(crate) fn compile(
        parent: &Map<String, Value>,
        required: Vec<String>,
        context: &CompilationContext<'_>,
    ) -> CompilationResult {
        let allowed = if matches!(parent.get("additionalProperties"), Some(Value::Bool(false))) {
            Some(AllowedKeys::from_parent(parent)?)
        } else {
            None
        };
        Ok(Box::new(RequiredAdditionalPropertiesValidator {
            required,
            allowed,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for RequiredAdditionalPropertiesValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Object(map) = &*instance {
            let missing: Vec<String> = self
                .required
                .iter()
                .filter(|name| !map.contains_key(*name))
                .cloned()
                .collect();
            let extra: Vec<String> = match &self.allowed {
                Some(allowed) => map
                    .keys()
                    .filter(|key| !allowed.contains(key))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };
            if !missing.is_empty() || !extra.is_empty() {
                return Err(ValidationError::required_additional_properties(
                    instance_path.into(),
                    instance,
                    Arc::clone(&self.definition),
                    missing,
                    extra,
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for RequiredAdditionalPropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "required: [{}]", self.required.join(", "))?;
        if self.allowed.is_some() {
            f.write_str(", additionalProperties: false")?;
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn compile(
    parent: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    match schema {
        Value::Array(items) => {
            let mut required = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(name) => required.push(name.clone()),
                    _ => return Some(Err(CompilationError::SchemaError)),
                }
            }
            Some(RequiredAdditionalPropertiesValidator::compile(parent, required, context))
        }
        _ => Some(Err(CompilationError::SchemaError)),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(json!({"required": ["a", "b"]}), json!({"a": 1, "b": 2}))]
    #[test_case(json!({"required": []}), json!({}))]
    #[test_case(json!({"required": ["a"], "additionalProperties": false, "properties": {"a": {}}}), json!({"a": 1}))]
    fn valid(schema: Value, instance: Value) {
        tests_util::is_valid(&schema, &instance);
    }

    #[test]
    fn required_alone_reports_all_missing_keys() {
        let schema = json!({"type": "object", "required": ["a", "b"]});
        let error = tests_util::expect_error(&schema, &json!({}));
        assert_eq!(error.rule(), "required-additionalProperties");
        assert_eq!(error.missing_fields(), &["a".to_string(), "b".to_string()]);
        assert!(error.extra_fields().is_empty());

        let error = tests_util::expect_error(&schema, &json!({"a": 1}));
        assert_eq!(error.missing_fields(), &["b".to_string()]);
    }

    #[test]
    fn additional_false_reports_extra_keys() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {"type": "number"},
                "b": {"type": "string"},
                "c_d": {"type": "boolean"},
            },
            "additionalProperties": false,
        });
        tests_util::is_valid(&schema, &json!({"c_d": true}));
        let error = tests_util::expect_error(&schema, &json!({"a": 1, "b": "", "any": true}));
        assert_eq!(error.rule(), "required-additionalProperties");
        assert!(error.missing_fields().is_empty());
        assert_eq!(error.extra_fields(), &["any".to_string()]);
        // a key is either declared exactly or matched by nothing
        let error = tests_util::expect_error(&schema, &json!({"cd": true}));
        assert_eq!(error.extra_fields(), &["cd".to_string()]);
    }

    #[test]
    fn pattern_properties_extend_the_allowed_keys() {
        let schema = json!({
            "type": "object",
            "patternProperties": {
                "a": {"type": "number"},
                "b": {"type": "string"},
            },
            "additionalProperties": false,
        });
        tests_util::is_valid(&schema, &json!({"xa": 1, "xbx": ""}));
        let error = tests_util::expect_error(&schema, &json!({"q": 1}));
        assert_eq!(error.extra_fields(), &["q".to_string()]);
    }

    #[test]
    fn missing_and_extra_in_one_diagnostic() {
        let schema = json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {"a": {}, "b": {}},
            "additionalProperties": false,
        });
        let error = tests_util::expect_error(&schema, &json!({"a": 1, "x": 1, "y": 2}));
        assert_eq!(error.missing_fields(), &["b".to_string()]);
        assert_eq!(error.extra_fields(), &["x".to_string(), "y".to_string()]);
        assert_eq!(
            error.to_string(),
            "data is missing required properties: [b]; additional properties are not allowed: [x], [y]"
        );
    }

    #[test]
    fn additional_schema_does_not_populate_extra_fields() {
        let schema = json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {"a": {}, "b": {}},
            "additionalProperties": {"type": "string"},
        });
        let error = tests_util::expect_error(&schema, &json!({"a": 1, "x": "x", "y": "y"}));
        assert_eq!(error.missing_fields(), &["b".to_string()]);
        assert!(error.extra_fields().is_empty());
    }

    #[test]
    fn required_key_satisfied_by_default_is_not_missing() {
        let schema = json!({
            "type": "object",
            "required": ["a", "c"],
            "properties": {"a": {}, "c": {"default": "abc"}},
        });
        tests_util::is_valid(&schema, &json!({"a": 1}));
    }
}
