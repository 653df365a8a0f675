use crate::{
    compilation::JSONSchema,
    error::ValidationError,
    keywords::BoxedValidator,
    paths::{InstancePath, JSONPointer},
    special_fields::SpecialFieldsExtractor,
};
use serde_json::Value;
use std::{fmt, sync::Arc};

/// Outcome of a single validator: either the value conforms, or the first failure.
pub(crate) type ValidationResult = Result<(), ValidationError>;

/// Ambient state threaded through a validation run.
#[derive(Clone, Copy, Default)]
pub(crate) struct ValidationContext<'a> {
    pub(crate) special_fields: Option<&'a dyn SpecialFieldsExtractor>,
}

pub(crate) trait Validate: Send + Sync + fmt::Display {
    /// Check `instance` against this keyword. The value is mutable because validating
    /// an object inserts `default`s for absent properties.
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult;
}

impl fmt::Debug for dyn Validate + Send + Sync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string())
    }
}

/// Per-call validation settings: the special-fields extractor and, when a subtree of a
/// larger document is validated, the document and the subtree's path inside it.
#[derive(Default)]
pub struct ValidationOptions {
    pub(crate) root: Option<Value>,
    pub(crate) root_path: JSONPointer,
    pub(crate) special_fields: Option<Arc<dyn SpecialFieldsExtractor>>,
}

impl ValidationOptions {
    /// Settings with no extractor, rooted at the instance itself.
    #[must_use]
    pub fn new() -> Self {
        ValidationOptions::default()
    }

    /// The document rendered paths are resolved against. Defaults to the validated
    /// instance.
    #[must_use]
    pub fn with_root(mut self, root: Value) -> Self {
        self.root = Some(root);
        self
    }

    /// Path of the validated instance inside the root document. Prefixes every
    /// diagnostic path. Defaults to the empty path.
    #[must_use]
    pub fn with_root_path(mut self, root_path: JSONPointer) -> Self {
        self.root_path = root_path;
        self
    }

    /// The special-fields extractor used for path annotations and `anyOf` arbitration.
    #[must_use]
    pub fn with_special_fields(mut self, extractor: Arc<dyn SpecialFieldsExtractor>) -> Self {
        self.special_fields = Some(extractor);
        self
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("root", &self.root)
            .field("root_path", &self.root_path)
            .field("special_fields", &self.special_fields.as_ref().map(|_| "<extractor>"))
            .finish()
    }
}

pub(crate) fn format_validators(validators: &[BoxedValidator]) -> String {
    match validators.len() {
        0 => "{}".to_string(),
        1 => {
            let name = validators[0].to_string();
            match name.as_str() {
                // boolean validators are represented as is, without brackets because if they
                // occur in a vector, then the schema is not a key/value mapping
                "true" | "false" => name,
                _ => format!("{{{}}}", name),
            }
        }
        _ => format!(
            "{{{}}}",
            validators
                .iter()
                .map(|validator| format!("{:?}", validator))
                .collect::<Vec<String>>()
                .join(", ")
        ),
    }
}

pub(crate) fn format_vec_of_validators(validators: &[Vec<BoxedValidator>]) -> String {
    validators
        .iter()
        .map(|v| format_validators(v))
        .collect::<Vec<String>>()
        .join(", ")
}

