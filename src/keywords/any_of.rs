use crate::{
    compilation::{compile_validators, context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError, ValidationErrorKind},
    keywords::{validate_each, CompilationResult, Validators},
    paths::{InstancePath, PathChunk},
    validator::{format_vec_of_validators, Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

pub(crate) struct AnyOfValidator {
    schemas: Vec<Validators>,
    definition: Arc<Value>,
}

impl AnyOfValidator {
    #[inline]
    pub(crate) fn compile(schema: &Value, context: &CompilationContext<'_>) -> CompilationResult {
        if let Value::Array(items) = schema {
            let mut schemas = Vec::with_capacity(items.len());
            for item in items {
                schemas.push(compile_validators(item, context)?);
            }
            Ok(Box::new(AnyOfValidator {
                schemas,
                definition: Arc::clone(&context.definition),
            }))
        } else {
            Err(CompilationError::SchemaError)
        }
    }
}

impl Validate for AnyOfValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        // Branches run left to right; each contributes its first failure only.
        let mut errors = Vec::with_capacity(self.schemas.len());
        for validators in &self.schemas {
            match validate_each(schema, validators, instance, instance_path, context) {
                Ok(()) => return Ok(()),
                Err(error) => errors.push(error),
            }
        }
        Err(best_error(errors, instance, instance_path, context, &self.definition))
    }
}

impl fmt::Display for AnyOfValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anyOf: [{}]", format_vec_of_validators(&self.schemas))
    }
}

/// Select the branch failure to surface, or synthesize a better one.
///
/// When the value is an object with tag or discriminator fields, the first branch whose
/// failure is consistent with them is assumed to be the branch the value was meant for,
/// and its failure is surfaced. A branch whose single recorded failure concerns the
/// presence of a tag field (or anything about a discriminator field) rejected the
/// union shape itself and is passed over. If every branch rejected the tags the tags are
/// unknown; if every branch rejected the discriminators their values are bad. Without
/// an extractor, or signals, the deepest failure is the most specific one.
///
/// Branch schemas are expected to list tag/discriminator fields before the rest; when
/// they do not, validation still works but the selection degrades to the deepest
/// failure.
fn best_error(
    mut errors: Vec<ValidationError>,
    instance: &Value,
    instance_path: &InstancePath<'_>,
    context: &ValidationContext<'_>,
    definition: &Arc<Value>,
) -> ValidationError {
    debug_assert!(!errors.is_empty());
    let (extractor, object) = match (context.special_fields, &*instance) {
        (Some(extractor), Value::Object(object)) => (extractor, object),
        _ => return deepest(errors),
    };
    let fields = extractor.extract(object);
    if fields.signal_count() == 0 {
        return deepest(errors);
    }

    let base_len = instance_path.len();
    let mut selected = None;
    for (index, error) in errors.iter().enumerate() {
        if is_fundamental_error(base_len, error) {
            continue;
        }
        // The branch allowed every tag field that is present, so the failure it reports
        // is about the object's content rather than its shape.
        if !fields.tags.is_empty()
            && fields
                .tags
                .iter()
                .all(|tag| !is_specific_field_error(base_len, error, tag, true))
        {
            selected = Some(index);
            break;
        }
        // Same for discriminators, except that their values matter too.
        if !fields.discriminators.is_empty()
            && fields
                .discriminators
                .iter()
                .all(|field| !is_specific_field_error(base_len, error, field, false))
        {
            selected = Some(index);
            break;
        }
    }
    if let Some(index) = selected {
        return errors.swap_remove(index);
    }

    if !fields.tags.is_empty() {
        return ValidationError::unknown_tags(instance_path.into(), instance, Arc::clone(definition));
    }
    if !fields.discriminators.is_empty() {
        return ValidationError::bad_discriminators(instance_path.into(), instance, Arc::clone(definition));
    }
    deepest(errors)
}

/// The failure with the longest path; ties resolve to the earliest branch.
fn deepest(errors: Vec<ValidationError>) -> ValidationError {
    errors
        .into_iter()
        .reduce(|best, error| {
            if error.path().len() > best.path().len() {
                error
            } else {
                best
            }
        })
        .expect("anyOf compiles to at least one branch")
}

/// Whether `error` concerns any field of the object at depth `base_len`.
fn is_any_field_error(base_len: usize, error: &ValidationError) -> bool {
    error.path().len() > base_len
        || matches!(
            error.kind,
            ValidationErrorKind::RequiredAdditionalProperties { .. }
                | ValidationErrorKind::PropertyNames { .. }
        )
}

/// Whether `error` rejects the object itself (its type, for example) rather than any of
/// its fields.
fn is_fundamental_error(base_len: usize, error: &ValidationError) -> bool {
    !is_any_field_error(base_len, error)
}

/// Whether `error` concerns the given `field` of the object at depth `base_len`.
/// With `existence_only`, failures about the field's value are ignored and only
/// missing/disallowed reports count.
fn is_specific_field_error(
    base_len: usize,
    error: &ValidationError,
    field: &str,
    existence_only: bool,
) -> bool {
    if !existence_only {
        if let Some(PathChunk::Name(name)) = error.path().get(base_len) {
            if name == field {
                return true;
            }
        }
    }
    match &error.kind {
        ValidationErrorKind::RequiredAdditionalProperties { missing, extra } => {
            missing.iter().any(|name| name == field) || extra.iter().any(|name| name == field)
        }
        ValidationErrorKind::PropertyNames { .. } => true,
        _ => false,
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(AnyOfValidator::compile(schema, context))
}
