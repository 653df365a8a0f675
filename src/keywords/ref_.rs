use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    keywords::{validate_each, CompilationResult},
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::fmt;

/// A call to the validators of a resolved URI.
///
/// The target is compiled through the compilation work queue and looked up in the
/// schema's registry at validation time, so a reference may (transitively) call itself.
pub(crate) struct RefValidator {
    uri: String,
    name: String,
}

impl RefValidator {
    #[inline]
    pub(crate) fn compile(reference: &str, context: &CompilationContext<'_>) -> CompilationResult {
        let url = context.build_url(reference)?;
        let name = context.resolver.scope_name(&url);
        let uri = url.to_string();
        context.refs.borrow_mut().enqueue(&uri);
        Ok(Box::new(RefValidator { uri, name }))
    }
}

impl Validate for RefValidator {
    fn validate(
        &self,
        schema: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        context: &ValidationContext<'_>,
    ) -> ValidationResult {
        let validators = schema.resolved_validators(&self.uri);
        validate_each(schema, validators, instance, instance_path, context)
    }
}

impl fmt::Display for RefValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$ref: {}", self.name)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    reference: &str,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    Some(RefValidator::compile(reference, context))
}
