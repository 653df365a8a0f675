use crate::{
    compilation::JSONSchema,
    error::CompilationError,
    resolver::{DefaultResolver, SchemaResolver},
    schemas::Draft,
};
use ahash::AHashMap;
use serde_json::Value;
use std::{fmt, sync::Arc};

/// A format handler: decides whether a string conforms to a named format.
pub type FormatCheck = dyn Fn(&str) -> bool + Send + Sync;

/// Full configuration to guide the `JSONSchema` compilation.
///
/// Using a `CompilationOptions` instance you can configure the draft version, register
/// format handlers and plug an external `$ref` resolver.
#[derive(Clone)]
pub struct CompilationOptions {
    draft: Option<Draft>,
    formats: AHashMap<String, Arc<FormatCheck>>,
    resolver: Arc<dyn SchemaResolver>,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        CompilationOptions {
            draft: None,
            formats: AHashMap::new(),
            resolver: Arc::new(DefaultResolver),
        }
    }
}

impl CompilationOptions {
    /// Use a specific draft instead of detecting it from the `$schema` field.
    ///
    /// When neither is present, draft-04 is assumed.
    #[must_use]
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = Some(draft);
        self
    }

    /// Register a handler for the given `format` name.
    ///
    /// Formats without a registered handler are silently accepted; this crate ships no
    /// built-in format validators.
    #[must_use]
    pub fn with_format<F>(mut self, format: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.insert(format.into(), Arc::new(check));
        self
    }

    /// Use a custom resolver for out-of-document `$ref`s.
    ///
    /// Without one, any reference that leaves the document is a definition-time error.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl SchemaResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub(crate) fn draft(&self) -> Option<Draft> {
        self.draft
    }

    pub(crate) fn format(&self, format: &str) -> Option<&Arc<FormatCheck>> {
        self.formats.get(format)
    }

    pub(crate) fn resolver(&self) -> Arc<dyn SchemaResolver> {
        Arc::clone(&self.resolver)
    }

    /// Compile `schema` into a validation tree using this configuration.
    pub fn compile(&self, schema: &Value) -> Result<JSONSchema, CompilationError> {
        crate::compilation::compile_with(self, schema)
    }
}

impl fmt::Debug for CompilationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilationOptions")
            .field("draft", &self.draft)
            .field("formats", &self.formats.keys().collect::<Vec<&String>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registered_format_is_applied() {
        let schema = json!({"format": "even-length"});
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .with_format("even-length", |value: &str| value.len() % 2 == 0)
            .compile(&schema)
            .unwrap();
        assert!(compiled.is_valid(&json!("ab")));
        let error = compiled.validate(json!("abc")).unwrap_err();
        assert_eq!(error.rule(), "format");
        assert_eq!(error.to_string(), "data must be even-length");
    }

    #[test]
    fn unknown_format_is_accepted() {
        let schema = json!({"format": "no-such-format"});
        let compiled = JSONSchema::compile(&schema).unwrap();
        assert!(compiled.is_valid(&json!("anything")));
    }
}
