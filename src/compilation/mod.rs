//! Schema compilation.
//! The main idea is to compile the input JSON Schema to a validators tree that will contain
//! everything needed to perform such validation in runtime.
pub(crate) mod context;
pub(crate) mod options;

use crate::{
    error::{CompilationError, ValidationError},
    keywords,
    keywords::Validators,
    paths::InstancePath,
    resolver::Resolver,
    schemas,
    schemas::Draft,
    validator::{ValidationContext, ValidationOptions},
};
use ahash::{AHashMap, AHashSet};
use context::CompilationContext;
use options::CompilationOptions;
use serde_json::Value;
use std::cell::RefCell;
use std::sync::Arc;
use url::Url;

pub(crate) const DEFAULT_ROOT_URL: &str = "json-schema:///";

lazy_static::lazy_static! {
    pub(crate) static ref DEFAULT_SCOPE: Url = Url::parse(DEFAULT_ROOT_URL).expect("Is a valid URL");
}

/// The structure that holds a JSON Schema compiled into a validation tree.
///
/// Validation consumes a value and either returns it back (with `default`s merged into
/// objects) or fails with a single rich [`ValidationError`].
#[derive(Debug)]
pub struct JSONSchema {
    draft: Draft,
    validators: Validators,
    /// Validators for every `$ref`-resolved URI, compiled eagerly through a work queue so
    /// reference cycles terminate: a URI is claimed before its body is compiled, and the
    /// emitted `$ref` validator only carries the URI it calls through this registry.
    registry: AHashMap<String, Validators>,
}

/// URIs that still need their validators compiled, discovered while compiling `$ref`s.
#[derive(Debug, Default)]
pub(crate) struct RefQueue {
    pending: Vec<String>,
    seen: AHashSet<String>,
}

impl RefQueue {
    pub(crate) fn enqueue(&mut self, uri: &str) {
        if self.seen.insert(uri.to_string()) {
            self.pending.push(uri.to_string());
        }
    }
}

impl JSONSchema {
    /// Return a default [`CompilationOptions`] that can configure the compilation flow:
    /// the draft version, format handlers and the external reference resolver.
    #[must_use]
    pub fn options() -> CompilationOptions {
        CompilationOptions::default()
    }

    /// Compile the input schema into a validation tree.
    ///
    /// The method is equivalent to `JSONSchema::options().compile(schema)`.
    pub fn compile(schema: &Value) -> Result<JSONSchema, CompilationError> {
        Self::options().compile(schema)
    }

    /// The draft this schema was compiled against.
    #[must_use]
    pub fn draft(&self) -> Draft {
        self.draft
    }

    /// Run validation against `instance`, returning it back with `default`s merged into
    /// objects, or the first validation failure.
    pub fn validate(&self, instance: Value) -> Result<Value, ValidationError> {
        self.validate_with(instance, ValidationOptions::default())
    }

    /// Run validation with explicit [`ValidationOptions`]: a special-fields extractor
    /// for tagged-union diagnostics, and/or a root document and path prefix when the
    /// instance is a subtree of a larger document.
    pub fn validate_with(
        &self,
        mut instance: Value,
        options: ValidationOptions,
    ) -> Result<Value, ValidationError> {
        let ValidationOptions {
            root,
            root_path,
            special_fields,
        } = options;
        let context = ValidationContext {
            special_fields: special_fields.as_deref(),
        };
        let instance_path = InstancePath::new();
        for validator in &self.validators {
            if let Err(error) = validator.validate(self, &mut instance, &instance_path, &context) {
                let root = root.unwrap_or(instance);
                return Err(error.with_context(root_path, Some(root), special_fields));
            }
        }
        Ok(instance)
    }

    /// Run validation against `instance` but return a boolean result instead of the
    /// defaulted value. The instance is cloned internally: default insertion needs
    /// ownership and the boolean surface must not observe mutation.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance.clone()).is_ok()
    }

    pub(crate) fn resolved_validators(&self, uri: &str) -> &Validators {
        self.registry
            .get(uri)
            .expect("referenced validators are compiled before validation starts")
    }
}

pub(crate) fn compile_with(
    config: &CompilationOptions,
    schema: &Value,
) -> Result<JSONSchema, CompilationError> {
    // Draft is detected in the following precedence order:
    //   - Explicitly specified;
    //   - $schema field in the document;
    //   - Draft4;
    let draft = config
        .draft()
        .unwrap_or_else(|| schemas::draft_from_schema(schema).unwrap_or(Draft::Draft4));
    let scope = match schemas::id_of(draft, schema) {
        Some(url) => Url::parse(url)?,
        None => DEFAULT_SCOPE.clone(),
    };
    let schema = Arc::new(schema.clone());
    let resolver = Resolver::new(config.resolver(), draft, &scope, Arc::clone(&schema))?;
    let refs = RefCell::new(RefQueue::default());
    let context = CompilationContext::new(scope, draft, config, &resolver, &refs);
    let validators = compile_validators(&schema, &context)?;

    // Compile everything `$ref`s point at. Compiling a body may discover further
    // references, which land on the same queue.
    let mut registry: AHashMap<String, Validators> = AHashMap::new();
    loop {
        let next = refs.borrow_mut().pending.pop();
        let uri = match next {
            Some(uri) => uri,
            None => break,
        };
        let url = Url::parse(&uri)?;
        let (resolved_scope, resolved) = resolver.resolve_fragment(draft, &url, &uri)?;
        let ref_context = CompilationContext::new(resolved_scope, draft, config, &resolver, &refs);
        let compiled = compile_validators(&resolved, &ref_context)?;
        registry.insert(uri, compiled);
    }
    Ok(JSONSchema {
        draft,
        validators,
        registry,
    })
}

/// Compile a JSON schema node into a list of validators.
pub(crate) fn compile_validators(
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Result<Validators, CompilationError> {
    let context = context.push(schema);
    match schema {
        Value::Bool(value) => {
            let mut validators = Vec::with_capacity(1);
            if let Some(validator) = keywords::boolean::compile(*value, &context) {
                validators.push(validator?);
            }
            Ok(validators)
        }
        Value::Object(object) => {
            if let Some(reference) = object.get("$ref") {
                // needed because $ref overrides any sibling keywords
                if let Value::String(reference) = reference {
                    let mut validators = Vec::with_capacity(1);
                    if let Some(validator) = keywords::ref_::compile(object, reference, &context) {
                        validators.push(validator?);
                    }
                    Ok(validators)
                } else {
                    Err(CompilationError::SchemaError)
                }
            } else {
                let mut validators = Vec::with_capacity(object.len());
                for keyword in schemas::KEYWORD_ORDER {
                    if let Some(subschema) = object.get(*keyword) {
                        if let Some(compilation_func) = context.draft.get_validator(keyword) {
                            if let Some(validator) = compilation_func(object, subschema, &context) {
                                validators.push(validator?);
                            }
                        }
                    }
                }
                Ok(validators)
            }
        }
        _ => Err(CompilationError::SchemaError),
    }
}
