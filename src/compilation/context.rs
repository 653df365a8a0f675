use crate::compilation::options::CompilationOptions;
use crate::compilation::RefQueue;
use crate::resolver::Resolver;
use crate::schemas::{id_of, Draft};
use serde_json::Value;
use std::borrow::Cow;
use std::cell::RefCell;
use std::sync::Arc;
use url::{ParseError, Url};

/// Context holds information about used draft and current scope.
#[derive(Debug)]
pub(crate) struct CompilationContext<'a> {
    pub(crate) scope: Cow<'a, Url>,
    pub(crate) draft: Draft,
    pub(crate) config: &'a CompilationOptions,
    pub(crate) resolver: &'a Resolver,
    pub(crate) refs: &'a RefCell<RefQueue>,
    /// The schema node being compiled, shared with every diagnostic it can produce.
    pub(crate) definition: Arc<Value>,
}

impl<'a> CompilationContext<'a> {
    pub(crate) fn new(
        scope: Url,
        draft: Draft,
        config: &'a CompilationOptions,
        resolver: &'a Resolver,
        refs: &'a RefCell<RefQueue>,
    ) -> Self {
        CompilationContext {
            scope: Cow::Owned(scope),
            draft,
            config,
            resolver,
            refs,
            definition: Arc::new(Value::Null),
        }
    }

    /// Push a new scope. All URLs built from the new context will have this scope in them.
    /// Before push:
    ///    scope = http://example.com/
    ///    build_url("#/definitions/foo") -> "http://example.com/#/definitions/foo"
    /// After push this schema - {"$id": "folder/", ...}
    ///    scope = http://example.com/folder/
    ///    build_url("#/definitions/foo") -> "http://example.com/folder/#/definitions/foo"
    ///
    /// In other words it keeps track of sub-folders during compilation. The previous
    /// scope is restored automatically when the pushed context goes out of scope, on
    /// every exit path.
    pub(crate) fn push(&'a self, schema: &Value) -> Self {
        let scope = match id_of(self.draft, schema) {
            Some(id) => match Url::options().base_url(Some(&self.scope)).parse(id) {
                Ok(scope) => Cow::Owned(scope),
                Err(_) => Cow::Borrowed(self.scope.as_ref()),
            },
            None => Cow::Borrowed(self.scope.as_ref()),
        };
        CompilationContext {
            scope,
            draft: self.draft,
            config: self.config,
            resolver: self.resolver,
            refs: self.refs,
            definition: Arc::new(schema.clone()),
        }
    }

    /// Build a new URL. Used for `$ref` compilation to keep their full paths.
    pub(crate) fn build_url(&self, reference: &str) -> Result<Url, ParseError> {
        Url::options().base_url(Some(&self.scope)).parse(reference)
    }
}
