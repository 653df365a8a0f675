//! Reference resolver. Implements the logic required by the `$ref` keyword: scope
//! tracking, named sub-schema lookup, JSON Pointer dereferencing and stable validator
//! naming. Out-of-document references are delegated to a caller-supplied
//! [`SchemaResolver`]; without one they are a definition-time error.
use crate::{
    compilation::DEFAULT_ROOT_URL,
    error::CompilationError,
    schemas::{id_of, Draft},
};
use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use serde_json::Value;
use std::{borrow::Cow, sync::Arc};
use url::Url;

/// What a [`SchemaResolver`] fails with. Opaque to the compiler, which folds any
/// resolution failure into a definition error for the offending reference.
pub type SchemaResolverError = anyhow::Error;

/// Supplies the documents that `$ref`s pointing outside the schema resolve to.
/// References into the schema itself (`#/definitions/...`, `$id`-named sub-schemas)
/// never reach the resolver.
///
/// # Example
///
/// ```rust
/// # use serde_json::{json, Value};
/// # use anyhow::anyhow;
/// # use richschema::{SchemaResolver, SchemaResolverError};
/// # use std::sync::Arc;
/// # use url::Url;
/// struct Registry;
///
/// impl SchemaResolver for Registry {
///     fn resolve(&self, _root: &Value, url: &Url, _reference: &str) -> Result<Arc<Value>, SchemaResolverError> {
///         match url.scheme() {
///             "memory" => Ok(Arc::new(json!({"type": "string"}))),
///             other => Err(anyhow!("unsupported scheme `{}`", other)),
///         }
///     }
/// }
/// ```
pub trait SchemaResolver: Send + Sync {
    /// Fetch the document behind `url`.
    ///
    /// `url` is already absolute: relative references were joined onto the root
    /// schema's `$id` (or onto the synthetic `json-schema` scheme when the root
    /// declares none). `reference` is the text as it appeared in the schema, for
    /// resolvers that care about details the join discards.
    fn resolve(
        &self,
        root_schema: &Value,
        url: &Url,
        reference: &str,
    ) -> Result<Arc<Value>, SchemaResolverError>;
}

/// Rejects every out-of-document reference, making such refs a definition-time error.
pub(crate) struct DefaultResolver;

impl SchemaResolver for DefaultResolver {
    fn resolve(
        &self,
        _root_schema: &Value,
        url: &Url,
        _reference: &str,
    ) -> Result<Arc<Value>, SchemaResolverError> {
        match url.scheme() {
            "json-schema" => Err(anyhow::anyhow!(
                "cannot resolve relative external schema without root schema ID"
            )),
            scheme => Err(anyhow::anyhow!(
                "a custom resolver is required to resolve external schemas via `{}`",
                scheme
            )),
        }
    }
}

#[derive(Default)]
struct NameRegistry {
    by_uri: AHashMap<String, String>,
    used: AHashSet<String>,
}

pub(crate) struct Resolver {
    external_resolver: Arc<dyn SchemaResolver>,
    root_schema: Arc<Value>,
    // canonical_id: sub-schema mapping to resolve documents by their ID
    // canonical_id is composed with the root document id
    // (if not specified, then `DEFAULT_ROOT_URL` is used for this purpose)
    schemas: AHashMap<String, Arc<Value>>,
    store: RwLock<AHashMap<String, Arc<Value>>>,
    names: RwLock<NameRegistry>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("root_schema", &self.root_schema)
            .field("schemas", &self.schemas)
            .finish()
    }
}

impl Resolver {
    pub(crate) fn new(
        external_resolver: Arc<dyn SchemaResolver>,
        draft: Draft,
        scope: &Url,
        schema: Arc<Value>,
    ) -> Result<Resolver, CompilationError> {
        let mut schemas: AHashMap<String, Arc<Value>> = AHashMap::new();
        collect_named_schemas(draft, &schema, scope, &mut schemas)?;
        Ok(Resolver {
            external_resolver,
            root_schema: schema,
            schemas,
            store: RwLock::new(AHashMap::new()),
            names: RwLock::new(NameRegistry::default()),
        })
    }

    /// The document living at `url`: the root document, one of its `$id`-named
    /// sub-schemas, or an external document fetched through the configured resolver
    /// (and memoized).
    fn resolve_url(&self, url: &Url, orig_ref: &str) -> Result<Arc<Value>, CompilationError> {
        match url.as_str() {
            DEFAULT_ROOT_URL => Ok(Arc::clone(&self.root_schema)),
            url_str => match self.schemas.get(url_str) {
                Some(value) => Ok(Arc::clone(value)),
                None => {
                    if let Some(cached) = self.store.read().get(url_str) {
                        return Ok(Arc::clone(cached));
                    }
                    let resolved = self
                        .external_resolver
                        .resolve(&self.root_schema, url, orig_ref)
                        .map_err(|_| CompilationError::InvalidReference(url.to_string()))?;
                    self.store
                        .write()
                        .insert(url.as_str().to_string(), Arc::clone(&resolved));
                    Ok(resolved)
                }
            },
        }
    }

    /// Resolve a URL possibly containing a fragment to the referenced sub-schema and the
    /// base URL its own scope starts from.
    pub(crate) fn resolve_fragment(
        &self,
        draft: Draft,
        url: &Url,
        orig_ref: &str,
    ) -> Result<(Url, Arc<Value>), CompilationError> {
        let mut resource = url.clone();
        resource.set_fragment(None);

        // a location-independent `$id` wins over a pointer lookup
        if let Some(schema) = self.schemas.get(url.as_str()) {
            return Ok((resource, Arc::clone(schema)));
        }

        let fragment = percent_encoding::percent_decode_str(url.fragment().unwrap_or(""))
            .decode_utf8()
            .map_err(|_| CompilationError::InvalidReference(url.to_string()))?;
        let document = self.resolve_url(&resource, orig_ref)?;
        if fragment.is_empty() {
            return Ok((resource, document));
        }
        let (folders, schema) = dereference(draft, &document, fragment.as_ref())
            .ok_or_else(|| CompilationError::InvalidReference(url.to_string()))?;
        let schema = Arc::new(schema.clone());
        // every `$id` passed on the way down moves the base the target lives under;
        // the first one is the document's own
        for folder in folders.iter().skip(1) {
            resource = resource.join(folder)?;
        }
        Ok((resource, schema))
    }

    /// The stable identifier assigned to a resolved URI. The same URI always yields the
    /// same name; distinct URIs always yield distinct names.
    pub(crate) fn scope_name(&self, url: &Url) -> String {
        let key = url.as_str();
        if let Some(existing) = self.names.read().by_uri.get(key) {
            return existing.clone();
        }
        let mut names = self.names.write();
        if let Some(existing) = names.by_uri.get(key) {
            return existing.clone();
        }
        let candidate = format!("validate_{}", sanitize(url.fragment().unwrap_or("")));
        let name = if names.used.contains(&candidate) {
            let mut counter = 2usize;
            loop {
                let numbered = format!("{}_{}", candidate, counter);
                if !names.used.contains(&numbered) {
                    break numbered;
                }
                counter += 1;
            }
        } else {
            candidate
        };
        names.used.insert(name.clone());
        names.by_uri.insert(key.to_string(), name.clone());
        name
    }
}

fn sanitize(fragment: &str) -> String {
    if fragment.is_empty() {
        return "root".to_string();
    }
    fragment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Walk the document and record every sub-schema that declares its own identifier under
/// its canonical URI, so location-independent `$ref`s can find them later.
fn collect_named_schemas(
    draft: Draft,
    schema: &Value,
    base: &Url,
    store: &mut AHashMap<String, Arc<Value>>,
) -> Result<(), url::ParseError> {
    match schema {
        Value::Object(object) => {
            let mut scope = Cow::Borrowed(base);
            if let Some(id) = id_of(draft, schema) {
                let mut identifier = base.join(id)?;
                // an empty fragment names the same location as no fragment at all
                if identifier.fragment() == Some("") {
                    identifier.set_fragment(None);
                }
                store.insert(identifier.to_string(), Arc::new(schema.clone()));
                scope = Cow::Owned(identifier);
            }
            for (keyword, subschema) in object {
                // `enum` and `const` hold plain data, so an `$id` inside them names nothing
                if keyword != "enum" && keyword != "const" {
                    collect_named_schemas(draft, subschema, &scope, store)?;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_named_schemas(draft, item, base, store)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Undo JSON Pointer escaping: `~1` stands for `/` and `~0` for `~`. Tokens without a
/// `~` pass through unallocated.
fn unescape_token(token: &str) -> Cow<'_, str> {
    if memchr::memchr(b'~', token.as_bytes()).is_none() {
        return Cow::Borrowed(token);
    }
    Cow::Owned(token.replace("~1", "/").replace("~0", "~"))
}

/// Follow a JSON Pointer through `document`, recording every `$id` passed on the way
/// down so the base URI of the referenced sub-schema can be reconstructed.
fn dereference<'a>(
    draft: Draft,
    document: &'a Value,
    fragment: &str,
) -> Option<(Vec<&'a str>, &'a Value)> {
    if !fragment.starts_with('/') {
        return None;
    }
    let mut current = document;
    let mut folders = Vec::new();
    for token in fragment.split('/').skip(1) {
        let token = unescape_token(token);
        current = match current {
            Value::Object(object) => {
                if let Some(id) = id_of(draft, current) {
                    folders.push(id);
                }
                object.get(token.as_ref())?
            }
            Value::Array(items) => items.get(array_index(&token)?)?,
            _ => return None,
        };
    }
    Some((folders, current))
}

fn array_index(token: &str) -> Option<usize> {
    // `usize::from_str` accepts a leading `+` and leading zeros; JSON Pointer does not
    if token.starts_with('+') || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_resolver(schema: &Value) -> Resolver {
        Resolver::new(
            Arc::new(DefaultResolver),
            Draft::Draft7,
            &Url::parse("json-schema:///").unwrap(),
            Arc::new(schema.clone()),
        )
        .unwrap()
    }

    #[test]
    fn only_keyword() {
        // When only one keyword is specified
        let schema = json!({"type": "string"});
        let resolver = make_resolver(&schema);
        // Then in the resolver schema there should be no schemas
        assert_eq!(resolver.schemas.len(), 0);
    }

    #[test]
    fn sub_schema_in_object() {
        // When only one sub-schema is specified inside an object
        let schema = json!({
            "allOf": [{"$ref": "#foo"}],
            "definitions": {
                "A": {"$id": "#foo", "type": "integer"}
            }
        });
        let resolver = make_resolver(&schema);
        assert_eq!(resolver.schemas.len(), 1);
        assert_eq!(
            resolver
                .schemas
                .get("json-schema:///#foo")
                .map(AsRef::as_ref),
            schema.pointer("/definitions/A")
        );
    }

    #[test]
    fn root_schema_id() {
        let schema = json!({
            "$id": "http://localhost:1234/tree",
            "definitions": {
                "node": {
                    "$id": "http://localhost:1234/node",
                    "properties": {
                        "subtree": {"$ref": "tree"},
                        "value": {"type": "number"}
                    },
                    "required": ["value"],
                    "type": "object"
                }
            },
            "properties": {
                "meta": {"type": "string"},
                "nodes": {
                    "items": {"$ref": "node"},
                    "type": "array"
                }
            },
            "required": ["meta", "nodes"],
            "type": "object"
        });
        let resolver = make_resolver(&schema);
        assert_eq!(resolver.schemas.len(), 2);
        assert_eq!(
            resolver
                .schemas
                .get("http://localhost:1234/tree")
                .map(AsRef::as_ref),
            schema.pointer("")
        );
        assert_eq!(
            resolver
                .schemas
                .get("http://localhost:1234/node")
                .map(AsRef::as_ref),
            schema.pointer("/definitions/node")
        );
    }

    #[test]
    fn resolve_fragment_pointer() {
        let schema = json!({
            "definitions": {
                "a": {"type": "integer"},
                "b": {"$ref": "#/definitions/a"},
                "c": {"$ref": "#/definitions/b"}
            }
        });
        let resolver = make_resolver(&schema);
        let url = Url::parse("json-schema:///#/definitions/a").unwrap();
        let (resource, resolved) = resolver
            .resolve_fragment(Draft::Draft7, &url, "#/definitions/a")
            .unwrap();
        assert_eq!(resource, Url::parse("json-schema:///").unwrap());
        assert_eq!(resolved.as_ref(), schema.pointer("/definitions/a").unwrap());
    }

    #[test]
    fn dereference_unescapes_tokens() {
        let schema = json!({"definitions": {"a/b": {"~": {"type": "null"}}}});
        let (folders, resolved) =
            dereference(Draft::Draft7, &schema, "/definitions/a~1b/~0").expect("resolvable");
        assert!(folders.is_empty());
        assert_eq!(resolved, &json!({"type": "null"}));
    }

    #[test]
    fn dereference_array_indices() {
        let schema = json!({"items": [{"type": "null"}, {"type": "string"}]});
        let (_, resolved) = dereference(Draft::Draft7, &schema, "/items/1").expect("resolvable");
        assert_eq!(resolved, &json!({"type": "string"}));
        // leading zeros and signs are not indices
        assert!(dereference(Draft::Draft7, &schema, "/items/01").is_none());
        assert!(dereference(Draft::Draft7, &schema, "/items/+1").is_none());
        // and neither is anything not starting at the root
        assert!(dereference(Draft::Draft7, &schema, "items/1").is_none());
    }

    #[test]
    fn unresolvable_external_reference_is_a_definition_error() {
        let schema = json!({"type": "object"});
        let resolver = make_resolver(&schema);
        let url = Url::parse("http://example.com/other.json").unwrap();
        let result = resolver.resolve_fragment(Draft::Draft7, &url, "http://example.com/other.json");
        assert_eq!(
            result.unwrap_err(),
            CompilationError::InvalidReference("http://example.com/other.json".to_string())
        );
    }

    #[test]
    fn scope_names_are_stable_and_unique() {
        let schema = json!({});
        let resolver = make_resolver(&schema);
        let first = Url::parse("json-schema:///#/definitions/NamedType_string").unwrap();
        let second = Url::parse("json-schema:///#/definitions/NamedType%3Cstring%5B%5D%3E").unwrap();
        let name_one = resolver.scope_name(&first);
        // same URI resolves to the same identifier
        assert_eq!(name_one, resolver.scope_name(&first));
        // distinct URIs never collide
        assert_ne!(name_one, resolver.scope_name(&second));
    }

    #[test]
    fn colliding_sanitized_names_get_a_counter() {
        let schema = json!({});
        let resolver = make_resolver(&schema);
        let first = Url::parse("json-schema:///#/definitions/a.b").unwrap();
        let second = Url::parse("json-schema:///#/definitions/a_b").unwrap();
        assert_eq!(resolver.scope_name(&first), "validate__definitions_a_b");
        assert_eq!(resolver.scope_name(&second), "validate__definitions_a_b_2");
    }
}
