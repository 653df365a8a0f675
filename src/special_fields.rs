//! Tagged-union awareness for diagnostics.
//!
//! Callers that encode discriminated unions in their documents can supply an extractor
//! that classifies the keys of any object into three ordered groups:
//!
//!   * **tag fields** — keys whose mere presence selects a union branch;
//!   * **discriminator fields** — keys whose value selects a union branch;
//!   * **identification fields** — keys that carry no semantic role but help a human
//!     locate the object (names, ids).
//!
//! Rendered paths annotate every object they traverse with these fields, e.g.
//! `data.items[2]<kind=one,name=first>.value`, and the `anyOf` arbiter uses the tag and
//! discriminator groups to pick the most relevant branch failure.
use crate::paths::{JSONPointer, PathChunk};
use serde_json::{Map, Value};

/// The classification of one object's keys. All three lists must be disjoint and contain
/// only keys present in the object.
#[derive(Debug, Clone, Default)]
pub struct SpecialFields {
    /// Presence-only signals, in extractor order.
    pub tags: Vec<String>,
    /// Presence-and-value signals, in extractor order.
    pub discriminators: Vec<String>,
    /// Display-only fields, in extractor order.
    pub identifications: Vec<String>,
}

impl SpecialFields {
    /// `true` when no group contains any field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.discriminators.is_empty() && self.identifications.is_empty()
    }

    /// Number of fields that carry branch-selection meaning (tags + discriminators).
    #[must_use]
    pub fn signal_count(&self) -> usize {
        self.tags.len() + self.discriminators.len()
    }
}

/// Classifies object keys for path rendering and `anyOf` arbitration.
///
/// Must be pure: the same object must always produce the same classification.
pub trait SpecialFieldsExtractor: Send + Sync {
    /// Classify the keys of `object`.
    fn extract(&self, object: &Map<String, Value>) -> SpecialFields;
}

impl<F> SpecialFieldsExtractor for F
where
    F: Fn(&Map<String, Value>) -> SpecialFields + Send + Sync,
{
    fn extract(&self, object: &Map<String, Value>) -> SpecialFields {
        self(object)
    }
}

/// Value rendering used inside messages and path annotations: strings are shown bare,
/// everything else in its JSON form.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(item) => item.clone(),
        _ => value.to_string(),
    }
}

/// Render `path` into the human-readable dotted/bracketed form, annotating the root and
/// every traversed object with its special fields.
///
/// The rendering is fully determined by `(root, path, extractor)`; diagnostics cache the
/// result so untouched branch errors never pay for it.
pub(crate) fn render_path(
    root: Option<&Value>,
    path: &JSONPointer,
    extractor: Option<&dyn SpecialFieldsExtractor>,
) -> String {
    let mut rendered = String::from("data");
    let mut current = root;
    annotate(&mut rendered, current, extractor);
    for chunk in path.iter() {
        match chunk {
            PathChunk::Name(name) => {
                rendered.push('.');
                rendered.push_str(name);
                current = current.and_then(|value| value.get(name));
            }
            PathChunk::Index(idx) => {
                rendered.push('[');
                rendered.push_str(&idx.to_string());
                rendered.push(']');
                current = current.and_then(|value| value.get(idx));
            }
        }
        annotate(&mut rendered, current, extractor);
    }
    rendered
}

fn annotate(rendered: &mut String, value: Option<&Value>, extractor: Option<&dyn SpecialFieldsExtractor>) {
    let extractor = match extractor {
        Some(extractor) => extractor,
        None => return,
    };
    let object = match value {
        Some(Value::Object(object)) => object,
        _ => return,
    };
    let fields = extractor.extract(object);
    if fields.is_empty() {
        return;
    }
    let mut parts = fields.tags.clone();
    for field in fields.discriminators.iter().chain(fields.identifications.iter()) {
        if let Some(value) = object.get(field) {
            parts.push(format!("{}={}", field, display_value(value)));
        }
    }
    rendered.push('<');
    rendered.push_str(&parts.join(","));
    rendered.push('>');
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// The extractor used across the test suite: `$`-prefixed keys are tags, `type` and
    /// `kind` are discriminators, `name` identifies.
    pub(crate) fn test_extractor(object: &Map<String, Value>) -> SpecialFields {
        SpecialFields {
            tags: object
                .keys()
                .filter(|key| key.starts_with('$'))
                .cloned()
                .collect(),
            discriminators: object
                .keys()
                .filter(|key| key.as_str() == "type" || key.as_str() == "kind")
                .cloned()
                .collect(),
            identifications: object
                .keys()
                .filter(|key| key.as_str() == "name")
                .cloned()
                .collect(),
        }
    }

    #[test]
    fn renders_plain_paths() {
        let root = json!({"property": [null, {"text": 1}]});
        let path = JSONPointer::new(vec![
            PathChunk::Name("property".to_string()),
            PathChunk::Index(1),
            PathChunk::Name("text".to_string()),
        ]);
        assert_eq!(render_path(Some(&root), &path, None), "data.property[1].text");
    }

    #[test]
    fn renders_without_root() {
        let path = JSONPointer::new(vec![PathChunk::Index(0)]);
        assert_eq!(render_path(None, &path, None), "data[0]");
    }

    #[test]
    fn annotates_tags_discriminators_and_identifications() {
        let root = json!({"kind": "text", "named": {"name": "obj", "str": 1}});
        let path = JSONPointer::new(vec![PathChunk::Name("named".to_string()), PathChunk::Name("str".to_string())]);
        assert_eq!(
            render_path(Some(&root), &path, Some(&test_extractor)),
            "data<kind=text>.named<name=obj>.str"
        );
    }

    #[test]
    fn annotates_numeric_discriminator_values() {
        let root = json!({"kind": 1, "value": 1});
        let path = JSONPointer::default();
        assert_eq!(
            render_path(Some(&root), &path, Some(&test_extractor)),
            "data<kind=1>"
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let root = json!({"$tag": 1, "value": []});
        let path = JSONPointer::new(vec![PathChunk::Name("value".to_string())]);
        let first = render_path(Some(&root), &path, Some(&test_extractor));
        let second = render_path(Some(&root), &path, Some(&test_extractor));
        assert_eq!(first, "data<$tag>.value");
        assert_eq!(first, second);
    }
}
