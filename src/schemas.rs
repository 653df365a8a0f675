use crate::{compilation::context::CompilationContext, keywords};
use serde_json::{Map, Value};

/// JSON Schema drafts supported by this crate.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Draft {
    /// `http://json-schema.org/draft-04/schema`
    Draft4,
    /// `http://json-schema.org/draft-06/schema`
    Draft6,
    /// `http://json-schema.org/draft-07/schema`
    Draft7,
}

type CompileFunc =
    fn(&Map<String, Value>, &Value, &CompilationContext<'_>) -> Option<keywords::CompilationResult>;

/// Fixed keyword evaluation order. Validators run in this order regardless of how the
/// schema document orders its keys, so type failures surface before constraint failures
/// on the same node and `properties` inserts defaults before the fused
/// `required`/`additionalProperties` pass computes missing keys.
pub(crate) const KEYWORD_ORDER: &[&str] = &[
    "type",
    "enum",
    "const",
    "not",
    "allOf",
    "anyOf",
    "oneOf",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "minLength",
    "maxLength",
    "pattern",
    "format",
    "minItems",
    "maxItems",
    "uniqueItems",
    "items",
    "additionalItems",
    "contains",
    "minProperties",
    "maxProperties",
    "propertyNames",
    "properties",
    "patternProperties",
    "additionalProperties",
    "required",
    "dependencies",
];

impl Draft {
    pub(crate) fn get_validator(self, keyword: &str) -> Option<CompileFunc> {
        match self {
            Draft::Draft7 => match keyword {
                "additionalItems" => Some(keywords::additional_items::compile),
                "additionalProperties" => Some(keywords::additional_properties::compile),
                "allOf" => Some(keywords::all_of::compile),
                "anyOf" => Some(keywords::any_of::compile),
                "const" => Some(keywords::const_::compile),
                "contains" => Some(keywords::contains::compile),
                "dependencies" => Some(keywords::dependencies::compile),
                "enum" => Some(keywords::enum_::compile),
                "exclusiveMaximum" => Some(keywords::exclusive_maximum::compile),
                "exclusiveMinimum" => Some(keywords::exclusive_minimum::compile),
                "format" => Some(keywords::format::compile),
                "items" => Some(keywords::items::compile),
                "maximum" => Some(keywords::maximum::compile),
                "maxItems" => Some(keywords::max_items::compile),
                "maxLength" => Some(keywords::max_length::compile),
                "maxProperties" => Some(keywords::max_properties::compile),
                "minimum" => Some(keywords::minimum::compile),
                "minItems" => Some(keywords::min_items::compile),
                "minLength" => Some(keywords::min_length::compile),
                "minProperties" => Some(keywords::min_properties::compile),
                "multipleOf" => Some(keywords::multiple_of::compile),
                "not" => Some(keywords::not::compile),
                "oneOf" => Some(keywords::one_of::compile),
                "pattern" => Some(keywords::pattern::compile),
                "patternProperties" => Some(keywords::pattern_properties::compile),
                "properties" => Some(keywords::properties::compile),
                "propertyNames" => Some(keywords::property_names::compile),
                "required" => Some(keywords::required::compile),
                "type" => Some(keywords::type_::compile),
                "uniqueItems" => Some(keywords::unique_items::compile),
                _ => None,
            },
            Draft::Draft6 => match keyword {
                "additionalItems" => Some(keywords::additional_items::compile),
                "additionalProperties" => Some(keywords::additional_properties::compile),
                "allOf" => Some(keywords::all_of::compile),
                "anyOf" => Some(keywords::any_of::compile),
                "const" => Some(keywords::const_::compile),
                "contains" => Some(keywords::contains::compile),
                "dependencies" => Some(keywords::dependencies::compile),
                "enum" => Some(keywords::enum_::compile),
                "exclusiveMaximum" => Some(keywords::exclusive_maximum::compile),
                "exclusiveMinimum" => Some(keywords::exclusive_minimum::compile),
                "format" => Some(keywords::format::compile),
                "items" => Some(keywords::items::compile),
                "maximum" => Some(keywords::maximum::compile),
                "maxItems" => Some(keywords::max_items::compile),
                "maxLength" => Some(keywords::max_length::compile),
                "maxProperties" => Some(keywords::max_properties::compile),
                "minimum" => Some(keywords::minimum::compile),
                "minItems" => Some(keywords::min_items::compile),
                "minLength" => Some(keywords::min_length::compile),
                "minProperties" => Some(keywords::min_properties::compile),
                "multipleOf" => Some(keywords::multiple_of::compile),
                "not" => Some(keywords::not::compile),
                "oneOf" => Some(keywords::one_of::compile),
                "pattern" => Some(keywords::pattern::compile),
                "patternProperties" => Some(keywords::pattern_properties::compile),
                "properties" => Some(keywords::properties::compile),
                "propertyNames" => Some(keywords::property_names::compile),
                "required" => Some(keywords::required::compile),
                "type" => Some(keywords::type_::compile),
                "uniqueItems" => Some(keywords::unique_items::compile),
                _ => None,
            },
            Draft::Draft4 => match keyword {
                "additionalItems" => Some(keywords::additional_items::compile),
                "additionalProperties" => Some(keywords::additional_properties::compile),
                "allOf" => Some(keywords::all_of::compile),
                "anyOf" => Some(keywords::any_of::compile),
                "dependencies" => Some(keywords::dependencies::compile),
                "enum" => Some(keywords::enum_::compile),
                "format" => Some(keywords::format::compile),
                "items" => Some(keywords::items::compile),
                "maximum" => Some(keywords::maximum::compile),
                "maxItems" => Some(keywords::max_items::compile),
                "maxLength" => Some(keywords::max_length::compile),
                "maxProperties" => Some(keywords::max_properties::compile),
                "minimum" => Some(keywords::minimum::compile),
                "minItems" => Some(keywords::min_items::compile),
                "minLength" => Some(keywords::min_length::compile),
                "minProperties" => Some(keywords::min_properties::compile),
                "multipleOf" => Some(keywords::multiple_of::compile),
                "not" => Some(keywords::not::compile),
                "oneOf" => Some(keywords::one_of::compile),
                "pattern" => Some(keywords::pattern::compile),
                "patternProperties" => Some(keywords::pattern_properties::compile),
                "properties" => Some(keywords::properties::compile),
                "required" => Some(keywords::required::compile),
                "type" => Some(keywords::type_::compile),
                "uniqueItems" => Some(keywords::unique_items::compile),
                _ => None,
            },
        }
    }
}

/// Get the `Draft` from a JSON Schema URL.
pub fn draft_from_url(url: &str) -> Option<Draft> {
    match url.trim_end_matches('#') {
        "http://json-schema.org/draft-07/schema" => Some(Draft::Draft7),
        "http://json-schema.org/draft-06/schema" => Some(Draft::Draft6),
        "http://json-schema.org/draft-04/schema" => Some(Draft::Draft4),
        _ => None,
    }
}

/// Get the `Draft` from a JSON Schema.
pub fn draft_from_schema(schema: &Value) -> Option<Draft> {
    schema
        .as_object()
        .and_then(|x| x.get("$schema"))
        .and_then(Value::as_str)
        .and_then(draft_from_url)
}

pub(crate) fn id_of(draft: Draft, schema: &Value) -> Option<&str> {
    if let Value::Object(object) = schema {
        if draft == Draft::Draft4 {
            object.get("id")
        } else {
            object.get("$id")
        }
        .and_then(Value::as_str)
    } else {
        None
    }
}
