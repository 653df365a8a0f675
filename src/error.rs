//! Error types.
//!
//! Two disjoint failure kinds exist: [`CompilationError`] for malformed schemas
//! (definition time) and [`ValidationError`] for values that do not conform
//! (validation time). The core never logs and never returns partial results.
use crate::paths::JSONPointer;
use crate::primitive_type::{kind_of, PrimitiveType, PrimitiveTypesBitMap};
use crate::special_fields::{display_value, render_path, SpecialFieldsExtractor};
use once_cell::sync::OnceCell;
use serde_json::{Number, Value};
use std::fmt::{Error, Formatter};
use std::sync::Arc;
use std::{error, fmt};

/// The error type that happens when the input schema is not valid.
///
/// Not recoverable per sub-schema; the whole compilation fails.
#[derive(Debug, PartialEq)]
pub enum CompilationError {
    /// Invalid schema structure.
    SchemaError,
    /// A `$ref` that cannot be resolved at compile time.
    InvalidReference(String),
}

impl error::Error for CompilationError {}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            CompilationError::SchemaError => write!(f, "Schema compilation error"),
            CompilationError::InvalidReference(reference) => {
                write!(f, "Invalid reference: {}", reference)
            }
        }
    }
}

impl From<regex::Error> for CompilationError {
    #[inline]
    fn from(_: regex::Error) -> Self {
        CompilationError::SchemaError
    }
}
impl From<url::ParseError> for CompilationError {
    #[inline]
    fn from(_: url::ParseError) -> Self {
        CompilationError::SchemaError
    }
}

/// An error that can occur during validation.
///
/// Carries the offending value, the structural path from the root, the violated rule
/// with its rule-specific payload, and the schema subtree the value failed against.
/// The human-readable path is rendered lazily and cached, so errors that are caught and
/// discarded (e.g. inside `anyOf`) never pay for rendering.
pub struct ValidationError {
    pub(crate) kind: ValidationErrorKind,
    pub(crate) instance: Value,
    pub(crate) path: JSONPointer,
    pub(crate) definition: Arc<Value>,
    root: Option<Value>,
    special_fields: Option<Arc<dyn SpecialFieldsExtractor>>,
    rendered: OnceCell<String>,
}

/// Kinds of errors that may happen during validation, with their rule-specific payloads.
#[derive(Debug)]
pub enum ValidationErrorKind {
    /// The input array contains more items than the positional `items` schemas allow.
    AdditionalItems {
        /// Number of positional schemas.
        limit: usize,
    },
    /// No `anyOf` branch was consistent with the object's discriminator fields.
    BadDiscriminators,
    /// The input value doesn't match the expected constant.
    Constant {
        /// The only accepted value.
        expected_value: Value,
    },
    /// The input array doesn't contain items conforming to the `contains` schema.
    Contains,
    /// A property requires other properties to be present.
    Dependencies {
        /// The property that triggered the dependency.
        property: String,
        /// Properties that must accompany it but are absent.
        missing: Vec<String>,
    },
    /// The input value doesn't match any of the specified options.
    Enum {
        /// Accepted values.
        options: Value,
    },
    /// Value is too large (draft-06+ numeric form).
    ExclusiveMaximum {
        /// The open upper bound.
        limit: Number,
    },
    /// Value is too small (draft-06+ numeric form).
    ExclusiveMinimum {
        /// The open lower bound.
        limit: Number,
    },
    /// Everything is invalid for a `false` schema.
    FalseSchema,
    /// The input doesn't conform to a registered format.
    Format {
        /// Format name.
        format: String,
    },
    /// Value is too large.
    Maximum {
        /// The upper bound.
        limit: Number,
        /// Whether the bound itself is excluded (boolean `exclusiveMaximum` sibling).
        exclusive: bool,
    },
    /// Too many items in an array.
    MaxItems {
        /// Maximum number of items.
        limit: u64,
    },
    /// String is too long.
    MaxLength {
        /// Maximum number of code points.
        limit: u64,
    },
    /// Too many properties in an object.
    MaxProperties {
        /// Maximum number of properties.
        limit: u64,
    },
    /// Value is too small.
    Minimum {
        /// The lower bound.
        limit: Number,
        /// Whether the bound itself is excluded (boolean `exclusiveMinimum` sibling).
        exclusive: bool,
    },
    /// Too few items in an array.
    MinItems {
        /// Minimum number of items.
        limit: u64,
    },
    /// String is too short.
    MinLength {
        /// Minimum number of code points.
        limit: u64,
    },
    /// Not enough properties in an object.
    MinProperties {
        /// Minimum number of properties.
        limit: u64,
    },
    /// The number is not a multiple of the divisor.
    MultipleOf {
        /// The divisor.
        multiple_of: Number,
    },
    /// Negated schema matched.
    Not,
    /// The value was valid under zero or several `oneOf` branches.
    OneOf,
    /// The string doesn't match the pattern.
    Pattern {
        /// The source pattern text.
        pattern: String,
    },
    /// An object key failed the `propertyNames` schema.
    PropertyNames {
        /// The offending key.
        property: String,
    },
    /// The fused `required`/`additionalProperties` check failed.
    RequiredAdditionalProperties {
        /// Required properties absent from the object, in declaration order.
        missing: Vec<String>,
        /// Present properties that are not allowed, in key order.
        extra: Vec<String>,
    },
    /// The value doesn't match the required type(s).
    Type {
        /// Expected type or set of types.
        kind: TypeKind,
    },
    /// The input array has non-unique elements.
    UniqueItems,
    /// No `anyOf` branch accepted the object's tag fields.
    UnknownTags,
}

/// Expected type payload of a `type` failure.
#[derive(Debug)]
pub enum TypeKind {
    /// A single expected type.
    Single(PrimitiveType),
    /// A set of expected types.
    Multiple(PrimitiveTypesBitMap),
}

/// Shortcuts for creation of specific error kinds.
impl ValidationError {
    fn new(kind: ValidationErrorKind, instance: &Value, path: JSONPointer, definition: Arc<Value>) -> ValidationError {
        ValidationError {
            kind,
            instance: instance.clone(),
            path,
            definition,
            root: None,
            special_fields: None,
            rendered: OnceCell::new(),
        }
    }

    pub(crate) fn additional_items(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: usize,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::AdditionalItems { limit }, instance, path, definition)
    }
    pub(crate) fn bad_discriminators(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::BadDiscriminators, instance, path, definition)
    }
    pub(crate) fn constant(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        expected_value: &Value,
    ) -> ValidationError {
        ValidationError::new(
            ValidationErrorKind::Constant {
                expected_value: expected_value.clone(),
            },
            instance,
            path,
            definition,
        )
    }
    pub(crate) fn contains(path: JSONPointer, instance: &Value, definition: Arc<Value>) -> ValidationError {
        ValidationError::new(ValidationErrorKind::Contains, instance, path, definition)
    }
    pub(crate) fn dependencies(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        property: &str,
        missing: Vec<String>,
    ) -> ValidationError {
        ValidationError::new(
            ValidationErrorKind::Dependencies {
                property: property.to_string(),
                missing,
            },
            instance,
            path,
            definition,
        )
    }
    pub(crate) fn enumeration(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        options: &Value,
    ) -> ValidationError {
        ValidationError::new(
            ValidationErrorKind::Enum {
                options: options.clone(),
            },
            instance,
            path,
            definition,
        )
    }
    pub(crate) fn exclusive_maximum(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: Number,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::ExclusiveMaximum { limit }, instance, path, definition)
    }
    pub(crate) fn exclusive_minimum(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: Number,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::ExclusiveMinimum { limit }, instance, path, definition)
    }
    pub(crate) fn false_schema(path: JSONPointer, instance: &Value, definition: Arc<Value>) -> ValidationError {
        ValidationError::new(ValidationErrorKind::FalseSchema, instance, path, definition)
    }
    pub(crate) fn format(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        format: &str,
    ) -> ValidationError {
        ValidationError::new(
            ValidationErrorKind::Format {
                format: format.to_string(),
            },
            instance,
            path,
            definition,
        )
    }
    pub(crate) fn maximum(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: Number,
        exclusive: bool,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::Maximum { limit, exclusive }, instance, path, definition)
    }
    pub(crate) fn max_items(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: u64,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::MaxItems { limit }, instance, path, definition)
    }
    pub(crate) fn max_length(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: u64,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::MaxLength { limit }, instance, path, definition)
    }
    pub(crate) fn max_properties(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: u64,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::MaxProperties { limit }, instance, path, definition)
    }
    pub(crate) fn minimum(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: Number,
        exclusive: bool,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::Minimum { limit, exclusive }, instance, path, definition)
    }
    pub(crate) fn min_items(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: u64,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::MinItems { limit }, instance, path, definition)
    }
    pub(crate) fn min_length(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: u64,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::MinLength { limit }, instance, path, definition)
    }
    pub(crate) fn min_properties(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        limit: u64,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::MinProperties { limit }, instance, path, definition)
    }
    pub(crate) fn multiple_of(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        multiple_of: Number,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::MultipleOf { multiple_of }, instance, path, definition)
    }
    pub(crate) fn not(path: JSONPointer, instance: &Value, definition: Arc<Value>) -> ValidationError {
        ValidationError::new(ValidationErrorKind::Not, instance, path, definition)
    }
    pub(crate) fn one_of(path: JSONPointer, instance: &Value, definition: Arc<Value>) -> ValidationError {
        ValidationError::new(ValidationErrorKind::OneOf, instance, path, definition)
    }
    pub(crate) fn pattern(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        pattern: String,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::Pattern { pattern }, instance, path, definition)
    }
    pub(crate) fn property_names(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        property: String,
    ) -> ValidationError {
        ValidationError::new(ValidationErrorKind::PropertyNames { property }, instance, path, definition)
    }
    pub(crate) fn required_additional_properties(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        missing: Vec<String>,
        extra: Vec<String>,
    ) -> ValidationError {
        ValidationError::new(
            ValidationErrorKind::RequiredAdditionalProperties { missing, extra },
            instance,
            path,
            definition,
        )
    }
    pub(crate) fn single_type_error(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        type_name: PrimitiveType,
    ) -> ValidationError {
        ValidationError::new(
            ValidationErrorKind::Type {
                kind: TypeKind::Single(type_name),
            },
            instance,
            path,
            definition,
        )
    }
    pub(crate) fn multiple_type_error(
        path: JSONPointer,
        instance: &Value,
        definition: Arc<Value>,
        types: PrimitiveTypesBitMap,
    ) -> ValidationError {
        ValidationError::new(
            ValidationErrorKind::Type {
                kind: TypeKind::Multiple(types),
            },
            instance,
            path,
            definition,
        )
    }
    pub(crate) fn unique_items(path: JSONPointer, instance: &Value, definition: Arc<Value>) -> ValidationError {
        ValidationError::new(ValidationErrorKind::UniqueItems, instance, path, definition)
    }
    pub(crate) fn unknown_tags(path: JSONPointer, instance: &Value, definition: Arc<Value>) -> ValidationError {
        ValidationError::new(ValidationErrorKind::UnknownTags, instance, path, definition)
    }

    /// Attach the context needed for path rendering. Called once, at the validation
    /// boundary, on the error that is about to escape to the caller.
    pub(crate) fn with_context(
        mut self,
        root_path: JSONPointer,
        root: Option<Value>,
        special_fields: Option<Arc<dyn SpecialFieldsExtractor>>,
    ) -> ValidationError {
        if !root_path.is_empty() {
            self.path = root_path.extend(&self.path);
        }
        self.root = root;
        self.special_fields = special_fields;
        self
    }
}

impl ValidationError {
    /// The rule-specific payload.
    #[must_use]
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }

    /// The offending value.
    #[must_use]
    pub fn instance(&self) -> &Value {
        &self.instance
    }

    /// Structural path from the root value to the offending value. Empty means the root.
    #[must_use]
    pub fn path(&self) -> &JSONPointer {
        &self.path
    }

    /// The schema subtree the value failed against.
    #[must_use]
    pub fn definition(&self) -> &Value {
        &self.definition
    }

    /// Name of the violated rule. Always set.
    #[must_use]
    pub fn rule(&self) -> &'static str {
        match &self.kind {
            ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
            ValidationErrorKind::BadDiscriminators => "badDiscriminators",
            ValidationErrorKind::Constant { .. } => "const",
            ValidationErrorKind::Contains => "contains",
            ValidationErrorKind::Dependencies { .. } => "dependencies",
            ValidationErrorKind::Enum { .. } => "enum",
            ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
            ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
            ValidationErrorKind::FalseSchema => "false",
            ValidationErrorKind::Format { .. } => "format",
            ValidationErrorKind::Maximum { .. } => "maximum",
            ValidationErrorKind::MaxItems { .. } => "maxItems",
            ValidationErrorKind::MaxLength { .. } => "maxLength",
            ValidationErrorKind::MaxProperties { .. } => "maxProperties",
            ValidationErrorKind::Minimum { .. } => "minimum",
            ValidationErrorKind::MinItems { .. } => "minItems",
            ValidationErrorKind::MinLength { .. } => "minLength",
            ValidationErrorKind::MinProperties { .. } => "minProperties",
            ValidationErrorKind::MultipleOf { .. } => "multipleOf",
            ValidationErrorKind::Not => "not",
            ValidationErrorKind::OneOf => "oneOf",
            ValidationErrorKind::Pattern { .. } => "pattern",
            ValidationErrorKind::PropertyNames { .. } => "propertyNames",
            ValidationErrorKind::RequiredAdditionalProperties { .. } => "required-additionalProperties",
            ValidationErrorKind::Type { .. } => "type",
            ValidationErrorKind::UniqueItems => "uniqueItems",
            ValidationErrorKind::UnknownTags => "unknownTags",
        }
    }

    /// The value of the violated rule inside [`definition`](Self::definition), when the
    /// definition carries it under the rule name.
    #[must_use]
    pub fn rule_definition(&self) -> Option<&Value> {
        self.definition.get(self.rule())
    }

    /// Required properties reported missing by the fused check. Empty for other rules.
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        match &self.kind {
            ValidationErrorKind::RequiredAdditionalProperties { missing, .. } => missing,
            _ => &[],
        }
    }

    /// Disallowed properties reported by the fused check. Empty for other rules.
    #[must_use]
    pub fn extra_fields(&self) -> &[String] {
        match &self.kind {
            ValidationErrorKind::RequiredAdditionalProperties { extra, .. } => extra,
            _ => &[],
        }
    }

    /// Human-readable information about what is wrong, without the path prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            ValidationErrorKind::AdditionalItems { .. } => "must contain only specified items".to_string(),
            ValidationErrorKind::BadDiscriminators => "discriminator fields not recognized".to_string(),
            ValidationErrorKind::Constant { expected_value } => format!(
                "must be const {} but is: {}",
                display_value(expected_value),
                display_value(&self.instance)
            ),
            ValidationErrorKind::Contains => "must contain one of contains definition".to_string(),
            ValidationErrorKind::Dependencies { missing, .. } => {
                format!("must contain {} properties", bracketed(missing))
            }
            ValidationErrorKind::Enum { options } => format!("must be one of {}", options),
            ValidationErrorKind::ExclusiveMaximum { limit } => format!("must be smaller than {}", limit),
            ValidationErrorKind::ExclusiveMinimum { limit } => format!("must be bigger than {}", limit),
            ValidationErrorKind::FalseSchema => "must not be there".to_string(),
            ValidationErrorKind::Format { format } => format!("must be {}", format),
            ValidationErrorKind::Maximum { limit, exclusive } => {
                if *exclusive {
                    format!("must be smaller than {}", limit)
                } else {
                    format!("must be smaller than or equal to {}", limit)
                }
            }
            ValidationErrorKind::MaxItems { limit } => {
                format!("must contain less than or equal to {} items", limit)
            }
            ValidationErrorKind::MaxLength { limit } => {
                format!("must be shorter than or equal to {} characters", limit)
            }
            ValidationErrorKind::MaxProperties { limit } => {
                format!("must contain less than or equal to {} properties", limit)
            }
            ValidationErrorKind::Minimum { limit, exclusive } => {
                if *exclusive {
                    format!("must be bigger than {}", limit)
                } else {
                    format!("must be bigger than or equal to {}", limit)
                }
            }
            ValidationErrorKind::MinItems { limit } => format!("must contain at least {} items", limit),
            ValidationErrorKind::MinLength { limit } => {
                format!("must be longer than or equal to {} characters", limit)
            }
            ValidationErrorKind::MinProperties { limit } => {
                format!("must contain at least {} properties", limit)
            }
            ValidationErrorKind::MultipleOf { multiple_of } => format!("must be multiple of {}", multiple_of),
            ValidationErrorKind::Not => "must not be valid by not definition".to_string(),
            ValidationErrorKind::OneOf => "must be valid exactly by one of oneOf definition".to_string(),
            ValidationErrorKind::Pattern { pattern } => format!("must match pattern {}", pattern),
            ValidationErrorKind::PropertyNames { .. } => "must be named by propertyName definition".to_string(),
            ValidationErrorKind::RequiredAdditionalProperties { .. } => "missing/extra properties".to_string(),
            ValidationErrorKind::Type { kind } => {
                let expected = match kind {
                    TypeKind::Single(type_) => type_.to_string(),
                    TypeKind::Multiple(types) => types
                        .into_iter()
                        .map(|type_| type_.to_string())
                        .collect::<Vec<String>>()
                        .join(" or "),
                };
                format!("must be {}, but is a: {}", expected, kind_of(&self.instance))
            }
            ValidationErrorKind::UniqueItems => "must contain unique items".to_string(),
            ValidationErrorKind::UnknownTags => "tag fields not recognized".to_string(),
        }
    }

    /// The rendered, human-oriented form of [`path`](Self::path). Computed on first use
    /// and cached.
    pub fn rendered_path(&self) -> &str {
        self.rendered.get_or_init(|| {
            render_path(self.root.as_ref(), &self.path, self.special_fields.as_deref())
        })
    }
}

fn bracketed(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| format!("[{}]", field))
        .collect::<Vec<String>>()
        .join(", ")
}

impl error::Error for ValidationError {}

/// Textual representation of various validation errors.
impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let ValidationErrorKind::RequiredAdditionalProperties { missing, extra } = &self.kind {
            f.write_str(self.rendered_path())?;
            if !missing.is_empty() {
                write!(f, " is missing required properties: {}", bracketed(missing))?;
            }
            if !missing.is_empty() && !extra.is_empty() {
                f.write_str(";")?;
            }
            if !extra.is_empty() {
                write!(f, " additional properties are not allowed: {}", bracketed(extra))?;
            }
            Ok(())
        } else {
            write!(f, "{} {}", self.rendered_path(), self.message())
        }
    }
}

impl fmt::Debug for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::RequiredAdditionalProperties { missing, extra } => write!(
                f,
                "ValidationError({}, {}, {}, missing={:?}, extra={:?})",
                self.message(),
                self.rule(),
                self.path,
                missing,
                extra
            ),
            _ => write!(f, "ValidationError({}, {}, {})", self.message(), self.rule(), self.path),
        }
    }
}
