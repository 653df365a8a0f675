//! # richschema
//!
//! A crate for performing fast JSON Schema validation with rich, path-aware diagnostics.
//! Schemas are compiled once into a validation tree; validation consumes a value and
//! either returns it back — with `default`s merged into objects — or fails with a single
//! diagnostic that pinpoints where and why validation failed:
//!
//! ```rust
//! use richschema::JSONSchema;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string"}}
//! });
//! let compiled = JSONSchema::compile(&schema).expect("A valid schema");
//! let error = compiled.validate(json!({"name": 42})).unwrap_err();
//! assert_eq!(error.to_string(), "data.name must be string, but is a: int");
//! ```
//!
//! Documents that encode tagged or discriminated unions through `anyOf` can supply a
//! [`SpecialFieldsExtractor`]; rendered paths then annotate every traversed object with
//! its tag/discriminator fields (`data.items[2]<kind=one>.value`), and aggregate `anyOf`
//! failures are arbitrated down to the branch consistent with those fields.
//!
//! Supports JSON Schema drafts 4, 6 and 7 (the common subset; draft detection via
//! `$schema`, defaulting to draft 4). Format validators and out-of-document `$ref`
//! resolution are pluggable through [`CompilationOptions`].
#![warn(
    clippy::cast_possible_truncation,
    clippy::doc_markdown,
    clippy::explicit_iter_loop,
    clippy::map_unwrap_or,
    clippy::match_same_arms,
    clippy::needless_borrow,
    clippy::needless_pass_by_value,
    clippy::print_stdout,
    clippy::redundant_closure,
    clippy::trivially_copy_pass_by_ref,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    variant_size_differences
)]
#![allow(clippy::upper_case_acronyms)]
mod compilation;
mod error;
mod keywords;
mod paths;
mod primitive_type;
mod resolver;
mod schemas;
mod special_fields;
mod validator;

pub use compilation::{options::CompilationOptions, JSONSchema};
pub use error::{CompilationError, TypeKind, ValidationError, ValidationErrorKind};
pub use paths::{JSONPointer, PathChunk};
pub use primitive_type::{PrimitiveType, PrimitiveTypesBitMap};
pub use resolver::{SchemaResolver, SchemaResolverError};
pub use schemas::{draft_from_schema, draft_from_url, Draft};
pub use special_fields::{SpecialFields, SpecialFieldsExtractor};
pub use validator::ValidationOptions;

use serde_json::Value;

/// A shortcut for validating `instance` against `schema`. Draft version is detected
/// automatically.
/// ```rust
/// use richschema::is_valid;
/// use serde_json::json;
///
/// let schema = json!({"maxLength": 5});
/// let instance = json!("foo");
/// assert!(is_valid(&schema, &instance));
/// ```
///
/// This function panics if an invalid schema is passed.
#[must_use]
#[inline]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    let compiled = JSONSchema::compile(schema).expect("Invalid schema");
    compiled.is_valid(instance)
}
