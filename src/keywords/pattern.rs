use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use ahash::AHashMap;
use parking_lot::RwLock;
use regex::Regex;
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};

lazy_static::lazy_static! {
    // Pattern texts repeat a lot across real schemas (and across `pattern` /
    // `patternProperties` / the fused allowed-keys check), so compiled programs are
    // shared process-wide. The pool only ever grows, and only during compilation.
    static ref COMPILED_PATTERNS: RwLock<AHashMap<String, Regex>> = RwLock::new(AHashMap::new());
}

/// Fetch the compiled program for `pattern`, translating, compiling and caching it on
/// first sight.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, CompilationError> {
    if let Some(compiled) = COMPILED_PATTERNS.read().get(pattern) {
        return Ok(compiled.clone());
    }
    let compiled = Regex::new(&translate_ecma_escapes(pattern))?;
    COMPILED_PATTERNS
        .write()
        .insert(pattern.to_string(), compiled.clone());
    Ok(compiled)
}

/// Schema patterns follow ECMA 262, which disagrees with the `regex` crate on a few
/// escapes: `\d`/`\w`/`\s` and their negations are ASCII-only there, and `\cX` control
/// escapes do not exist here at all. One pass over the text rewrites those; anything
/// the translation does not recognize is left for the engine to accept or reject.
fn translate_ecma_escapes(pattern: &str) -> String {
    let mut translated = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(current) = chars.next() {
        if current != '\\' {
            translated.push(current);
            continue;
        }
        match chars.next() {
            Some('d') => translated.push_str("[0-9]"),
            Some('D') => translated.push_str("[^0-9]"),
            Some('w') => translated.push_str("[A-Za-z0-9_]"),
            Some('W') => translated.push_str("[^A-Za-z0-9_]"),
            Some('s') => translated.push_str(ECMA_WHITESPACE),
            Some('S') => translated.push_str(ECMA_NON_WHITESPACE),
            Some('c') => match chars.next() {
                // `\cJ` is control-J, i.e. the letter's position in the alphabet
                Some(letter) if letter.is_ascii_alphabetic() => {
                    translated.push((letter.to_ascii_uppercase() as u8 - b'A' + 1) as char)
                }
                next => {
                    translated.push_str("\\c");
                    if let Some(next) = next {
                        translated.push(next);
                    }
                }
            },
            Some(other) => {
                translated.push('\\');
                translated.push(other);
            }
            // a trailing backslash is an incomplete escape; the engine will reject it
            None => translated.push('\\'),
        }
    }
    translated
}

const ECMA_WHITESPACE: &str = "[ \t\n\r\u{000b}\u{000c}\u{00a0}\u{2003}\u{2029}\u{feff}]";
const ECMA_NON_WHITESPACE: &str = "[^ \t\n\r\u{000b}\u{000c}\u{00a0}\u{2003}\u{2029}\u{feff}]";

pub(crate) struct PatternValidator {
    original: String,
    pattern: Regex,
    definition: Arc<Value>,
}

impl PatternValidator {
    #[inline]
    pub(crate) fn compile(pattern: &str, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(PatternValidator {
            original: pattern.to_string(),
            pattern: compile_pattern(pattern)?,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for PatternValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::String(item) = &*instance {
            // the pattern is not anchored: a match anywhere in the string counts
            if !self.pattern.is_match(item) {
                return Err(ValidationError::pattern(
                    instance_path.into(),
                    instance,
                    Arc::clone(&self.definition),
                    self.original.clone(),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for PatternValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pattern: {}", self.original)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    match schema {
        Value::String(item) => Some(PatternValidator::compile(item, context)),
        _ => Some(Err(CompilationError::SchemaError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_util;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(r"^\d+$", "2024", true)]
    #[test_case(r"^\d+$", "٢٠٢٤", false; "digits are ascii only")]
    #[test_case(r"^\w+$", "snake_case", true)]
    #[test_case(r"^\w+$", "käse", false; "word chars are ascii only")]
    #[test_case(r"^\W$", "_", false)]
    #[test_case(r"\s", "a b", true)]
    #[test_case(r"^\S+$", "a b", false)]
    #[test_case(r"\cJ", "line\nbreak", true; "control escapes translate")]
    #[test_case(r"\\d", r"\d", true; "escaped backslash stays literal")]
    #[test_case(r"a\.b", "a.b", true)]
    #[test_case(r"a\.b", "axb", false)]
    fn ecma_escape_translation(pattern: &str, text: &str, is_matching: bool) {
        let compiled = compile_pattern(pattern).expect("A valid pattern");
        assert_eq!(compiled.is_match(text), is_matching);
    }

    #[test_case(r"\")]
    #[test_case(r"[unclosed")]
    #[test_case(r"a{2,1}")]
    fn invalid_patterns(pattern: &str) {
        assert!(compile_pattern(pattern).is_err());
    }

    #[test]
    fn match_is_not_anchored() {
        tests_util::is_valid(&json!({"pattern": "a+"}), &json!("xxaxx"));
        tests_util::is_not_valid(&json!({"pattern": "^a+$"}), &json!("xxaxx"));
    }

    #[test]
    fn compiled_patterns_are_pooled() {
        let _ = compile_pattern("po+led").unwrap();
        assert!(COMPILED_PATTERNS.read().contains_key("po+led"));
    }
}
