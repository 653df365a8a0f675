use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Number, Value};
use std::{fmt, sync::Arc};

pub(crate) struct MultipleOfIntegerValidator {
    multiple_of: f64,
    original: Number,
    definition: Arc<Value>,
}

impl MultipleOfIntegerValidator {
    #[inline]
    pub(crate) fn compile(original: Number, context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(MultipleOfIntegerValidator {
            multiple_of: original.as_f64().expect("Always representable"),
            original,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for MultipleOfIntegerValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Number(item) = &*instance {
            let value = item.as_f64().expect("Always representable");
            let valid = value.fract() == 0. && (value % self.multiple_of) == 0.;
            if !valid {
                return Err(ValidationError::multiple_of(
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

impl fmt::Display for MultipleOfIntegerValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "multipleOf: {}", self.original)
    }
}

/// Validator for non-integral divisors.
///
/// Both operands are scaled by 10^d, where d is the number of decimal digits of the
/// divisor, so `0.0075` is recognized as a multiple of `0.0001` despite neither having
/// an exact binary representation. The scaled value must itself land on an integer
/// (within representation noise) and divide evenly.
pub(crate) struct MultipleOfFloatValidator {
    scale: f64,
    scaled_multiple: f64,
    original: Number,
    definition: Arc<Value>,
}

impl MultipleOfFloatValidator {
    #[inline]
    pub(crate) fn compile(original: Number, context: &CompilationContext<'_>) -> CompilationResult {
        let multiple_of = original.as_f64().expect("Always representable");
        let scale = 10f64.powi(decimal_places(multiple_of));
        Ok(Box::new(MultipleOfFloatValidator {
            scale,
            scaled_multiple: (multiple_of * scale).round(),
            original,
            definition: Arc::clone(&context.definition),
        }))
    }

    fn is_multiple(&self, value: f64) -> bool {
        let scaled = value * self.scale;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-9 * scaled.abs().max(1.0) {
            // more decimal places than the divisor itself
            return false;
        }
        (rounded % self.scaled_multiple) == 0.
    }
}

impl Validate for MultipleOfFloatValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Number(item) = &*instance {
            let value = item.as_f64().expect("Always representable");
            if !self.is_multiple(value) {
                return Err(ValidationError::multiple_of(
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

impl fmt::Display for MultipleOfFloatValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "multipleOf: {}", self.original)
    }
}

/// Number of digits after the decimal point in the shortest representation of `value`.
fn decimal_places(value: f64) -> i32 {
    let repr = format!("{}", value);
    match repr.split_once('.') {
        Some((_, decimals)) => decimals.len() as i32,
        None => 0,
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    if let Value::Number(multiple_of) = schema {
        if multiple_of.is_u64() || multiple_of.is_i64() {
            Some(MultipleOfIntegerValidator::compile(multiple_of.clone(), context))
        } else {
            Some(MultipleOfFloatValidator::compile(multiple_of.clone(), context))
        }
    } else {
        Some(Err(CompilationError::SchemaError))
    }
}
