use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::{CompilationError, ValidationError},
    keywords::CompilationResult,
    paths::InstancePath,
    primitive_type::{PrimitiveType, PrimitiveTypesBitMap},
    validator::{Validate, ValidationContext, ValidationResult},
};
use serde_json::{Map, Value};
use std::{convert::TryFrom, fmt, sync::Arc};

pub(crate) struct MultipleTypesValidator {
    types: PrimitiveTypesBitMap,
    definition: Arc<Value>,
}

impl MultipleTypesValidator {
    #[inline]
    pub(crate) fn compile(items: &[Value], context: &CompilationContext<'_>) -> CompilationResult {
        let mut types = PrimitiveTypesBitMap::new();
        for item in items {
            match item {
                Value::String(string) => {
                    if let Ok(primitive_type) = PrimitiveType::try_from(string.as_str()) {
                        types |= primitive_type;
                    } else {
                        return Err(CompilationError::SchemaError);
                    }
                }
                _ => return Err(CompilationError::SchemaError),
            }
        }
        Ok(Box::new(MultipleTypesValidator {
            types,
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for MultipleTypesValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        let valid = match &*instance {
            Value::Array(_) => self.types.contains_type(PrimitiveType::Array),
            Value::Bool(_) => self.types.contains_type(PrimitiveType::Boolean),
            Value::Null => self.types.contains_type(PrimitiveType::Null),
            Value::Number(number) => {
                self.types.contains_type(PrimitiveType::Number)
                    || (self.types.contains_type(PrimitiveType::Integer)
                        && (number.is_u64() || number.is_i64()))
            }
            Value::Object(_) => self.types.contains_type(PrimitiveType::Object),
            Value::String(_) => self.types.contains_type(PrimitiveType::String),
        };
        if valid {
            Ok(())
        } else {
            Err(ValidationError::multiple_type_error(
                instance_path.into(),
                instance,
                Arc::clone(&self.definition),
                self.types,
            ))
        }
    }
}

impl fmt::Display for MultipleTypesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type: [{}]",
            self.types
                .into_iter()
                .map(|type_| format!("{}", type_))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

macro_rules! single_type_validator {
    ($validator:ident, $primitive_type:expr, $name:literal, $matches:pat) => {
        pub(crate) struct $validator {
            definition: Arc<Value>,
        }

        impl $validator {
            #[inline]
            pub(crate) fn compile(context: &CompilationContext<'_>) -> CompilationResult {
                Ok(Box::new($validator {
                    definition: Arc::clone(&context.definition),
                }))
            }
        }

        impl Validate for $validator {
            fn validate(
                &self,
                _: &JSONSchema,
                instance: &mut Value,
                instance_path: &InstancePath<'_>,
                _: &ValidationContext<'_>,
            ) -> ValidationResult {
                if matches!(&*instance, $matches) {
                    Ok(())
                } else {
                    Err(ValidationError::single_type_error(
                        instance_path.into(),
                        instance,
                        Arc::clone(&self.definition),
                        $primitive_type,
                    ))
                }
            }
        }

        impl fmt::Display for $validator {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!("type: ", $name))
            }
        }
    };
}

single_type_validator!(ArrayTypeValidator, PrimitiveType::Array, "array", Value::Array(_));
single_type_validator!(BooleanTypeValidator, PrimitiveType::Boolean, "boolean", Value::Bool(_));
single_type_validator!(NullTypeValidator, PrimitiveType::Null, "null", Value::Null);
single_type_validator!(NumberTypeValidator, PrimitiveType::Number, "number", Value::Number(_));
single_type_validator!(ObjectTypeValidator, PrimitiveType::Object, "object", Value::Object(_));
single_type_validator!(StringTypeValidator, PrimitiveType::String, "string", Value::String(_));

pub(crate) struct IntegerTypeValidator {
    definition: Arc<Value>,
}

impl IntegerTypeValidator {
    #[inline]
    pub(crate) fn compile(context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(IntegerTypeValidator {
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for IntegerTypeValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        // Mathematical integers only: `1.0` carries a fractional representation and is
        // rejected, booleans are not numbers.
        let valid = match &*instance {
            Value::Number(number) => number.is_u64() || number.is_i64(),
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(ValidationError::single_type_error(
                instance_path.into(),
                instance,
                Arc::clone(&self.definition),
                PrimitiveType::Integer,
            ))
        }
    }
}

impl fmt::Display for IntegerTypeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("type: integer")
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    match schema {
        Value::String(item) => compile_single_type(item.as_str(), context),
        Value::Array(items) => {
            if items.len() == 1 {
                if let Some(Value::String(item)) = items.iter().next() {
                    compile_single_type(item.as_str(), context)
                } else {
                    Some(Err(CompilationError::SchemaError))
                }
            } else {
                Some(MultipleTypesValidator::compile(items, context))
            }
        }
        _ => Some(Err(CompilationError::SchemaError)),
    }
}

fn compile_single_type(item: &str, context: &CompilationContext<'_>) -> Option<CompilationResult> {
    match PrimitiveType::try_from(item) {
        Ok(PrimitiveType::Array) => Some(ArrayTypeValidator::compile(context)),
        Ok(PrimitiveType::Boolean) => Some(BooleanTypeValidator::compile(context)),
        Ok(PrimitiveType::Integer) => Some(IntegerTypeValidator::compile(context)),
        Ok(PrimitiveType::Null) => Some(NullTypeValidator::compile(context)),
        Ok(PrimitiveType::Number) => Some(NumberTypeValidator::compile(context)),
        Ok(PrimitiveType::Object) => Some(ObjectTypeValidator::compile(context)),
        Ok(PrimitiveType::String) => Some(StringTypeValidator::compile(context)),
        Err(()) => Some(Err(CompilationError::SchemaError)),
    }
}
