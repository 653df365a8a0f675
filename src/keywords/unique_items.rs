use crate::{
    compilation::{context::CompilationContext, JSONSchema},
    error::ValidationError,
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{Validate, ValidationContext, ValidationResult},
};
use ahash::{AHashSet, AHasher};
use serde_json::{Map, Value};
use std::hash::{Hash, Hasher};
use std::{fmt, sync::Arc};

// Based on implementation proposed by Sven Marnach:
// https://stackoverflow.com/questions/60882381/what-is-the-fastest-correct-way-to-detect-that-there-are-no-duplicates-in-a-json
#[derive(PartialEq)]
pub(crate) struct HashedValue<'a>(&'a Value);

impl Eq for HashedValue<'_> {}

impl Hash for HashedValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.0 {
            Value::Null => state.write_u32(3_221_225_473), // chosen randomly
            Value::Bool(ref item) => item.hash(state),
            Value::Number(ref item) => {
                if let Some(number) = item.as_u64() {
                    number.hash(state);
                } else if let Some(number) = item.as_i64() {
                    number.hash(state);
                } else if let Some(number) = item.as_f64() {
                    number.to_bits().hash(state)
                }
            }
            Value::String(ref item) => item.hash(state),
            Value::Array(ref items) => {
                for item in items {
                    HashedValue(item).hash(state);
                }
            }
            Value::Object(ref items) => {
                let mut hash = 0;
                for (key, value) in items {
                    // We have no way of building a new hasher of type `H`, so we
                    // hardcode using the default hasher of a hash map.
                    let mut item_hasher = AHasher::default();
                    key.hash(&mut item_hasher);
                    HashedValue(value).hash(&mut item_hasher);
                    hash ^= item_hasher.finish();
                }
                state.write_u64(hash);
            }
        }
    }
}

#[inline]
pub(crate) fn is_unique(items: &[Value]) -> bool {
    let mut seen = AHashSet::with_capacity(items.len());
    items.iter().map(HashedValue).all(move |x| seen.insert(x))
}

pub(crate) struct UniqueItemsValidator {
    definition: Arc<Value>,
}

impl UniqueItemsValidator {
    #[inline]
    pub(crate) fn compile(context: &CompilationContext<'_>) -> CompilationResult {
        Ok(Box::new(UniqueItemsValidator {
            definition: Arc::clone(&context.definition),
        }))
    }
}

impl Validate for UniqueItemsValidator {
    fn validate(
        &self,
        _: &JSONSchema,
        instance: &mut Value,
        instance_path: &InstancePath<'_>,
        _: &ValidationContext<'_>,
    ) -> ValidationResult {
        if let Value::Array(items) = &*instance {
            if !is_unique(items) {
                return Err(ValidationError::unique_items(
                    instance_path.into(),
                    instance,
                    Arc::clone(&self.definition),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for UniqueItemsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("uniqueItems: true")
    }
}

#[inline]
pub(crate) fn compile(
    _: &Map<String, Value>,
    schema: &Value,
    context: &CompilationContext<'_>,
) -> Option<CompilationResult> {
    if let Value::Bool(value) = schema {
        if *value {
            Some(UniqueItemsValidator::compile(context))
        } else {
            None
        }
    } else {
        None
    }
}
