//! JSON primitive types and the runtime kind names used in diagnostics.
use serde_json::Value;
use std::{convert::TryFrom, fmt, ops::BitOrAssign};

/// For faster error handling in "type" keyword validator we have this enum, to match
/// with it instead of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Array => write!(f, "array"),
            PrimitiveType::Boolean => write!(f, "boolean"),
            PrimitiveType::Integer => write!(f, "integer"),
            PrimitiveType::Null => write!(f, "null"),
            PrimitiveType::Number => write!(f, "number"),
            PrimitiveType::Object => write!(f, "object"),
            PrimitiveType::String => write!(f, "string"),
        }
    }
}

impl TryFrom<&str> for PrimitiveType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "array" => Ok(PrimitiveType::Array),
            "boolean" => Ok(PrimitiveType::Boolean),
            "integer" => Ok(PrimitiveType::Integer),
            "null" => Ok(PrimitiveType::Null),
            "number" => Ok(PrimitiveType::Number),
            "object" => Ok(PrimitiveType::Object),
            "string" => Ok(PrimitiveType::String),
            _ => Err(()),
        }
    }
}

const fn primitive_type_to_bit_map_representation(primitive_type: PrimitiveType) -> u8 {
    match primitive_type {
        PrimitiveType::Array => 1,
        PrimitiveType::Boolean => 2,
        PrimitiveType::Integer => 4,
        PrimitiveType::Null => 8,
        PrimitiveType::Number => 16,
        PrimitiveType::Object => 32,
        PrimitiveType::String => 64,
    }
}

/// Compact representation of a set of primitive types with stable iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimitiveTypesBitMap {
    inner: u8,
}

impl PrimitiveTypesBitMap {
    pub(crate) const fn new() -> Self {
        Self { inner: 0 }
    }

    #[must_use]
    pub(crate) const fn add_type(mut self, primitive_type: PrimitiveType) -> Self {
        self.inner |= primitive_type_to_bit_map_representation(primitive_type);
        self
    }

    pub(crate) const fn contains_type(self, primitive_type: PrimitiveType) -> bool {
        primitive_type_to_bit_map_representation(primitive_type) & self.inner != 0
    }
}

impl BitOrAssign<PrimitiveType> for PrimitiveTypesBitMap {
    fn bitor_assign(&mut self, rhs: PrimitiveType) {
        *self = self.add_type(rhs);
    }
}

impl IntoIterator for PrimitiveTypesBitMap {
    type Item = PrimitiveType;
    type IntoIter = PrimitiveTypesBitMapIterator;

    fn into_iter(self) -> Self::IntoIter {
        PrimitiveTypesBitMapIterator { bit_map: self, idx: 0 }
    }
}

const ITERATION_ORDER: [PrimitiveType; 7] = [
    PrimitiveType::Array,
    PrimitiveType::Boolean,
    PrimitiveType::Integer,
    PrimitiveType::Null,
    PrimitiveType::Number,
    PrimitiveType::Object,
    PrimitiveType::String,
];

#[derive(Debug)]
pub struct PrimitiveTypesBitMapIterator {
    bit_map: PrimitiveTypesBitMap,
    idx: usize,
}

impl Iterator for PrimitiveTypesBitMapIterator {
    type Item = PrimitiveType;

    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < ITERATION_ORDER.len() {
            let current = ITERATION_ORDER[self.idx];
            self.idx += 1;
            if self.bit_map.contains_type(current) {
                return Some(current);
            }
        }
        None
    }
}

/// The runtime kind name of a value, as it appears in "must be X, but is a: Y" messages.
/// Integral JSON numbers are `int`, everything else with a fractional representation is
/// `float`.
pub(crate) fn kind_of(instance: &Value) -> &'static str {
    match instance {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(number) => {
            if number.is_u64() || number.is_i64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
