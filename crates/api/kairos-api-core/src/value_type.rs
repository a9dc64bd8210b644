//! Value types: one immutable descriptor per kind of animatable value.
//!
//! Each variant acts as a process-wide singleton keyed by its name
//! (`"number"`, `"vector3"`, ...). Types carry a default value and know which
//! other types they can convert from; see [`crate::coercion`] for the rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coercion::{self, ConversionError};
use crate::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Boolean,
    Number,
    String,
    Vector2,
    Vector3,
    Vector4,
    /// 4x4 matrix
    Matrix,
}

const ALL: [ValueType; 7] = [
    ValueType::Boolean,
    ValueType::Number,
    ValueType::String,
    ValueType::Vector2,
    ValueType::Vector3,
    ValueType::Vector4,
    ValueType::Matrix,
];

impl ValueType {
    /// Registry name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Vector2 => "vector2",
            ValueType::Vector3 => "vector3",
            ValueType::Vector4 => "vector4",
            ValueType::Matrix => "matrix",
        }
    }

    /// Look a type up by its registry name.
    pub fn find(name: &str) -> Option<ValueType> {
        ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Every registered type, in declaration order.
    pub fn all() -> impl Iterator<Item = ValueType> {
        ALL.into_iter()
    }

    /// The vector type with `dim` components (2, 3 or 4).
    pub fn vector(dim: usize) -> Option<ValueType> {
        match dim {
            2 => Some(ValueType::Vector2),
            3 => Some(ValueType::Vector3),
            4 => Some(ValueType::Vector4),
            _ => None,
        }
    }

    /// Number of components for vector types, `None` otherwise.
    pub const fn dimension(self) -> Option<usize> {
        match self {
            ValueType::Vector2 => Some(2),
            ValueType::Vector3 => Some(3),
            ValueType::Vector4 => Some(4),
            _ => None,
        }
    }

    /// Whether values of this type support component-wise arithmetic.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, ValueType::Boolean | ValueType::String)
    }

    pub fn default_value(self) -> Value {
        match self {
            ValueType::Boolean => Value::Boolean(false),
            ValueType::Number => Value::Number(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::Vector2 => Value::Vector2([0.0; 2]),
            ValueType::Vector3 => Value::Vector3([0.0; 3]),
            ValueType::Vector4 => Value::Vector4([0.0; 4]),
            ValueType::Matrix => {
                let mut m = [0.0; 16];
                for i in 0..4 {
                    m[i * 5] = 1.0;
                }
                Value::Matrix(m)
            }
        }
    }

    /// Whether a value of type `from` can be converted into this type.
    #[inline]
    pub fn is_convertible(self, from: ValueType) -> bool {
        coercion::is_convertible(from, self)
    }

    /// Convert `value` (of type `from`) into a value of this type.
    pub fn convert_value(self, from: ValueType, value: &Value) -> Result<Value, ConversionError> {
        coercion::convert(from, self, value)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
