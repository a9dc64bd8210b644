//! Value: runtime instances of a [`ValueType`].
//! All numeric payloads use f64 so keyframe arithmetic keeps full precision.

use serde::{Deserialize, Serialize};

use crate::ValueType;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Boolean (step only)
    Boolean(bool),

    /// Scalar number
    Number(f64),

    /// Text; step only
    String(String),

    /// 2D vector
    Vector2([f64; 2]),

    /// 3D vector
    Vector3([f64; 3]),

    /// 4D vector
    Vector4([f64; 4]),

    /// 4x4 matrix, column-major
    Matrix([f64; 16]),
}

impl Value {
    /// Return the type this value is an instance of.
    #[inline]
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Boolean(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Vector2(_) => ValueType::Vector2,
            Value::Vector3(_) => ValueType::Vector3,
            Value::Vector4(_) => ValueType::Vector4,
            Value::Matrix(_) => ValueType::Matrix,
        }
    }

    /// Numeric components of number, vector and matrix values.
    ///
    /// Returns `None` for boolean and string values, which have no
    /// component-wise arithmetic.
    pub fn components(&self) -> Option<&[f64]> {
        match self {
            Value::Number(v) => Some(std::slice::from_ref(v)),
            Value::Vector2(a) => Some(&a[..]),
            Value::Vector3(a) => Some(&a[..]),
            Value::Vector4(a) => Some(&a[..]),
            Value::Matrix(a) => Some(&a[..]),
            Value::Boolean(_) | Value::String(_) => None,
        }
    }

    /// Build a numeric value of type `ty` from its components.
    ///
    /// Returns `None` when `ty` is not numeric or the component count does not
    /// match the type.
    pub fn from_components(ty: ValueType, comps: &[f64]) -> Option<Value> {
        match (ty, comps.len()) {
            (ValueType::Number, 1) => Some(Value::Number(comps[0])),
            (ValueType::Vector2, 2) => Some(Value::Vector2([comps[0], comps[1]])),
            (ValueType::Vector3, 3) => Some(Value::Vector3([comps[0], comps[1], comps[2]])),
            (ValueType::Vector4, 4) => Some(Value::Vector4([
                comps[0], comps[1], comps[2], comps[3],
            ])),
            (ValueType::Matrix, 16) => {
                let mut m = [0.0; 16];
                m.copy_from_slice(comps);
                Some(Value::Matrix(m))
            }
            _ => None,
        }
    }

    /// Scalar payload of a number value.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convenience constructors
    pub fn number(v: f64) -> Self {
        Value::Number(v)
    }

    pub fn vec2(x: f64, y: f64) -> Self {
        Value::Vector2([x, y])
    }

    pub fn vec3(x: f64, y: f64, z: f64) -> Self {
        Value::Vector3([x, y, z])
    }

    pub fn vec4(x: f64, y: f64, z: f64, w: f64) -> Self {
        Value::Vector4([x, y, z, w])
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
