//! Conversion rules between value types.
//!
//! A curve produces values of its native type; a consumer may ask for another
//! type. Supported conversions (`from -> to`):
//! - any type -> itself
//! - boolean -> number (1.0 / 0.0)
//! - number -> boolean (non-zero is true)
//! - number -> vector2/3/4 (broadcast to every component)
//! - number, boolean -> string (display form)
//!
//! Everything else is rejected with [`ConversionError`].

use thiserror::Error;

use crate::{Value, ValueType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("cannot convert {from} into {to}")]
    Unsupported { from: ValueType, to: ValueType },
    #[error("value of type {actual} passed where {declared} was declared")]
    WrongSourceType {
        declared: ValueType,
        actual: ValueType,
    },
}

/// Whether a value of type `from` can be converted into `to`.
pub fn is_convertible(from: ValueType, to: ValueType) -> bool {
    if from == to {
        return true;
    }
    match (from, to) {
        (ValueType::Boolean, ValueType::Number) => true,
        (ValueType::Number, ValueType::Boolean) => true,
        (ValueType::Number, ValueType::String) | (ValueType::Boolean, ValueType::String) => true,
        (ValueType::Number, t) => t.dimension().is_some(),
        _ => false,
    }
}

/// Convert `value` of type `from` into type `to`.
pub fn convert(from: ValueType, to: ValueType, value: &Value) -> Result<Value, ConversionError> {
    if value.value_type() != from {
        return Err(ConversionError::WrongSourceType {
            declared: from,
            actual: value.value_type(),
        });
    }
    if from == to {
        return Ok(value.clone());
    }
    let unsupported = || ConversionError::Unsupported { from, to };
    match (value, to) {
        (Value::Boolean(b), ValueType::Number) => Ok(Value::Number(bool_to_number(*b))),
        (Value::Boolean(b), ValueType::String) => Ok(Value::String(b.to_string())),
        (Value::Number(v), ValueType::Boolean) => Ok(Value::Boolean(*v != 0.0)),
        (Value::Number(v), ValueType::String) => Ok(Value::String(v.to_string())),
        (Value::Number(v), t) => t
            .dimension()
            .and_then(|dim| Value::from_components(t, &vec![*v; dim]))
            .ok_or_else(unsupported),
        _ => Err(unsupported()),
    }
}

#[inline]
fn bool_to_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_always_convertible() {
        for ty in ValueType::all() {
            assert!(ty.is_convertible(ty));
            let v = ty.default_value();
            assert_eq!(ty.convert_value(ty, &v), Ok(v));
        }
    }

    #[test]
    fn number_boolean_round_trip() {
        assert_eq!(
            ValueType::Number.convert_value(ValueType::Boolean, &Value::Boolean(true)),
            Ok(Value::Number(1.0))
        );
        assert_eq!(
            ValueType::Boolean.convert_value(ValueType::Number, &Value::Number(0.0)),
            Ok(Value::Boolean(false))
        );
        assert_eq!(
            ValueType::Boolean.convert_value(ValueType::Number, &Value::Number(-2.5)),
            Ok(Value::Boolean(true))
        );
    }

    #[test]
    fn number_broadcasts_into_vectors() {
        assert!(ValueType::Vector3.is_convertible(ValueType::Number));
        assert_eq!(
            ValueType::Vector3.convert_value(ValueType::Number, &Value::Number(2.0)),
            Ok(Value::vec3(2.0, 2.0, 2.0))
        );
    }

    #[test]
    fn vectors_do_not_narrow_to_numbers() {
        assert!(!ValueType::Number.is_convertible(ValueType::Vector3));
        assert_eq!(
            ValueType::Number.convert_value(ValueType::Vector3, &Value::vec3(1.0, 2.0, 3.0)),
            Err(ConversionError::Unsupported {
                from: ValueType::Vector3,
                to: ValueType::Number,
            })
        );
        assert!(!ValueType::Matrix.is_convertible(ValueType::Number));
    }

    #[test]
    fn every_claimed_conversion_produces_the_target_type() {
        for from in ValueType::all() {
            for to in ValueType::all() {
                if to.is_convertible(from) {
                    let out = to.convert_value(from, &from.default_value()).unwrap();
                    assert_eq!(out.value_type(), to, "{from} -> {to}");
                }
            }
        }
    }

    #[test]
    fn mismatched_source_value_is_rejected() {
        assert_eq!(
            ValueType::Number.convert_value(ValueType::Boolean, &Value::Number(1.0)),
            Err(ConversionError::WrongSourceType {
                declared: ValueType::Boolean,
                actual: ValueType::Number,
            })
        );
    }
}
