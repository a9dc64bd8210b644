//! Interpolation helpers:
//! - linear_value (component-wise blend of numeric values)

use kairos_api_core::Value;

/// Linear interpolation of scalars as `a*(1-r) + b*r`; exact at both ends.
#[inline]
pub fn lerp_f64(a: f64, b: f64, r: f64) -> f64 {
    a * (1.0 - r) + b * r
}

/// Component-wise interpolation between two numeric values of the same type.
///
/// Returns `None` when either value is not numeric or the types differ.
pub fn linear_value(a: &Value, b: &Value, r: f64) -> Option<Value> {
    if a.value_type() != b.value_type() {
        return None;
    }
    let (ca, cb) = (a.components()?, b.components()?);
    let out: Vec<f64> = ca
        .iter()
        .zip(cb.iter())
        .map(|(x, y)| lerp_f64(*x, *y, r))
        .collect();
    Value::from_components(a.value_type(), &out)
}
