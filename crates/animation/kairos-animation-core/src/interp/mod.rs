//! Interpolation helpers shared by the keyframe curves.

pub mod functions;

pub use functions::{lerp_f64, linear_value};
