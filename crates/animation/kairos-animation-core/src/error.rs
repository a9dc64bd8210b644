//! Error types for curve evaluation and parameter binding.

use kairos_api_core::{ConversionError, ValueType};

/// Convenience result type used across the animation core.
pub type Result<T> = std::result::Result<T, AnimationError>;

/// Every precondition violation the animation core reports.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimationError {
    /// A curve was asked to represent a type it cannot produce.
    #[error("unsupported type: {type_name}")]
    UnsupportedType { type_name: String },

    /// None of a parameter's declared types is supported by the curve.
    #[error("type mismatch binding '{parameter}': curve supports none of {declared:?}")]
    TypeMismatch {
        parameter: String,
        declared: Vec<ValueType>,
    },

    /// Bind on a parameter id that was never registered.
    #[error("unknown parameter: {id}")]
    UnknownParameter { id: String },

    /// A parameter id was registered twice.
    #[error("parameter already registered: {id}")]
    DuplicateParameter { id: String },

    /// Empty interval passed where a non-empty one is required, or reversed bounds.
    #[error("invalid interval: {interval}")]
    InvalidInterval { interval: String },

    /// NaN cannot be ordered and is not a valid time.
    #[error("invalid time value: {time}")]
    InvalidTime { time: f64 },

    /// Keyframe list violates the curve's requirements.
    #[error("invalid key frames: {reason}")]
    InvalidKeyFrames { reason: String },

    /// A composite curve was given children it cannot combine.
    #[error("invalid composition: {reason}")]
    InvalidComposition { reason: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl AnimationError {
    pub(crate) fn unsupported_type(ty: ValueType) -> Self {
        Self::UnsupportedType {
            type_name: ty.name().to_string(),
        }
    }

    pub(crate) fn invalid_key_frames(reason: impl Into<String>) -> Self {
        Self::InvalidKeyFrames {
            reason: reason.into(),
        }
    }
}
