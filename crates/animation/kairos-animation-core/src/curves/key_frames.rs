//! Keyframe storage shared by the linear and step curves.

use kairos_api_core::{Value, ValueType};
use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::time::Time;

/// One `(time, value)` anchor of a keyframe curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame {
    pub time: Time,
    pub value: Value,
}

impl KeyFrame {
    pub fn new(time: Time, value: Value) -> Self {
        Self { time, value }
    }
}

impl<V: Into<Value>> From<(f64, V)> for KeyFrame {
    fn from((time, value): (f64, V)) -> Self {
        Self::new(Time::from_number(time), value.into())
    }
}

/// At least two keyframes of one type, strictly increasing in time.
#[derive(Clone, Debug)]
pub(crate) struct KeyFrameTable {
    frames: Vec<KeyFrame>,
}

impl KeyFrameTable {
    pub(crate) fn new(ty: ValueType, frames: Vec<KeyFrame>) -> Result<Self> {
        if frames.len() < 2 {
            return Err(AnimationError::invalid_key_frames(format!(
                "need at least 2 key frames, got {}",
                frames.len()
            )));
        }
        if let Some(bad) = frames.iter().find(|k| k.value.value_type() != ty) {
            return Err(AnimationError::invalid_key_frames(format!(
                "key frame at {} holds a {} value, curve type is {ty}",
                bad.time,
                bad.value.value_type()
            )));
        }
        if let Some(pair) = frames.windows(2).find(|w| w[0].time >= w[1].time) {
            return Err(AnimationError::invalid_key_frames(format!(
                "key frame times must strictly increase ({} then {})",
                pair[0].time, pair[1].time
            )));
        }
        Ok(Self { frames })
    }

    /// Two keys at `0` and `1` holding the type's default value.
    pub(crate) fn with_defaults(ty: ValueType) -> Self {
        Self {
            frames: vec![
                KeyFrame::new(Time::ZERO, ty.default_value()),
                KeyFrame::new(Time::from_number(1.0), ty.default_value()),
            ],
        }
    }

    #[inline]
    pub(crate) fn frames(&self) -> &[KeyFrame] {
        &self.frames
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    /// Index of the first key strictly after `time`: `0` before the first
    /// key, `len()` at or after the last one.
    #[inline]
    pub(crate) fn find_key_frame_index(&self, time: Time) -> usize {
        self.frames.partition_point(|k| k.time <= time)
    }

    /// Replace the value of key `index`, keeping its time.
    pub(crate) fn set_value(&mut self, ty: ValueType, index: usize, value: Value) -> Result<()> {
        if value.value_type() != ty {
            return Err(AnimationError::invalid_key_frames(format!(
                "cannot store a {} value in a {ty} curve",
                value.value_type()
            )));
        }
        let len = self.frames.len();
        let slot = self.frames.get_mut(index).ok_or_else(|| {
            AnimationError::invalid_key_frames(format!(
                "key frame index {index} out of range ({len} keys)"
            ))
        })?;
        slot.value = value;
        Ok(())
    }
}
