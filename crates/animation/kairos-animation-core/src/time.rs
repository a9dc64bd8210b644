//! Time values for curve evaluation.
//!
//! A [`Time`] wraps an `f64` and is totally ordered. Infinite inputs saturate to
//! the sentinels [`MIN_TIME`] / [`MAX_TIME`], which bound every interval.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};

/// An instant on the animation time line.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Time(f64);

/// Smallest representable time.
pub const MIN_TIME: Time = Time(-f64::MAX);

/// Largest representable time.
pub const MAX_TIME: Time = Time(f64::MAX);

impl Time {
    pub const ZERO: Time = Time(0.0);

    /// Create a time from a number.
    ///
    /// `-0.0` is folded into `0.0` and infinities saturate to the sentinels.
    /// The number must not be NaN; use [`Time::try_from_number`] for unchecked input.
    #[inline]
    pub fn from_number(value: f64) -> Self {
        debug_assert!(!value.is_nan(), "time must not be NaN");
        Self(value.clamp(-f64::MAX, f64::MAX) + 0.0)
    }

    /// Checked variant of [`Time::from_number`].
    #[inline]
    pub fn try_from_number(value: f64) -> Result<Self> {
        if value.is_nan() {
            return Err(AnimationError::InvalidTime { time: value });
        }
        Ok(Self::from_number(value))
    }

    #[inline]
    pub fn to_number(self) -> f64 {
        self.0
    }

    /// Shift by `delta`, saturating at the sentinels.
    #[inline]
    pub fn offset(self, delta: f64) -> Self {
        Self::from_number(self.0 + delta)
    }

    #[inline]
    pub fn is_min(self) -> bool {
        self == MIN_TIME
    }

    #[inline]
    pub fn is_max(self) -> bool {
        self == MAX_TIME
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Time {}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_min() {
            f.write_str("MIN_TIME")
        } else if self.is_max() {
            f.write_str("MAX_TIME")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl TryFrom<f64> for Time {
    type Error = AnimationError;

    fn try_from(value: f64) -> Result<Self> {
        Self::try_from_number(value)
    }
}

impl From<Time> for f64 {
    fn from(time: Time) -> Self {
        time.0
    }
}
