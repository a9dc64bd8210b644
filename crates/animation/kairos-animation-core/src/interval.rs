//! Time intervals with independently open or closed ends.
//!
//! An interval is in exactly one of three states:
//! - **Empty**: `lower > upper`, or `lower == upper` with an open end
//! - **Single**: `lower == upper`, both ends closed
//! - **Proper**: `lower < upper`
//!
//! All operations return new values; an `Interval` is never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::time::{Time, MAX_TIME, MIN_TIME};

#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Interval {
    lower: Time,
    upper: Time,
    l_open: bool,
    u_open: bool,
}

/// `[MIN_TIME, MAX_TIME]`
pub const UNIVERSAL: Interval = Interval {
    lower: MIN_TIME,
    upper: MAX_TIME,
    l_open: false,
    u_open: false,
};

impl Interval {
    pub const UNIVERSAL: Interval = UNIVERSAL;

    /// Canonical empty interval `(0, 0)`.
    pub const EMPTY: Interval = Interval {
        lower: Time::ZERO,
        upper: Time::ZERO,
        l_open: true,
        u_open: true,
    };

    /// Build an interval from its bounds. Any combination is accepted; reversed
    /// bounds simply yield an Empty interval.
    #[inline]
    pub const fn new(lower: Time, upper: Time, l_open: bool, u_open: bool) -> Self {
        Self {
            lower,
            upper,
            l_open,
            u_open,
        }
    }

    /// Like [`Interval::new`] but rejects reversed bounds (`lower > upper`).
    pub fn try_new(lower: Time, upper: Time, l_open: bool, u_open: bool) -> Result<Self> {
        if lower > upper {
            return Err(AnimationError::InvalidInterval {
                interval: format!("lower bound {lower} above upper bound {upper}"),
            });
        }
        Ok(Self::new(lower, upper, l_open, u_open))
    }

    /// `[lower, upper]`
    #[inline]
    pub const fn closed(lower: Time, upper: Time) -> Self {
        Self::new(lower, upper, false, false)
    }

    /// `(lower, upper)`
    #[inline]
    pub const fn open(lower: Time, upper: Time) -> Self {
        Self::new(lower, upper, true, true)
    }

    /// `[time, time]`
    #[inline]
    pub const fn single(time: Time) -> Self {
        Self::new(time, time, false, false)
    }

    #[inline]
    pub fn lower(&self) -> Time {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> Time {
        self.upper
    }

    #[inline]
    pub fn l_open(&self) -> bool {
        self.l_open
    }

    #[inline]
    pub fn u_open(&self) -> bool {
        self.u_open
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower > self.upper || (self.lower == self.upper && (self.l_open || self.u_open))
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        self.lower == self.upper && !self.l_open && !self.u_open
    }

    #[inline]
    pub fn is_proper(&self) -> bool {
        self.lower < self.upper
    }

    #[inline]
    pub fn is_universal(&self) -> bool {
        *self == UNIVERSAL
    }

    /// Whether `time` lies inside the interval, honoring open ends.
    pub fn includes_time(&self, time: Time) -> bool {
        let above = if self.l_open {
            self.lower < time
        } else {
            self.lower <= time
        };
        let below = if self.u_open {
            time < self.upper
        } else {
            time <= self.upper
        };
        above && below
    }

    /// Whether every instant of `other` lies inside `self`.
    pub fn includes(&self, other: &Interval) -> bool {
        if other.is_empty() {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        let lower_ok = self.lower < other.lower
            || (self.lower == other.lower && (!self.l_open || other.l_open));
        let upper_ok = other.upper < self.upper
            || (self.upper == other.upper && (!self.u_open || other.u_open));
        lower_ok && upper_ok
    }

    #[inline]
    pub fn has_intersection(&self, other: &Interval) -> bool {
        !self.get_intersection(other).is_empty()
    }

    /// Common part of both intervals. On equal bounds the open flag wins.
    pub fn get_intersection(&self, other: &Interval) -> Interval {
        let (lower, l_open) = match self.lower.cmp(&other.lower) {
            std::cmp::Ordering::Greater => (self.lower, self.l_open),
            std::cmp::Ordering::Less => (other.lower, other.l_open),
            std::cmp::Ordering::Equal => (self.lower, self.l_open || other.l_open),
        };
        let (upper, u_open) = match self.upper.cmp(&other.upper) {
            std::cmp::Ordering::Less => (self.upper, self.u_open),
            std::cmp::Ordering::Greater => (other.upper, other.u_open),
            std::cmp::Ordering::Equal => (self.upper, self.u_open || other.u_open),
        };
        Interval::new(lower, upper, l_open, u_open)
    }

    /// Parts of `self` not covered by `other`, in ascending order.
    ///
    /// Yields 0 pieces when `other` covers `self`, 1 when it is disjoint or
    /// clips one side, 2 when it sits strictly inside. Empty pieces are dropped;
    /// a piece may be Single when `other` stops exactly one instant short.
    pub fn get_difference(&self, other: &Interval) -> Vec<Interval> {
        if self.is_empty() {
            return Vec::new();
        }
        let cut = self.get_intersection(other);
        if cut.is_empty() {
            return vec![*self];
        }
        let left = Interval::new(self.lower, cut.lower, self.l_open, !cut.l_open);
        let right = Interval::new(cut.upper, self.upper, !cut.u_open, self.u_open);
        [left, right]
            .into_iter()
            .filter(|piece| !piece.is_empty())
            .collect()
    }

    /// Every instant before the interval: from `MIN_TIME` up to `lower`, with
    /// the touching end open exactly when `lower` is closed.
    #[inline]
    pub fn get_precedings(&self) -> Interval {
        Interval::new(MIN_TIME, self.lower, false, !self.l_open)
    }

    /// Every instant after the interval: from `upper` to `MAX_TIME`, with the
    /// touching end open exactly when `upper` is closed.
    #[inline]
    pub fn get_followings(&self) -> Interval {
        Interval::new(self.upper, MAX_TIME, !self.u_open, false)
    }
}

/// Boundary-aware equality: all empty intervals are equal to each other,
/// otherwise bounds and open flags must match.
impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => true,
            (false, false) => {
                self.lower == other.lower
                    && self.upper == other.upper
                    && self.l_open == other.l_open
                    && self.u_open == other.u_open
            }
            _ => false,
        }
    }
}

impl Eq for Interval {}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        write!(
            f,
            "{}{:?}, {:?}{}",
            if self.l_open { '(' } else { '[' },
            self.lower,
            self.upper,
            if self.u_open { ')' } else { ']' }
        )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
