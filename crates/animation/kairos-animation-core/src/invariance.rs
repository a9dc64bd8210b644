//! Invariance: the spans of time over which a curve's value is constant.
//!
//! Stored as disjoint proper intervals keyed by their lower bound. Two
//! disjoint proper intervals never share a lower bound, so the key is unique.
//! Lookups walk the ordered map from the predecessor of the query's lower
//! bound, which keeps every operation logarithmic in the number of stored
//! intervals plus the number of intervals it touches.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included};

use crate::interval::{Interval, UNIVERSAL};
use crate::time::{Time, MIN_TIME};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invariance {
    imap: BTreeMap<Time, Interval>,
}

impl Invariance {
    pub fn new() -> Self {
        Self::default()
    }

    /// The invariance of a curve that never changes.
    pub fn universal() -> Self {
        let mut inv = Self::new();
        inv.imap.insert(MIN_TIME, UNIVERSAL);
        inv
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.imap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.imap.is_empty()
    }

    /// Stored intervals in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> + '_ {
        self.imap.values()
    }

    /// Copy of the stored intervals in ascending order.
    pub fn intervals(&self) -> Vec<Interval> {
        self.imap.values().copied().collect()
    }

    /// Paint `interval` as one constant span. Whatever was stored where it
    /// lands is cut away first, so later writes take precedence.
    pub fn write(&mut self, interval: Interval) -> &mut Self {
        self.remove(interval);
        if interval.is_proper() {
            self.imap.insert(interval.lower(), interval);
        }
        self
    }

    /// Cut `interval` out of every stored span it touches. Pieces that are no
    /// longer proper are dropped.
    pub fn remove(&mut self, interval: Interval) -> &mut Self {
        for key in self.overlapping_keys(&interval) {
            let Some(stored) = self.imap.remove(&key) else {
                continue;
            };
            for piece in stored.get_difference(&interval) {
                if piece.is_proper() {
                    self.imap.insert(piece.lower(), piece);
                }
            }
        }
        self
    }

    /// Stored intervals that intersect `interval`, not clipped to it.
    pub fn get_narrowed(&self, interval: Interval) -> Invariance {
        let imap = self
            .overlapping_keys(&interval)
            .into_iter()
            .filter_map(|key| self.imap.get(&key).map(|iv| (key, *iv)))
            .collect();
        Invariance { imap }
    }

    /// Spans constant in every input at once: the common refinement of all
    /// inputs, starting from `UNIVERSAL`. No input yields `{UNIVERSAL}`.
    pub fn merge<'a>(invariances: impl IntoIterator<Item = &'a Invariance>) -> Invariance {
        let mut acc = Invariance::universal();
        for inv in invariances {
            let mut next = Invariance::new();
            for span in acc.imap.values() {
                for key in inv.overlapping_keys(span) {
                    let Some(other) = inv.imap.get(&key) else {
                        continue;
                    };
                    let common = span.get_intersection(other);
                    if common.is_proper() {
                        next.imap.insert(common.lower(), common);
                    }
                }
            }
            acc = next;
        }
        acc
    }

    /// The stored interval containing `time`, if any.
    pub fn find(&self, time: Time) -> Option<Interval> {
        self.imap
            .range(..=time)
            .rev()
            .take_while(|(_, iv)| iv.upper() >= time)
            .map(|(_, iv)| *iv)
            .find(|iv| iv.includes_time(time))
    }

    /// Grow `interval` so each end lying strictly inside a stored span reaches
    /// that span's own bound. An end exactly on a span's boundary is kept.
    pub fn expand_interval_by_alignment(&self, interval: Interval) -> Interval {
        if interval.is_empty() {
            return interval;
        }
        let keys = self.overlapping_keys(&interval);
        let (Some(first), Some(last)) = (
            keys.first().and_then(|k| self.imap.get(k)),
            keys.last().and_then(|k| self.imap.get(k)),
        ) else {
            return interval;
        };

        let (lower, l_open) =
            if first.lower() < interval.lower() && interval.lower() < first.upper() {
                (first.lower(), first.l_open())
            } else {
                (interval.lower(), interval.l_open())
            };
        let (upper, u_open) =
            if last.lower() < interval.upper() && interval.upper() < last.upper() {
                (last.upper(), last.u_open())
            } else {
                (interval.upper(), interval.u_open())
            };
        Interval::new(lower, upper, l_open, u_open)
    }

    /// Replace what is known over `range` with `sub`, the invariance of the
    /// same curve computed over `range` after its definition changed.
    ///
    /// Spans of `sub` reaching past `range` overwrite the stale pieces they
    /// cover, so the result matches a full recomputation as long as the
    /// stored spans outside `range` are still valid.
    pub fn modify(&mut self, range: Interval, sub: &Invariance) -> &mut Self {
        self.remove(range);
        for key in sub.overlapping_keys(&range) {
            if let Some(iv) = sub.imap.get(&key) {
                self.write(*iv);
            }
        }
        self
    }

    /// Keys of the stored intervals intersecting `interval`, ascending.
    fn overlapping_keys(&self, interval: &Interval) -> Vec<Time> {
        if interval.is_empty() {
            return Vec::new();
        }
        let lower = interval.lower();
        let upper = interval.upper();

        // At most two spans start at or before `lower` and still reach it:
        // one ending exactly at `lower` and the one starting there.
        let mut keys: Vec<Time> = self
            .imap
            .range(..=lower)
            .rev()
            .take_while(|(_, iv)| iv.upper() >= lower)
            .filter(|(_, iv)| iv.has_intersection(interval))
            .map(|(k, _)| *k)
            .collect();
        keys.reverse();

        keys.extend(
            self.imap
                .range((Excluded(lower), Included(upper)))
                .filter(|(_, iv)| iv.has_intersection(interval))
                .map(|(k, _)| *k),
        );
        keys
    }
}

impl FromIterator<Interval> for Invariance {
    /// Write each interval in turn.
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        let mut inv = Invariance::new();
        for iv in iter {
            inv.write(iv);
        }
        inv
    }
}
