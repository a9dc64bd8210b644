//! Keyframe curve with linear interpolation between keys.
//!
//! Before the first key and after the last one the value is clamped to the
//! nearest key, so those two half-lines are the only constant spans.

use std::cell::RefCell;

use kairos_api_core::{Value, ValueType};

use crate::curve::{check_query, convert_native, supports_from_native, Curve, ValueChangeListeners};
use crate::curves::key_frames::{KeyFrame, KeyFrameTable};
use crate::error::{AnimationError, Result};
use crate::interp::linear_value;
use crate::interval::Interval;
use crate::invariance::Invariance;
use crate::time::{Time, MAX_TIME, MIN_TIME};

#[derive(Debug)]
pub struct KFLinearCurve {
    ty: ValueType,
    table: RefCell<KeyFrameTable>,
    listeners: ValueChangeListeners,
}

impl KFLinearCurve {
    /// Curve of type `ty` with keys at `0` and `1` holding the default value.
    /// Only numeric types (number, vectors, matrix) can be interpolated.
    pub fn new(ty: ValueType) -> Result<Self> {
        check_numeric(ty)?;
        Ok(Self::from_table(ty, KeyFrameTable::with_defaults(ty)))
    }

    pub fn with_key_frames(ty: ValueType, key_frames: Vec<KeyFrame>) -> Result<Self> {
        check_numeric(ty)?;
        let table = KeyFrameTable::new(ty, key_frames)?;
        Ok(Self::from_table(ty, table))
    }

    fn from_table(ty: ValueType, table: KeyFrameTable) -> Self {
        Self {
            ty,
            table: RefCell::new(table),
            listeners: ValueChangeListeners::new(),
        }
    }

    #[inline]
    pub fn value_type(&self) -> ValueType {
        self.ty
    }

    pub fn key_frames(&self) -> Vec<KeyFrame> {
        self.table.borrow().frames().to_vec()
    }

    /// Replace every key and notify listeners over all time.
    pub fn set_key_frames(&self, key_frames: Vec<KeyFrame>) -> Result<()> {
        let table = KeyFrameTable::new(self.ty, key_frames)?;
        *self.table.borrow_mut() = table;
        self.notify_value_change(Interval::UNIVERSAL);
        Ok(())
    }

    /// Change the value of key `index`. Listeners hear about the open span
    /// between its neighbours (or the half-line beyond an end key).
    pub fn set_key_frame_value(&self, index: usize, value: Value) -> Result<()> {
        let changed = {
            let mut table = self.table.borrow_mut();
            table.set_value(self.ty, index, value)?;
            let frames = table.frames();
            let last = frames.len() - 1;
            let lower = if index == 0 { MIN_TIME } else { frames[index - 1].time };
            let upper = if index == last { MAX_TIME } else { frames[index + 1].time };
            Interval::new(lower, upper, index > 0, index < last)
        };
        self.notify_value_change(changed);
        Ok(())
    }

    fn native_value(&self, time: Time) -> Result<Value> {
        let table = self.table.borrow();
        let frames = table.frames();
        let index = table.find_key_frame_index(time);
        if index == 0 {
            return Ok(frames[0].value.clone());
        }
        if index == table.len() {
            return Ok(frames[index - 1].value.clone());
        }
        let (k0, k1) = (&frames[index - 1], &frames[index]);
        let t0 = k0.time.to_number();
        let r = (time.to_number() - t0) / (k1.time.to_number() - t0);
        linear_value(&k0.value, &k1.value, r)
            .ok_or_else(|| AnimationError::unsupported_type(self.ty))
    }
}

fn check_numeric(ty: ValueType) -> Result<()> {
    if ty.is_numeric() {
        Ok(())
    } else {
        Err(AnimationError::unsupported_type(ty))
    }
}

impl Curve for KFLinearCurve {
    fn is_type_supported(&self, ty: ValueType) -> bool {
        supports_from_native(self.ty, ty)
    }

    fn value(&self, time: Time, ty: ValueType) -> Result<Value> {
        if !self.is_type_supported(ty) {
            return Err(AnimationError::unsupported_type(ty));
        }
        convert_native(self.ty, self.native_value(time)?, ty)
    }

    fn invariance(&self, interval: Interval) -> Result<Invariance> {
        check_query(&interval)?;
        let table = self.table.borrow();
        let frames = table.frames();
        let first = frames[0].time;
        let last = frames[frames.len() - 1].time;
        let full: Invariance = [
            Interval::closed(MIN_TIME, first),
            Interval::closed(last, MAX_TIME),
        ]
        .into_iter()
        .collect();
        Ok(full.get_narrowed(interval))
    }

    fn listeners(&self) -> &ValueChangeListeners {
        &self.listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_cannot_be_interpolated() {
        assert!(matches!(
            KFLinearCurve::new(ValueType::String),
            Err(AnimationError::UnsupportedType { .. })
        ));
        assert!(KFLinearCurve::new(ValueType::Boolean).is_err());
        assert!(KFLinearCurve::new(ValueType::Matrix).is_ok());
    }

    #[test]
    fn default_keys_hold_default_value() {
        let c = KFLinearCurve::new(ValueType::Vector2).unwrap();
        assert_eq!(
            c.value(Time::from_number(0.5), ValueType::Vector2).unwrap(),
            Value::vec2(0.0, 0.0)
        );
        assert_eq!(c.key_frames().len(), 2);
    }

    #[test]
    fn changed_span_of_interior_key_is_open() {
        use std::cell::Cell;
        use std::rc::Rc;

        let c = KFLinearCurve::with_key_frames(
            ValueType::Number,
            vec![(0.0, 0.0).into(), (1.0, 1.0).into(), (2.0, 0.0).into()],
        )
        .unwrap();
        let seen = Rc::new(Cell::new(Interval::EMPTY));
        let s = Rc::clone(&seen);
        c.add_value_change_listener(Rc::new(move |iv| s.set(iv)));

        c.set_key_frame_value(1, Value::Number(5.0)).unwrap();
        assert_eq!(
            seen.get(),
            Interval::open(Time::from_number(0.0), Time::from_number(2.0))
        );

        c.set_key_frame_value(0, Value::Number(5.0)).unwrap();
        assert_eq!(
            seen.get(),
            Interval::new(MIN_TIME, Time::from_number(1.0), false, true)
        );
    }
}
