//! Keyframe curve that holds each key's value until the next key.
//!
//! Every span `[t_i, t_{i+1})` is constant, as are the half-lines outside
//! the keys. Works for any value type.

use std::cell::RefCell;

use kairos_api_core::{Value, ValueType};

use crate::curve::{check_query, convert_native, supports_from_native, Curve, ValueChangeListeners};
use crate::curves::key_frames::{KeyFrame, KeyFrameTable};
use crate::error::{AnimationError, Result};
use crate::interval::Interval;
use crate::invariance::Invariance;
use crate::time::{Time, MAX_TIME, MIN_TIME};

#[derive(Debug)]
pub struct KFStepCurve {
    ty: ValueType,
    table: RefCell<KeyFrameTable>,
    listeners: ValueChangeListeners,
}

impl KFStepCurve {
    /// Curve of type `ty` with keys at `0` and `1` holding the default value.
    pub fn new(ty: ValueType) -> Self {
        Self::from_table(ty, KeyFrameTable::with_defaults(ty))
    }

    pub fn with_key_frames(ty: ValueType, key_frames: Vec<KeyFrame>) -> Result<Self> {
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

    /// Change the value of key `index`. Listeners hear about the span that key
    /// holds, extended to `MIN_TIME` for the first key.
    pub fn set_key_frame_value(&self, index: usize, value: Value) -> Result<()> {
        let changed = {
            let mut table = self.table.borrow_mut();
            table.set_value(self.ty, index, value)?;
            let frames = table.frames();
            let last = frames.len() - 1;
            let lower = if index == 0 { MIN_TIME } else { frames[index].time };
            if index == last {
                Interval::closed(lower, MAX_TIME)
            } else {
                Interval::new(lower, frames[index + 1].time, false, true)
            }
        };
        self.notify_value_change(changed);
        Ok(())
    }

    fn native_value(&self, time: Time) -> Value {
        let table = self.table.borrow();
        let index = table.find_key_frame_index(time);
        table.frames()[index.max(1) - 1].value.clone()
    }
}

impl Curve for KFStepCurve {
    fn is_type_supported(&self, ty: ValueType) -> bool {
        supports_from_native(self.ty, ty)
    }

    fn value(&self, time: Time, ty: ValueType) -> Result<Value> {
        if !self.is_type_supported(ty) {
            return Err(AnimationError::unsupported_type(ty));
        }
        convert_native(self.ty, self.native_value(time), ty)
    }

    fn invariance(&self, interval: Interval) -> Result<Invariance> {
        check_query(&interval)?;
        let table = self.table.borrow();
        let frames = table.frames();
        let last = frames.len() - 1;

        // First span merges the half-line before key 0 with key 0's own span.
        let mut spans = Vec::with_capacity(frames.len());
        spans.push(Interval::new(MIN_TIME, frames[1].time, false, true));
        for i in 1..last {
            spans.push(Interval::new(frames[i].time, frames[i + 1].time, false, true));
        }
        spans.push(Interval::closed(frames[last].time, MAX_TIME));

        let full: Invariance = spans.into_iter().collect();
        Ok(full.get_narrowed(interval))
    }

    fn listeners(&self) -> &ValueChangeListeners {
        &self.listeners
    }
}
