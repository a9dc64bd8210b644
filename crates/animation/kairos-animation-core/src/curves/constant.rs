//! A curve holding one value for all time.

use std::cell::RefCell;

use kairos_api_core::{Value, ValueType};

use crate::curve::{check_query, convert_native, supports_from_native, Curve, ValueChangeListeners};
use crate::error::Result;
use crate::interval::Interval;
use crate::invariance::Invariance;
use crate::time::Time;

#[derive(Debug)]
pub struct ConstantCurve {
    ty: ValueType,
    value: RefCell<Value>,
    listeners: ValueChangeListeners,
}

impl ConstantCurve {
    /// Create a constant curve of type `ty`. Without a value the type's
    /// default is used; a value of another type is converted into `ty`.
    pub fn new(ty: ValueType, value: Option<Value>) -> Result<Self> {
        let value = match value {
            Some(v) => coerce(ty, v)?,
            None => ty.default_value(),
        };
        Ok(Self {
            ty,
            value: RefCell::new(value),
            listeners: ValueChangeListeners::new(),
        })
    }

    #[inline]
    pub fn value_type(&self) -> ValueType {
        self.ty
    }

    pub fn constant_value(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Replace the held value and notify listeners over all time.
    pub fn set_value(&self, value: Value) -> Result<()> {
        let value = coerce(self.ty, value)?;
        if *self.value.borrow() == value {
            return Ok(());
        }
        *self.value.borrow_mut() = value;
        self.notify_value_change(Interval::UNIVERSAL);
        Ok(())
    }
}

fn coerce(ty: ValueType, value: Value) -> Result<Value> {
    if value.value_type() == ty {
        return Ok(value);
    }
    Ok(ty.convert_value(value.value_type(), &value)?)
}

impl Curve for ConstantCurve {
    fn is_type_supported(&self, ty: ValueType) -> bool {
        supports_from_native(self.ty, ty)
    }

    fn value(&self, _time: Time, ty: ValueType) -> Result<Value> {
        convert_native(self.ty, self.constant_value(), ty)
    }

    fn invariance(&self, interval: Interval) -> Result<Invariance> {
        check_query(&interval)?;
        Ok(Invariance::universal())
    }

    fn listeners(&self) -> &ValueChangeListeners {
        &self.listeners
    }
}
