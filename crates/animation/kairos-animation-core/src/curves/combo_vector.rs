//! Vector curve assembled from one scalar curve per component.
//!
//! The vector is constant only where every component is constant, so its
//! invariance is the merge of the children's. Changes of any child are
//! forwarded to the combo's own listeners.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use kairos_api_core::{Value, ValueType};
use log::debug;

use crate::curve::{check_query, convert_native, supports_from_native, Curve, ValueChangeListeners};
use crate::error::{AnimationError, Result};
use crate::ids::ListenerId;
use crate::interval::Interval;
use crate::invariance::Invariance;
use crate::time::Time;

struct Child {
    curve: Rc<dyn Curve>,
    listener: ListenerId,
}

pub struct ComboVectorCurve {
    ty: ValueType,
    children: RefCell<Vec<Child>>,
    listeners: ValueChangeListeners,
    me: Weak<ComboVectorCurve>,
}

impl ComboVectorCurve {
    /// Combine `children` into a curve of vector type `ty`. There must be one
    /// child per component and each must support `number`.
    pub fn new(ty: ValueType, children: Vec<Rc<dyn Curve>>) -> Result<Rc<Self>> {
        let dim = ty
            .dimension()
            .ok_or_else(|| AnimationError::unsupported_type(ty))?;
        if children.len() != dim {
            return Err(AnimationError::InvalidComposition {
                reason: format!("{ty} needs {dim} component curves, got {}", children.len()),
            });
        }
        for child in &children {
            check_scalar(child.as_ref())?;
        }

        Ok(Rc::new_cyclic(|me: &Weak<Self>| {
            let children = children
                .into_iter()
                .map(|curve| {
                    let listener = curve.add_value_change_listener(forwarder(me));
                    Child { curve, listener }
                })
                .collect();
            Self {
                ty,
                children: RefCell::new(children),
                listeners: ValueChangeListeners::new(),
                me: me.clone(),
            }
        }))
    }

    #[inline]
    pub fn value_type(&self) -> ValueType {
        self.ty
    }

    pub fn dimension(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn child(&self, index: usize) -> Option<Rc<dyn Curve>> {
        self.children
            .borrow()
            .get(index)
            .map(|c| Rc::clone(&c.curve))
    }

    /// Replace component `index` and notify listeners over all time.
    pub fn set_child(&self, index: usize, curve: Rc<dyn Curve>) -> Result<()> {
        check_scalar(curve.as_ref())?;
        {
            let mut children = self.children.borrow_mut();
            let len = children.len();
            let slot = children.get_mut(index).ok_or_else(|| AnimationError::InvalidComposition {
                reason: format!("component index {index} out of range ({len} components)"),
            })?;
            slot.curve.remove_value_change_listener(slot.listener);
            let listener = curve.add_value_change_listener(forwarder(&self.me));
            *slot = Child { curve, listener };
        }
        debug!("combo {} replaced component {index}", self.ty);
        self.notify_value_change(Interval::UNIVERSAL);
        Ok(())
    }
}

fn check_scalar(curve: &dyn Curve) -> Result<()> {
    if curve.is_type_supported(ValueType::Number) {
        Ok(())
    } else {
        Err(AnimationError::InvalidComposition {
            reason: "component curves must support number".to_string(),
        })
    }
}

fn forwarder(me: &Weak<ComboVectorCurve>) -> Rc<dyn Fn(Interval)> {
    let me = me.clone();
    Rc::new(move |interval| {
        if let Some(combo) = me.upgrade() {
            combo.notify_value_change(interval);
        }
    })
}

impl Curve for ComboVectorCurve {
    fn is_type_supported(&self, ty: ValueType) -> bool {
        supports_from_native(self.ty, ty)
    }

    fn value(&self, time: Time, ty: ValueType) -> Result<Value> {
        if !self.is_type_supported(ty) {
            return Err(AnimationError::unsupported_type(ty));
        }
        let comps = self
            .children
            .borrow()
            .iter()
            .map(|c| {
                let v = c.curve.value(time, ValueType::Number)?;
                v.as_number()
                    .ok_or_else(|| AnimationError::unsupported_type(v.value_type()))
            })
            .collect::<Result<Vec<f64>>>()?;
        let native = Value::from_components(self.ty, &comps)
            .ok_or_else(|| AnimationError::unsupported_type(self.ty))?;
        convert_native(self.ty, native, ty)
    }

    fn invariance(&self, interval: Interval) -> Result<Invariance> {
        check_query(&interval)?;
        let parts = self
            .children
            .borrow()
            .iter()
            .map(|c| c.curve.invariance(interval))
            .collect::<Result<Vec<Invariance>>>()?;
        Ok(Invariance::merge(&parts).get_narrowed(interval))
    }

    fn listeners(&self) -> &ValueChangeListeners {
        &self.listeners
    }
}

impl Drop for ComboVectorCurve {
    fn drop(&mut self) {
        for child in self.children.get_mut().iter() {
            child.curve.remove_value_change_listener(child.listener);
        }
    }
}

impl fmt::Debug for ComboVectorCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComboVectorCurve")
            .field("ty", &self.ty)
            .field("dimension", &self.dimension())
            .field("listeners", &self.listeners)
            .finish()
    }
}
