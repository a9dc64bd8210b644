//! Curve contract: a time -> value function that reports where it is constant
//! and tells listeners when its own definition changes.
//!
//! Curves are shared as `Rc<dyn Curve>`. A curve never knows who observes it;
//! binders and composite curves subscribe through [`ValueChangeListeners`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use kairos_api_core::{Value, ValueType};

use crate::error::{AnimationError, Result};
use crate::ids::{IdAllocator, ListenerId};
use crate::interval::Interval;
use crate::invariance::Invariance;
use crate::time::Time;

/// Callback receiving the interval over which a curve's definition changed.
pub type ValueChangeListener = Rc<dyn Fn(Interval)>;

pub trait Curve {
    /// Whether [`Curve::value`] can produce values of `ty`. Must not change
    /// over the lifetime of the curve.
    fn is_type_supported(&self, ty: ValueType) -> bool;

    /// Value at `time` as type `ty`. Fails with `UnsupportedType` when
    /// `is_type_supported(ty)` is false.
    fn value(&self, time: Time, ty: ValueType) -> Result<Value>;

    /// Constant spans intersecting `interval`. Spans may reach past
    /// `interval` but never lie entirely outside it. Fails with
    /// `InvalidInterval` when `interval` is empty.
    fn invariance(&self, interval: Interval) -> Result<Invariance>;

    /// The curve's listener set.
    fn listeners(&self) -> &ValueChangeListeners;

    fn add_value_change_listener(&self, listener: ValueChangeListener) -> ListenerId {
        self.listeners().add(listener)
    }

    fn remove_value_change_listener(&self, id: ListenerId) -> bool {
        self.listeners().remove(id)
    }

    /// Tell every listener the definition changed over `interval`.
    fn notify_value_change(&self, interval: Interval) {
        self.listeners().notify(interval);
    }
}

#[derive(Default)]
struct ListenerTable {
    ids: IdAllocator,
    entries: HashMap<ListenerId, ValueChangeListener>,
}

/// Set of value-change listeners owned by a curve.
#[derive(Default)]
pub struct ValueChangeListeners {
    table: RefCell<ListenerTable>,
}

impl ValueChangeListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: ValueChangeListener) -> ListenerId {
        let mut table = self.table.borrow_mut();
        let id = table.ids.alloc_listener();
        table.entries.insert(id, listener);
        id
    }

    /// Returns false when `id` was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.table.borrow_mut().entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call each registered listener once with `interval`. No-op for empty
    /// intervals. Listeners may add or remove listeners while being called;
    /// a listener removed mid-delivery is not called afterwards.
    pub fn notify(&self, interval: Interval) {
        if interval.is_empty() {
            return;
        }
        let snapshot: Vec<(ListenerId, ValueChangeListener)> = self
            .table
            .borrow()
            .entries
            .iter()
            .map(|(id, l)| (*id, Rc::clone(l)))
            .collect();
        for (id, listener) in snapshot {
            if self.table.borrow().entries.contains_key(&id) {
                listener(interval);
            }
        }
    }
}

impl fmt::Debug for ValueChangeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueChangeListeners")
            .field("len", &self.len())
            .finish()
    }
}

/// Reject empty query intervals.
pub(crate) fn check_query(interval: &Interval) -> Result<()> {
    if interval.is_empty() {
        return Err(AnimationError::InvalidInterval {
            interval: format!("{interval:?} is empty"),
        });
    }
    Ok(())
}

/// Types a curve with native type `native` can serve: the native type and
/// every type convertible from it.
#[inline]
pub(crate) fn supports_from_native(native: ValueType, ty: ValueType) -> bool {
    ty.is_convertible(native)
}

/// Convert a native value into `ty`, failing with `UnsupportedType` when no
/// conversion exists.
pub(crate) fn convert_native(native: ValueType, value: Value, ty: ValueType) -> Result<Value> {
    if native == ty {
        return Ok(value);
    }
    if !ty.is_convertible(native) {
        return Err(AnimationError::unsupported_type(ty));
    }
    Ok(ty.convert_value(native, &value)?)
}
