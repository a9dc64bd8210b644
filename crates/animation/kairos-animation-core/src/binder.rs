//! Connects one curve to one setter through an [`Updater`].
//!
//! A binder only re-evaluates its curve when the updater's time leaves the
//! constant span in which the previous value was produced. It learns those
//! spans lazily from [`Curve::invariance`] and forgets the parts a curve
//! reports as changed.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use kairos_api_core::{Value, ValueType};
use log::{debug, trace, warn};

use crate::config::UpdaterConfig;
use crate::curve::Curve;
use crate::error::{AnimationError, Result};
use crate::ids::{BinderId, ListenerId};
use crate::interval::Interval;
use crate::invariance::Invariance;
use crate::time::Time;
use crate::updater::{Updater, WeakUpdater};

/// Receives every value a binder produces.
pub type Setter = Rc<dyn Fn(&Value)>;

#[derive(Debug, Default)]
struct EvalCache {
    /// Constant spans of the curve known to be current.
    known: Invariance,
    /// Query windows already asked of the curve and not invalidated since.
    covered: Invariance,
    /// Constant span containing `last_time`, if the value there is current.
    span: Option<Interval>,
    last_time: Option<Time>,
}

pub(crate) struct BinderCore {
    id: Cell<Option<BinderId>>,
    listener: Cell<Option<ListenerId>>,
    updater: WeakUpdater,
    curve: Rc<dyn Curve>,
    ty: ValueType,
    setter: Setter,
    config: UpdaterConfig,
    cache: RefCell<EvalCache>,
}

impl BinderCore {
    #[inline]
    pub(crate) fn is_registered(&self) -> bool {
        self.id.get().is_some()
    }

    /// Bring the bound output up to date for `time`.
    pub(crate) fn refresh(&self, time: Time) {
        let query = {
            let cache = self.cache.borrow();
            if let Some(span) = cache.span {
                if span.includes_time(time) {
                    trace!("binder {:?}: {time} inside {span}, skipped", self.id.get());
                    return;
                }
            }
            cache
                .covered
                .find(time)
                .is_none()
                .then(|| cache.known.expand_interval_by_alignment(self.config.window(time)))
        };

        let value = match self.curve.value(time, self.ty) {
            Ok(v) => v,
            Err(err) => {
                warn!("binder {:?}: no {} value at {time}: {err}", self.id.get(), self.ty);
                return;
            }
        };

        let fresh = match query {
            Some(q) => match self.curve.invariance(q) {
                Ok(inv) => Some((q, inv)),
                Err(err) => {
                    warn!("binder {:?}: invariance query {q} failed: {err}", self.id.get());
                    None
                }
            },
            None => None,
        };

        {
            let mut cache = self.cache.borrow_mut();
            if let Some((q, inv)) = fresh {
                cache.known.modify(q, &inv);
                cache.covered.write(q);
            }
            cache.span = cache.known.find(time);
            cache.last_time = Some(time);
            trace!(
                "binder {:?}: evaluated at {time}, constant span {:?}",
                self.id.get(),
                cache.span
            );
        }

        (self.setter)(&value);
    }

    /// Forget everything known about `changed` and drop the cached span where
    /// it overlaps.
    fn invalidate(&self, changed: Interval) {
        let mut cache = self.cache.borrow_mut();
        cache.known.remove(changed);
        cache.covered.remove(changed);
        if let Some(span) = cache.span {
            if span.has_intersection(&changed) {
                let last = cache.last_time;
                cache.span = last.and_then(|t| {
                    span.get_difference(&changed)
                        .into_iter()
                        .find(|piece| piece.includes_time(t))
                });
            }
        }
    }

    fn detach(&self) -> bool {
        let listener = self.listener.take();
        if let Some(listener) = listener {
            self.curve.remove_value_change_listener(listener);
        }
        let Some(id) = self.id.take() else {
            return false;
        };
        if let Some(updater) = self.updater.upgrade() {
            updater.unregister(id);
        }
        debug!("binder {id:?} unbound ({})", self.ty);
        true
    }
}

/// A live binding of `curve` to `setter`, refreshed on every
/// [`Updater::update`] until [`Binder::unbind`] is called. Dropping the
/// handle does not unbind.
#[derive(Clone)]
pub struct Binder {
    core: Rc<BinderCore>,
}

impl Binder {
    /// Bind `curve` as type `ty`. Fails with `UnsupportedType`, registering
    /// nothing, when the curve cannot produce `ty`.
    pub fn new(
        updater: &Updater,
        curve: Rc<dyn Curve>,
        ty: ValueType,
        setter: Setter,
    ) -> Result<Self> {
        if !curve.is_type_supported(ty) {
            return Err(AnimationError::unsupported_type(ty));
        }
        let core = Rc::new(BinderCore {
            id: Cell::new(None),
            listener: Cell::new(None),
            updater: updater.downgrade(),
            curve,
            ty,
            setter,
            config: updater.config(),
            cache: RefCell::new(EvalCache::default()),
        });

        let weak: Weak<BinderCore> = Rc::downgrade(&core);
        let listener = core.curve.add_value_change_listener(Rc::new(move |changed| {
            if let Some(core) = weak.upgrade() {
                core.invalidate(changed);
            }
        }));
        core.listener.set(Some(listener));
        let id = updater.register(Rc::clone(&core));
        core.id.set(Some(id));
        debug!("binder {id:?} bound ({ty})");
        Ok(Self { core })
    }

    pub fn id(&self) -> Option<BinderId> {
        self.core.id.get()
    }

    pub fn curve(&self) -> Rc<dyn Curve> {
        Rc::clone(&self.core.curve)
    }

    #[inline]
    pub fn value_type(&self) -> ValueType {
        self.core.ty
    }

    /// The driving updater, while it is alive.
    pub fn updater(&self) -> Option<Updater> {
        self.core.updater.upgrade()
    }

    pub fn is_bound(&self) -> bool {
        self.core.is_registered()
    }

    /// Stop listening to the curve and leave the updater. Returns false when
    /// already unbound.
    pub fn unbind(&self) -> bool {
        self.core.detach()
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("id", &self.core.id.get())
            .field("ty", &self.core.ty)
            .field("cache", &self.core.cache.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{ConstantCurve, KFStepCurve};

    fn recorder() -> (Setter, Rc<RefCell<Vec<Value>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let setter: Setter = Rc::new(move |v: &Value| l.borrow_mut().push(v.clone()));
        (setter, log)
    }

    #[test]
    fn unsupported_type_registers_nothing() {
        let u = Updater::new();
        let curve = Rc::new(KFStepCurve::new(ValueType::String));
        let (setter, _) = recorder();
        let err = Binder::new(&u, curve.clone(), ValueType::Number, setter);
        assert!(matches!(err, Err(AnimationError::UnsupportedType { .. })));
        assert_eq!(u.binder_count(), 0);
        assert!(curve.listeners().is_empty());
    }

    #[test]
    fn unbind_is_idempotent() {
        let u = Updater::new();
        let curve = Rc::new(ConstantCurve::new(ValueType::Number, None).unwrap());
        let (setter, _) = recorder();
        let b = Binder::new(&u, curve.clone(), ValueType::Number, setter).unwrap();
        assert_eq!(u.binder_count(), 1);
        assert_eq!(curve.listeners().len(), 1);
        assert!(b.unbind());
        assert!(!b.unbind());
        assert!(!b.is_bound());
        assert_eq!(u.binder_count(), 0);
        assert!(curve.listeners().is_empty());
    }

    #[test]
    fn invalidation_keeps_untouched_part_of_span() {
        let u = Updater::new();
        let curve = Rc::new(
            KFStepCurve::with_key_frames(
                ValueType::Number,
                vec![(0.0, 1.0).into(), (10.0, 2.0).into(), (20.0, 3.0).into()],
            )
            .unwrap(),
        );
        let (setter, log) = recorder();
        let _b = Binder::new(&u, curve.clone(), ValueType::Number, setter).unwrap();

        u.update(Time::from_number(12.0));
        assert_eq!(log.borrow().len(), 1);

        // Touches [MIN, 10) only; 12 still lies in [10, 20).
        curve.set_key_frame_value(0, Value::Number(7.0)).unwrap();
        u.update(Time::from_number(13.0));
        assert_eq!(log.borrow().len(), 1);

        curve.set_key_frame_value(1, Value::Number(9.0)).unwrap();
        u.update(Time::from_number(13.0));
        assert_eq!(*log.borrow(), vec![Value::Number(2.0), Value::Number(9.0)]);
    }
}
