//! Named registries of an object's bindable parameters.
//!
//! A [`BindingBlock`] maps parameter ids to declared types and at most one
//! live [`Binder`] each. Binding picks the first declared type the curve can
//! produce, so declaration order is preference order.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use kairos_api_core::{Value, ValueType};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::binder::{Binder, Setter};
use crate::curve::Curve;
use crate::error::{AnimationError, Result};
use crate::updater::Updater;

/// A bindable parameter and the types it accepts, in preference order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    pub types: Vec<ValueType>,
}

/// Tears down the bindings of a nested block.
pub type DescendantUnbinder = Rc<dyn Fn()>;

pub trait BindingBlock {
    /// Every registered parameter in registration order.
    fn enum_supported_parameters(&self) -> Vec<Parameter>;

    fn is_bound(&self, id: &str) -> bool;

    fn bound_updater(&self, id: &str) -> Option<Updater>;

    fn bound_curve(&self, id: &str) -> Option<Rc<dyn Curve>>;

    /// Bind `curve` to parameter `id`, replacing any current binding. On
    /// error nothing changes.
    fn bind(&self, id: &str, updater: &Updater, curve: Rc<dyn Curve>) -> Result<()>;

    /// Tear down the binding of `id`. No-op when `id` is unknown or unbound.
    ///
    /// Unlike [`Binder::unbind`], which only stops further setter calls, an
    /// entry that declares an initial value has its setter called once more
    /// with that value. Entries without one see no further calls.
    fn unbind(&self, id: &str);

    /// [`BindingBlock::unbind`] for every parameter, in registration order.
    fn unbind_all(&self);

    /// Like [`BindingBlock::unbind_all`], then also unbind nested blocks.
    fn unbind_all_recursively(&self);
}

struct Entry {
    types: Vec<ValueType>,
    initial: Option<Value>,
    setter: Setter,
    binder: Option<Binder>,
}

#[derive(Default)]
struct Registry {
    order: Vec<String>,
    entries: HashMap<String, Entry>,
    descendants: Vec<DescendantUnbinder>,
}

/// [`BindingBlock`] whose parameters each carry a setter closure.
#[derive(Default)]
pub struct EasyBindingBlock {
    registry: RefCell<Registry>,
}

impl EasyBindingBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register parameter `id`. `initial`, when given, must be of one of
    /// `types`; the setter receives it whenever the parameter's binding is
    /// torn down through this block.
    pub fn add_entry(
        &self,
        id: impl Into<String>,
        types: Vec<ValueType>,
        initial: Option<Value>,
        setter: Setter,
    ) -> Result<()> {
        let id = id.into();
        let mut reg = self.registry.borrow_mut();
        if reg.entries.contains_key(&id) {
            return Err(AnimationError::DuplicateParameter { id });
        }
        if let Some(v) = &initial {
            if !types.contains(&v.value_type()) {
                return Err(AnimationError::TypeMismatch {
                    parameter: id,
                    declared: types,
                });
            }
        }
        reg.order.push(id.clone());
        reg.entries.insert(
            id,
            Entry {
                types,
                initial,
                setter,
                binder: None,
            },
        );
        Ok(())
    }

    /// Register a callback run by [`BindingBlock::unbind_all_recursively`],
    /// usually the recursive unbind of a child block.
    pub fn add_descendant_unbinder(&self, unbinder: DescendantUnbinder) {
        self.registry.borrow_mut().descendants.push(unbinder);
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_binder<T>(&self, id: &str, f: impl FnOnce(&Binder) -> Option<T>) -> Option<T> {
        let reg = self.registry.borrow();
        reg.entries.get(id)?.binder.as_ref().and_then(f)
    }

    /// Detach the binder of `id` and restore the initial value. Runs user
    /// code, so no borrow of the registry may be held by the caller.
    fn tear_down(&self, id: &str) {
        let taken = {
            let mut reg = self.registry.borrow_mut();
            reg.entries.get_mut(id).and_then(|e| {
                e.binder
                    .take()
                    .map(|b| (b, e.initial.clone(), Rc::clone(&e.setter)))
            })
        };
        if let Some((binder, initial, setter)) = taken {
            binder.unbind();
            debug!("parameter '{id}' unbound");
            if let Some(v) = initial {
                setter(&v);
            }
        }
    }
}

impl BindingBlock for EasyBindingBlock {
    fn enum_supported_parameters(&self) -> Vec<Parameter> {
        let reg = self.registry.borrow();
        reg.order
            .iter()
            .filter_map(|id| {
                reg.entries.get(id).map(|e| Parameter {
                    id: id.clone(),
                    types: e.types.clone(),
                })
            })
            .collect()
    }

    fn is_bound(&self, id: &str) -> bool {
        self.with_binder(id, |b| b.is_bound().then_some(())).is_some()
    }

    fn bound_updater(&self, id: &str) -> Option<Updater> {
        self.with_binder(id, Binder::updater)
    }

    fn bound_curve(&self, id: &str) -> Option<Rc<dyn Curve>> {
        self.with_binder(id, |b| Some(b.curve()))
    }

    fn bind(&self, id: &str, updater: &Updater, curve: Rc<dyn Curve>) -> Result<()> {
        let (ty, setter) = {
            let reg = self.registry.borrow();
            let entry = reg
                .entries
                .get(id)
                .ok_or_else(|| AnimationError::UnknownParameter { id: id.to_string() })?;
            let ty = entry
                .types
                .iter()
                .copied()
                .find(|&t| curve.is_type_supported(t))
                .ok_or_else(|| AnimationError::TypeMismatch {
                    parameter: id.to_string(),
                    declared: entry.types.clone(),
                })?;
            (ty, Rc::clone(&entry.setter))
        };

        let binder = Binder::new(updater, curve, ty, setter)?;
        let previous = {
            let mut reg = self.registry.borrow_mut();
            match reg.entries.get_mut(id) {
                Some(entry) => entry.binder.replace(binder),
                // Entries are never removed.
                None => Some(binder),
            }
        };
        if let Some(old) = previous {
            old.unbind();
        }
        debug!("parameter '{id}' bound as {ty}");
        Ok(())
    }

    fn unbind(&self, id: &str) {
        self.tear_down(id);
    }

    fn unbind_all(&self) {
        let ids = self.registry.borrow().order.clone();
        for id in &ids {
            self.tear_down(id);
        }
    }

    fn unbind_all_recursively(&self) {
        self.unbind_all();
        let descendants = self.registry.borrow().descendants.clone();
        for unbind in descendants {
            unbind();
        }
    }
}

impl fmt::Debug for EasyBindingBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = self.registry.borrow();
        let bound: Vec<&str> = reg
            .order
            .iter()
            .filter(|id| reg.entries.get(*id).is_some_and(|e| e.binder.is_some()))
            .map(String::as_str)
            .collect();
        f.debug_struct("EasyBindingBlock")
            .field("parameters", &reg.order)
            .field("bound", &bound)
            .field("descendants", &reg.descendants.len())
            .finish()
    }
}
