//! Per-scope clock driving every binder registered with it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use log::trace;

use crate::binder::BinderCore;
use crate::config::UpdaterConfig;
use crate::ids::{BinderId, IdAllocator};
use crate::time::Time;

/// Entries in registration order. Removal leaves a hole; holes are compacted
/// away once they outnumber live entries, so insert and remove stay O(1)
/// amortized.
struct OrderedSlab<T> {
    slots: Vec<Option<(BinderId, T)>>,
    index: HashMap<BinderId, usize>,
}

impl<T> Default for OrderedSlab<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> OrderedSlab<T> {
    fn insert(&mut self, id: BinderId, value: T) {
        self.index.insert(id, self.slots.len());
        self.slots.push(Some((id, value)));
    }

    fn remove(&mut self, id: BinderId) -> bool {
        let Some(slot) = self.index.remove(&id) else {
            return false;
        };
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = None;
        }
        if self.slots.len() > 2 * self.index.len() {
            self.compact();
        }
        true
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (slot, entry) in self.slots.iter().enumerate() {
            if let Some((id, _)) = entry {
                self.index.insert(*id, slot);
            }
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().flatten().map(|(_, value)| value)
    }
}

pub(crate) struct UpdaterState {
    time: Option<Time>,
    ids: IdAllocator,
    binders: OrderedSlab<Rc<BinderCore>>,
    config: UpdaterConfig,
}

/// Handle to a clock. Clones share the same clock; equality is identity.
///
/// Binders register themselves on construction and deregister on
/// [`crate::Binder::unbind`]; the updater only drives them.
#[derive(Clone)]
pub struct Updater {
    state: Rc<RefCell<UpdaterState>>,
}

impl Default for Updater {
    fn default() -> Self {
        Self::new()
    }
}

impl Updater {
    pub fn new() -> Self {
        Self::with_config(UpdaterConfig::default())
    }

    pub fn with_config(config: UpdaterConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(UpdaterState {
                time: None,
                ids: IdAllocator::new(),
                binders: OrderedSlab::default(),
                config,
            })),
        }
    }

    pub fn config(&self) -> UpdaterConfig {
        self.state.borrow().config.clone()
    }

    /// Time passed to the last [`Updater::update`], if any.
    pub fn time(&self) -> Option<Time> {
        self.state.borrow().time
    }

    pub fn binder_count(&self) -> usize {
        self.state.borrow().binders.len()
    }

    /// Set the current time and refresh every registered binder in
    /// registration order. Setters may bind or unbind while this runs; a binder
    /// unbound mid-update is skipped, one bound mid-update waits for the next
    /// call.
    pub fn update(&self, time: Time) {
        let binders: Vec<Rc<BinderCore>> = {
            let mut state = self.state.borrow_mut();
            state.time = Some(time);
            state.binders.values().cloned().collect()
        };
        trace!("update at {time}: {} binders", binders.len());
        for binder in binders {
            if binder.is_registered() {
                binder.refresh(time);
            }
        }
    }

    pub(crate) fn register(&self, binder: Rc<BinderCore>) -> BinderId {
        let mut state = self.state.borrow_mut();
        let id = state.ids.alloc_binder();
        state.binders.insert(id, binder);
        id
    }

    pub(crate) fn unregister(&self, id: BinderId) -> bool {
        self.state.borrow_mut().binders.remove(id)
    }

    pub(crate) fn downgrade(&self) -> WeakUpdater {
        WeakUpdater(Rc::downgrade(&self.state))
    }
}

impl PartialEq for Updater {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for Updater {}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Updater")
            .field("time", &state.time)
            .field("binders", &state.binders.len())
            .field("config", &state.config)
            .finish()
    }
}

/// Non-owning reference held by binders so a dropped clock is not kept alive.
#[derive(Clone)]
pub(crate) struct WeakUpdater(Weak<RefCell<UpdaterState>>);

impl WeakUpdater {
    pub(crate) fn upgrade(&self) -> Option<Updater> {
        self.0.upgrade().map(|state| Updater { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_clock() {
        let a = Updater::new();
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Updater::new());
        b.update(Time::from_number(2.5));
        assert_eq!(a.time(), Some(Time::from_number(2.5)));
    }

    #[test]
    fn update_without_binders_only_moves_time() {
        let u = Updater::default();
        assert_eq!(u.time(), None);
        u.update(Time::ZERO);
        assert_eq!(u.time(), Some(Time::ZERO));
        assert_eq!(u.binder_count(), 0);
    }

    #[test]
    fn slab_keeps_registration_order_across_compaction() {
        let mut slab = OrderedSlab::default();
        for i in 0..10 {
            slab.insert(BinderId(i), i);
        }
        for i in [1, 2, 3, 5, 6, 7] {
            assert!(slab.remove(BinderId(i)));
        }
        assert!(!slab.remove(BinderId(2)));
        // Six holes over four live entries forced a compaction.
        assert_eq!(slab.slots.len(), 4);
        slab.insert(BinderId(10), 10);
        assert!(slab.remove(BinderId(4)));
        assert_eq!(slab.values().copied().collect::<Vec<_>>(), vec![0, 8, 9, 10]);
        assert_eq!(slab.len(), 4);
    }

    #[test]
    fn weak_handle_dies_with_updater() {
        let u = Updater::new();
        let weak = u.downgrade();
        assert_eq!(weak.upgrade(), Some(u.clone()));
        drop(u);
        assert!(weak.upgrade().is_none());
    }
}
