//! Identifiers and simple allocators for listeners and binders.

use serde::{Deserialize, Serialize};

/// Handle returned when registering a value-change listener on a curve.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

/// Registration key of a binder inside its updater. Keys grow monotonically,
/// so ordering by key is registration order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BinderId(pub u64);

/// Monotonic allocator for ListenerId and BinderId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_listener: u64,
    next_binder: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_binder(&mut self) -> BinderId {
        let id = BinderId(self.next_binder);
        self.next_binder = self.next_binder.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_listener(), ListenerId(0));
        assert_eq!(alloc.alloc_listener(), ListenerId(1));
        assert_eq!(alloc.alloc_binder(), BinderId(0));
        assert_eq!(alloc.alloc_binder(), BinderId(1));
        assert!(BinderId(0) < BinderId(1));
    }
}
