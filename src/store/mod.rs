//! Authoritative in-memory collections and their mutation operations.
//!
//! A [`ListStore`] owns one collection and a set of on-mutation hooks. Every
//! mutation — including the hydration publish — runs every hook with the
//! post-mutation value; calls that do not mutate (a failed name-addressed
//! removal, a missed value-addressed removal) run nothing. The persistence
//! synchronizer and the query filter engine each register one hook and own
//! their debounce timers independently.

mod groups;
mod tabs;

pub use groups::{GroupStore, NoSuchGroup};
pub use tabs::TabStore;

/// An on-mutation hook. Receives the full post-mutation collection.
pub type MutationHook<C> = Box<dyn FnMut(&C) + Send>;

/// Generic mutable collection with change notification.
pub struct ListStore<C> {
    value: C,
    hooks: Vec<MutationHook<C>>,
}

impl<C> ListStore<C> {
    pub fn new(value: C) -> Self {
        Self {
            value,
            hooks: Vec::new(),
        }
    }

    pub fn get(&self) -> &C {
        &self.value
    }

    /// Register an on-mutation hook. Hooks fire in registration order.
    pub fn subscribe<F>(&mut self, hook: F)
    where
        F: FnMut(&C) + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Replace the whole collection and notify.
    pub fn replace(&mut self, value: C) {
        self.value = value;
        self.notify();
    }

    /// Apply `op` to the collection and notify.
    ///
    /// Callers must only reach for this when `op` actually mutates; check
    /// first and skip the call otherwise, so subscribers never re-arm on a
    /// no-op.
    pub fn mutate<R>(&mut self, op: impl FnOnce(&mut C) -> R) -> R {
        let out = op(&mut self.value);
        self.notify();
        out
    }

    fn notify(&mut self) {
        for hook in self.hooks.iter_mut() {
            hook(&self.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_replace_notifies_all_hooks() {
        let mut store = ListStore::new(0u32);
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            store.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        store.replace(7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*store.get(), 7);
    }

    #[test]
    fn test_hooks_observe_post_mutation_value() {
        let mut store = ListStore::new(vec![1, 2]);
        let seen = Arc::new(AtomicUsize::new(0));
        {
            let seen = Arc::clone(&seen);
            store.subscribe(move |v: &Vec<i32>| {
                seen.store(v.len(), Ordering::SeqCst);
            });
        }

        store.mutate(|v| v.push(3));
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
