use super::ListStore;
use crate::model::{to_display_order, Tab};

/// The read-later list, held in display (newest-first) order.
///
/// The persisted form is chronological (oldest-first); [`TabStore::hydrate`]
/// applies the load-time reversal, the persistence synchronizer applies the
/// write-time one.
pub struct TabStore {
    inner: ListStore<Vec<Tab>>,
}

impl TabStore {
    pub fn new() -> Self {
        Self {
            inner: ListStore::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&mut self, hook: F)
    where
        F: FnMut(&Vec<Tab>) + Send + 'static,
    {
        self.inner.subscribe(hook);
    }

    /// Publish the collection loaded from the persistent store.
    ///
    /// Takes the persisted (oldest-first) list and fails open: an absent
    /// value hydrates to the empty list.
    pub fn hydrate(&mut self, persisted: Option<Vec<Tab>>) {
        self.inner
            .replace(to_display_order(persisted.unwrap_or_default()));
    }

    /// Replace the whole list, given in display order.
    pub fn replace(&mut self, tabs: Vec<Tab>) {
        self.inner.replace(tabs);
    }

    pub fn get(&self) -> &[Tab] {
        self.inner.get()
    }

    /// Add a newly stashed tab at the front (newest-first display order).
    pub fn stash(&mut self, tab: Tab) {
        self.inner.mutate(|tabs| {
            tabs.insert(0, tab);
        });
    }

    /// Remove the first tab whose URL matches `target`.
    ///
    /// Value-addressed from a rendered snapshot that may already be stale:
    /// a missing match is a silent no-op (subscribers do not fire) and
    /// returns `false`.
    pub fn remove(&mut self, target: &Tab) -> bool {
        let position = self.inner.get().iter().position(|t| t.url == target.url);
        match position {
            Some(index) => {
                self.inner.mutate(|tabs| {
                    tabs.remove(index);
                });
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.inner.get().iter().any(|t| t.url == url)
    }

    pub fn len(&self) -> usize {
        self.inner.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get().is_empty()
    }
}

impl Default for TabStore {
    fn default() -> Self {
        Self::new()
    }
}
