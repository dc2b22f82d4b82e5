use super::ListStore;
use crate::model::Groups;
use thiserror::Error;

/// Name-addressed removal targeted a group that does not exist.
///
/// The message text is part of the user-visible contract.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no group {0}")]
pub struct NoSuchGroup(pub String);

/// The link-group collection: group name → ordered URL list.
pub struct GroupStore {
    inner: ListStore<Groups>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self {
            inner: ListStore::new(Groups::new()),
        }
    }

    pub fn subscribe<F>(&mut self, hook: F)
    where
        F: FnMut(&Groups) + Send + 'static,
    {
        self.inner.subscribe(hook);
    }

    /// Publish the collection loaded from the persistent store.
    ///
    /// Fails open: an absent persisted value hydrates to the empty map. This
    /// is a mutation like any other — subscribers observe the loaded value as
    /// their first notification.
    pub fn hydrate(&mut self, persisted: Option<Groups>) {
        self.inner.replace(persisted.unwrap_or_default());
    }

    pub fn replace(&mut self, groups: Groups) {
        self.inner.replace(groups);
    }

    pub fn get(&self) -> &Groups {
        self.inner.get()
    }

    /// Insert (or overwrite) a whole group.
    pub fn insert(&mut self, name: impl Into<String>, urls: Vec<String>) {
        let name = name.into();
        self.inner.mutate(|groups| {
            groups.insert(name, urls);
        });
    }

    /// Append a link to a group, creating the group when absent.
    pub fn add_link(&mut self, name: &str, url: impl Into<String>) {
        let url = url.into();
        self.inner.mutate(|groups| {
            groups.entry(name.to_string()).or_default().push(url);
        });
    }

    /// Remove a group by name.
    ///
    /// Name-addressed removal is expected to resolve: an absent name does not
    /// mutate state (subscribers do not fire) and reports [`NoSuchGroup`].
    pub fn remove(&mut self, name: &str) -> Result<(), NoSuchGroup> {
        if !self.inner.get().contains_key(name) {
            return Err(NoSuchGroup(name.to_string()));
        }
        self.inner.mutate(|groups| {
            groups.remove(name);
        });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.get().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get().is_empty()
    }
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn watched_store() -> (GroupStore, Arc<AtomicUsize>) {
        let mut store = GroupStore::new();
        let notifications = Arc::new(AtomicUsize::new(0));
        {
            let notifications = Arc::clone(&notifications);
            store.subscribe(move |_| {
                notifications.fetch_add(1, Ordering::SeqCst);
            });
        }
        (store, notifications)
    }

    #[test]
    fn test_hydrate_fails_open_to_empty() {
        let (mut store, notifications) = watched_store();
        store.hydrate(None);
        assert!(store.is_empty());
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_existing_group() {
        let (mut store, notifications) = watched_store();
        store.insert("work", vec!["https://a.com".to_string()]);

        store.remove("work").unwrap();
        assert!(!store.contains("work"));
        // insert + remove
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_remove_missing_group_reports_and_does_not_notify() {
        let (mut store, notifications) = watched_store();
        store.insert("work", vec!["https://a.com".to_string()]);

        let err = store.remove("missing").unwrap_err();
        assert_eq!(err, NoSuchGroup("missing".to_string()));
        assert_eq!(err.to_string(), "no group missing");
        assert!(store.contains("work"));
        // Only the insert notified.
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_add_link_creates_group_when_absent() {
        let (mut store, _) = watched_store();
        store.add_link("reading", "https://a.com");
        store.add_link("reading", "https://b.com");

        assert_eq!(
            store.get().get("reading"),
            Some(&vec![
                "https://a.com".to_string(),
                "https://b.com".to_string()
            ])
        );
    }
}
