use super::PopupEvent;
use crate::config::PopupConfig;
use crate::external::StateStore;
use crate::filter::{filter_groups, FilterEngine};
use crate::model::Groups;
use crate::removal::RemovalWorkflow;
use crate::store::{GroupStore, NoSuchGroup};
use crate::sync::GroupSynchronizer;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// The link-groups view: named groups of saved links with immediate
/// persistence and a debounced name filter.
pub struct GroupsView {
    store: GroupStore,
    filter: FilterEngine<Groups>,
    removal: RemovalWorkflow<String>,
}

impl GroupsView {
    /// Build the view and hydrate it from the persistent store.
    ///
    /// Subscribers attach before hydration, so the loaded collection is the
    /// first value they observe — the pre-load empty map is never persisted
    /// or filtered. A load failure is reported on the event channel and the
    /// view starts empty; it is never fatal.
    pub async fn mount(
        config: &PopupConfig,
        store: Arc<dyn StateStore>,
        events: mpsc::Sender<PopupEvent>,
    ) -> Self {
        let mut groups = GroupStore::new();

        let filter = FilterEngine::new(config.filter_debounce(), Groups::new(), filter_groups);
        groups.subscribe(filter.on_mutation());

        let sync = GroupSynchronizer::new(Arc::clone(&store), events.clone());
        groups.subscribe(sync.on_mutation());

        let persisted = match store.get().await {
            Ok(state) => state.and_then(|s| s.groups),
            Err(error) => {
                tracing::warn!(%error, "failed to load link groups, starting empty");
                let _ = events
                    .send(PopupEvent::GroupsLoadFailed {
                        error: error.to_string(),
                    })
                    .await;
                None
            }
        };

        let mut view = Self {
            store: groups,
            filter,
            removal: RemovalWorkflow::new(),
        };
        view.store.hydrate(persisted);
        view
    }

    // ========================================================================
    // Collection Access & Mutation
    // ========================================================================

    pub fn groups(&self) -> &Groups {
        self.store.get()
    }

    pub fn replace(&mut self, groups: Groups) {
        self.store.replace(groups);
    }

    pub fn insert(&mut self, name: impl Into<String>, urls: Vec<String>) {
        self.store.insert(name, urls);
    }

    pub fn add_link(&mut self, name: &str, url: impl Into<String>) {
        self.store.add_link(name, url);
    }

    // ========================================================================
    // Query Filter
    // ========================================================================

    pub fn set_query(&self, query: &str) {
        self.filter.set_query(query);
    }

    pub fn query(&self) -> String {
        self.filter.query()
    }

    /// The settled filtered view for rendering. `None` until the first pass
    /// settles (loading affordance), then always the last settled subset.
    pub fn filtered(&self) -> watch::Receiver<Option<Groups>> {
        self.filter.watch()
    }

    pub fn settled(&self) -> Option<Groups> {
        self.filter.settled()
    }

    // ========================================================================
    // Removal Workflow
    // ========================================================================

    pub fn request_removal(&mut self, name: impl Into<String>) {
        self.removal.request(name.into());
    }

    pub fn cancel_removal(&mut self) {
        self.removal.cancel();
    }

    pub fn pending_removal(&self) -> Option<&String> {
        self.removal.pending()
    }

    /// Apply the pending removal.
    ///
    /// The selection is cleared either way; an absent group leaves the
    /// collection untouched and surfaces `no group {name}`.
    pub fn confirm_removal(&mut self) -> Result<(), NoSuchGroup> {
        let Some(name) = self.removal.confirm() else {
            return Ok(());
        };
        self.store.remove(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::MemoryStore;
    use pretty_assertions::assert_eq;
    use tokio::time;

    async fn drain() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let mut groups = Groups::new();
        groups.insert("work".to_string(), vec!["https://a.com".to_string()]);
        store.seed_groups(groups);
        store
    }

    #[tokio::test]
    async fn test_mount_hydrates_from_store() {
        let store = seeded_store();
        let (tx, _rx) = mpsc::channel(8);
        let view = GroupsView::mount(&PopupConfig::default(), store, tx).await;

        assert!(view.groups().contains_key("work"));
    }

    #[tokio::test]
    async fn test_mount_load_failure_starts_empty_and_reports() {
        let store = Arc::new(MemoryStore::new());
        store.fail_reads(true);
        let (tx, mut rx) = mpsc::channel(8);
        let view = GroupsView::mount(&PopupConfig::default(), store, tx).await;

        assert!(view.groups().is_empty());
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, PopupEvent::GroupsLoadFailed { .. }));
    }

    #[tokio::test]
    async fn test_confirm_removal_of_missing_group_reports_error() {
        time::pause();
        let store = seeded_store();
        let (tx, _rx) = mpsc::channel(8);
        let mut view = GroupsView::mount(&PopupConfig::default(), store, tx).await;

        view.request_removal("missing");
        let err = view.confirm_removal().unwrap_err();
        assert_eq!(err.to_string(), "no group missing");
        assert!(view.groups().contains_key("work"));
        assert_eq!(view.pending_removal(), None);
        drain().await;
    }

    #[tokio::test]
    async fn test_cancel_leaves_collection_unchanged() {
        time::pause();
        let store = seeded_store();
        let (tx, _rx) = mpsc::channel(8);
        let mut view = GroupsView::mount(&PopupConfig::default(), store, tx).await;

        let before = view.groups().clone();
        view.request_removal("work");
        view.cancel_removal();

        assert_eq!(view.groups(), &before);
        assert_eq!(view.pending_removal(), None);
        // Confirm after cancel is a no-op.
        assert!(view.confirm_removal().is_ok());
        assert_eq!(view.groups(), &before);
        drain().await;
    }
}
