use crate::config::PopupConfig;
use crate::external::{BadgeHost, Navigator, StateStore};
use crate::filter::{filter_tabs, FilterEngine};
use crate::model::Tab;
use crate::removal::RemovalWorkflow;
use crate::store::TabStore;
use crate::sync::TabSynchronizer;
use crate::util::{validate_stash_url, StashUrlError};
use std::sync::Arc;
use tokio::sync::watch;

/// The read-later view: an ordered tab list with debounced persistence, a
/// derived badge count, and a debounced free-text filter.
pub struct TabsView {
    store: TabStore,
    filter: FilterEngine<Vec<Tab>>,
    removal: RemovalWorkflow<Tab>,
    navigator: Arc<dyn Navigator>,
}

impl TabsView {
    /// Build the view and hydrate it from the persistent store.
    ///
    /// Subscribers attach before hydration, so the loaded list (already
    /// reversed to display order) is the first value they observe. Hydration
    /// arms the write debounce like any other mutation: every popup open
    /// re-persists the loaded list once and refreshes the badge. A load
    /// failure is logged and the view starts empty; it is never fatal or
    /// user-visible.
    pub async fn mount(
        config: &PopupConfig,
        store: Arc<dyn StateStore>,
        badge: Arc<dyn BadgeHost>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let mut tabs = TabStore::new();

        let filter = FilterEngine::new(config.filter_debounce(), Vec::new(), filter_tabs);
        tabs.subscribe(filter.on_mutation());

        let sync = TabSynchronizer::new(
            Arc::clone(&store),
            badge,
            config.tab_write_debounce(),
            config.badge_background.clone(),
        );
        tabs.subscribe(sync.on_mutation());

        let persisted = match store.get().await {
            Ok(state) => state.and_then(|s| s.read_later),
            Err(error) => {
                tracing::error!(%error, "failed to load read-later list, starting empty");
                None
            }
        };

        let mut view = Self {
            store: tabs,
            filter,
            removal: RemovalWorkflow::new(),
            navigator,
        };
        view.store.hydrate(persisted);
        view
    }

    // ========================================================================
    // Collection Access & Mutation
    // ========================================================================

    /// The live list in display (newest-first) order.
    pub fn tabs(&self) -> &[Tab] {
        self.store.get()
    }

    pub fn replace(&mut self, tabs: Vec<Tab>) {
        self.store.replace(tabs);
    }

    /// Stash a tab at the front of the list.
    ///
    /// Rejects non-web URLs; stashing an already-stashed URL is a quiet
    /// no-op, so repeated stash shortcuts never duplicate an entry.
    pub fn stash(&mut self, tab: Tab) -> Result<(), StashUrlError> {
        validate_stash_url(&tab.url)?;
        if self.store.contains(&tab.url) {
            tracing::debug!(url = %tab.url, "tab already stashed");
            return Ok(());
        }
        self.store.stash(tab);
        Ok(())
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
    pub fn filtered(&self) -> watch::Receiver<Option<Vec<Tab>>> {
        self.filter.watch()
    }

    pub fn settled(&self) -> Option<Vec<Tab>> {
        self.filter.settled()
    }

    // ========================================================================
    // Opening
    // ========================================================================

    /// Open a stashed tab; with `remove_on_open` (the modifier-click path)
    /// the tab is also removed without confirmation — opening it is treated
    /// as sufficient intent.
    pub fn open_tab(&mut self, tab: &Tab, remove_on_open: bool) {
        self.navigator.open(&tab.url);
        if remove_on_open {
            self.store.remove(tab);
        }
    }

    // ========================================================================
    // Removal Workflow
    // ========================================================================

    pub fn request_removal(&mut self, tab: Tab) {
        self.removal.request(tab);
    }

    pub fn cancel_removal(&mut self) {
        self.removal.cancel();
    }

    pub fn pending_removal(&self) -> Option<&Tab> {
        self.removal.pending()
    }

    /// Apply the pending removal.
    ///
    /// The target is value-addressed from a rendered snapshot that may be
    /// stale: a missing match is silently ignored. Returns whether a tab was
    /// actually removed.
    pub fn confirm_removal(&mut self) -> bool {
        match self.removal.confirm() {
            Some(tab) => self.store.remove(&tab),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{MemoryStore, RecordingBadge, RecordingNavigator};
    use pretty_assertions::assert_eq;
    use tokio::time::{self, Duration};

    async fn drain() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        badge: Arc<RecordingBadge>,
        navigator: Arc<RecordingNavigator>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(MemoryStore::new()),
                badge: Arc::new(RecordingBadge::new()),
                navigator: Arc::new(RecordingNavigator::new()),
            }
        }

        async fn mount(&self) -> TabsView {
            TabsView::mount(
                &PopupConfig::default(),
                Arc::clone(&self.store) as Arc<dyn StateStore>,
                Arc::clone(&self.badge) as Arc<dyn BadgeHost>,
                Arc::clone(&self.navigator) as Arc<dyn Navigator>,
            )
            .await
        }
    }

    #[tokio::test]
    async fn test_mount_reverses_persisted_order() {
        time::pause();
        let fixture = Fixture::new();
        fixture.store.seed_read_later(vec![
            Tab::new("https://x.com", "X"),
            Tab::new("https://y.com", "Y"),
        ]);

        let view = fixture.mount().await;
        assert_eq!(view.tabs()[0].title, "Y");
        assert_eq!(view.tabs()[1].title, "X");
        drain().await;
    }

    #[tokio::test]
    async fn test_stash_rejects_non_web_urls() {
        time::pause();
        let fixture = Fixture::new();
        let mut view = fixture.mount().await;

        let err = view.stash(Tab::new("chrome://settings", "Settings"));
        assert!(err.is_err());
        assert!(view.tabs().is_empty());
        drain().await;
    }

    #[tokio::test]
    async fn test_stash_is_idempotent_per_url() {
        time::pause();
        let fixture = Fixture::new();
        let mut view = fixture.mount().await;

        view.stash(Tab::new("https://a.com", "A")).unwrap();
        view.stash(Tab::new("https://a.com", "A again")).unwrap();
        assert_eq!(view.tabs().len(), 1);
        drain().await;
    }

    #[tokio::test]
    async fn test_open_with_modifier_removes_without_confirmation() {
        time::pause();
        let fixture = Fixture::new();
        let mut view = fixture.mount().await;
        view.stash(Tab::new("https://a.com", "A")).unwrap();

        let tab = view.tabs()[0].clone();
        view.open_tab(&tab, true);

        assert_eq!(fixture.navigator.opened(), vec!["https://a.com".to_string()]);
        assert!(view.tabs().is_empty());
        drain().await;
    }

    #[tokio::test]
    async fn test_open_without_modifier_keeps_tab() {
        time::pause();
        let fixture = Fixture::new();
        let mut view = fixture.mount().await;
        view.stash(Tab::new("https://a.com", "A")).unwrap();

        let tab = view.tabs()[0].clone();
        view.open_tab(&tab, false);

        assert_eq!(fixture.navigator.opened().len(), 1);
        assert_eq!(view.tabs().len(), 1);
        drain().await;
    }

    #[tokio::test]
    async fn test_confirm_removal_of_stale_target_is_silent() {
        time::pause();
        let fixture = Fixture::new();
        let mut view = fixture.mount().await;
        view.stash(Tab::new("https://a.com", "A")).unwrap();

        view.request_removal(Tab::new("https://gone.com", "stale"));
        assert!(!view.confirm_removal());
        assert_eq!(view.tabs().len(), 1);
        assert_eq!(view.pending_removal(), None);
        drain().await;
    }

    #[tokio::test]
    async fn test_mount_refreshes_badge_after_write_window() {
        time::pause();
        let fixture = Fixture::new();
        fixture
            .store
            .seed_read_later(vec![Tab::new("https://x.com", "X")]);

        let _view = fixture.mount().await;
        time::advance(Duration::from_millis(200)).await;
        drain().await;

        assert_eq!(fixture.badge.last_text().as_deref(), Some("1"));
    }
}
