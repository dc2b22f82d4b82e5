//! Query filter engine: free-text query state plus a debounced, settled
//! filtered view.
//!
//! The query string mutates synchronously on every keystroke but is consumed
//! only when the engine's own debounce settles, so the rendered view never
//! reflects a partially-typed query. The settled view is published on a watch
//! channel seeded with `None`: `None` means not-yet-settled (loading
//! affordance), `Some(empty)` means settled-and-empty. Once settled there is
//! no transition back to `None` — re-arming leaves the previous value visible
//! until the new one lands.

use crate::debounce::Debouncer;
use crate::model::{Groups, Tab};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;

// ============================================================================
// Matching Rules
// ============================================================================

/// Group matching: a group is included iff its name contains the query as a
/// substring. Case-sensitive, no normalization. The empty query matches
/// every group.
pub fn filter_groups(groups: &Groups, query: &str) -> Groups {
    groups
        .iter()
        .filter(|(name, _)| name.contains(query))
        .map(|(name, urls)| (name.clone(), urls.clone()))
        .collect()
}

/// Tab matching: a tab is included iff the query is empty, or its lower-cased
/// URL contains the query, or its lower-cased title does.
///
/// The query is matched as typed — only the target strings are lower-cased.
/// Carried over verbatim from the shipped behavior; a capitalized query
/// therefore matches almost nothing. Flagged to the product owner, not
/// corrected here.
pub fn filter_tabs(tabs: &Vec<Tab>, query: &str) -> Vec<Tab> {
    if query.is_empty() {
        return tabs.clone();
    }
    tabs.iter()
        .filter(|tab| {
            tab.url.to_lowercase().contains(query) || tab.title.to_lowercase().contains(query)
        })
        .cloned()
        .collect()
}

// ============================================================================
// Filter Engine
// ============================================================================

struct FilterShared<C> {
    matcher: fn(&C, &str) -> C,
    query: Mutex<String>,
    latest: Mutex<C>,
    timer: Mutex<Debouncer>,
    tx: watch::Sender<Option<C>>,
}

/// Debounced filtered view over one List Store collection.
///
/// Re-armed by every query change and every collection change; the debounce
/// applies even when the query is empty (the empty-query result still equals
/// the full collection, it just settles on the same timer).
pub struct FilterEngine<C>
where
    C: Clone + Send + Sync + 'static,
{
    shared: Arc<FilterShared<C>>,
    rx: watch::Receiver<Option<C>>,
}

impl<C> FilterEngine<C>
where
    C: Clone + Send + Sync + 'static,
{
    pub fn new(window: Duration, initial: C, matcher: fn(&C, &str) -> C) -> Self {
        let (tx, rx) = watch::channel(None);
        Self {
            shared: Arc::new(FilterShared {
                matcher,
                query: Mutex::new(String::new()),
                latest: Mutex::new(initial),
                timer: Mutex::new(Debouncer::new(window)),
                tx,
            }),
            rx,
        }
    }

    /// The on-mutation hook to register with the List Store.
    pub fn on_mutation(&self) -> impl FnMut(&C) + Send + 'static {
        let shared = Arc::clone(&self.shared);
        move |value: &C| {
            *shared.latest.lock() = value.clone();
            rearm(&shared);
        }
    }

    /// Update the query synchronously and restart the debounce.
    pub fn set_query(&self, query: &str) {
        *self.shared.query.lock() = query.to_string();
        rearm(&self.shared);
    }

    pub fn query(&self) -> String {
        self.shared.query.lock().clone()
    }

    /// A receiver over the settled view for the rendering layer.
    pub fn watch(&self) -> watch::Receiver<Option<C>> {
        self.rx.clone()
    }

    /// The last settled view, or `None` if nothing has settled yet.
    pub fn settled(&self) -> Option<C> {
        self.rx.borrow().clone()
    }
}

/// Restart the debounce window. The scheduled pass holds only a weak
/// reference, so dropping the engine (popup teardown) aborts it rather than
/// letting a stale closure publish.
fn rearm<C>(shared: &Arc<FilterShared<C>>)
where
    C: Clone + Send + Sync + 'static,
{
    let weak: Weak<FilterShared<C>> = Arc::downgrade(shared);
    shared.timer.lock().arm(async move {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let snapshot = shared.latest.lock().clone();
        let query = shared.query.lock().clone();
        let filtered = (shared.matcher)(&snapshot, &query);
        shared.tx.send_replace(Some(filtered));
    });
}
