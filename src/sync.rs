//! Persistence synchronizers: one per collection, each subscribed to its
//! List Store and owning its own write scheduling.
//!
//! Tab writes are high-frequency (every stash/remove while browsing) and
//! paired with a badge side effect, so they coalesce behind a debounce
//! window. Group writes are low-frequency manual edits where immediate
//! consistency with storage wins over coalescing, so every change spawns an
//! immediate write. The same asymmetry governs failure reporting: tab write
//! failures stay in the log, group write failures surface to the user.

use crate::debounce::Debouncer;
use crate::external::{BadgeHost, StateStore};
use crate::model::{to_persisted_order, Groups, StatePatch, Tab};
use crate::view::PopupEvent;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Tab Synchronizer (debounced, badge-deriving)
// ============================================================================

struct TabSyncShared {
    store: Arc<dyn StateStore>,
    badge: Arc<dyn BadgeHost>,
    badge_background: String,
    timer: Mutex<Debouncer>,
}

impl TabSyncShared {
    /// Write one settled snapshot, then derive the badge from it.
    ///
    /// The snapshot arrives in display order; the write-time reversal to
    /// chronological order happens here and nowhere else on the write path.
    async fn write(&self, display: Vec<Tab>) {
        let count = display.len();
        let chronological = to_persisted_order(display);
        match self.store.set(StatePatch::with_read_later(chronological)).await {
            Ok(()) => {
                tracing::debug!(count, "persisted read-later list");
                self.badge.set_text(&count.to_string());
                self.badge.set_background(&self.badge_background);
            }
            Err(error) => {
                // Log-only path; never surfaced, never retried.
                tracing::error!(%error, "failed to persist read-later list");
            }
        }
    }
}

/// Debounced persistence for the read-later list.
///
/// Each mutation cancels and restarts the pending timer, so a burst of N
/// mutations inside the window yields exactly one write of the Nth state. On
/// a successful write the badge is set to the list length with a fixed
/// background color.
pub struct TabSynchronizer {
    shared: Arc<TabSyncShared>,
}

impl TabSynchronizer {
    pub fn new(
        store: Arc<dyn StateStore>,
        badge: Arc<dyn BadgeHost>,
        window: Duration,
        badge_background: String,
    ) -> Self {
        Self {
            shared: Arc::new(TabSyncShared {
                store,
                badge,
                badge_background,
                timer: Mutex::new(Debouncer::new(window)),
            }),
        }
    }

    /// The on-mutation hook to register with the tab List Store.
    pub fn on_mutation(&self) -> impl FnMut(&Vec<Tab>) + Send + 'static {
        let shared = Arc::clone(&self.shared);
        move |tabs: &Vec<Tab>| schedule(&shared, tabs.clone())
    }
}

/// Re-arm the write timer with a fresh snapshot. The scheduled write holds
/// only a weak reference: dropping the owning view aborts the pending write
/// instead of letting it outlive the popup.
fn schedule(shared: &Arc<TabSyncShared>, snapshot: Vec<Tab>) {
    let weak: Weak<TabSyncShared> = Arc::downgrade(shared);
    shared.timer.lock().arm(async move {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        shared.write(snapshot).await;
    });
}

// ============================================================================
// Group Synchronizer (immediate, user-visible failures)
// ============================================================================

/// Immediate persistence for the link groups.
///
/// Every mutation spawns a fire-and-forget write of the full map; a failure
/// is reported on the popup event channel as user-visible error state.
pub struct GroupSynchronizer {
    store: Arc<dyn StateStore>,
    events: mpsc::Sender<PopupEvent>,
}

impl GroupSynchronizer {
    pub fn new(store: Arc<dyn StateStore>, events: mpsc::Sender<PopupEvent>) -> Self {
        Self { store, events }
    }

    /// The on-mutation hook to register with the group List Store.
    pub fn on_mutation(&self) -> impl FnMut(&Groups) + Send + 'static {
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        move |groups: &Groups| {
            let snapshot = groups.clone();
            let store = Arc::clone(&store);
            let events = events.clone();
            tokio::spawn(async move {
                tracing::debug!(groups = snapshot.len(), "persisting link groups");
                if let Err(error) = store.set(StatePatch::with_groups(snapshot)).await {
                    tracing::warn!(%error, "failed to persist link groups");
                    let _ = events
                        .send(PopupEvent::GroupsSaveFailed {
                            error: error.to_string(),
                        })
                        .await;
                }
            });
        }
    }
}
