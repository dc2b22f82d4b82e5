//! Cancellable debounce timer.
//!
//! Every subscriber that reacts to List Store mutations owns one of these:
//! re-arming cancels the pending timer (not merely ignores it), so a stale
//! closure can never run after a newer one has been scheduled. Dropping the
//! owner aborts whatever is still pending.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A single-slot debounce timer backed by a spawned Tokio task.
///
/// `arm` schedules `action` to run after the configured window; arming again
/// before the window elapses aborts the previous task and restarts the delay.
/// Must be used from within a Tokio runtime.
pub struct Debouncer {
    window: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            handle: None,
        }
    }

    /// Schedule `action` to run once the debounce window elapses without
    /// another `arm` call. Any previously armed action is aborted first.
    pub fn arm<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let window = self.window;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            action.await;
        }));
    }

    /// Abort the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether an action is currently scheduled and not yet completed.
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
