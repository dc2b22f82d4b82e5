//! Desktop-host [`Navigator`] backed by the platform opener.

use super::Navigator;

/// Opens URLs with the system default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn open(&self, url: &str) {
        // Fire-and-forget per the contract; a launch failure is only a
        // diagnostic concern.
        if let Err(error) = open::that_detached(url) {
            tracing::warn!(%error, url, "failed to open url");
        }
    }
}
