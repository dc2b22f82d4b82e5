//! Contracts for the collaborators this core consumes but does not implement:
//! the asynchronous persistent store, the badge indicator, and external
//! navigation. The diagnostic sink is the `tracing` facade and needs no trait.

mod memory;
mod sqlite;
mod system;

pub use memory::{MemoryStore, RecordingBadge, RecordingNavigator};
pub use sqlite::SqliteStore;
pub use system::SystemNavigator;

use crate::model::{PersistedState, StatePatch};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Failures crossing the persistent-store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted field exists but does not deserialize.
    #[error("malformed persisted state: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// Collaborator Contracts
// ============================================================================

/// Asynchronous persistent key-value store holding the popup record.
///
/// `get` returns the whole record, or `None` when nothing has ever been
/// persisted. `set` replaces exactly the fields present in the patch and
/// leaves the others untouched.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self) -> Result<Option<PersistedState>, StoreError>;
    async fn set(&self, patch: StatePatch) -> Result<(), StoreError>;
}

/// The badge indicator on the extension icon. Fire-and-forget: no return
/// contract is consumed.
pub trait BadgeHost: Send + Sync {
    fn set_text(&self, text: &str);
    fn set_background(&self, color: &str);
}

/// External navigation (opening a stashed URL). Fire-and-forget; whether the
/// navigation succeeded is not reported back.
pub trait Navigator: Send + Sync {
    fn open(&self, url: &str);
}
