//! Debounced state-synchronization and query-filter core for a tab-stash
//! browser popup.
//!
//! Two views share one pattern: an authoritative in-memory [`store`] whose
//! mutations notify subscribers, a [`sync`] layer that persists each settled
//! snapshot (debounced for the read-later list, immediate for link groups),
//! a [`filter`] engine that settles a filtered view on its own debounce
//! timer, and a [`removal`] workflow gating deletions behind confirmation.
//! Presentation, the storage transport, and the badge itself live behind the
//! narrow contracts in [`external`].

pub mod config;
pub mod debounce;
pub mod external;
pub mod filter;
pub mod model;
pub mod removal;
pub mod store;
pub mod sync;
pub mod util;
pub mod view;

pub use config::{ConfigError, PopupConfig};
pub use external::{
    BadgeHost, MemoryStore, Navigator, SqliteStore, StateStore, StoreError, SystemNavigator,
};
pub use model::{Groups, PersistedState, StatePatch, Tab};
pub use store::NoSuchGroup;
pub use util::StashUrlError;
pub use view::{GroupsView, PopupEvent, TabsView};
