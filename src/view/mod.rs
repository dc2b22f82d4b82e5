//! The two popup views, each tying one List Store to its persistence
//! synchronizer, filter engine, and removal workflow.

mod groups;
mod tabs;

pub use groups::GroupsView;
pub use tabs::TabsView;

/// User-visible failures delivered to the rendering layer.
///
/// Only the groups view reports through this channel; read-later failures go
/// to the diagnostic log only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEvent {
    /// Loading the persisted groups failed; the view started empty.
    GroupsLoadFailed { error: String },
    /// Persisting the groups failed; in-memory state is ahead of storage.
    GroupsSaveFailed { error: String },
}
