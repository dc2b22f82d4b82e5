use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Collection Types
// ============================================================================

/// A saved tab in the read-later list.
///
/// Tabs carry no identity beyond their fields; membership tests and
/// value-addressed removal compare on `url` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub url: String,
    pub title: String,
}

impl Tab {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Named groups of saved links: group name → ordered URL list.
///
/// Key order carries no semantic meaning; a deterministic ordered map keeps
/// serialization and test output stable.
pub type Groups = BTreeMap<String, Vec<String>>;

// ============================================================================
// Persisted Record
// ============================================================================

/// The single persisted record, as read back from the store.
///
/// Both fields are independent; either may be absent when the corresponding
/// view has never persisted anything. `read_later` is stored in chronological
/// (oldest-first) order regardless of in-memory display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Groups>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_later: Option<Vec<Tab>>,
}

/// A partial write: only the fields present are replaced in the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub groups: Option<Groups>,
    pub read_later: Option<Vec<Tab>>,
}

impl StatePatch {
    pub fn with_groups(groups: Groups) -> Self {
        Self {
            groups: Some(groups),
            ..Self::default()
        }
    }

    pub fn with_read_later(tabs: Vec<Tab>) -> Self {
        Self {
            read_later: Some(tabs),
            ..Self::default()
        }
    }
}

// ============================================================================
// Order Conversion
// ============================================================================

// The reversal between persisted (oldest-first) and display (newest-first)
// order must be applied exactly once per direction. These two helpers are the
// only places it happens: `to_display_order` at load, `to_persisted_order` at
// write. Applying either twice silently un-reverses the list.

/// Convert a persisted (oldest-first) tab list to display (newest-first) order.
pub fn to_display_order(mut persisted: Vec<Tab>) -> Vec<Tab> {
    persisted.reverse();
    persisted
}

/// Convert a display (newest-first) tab list to persisted (oldest-first) order.
pub fn to_persisted_order(mut display: Vec<Tab>) -> Vec<Tab> {
    display.reverse();
    display
}
