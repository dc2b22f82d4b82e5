//! In-process collaborators for tests and headless hosts.
//!
//! `MemoryStore` implements the full [`StateStore`] contract with failure
//! injection and a log of applied patches, so debounce coalescing and
//! error-path behavior can be asserted without a real backend. The recording
//! badge and navigator play the same role for their contracts.

use super::{BadgeHost, Navigator, StateStore, StoreError};
use crate::model::{Groups, PersistedState, StatePatch, Tab};
use async_trait::async_trait;
use parking_lot::Mutex;

// ============================================================================
// MemoryStore
// ============================================================================

#[derive(Default)]
struct MemoryInner {
    groups: Option<Groups>,
    read_later: Option<Vec<Tab>>,
    applied: Vec<StatePatch>,
    rejected: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// An in-memory [`StateStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the persisted groups field, as if a previous session wrote it.
    pub fn seed_groups(&self, groups: Groups) {
        self.inner.lock().groups = Some(groups);
    }

    /// Seed the persisted read-later field in chronological (oldest-first)
    /// order, as the real store holds it.
    pub fn seed_read_later(&self, tabs: Vec<Tab>) {
        self.inner.lock().read_later = Some(tabs);
    }

    /// Make every subsequent `get` fail until switched back.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.lock().fail_reads = fail;
    }

    /// Make every subsequent `set` fail until switched back.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    /// Patches applied so far, in order.
    pub fn applied_patches(&self) -> Vec<StatePatch> {
        self.inner.lock().applied.clone()
    }

    /// Number of successfully applied writes.
    pub fn write_count(&self) -> usize {
        self.inner.lock().applied.len()
    }

    /// Applied writes that carried the read-later field, in order.
    pub fn read_later_writes(&self) -> Vec<Vec<Tab>> {
        self.inner
            .lock()
            .applied
            .iter()
            .filter_map(|patch| patch.read_later.clone())
            .collect()
    }

    /// Applied writes that carried the groups field, in order.
    pub fn groups_writes(&self) -> Vec<Groups> {
        self.inner
            .lock()
            .applied
            .iter()
            .filter_map(|patch| patch.groups.clone())
            .collect()
    }

    /// Number of writes rejected by failure injection.
    pub fn rejected_writes(&self) -> usize {
        self.inner.lock().rejected
    }

    /// Current persisted read-later field (chronological order).
    pub fn persisted_read_later(&self) -> Option<Vec<Tab>> {
        self.inner.lock().read_later.clone()
    }

    /// Current persisted groups field.
    pub fn persisted_groups(&self) -> Option<Groups> {
        self.inner.lock().groups.clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self) -> Result<Option<PersistedState>, StoreError> {
        let inner = self.inner.lock();
        if inner.fail_reads {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        if inner.groups.is_none() && inner.read_later.is_none() {
            return Ok(None);
        }
        Ok(Some(PersistedState {
            groups: inner.groups.clone(),
            read_later: inner.read_later.clone(),
        }))
    }

    async fn set(&self, patch: StatePatch) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.fail_writes {
            inner.rejected += 1;
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        if let Some(groups) = &patch.groups {
            inner.groups = Some(groups.clone());
        }
        if let Some(tabs) = &patch.read_later {
            inner.read_later = Some(tabs.clone());
        }
        inner.applied.push(patch);
        Ok(())
    }
}

// ============================================================================
// Recording Badge / Navigator
// ============================================================================

/// A [`BadgeHost`] that records every call for later assertion.
#[derive(Default)]
pub struct RecordingBadge {
    texts: Mutex<Vec<String>>,
    backgrounds: Mutex<Vec<String>>,
}

impl RecordingBadge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }

    pub fn backgrounds(&self) -> Vec<String> {
        self.backgrounds.lock().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts.lock().last().cloned()
    }
}

impl BadgeHost for RecordingBadge {
    fn set_text(&self, text: &str) {
        self.texts.lock().push(text.to_string());
    }

    fn set_background(&self, color: &str) {
        self.backgrounds.lock().push(color.to_string());
    }
}

/// A [`Navigator`] that records opened URLs instead of launching anything.
#[derive(Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open(&self, url: &str) {
        self.opened.lock().push(url.to_string());
    }
}
