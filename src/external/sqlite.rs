//! SQLite-backed [`StateStore`] for desktop hosts.
//!
//! The popup record lives in a single key-value table; each field is stored
//! as its own JSON document so `set` can replace one field without touching
//! the other, matching the partial-write contract.

use super::{StateStore, StoreError};
use crate::model::{PersistedState, StatePatch};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

const GROUPS_KEY: &str = "groups";
const READ_LATER_KEY: &str = "read_later";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a database connection and run migrations.
    ///
    /// Pass `":memory:"` for an ephemeral store.
    pub async fn open(path: &str) -> Result<Self> {
        let url = format!("sqlite:{}?mode=rwc", path);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS popup_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn read_key(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM popup_state WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn write_key(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO popup_state (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn get(&self) -> Result<Option<PersistedState>, StoreError> {
        let groups = match self.read_key(GROUPS_KEY).await? {
            Some(raw) => Some(serde_json::from_str(&raw)?),
            None => None,
        };
        let read_later = match self.read_key(READ_LATER_KEY).await? {
            Some(raw) => Some(serde_json::from_str(&raw)?),
            None => None,
        };

        if groups.is_none() && read_later.is_none() {
            return Ok(None);
        }
        Ok(Some(PersistedState { groups, read_later }))
    }

    async fn set(&self, patch: StatePatch) -> Result<(), StoreError> {
        if let Some(groups) = &patch.groups {
            let raw = serde_json::to_string(groups)?;
            self.write_key(GROUPS_KEY, &raw).await?;
        }
        if let Some(tabs) = &patch.read_later {
            let raw = serde_json::to_string(tabs)?;
            self.write_key(READ_LATER_KEY, &raw).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Groups, Tab};
    use pretty_assertions::assert_eq;

    async fn test_store() -> SqliteStore {
        SqliteStore::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_on_fresh_store_returns_none() {
        let store = test_store().await;
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let store = test_store().await;

        let mut groups = Groups::new();
        groups.insert("home".to_string(), vec!["https://b.com".to_string()]);
        let tabs = vec![Tab::new("https://x.com", "X"), Tab::new("https://y.com", "Y")];

        store.set(StatePatch::with_groups(groups.clone())).await.unwrap();
        store
            .set(StatePatch::with_read_later(tabs.clone()))
            .await
            .unwrap();

        let state = store.get().await.unwrap().unwrap();
        assert_eq!(state.groups, Some(groups));
        assert_eq!(state.read_later, Some(tabs));
    }

    #[tokio::test]
    async fn test_partial_set_leaves_other_field() {
        let store = test_store().await;
        store
            .set(StatePatch::with_read_later(vec![Tab::new("u", "t")]))
            .await
            .unwrap();

        let mut groups = Groups::new();
        groups.insert("work".to_string(), vec![]);
        store.set(StatePatch::with_groups(groups)).await.unwrap();

        let state = store.get().await.unwrap().unwrap();
        assert_eq!(state.read_later, Some(vec![Tab::new("u", "t")]));
        assert!(state.groups.is_some());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let store = test_store().await;
        store
            .set(StatePatch::with_read_later(vec![Tab::new("a", "A")]))
            .await
            .unwrap();
        store
            .set(StatePatch::with_read_later(vec![Tab::new("b", "B")]))
            .await
            .unwrap();

        let state = store.get().await.unwrap().unwrap();
        assert_eq!(state.read_later, Some(vec![Tab::new("b", "B")]));
    }

    #[tokio::test]
    async fn test_malformed_value_reports_malformed() {
        let store = test_store().await;
        store.write_key(READ_LATER_KEY, "not json").await.unwrap();

        let err = store.get().await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
