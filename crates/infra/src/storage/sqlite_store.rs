//! SQLite-backed key-value store for the session record.
//!
//! Implements the `StateStore` port on a single `kv_store` table. All
//! database operations run in `spawn_blocking` to avoid blocking the async
//! runtime.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use livegate_core::StateStore;
use livegate_domain::Result as DomainResult;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;
use tracing::{debug, info};

use crate::errors::{map_join_error, InfraError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite key-value store.
///
/// One connection guarded by a mutex; writes are upserts keyed by record
/// name.
#[derive(Clone)]
pub struct SqliteStateStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStateStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(InfraError::from)?;
        }

        let conn = Connection::open(path).map_err(InfraError::from)?;
        info!(path = %path.display(), "opened state database");
        Self::from_connection(conn)
    }

    /// Private in-memory database, mainly for tests.
    pub fn open_in_memory() -> DomainResult<Self> {
        Self::from_connection(Connection::open_in_memory().map_err(InfraError::from)?)
    }

    fn from_connection(conn: Connection) -> DomainResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT).map_err(InfraError::from)?;
        conn.execute_batch(SCHEMA).map_err(InfraError::from)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Read the value stored under `key`.
    pub async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let conn = Arc::clone(&self.conn);
        let key = key.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<String>> {
            let conn = conn.lock();
            query_value(&conn, &key).map_err(|e| InfraError::from(e).into())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Insert or replace the value under `key`.
    pub async fn put(&self, key: &str, value: &str) -> DomainResult<()> {
        let conn = Arc::clone(&self.conn);
        let key = key.to_string();
        let value = value.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = conn.lock();
            upsert_value(&conn, &key, &value).map_err(|e| InfraError::from(e).into())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Delete `key`. Returns whether a row was removed.
    pub async fn delete(&self, key: &str) -> DomainResult<bool> {
        let conn = Arc::clone(&self.conn);
        let key = key.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = conn.lock();
            let removed = conn
                .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
                .map_err(InfraError::from)?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn load(&self, key: &str) -> DomainResult<Option<String>> {
        let value = self.get(key).await?;
        debug!(key, found = value.is_some(), "state record loaded");
        Ok(value)
    }

    async fn save(&self, key: &str, value: &str) -> DomainResult<()> {
        self.put(key, value).await
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn query_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get(0))
        .optional()
}

fn upsert_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    let now = chrono::Utc::now().timestamp_millis();

    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at",
        params![key, value, now],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_loads_none() {
        let store = SqliteStateStore::open_in_memory().expect("store");
        assert_eq!(store.load("livegate-storage").await.expect("load"), None);
    }

    #[tokio::test]
    async fn save_overwrites_previous_value() {
        let store = SqliteStateStore::open_in_memory().expect("store");

        store.save("k", "first").await.expect("save");
        store.save("k", "second").await.expect("save");

        assert_eq!(store.load("k").await.expect("load").as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn delete_reports_removal() {
        let store = SqliteStateStore::open_in_memory().expect("store");
        store.put("k", "v").await.expect("put");

        assert!(store.delete("k").await.expect("delete"));
        assert!(!store.delete("k").await.expect("delete"));
    }
}
