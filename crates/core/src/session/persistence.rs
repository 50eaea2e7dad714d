//! Best-effort persistence of the session record
//!
//! Endpoint and credential changes both land in one durable record. Writers
//! update their part of the cached record under an async lock and the whole
//! record is written back while the lock is held, so the last writer always
//! stores the latest state. Storage failures are logged and swallowed: the
//! in-memory session stays authoritative.

use std::sync::Arc;

use livegate_domain::{LiveGateError, PersistedState, Result};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ports::StateStore;

/// Read-modify-write access to the persisted session record
pub struct SessionPersistence {
    store: Arc<dyn StateStore>,
    key: String,
    record: Mutex<PersistedState>,
}

impl SessionPersistence {
    /// Persistence of the record stored under `key`
    pub fn new(store: Arc<dyn StateStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into(), record: Mutex::new(PersistedState::default()) }
    }

    /// Storage key of the session record
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the durable record.
    ///
    /// Returns `Ok(None)` when nothing was stored yet. A record that fails to
    /// parse is reported as a storage error.
    pub async fn load(&self) -> Result<Option<PersistedState>> {
        let Some(raw) = self.store.load(&self.key).await? else {
            return Ok(None);
        };

        let state: PersistedState = serde_json::from_str(&raw).map_err(|e| {
            LiveGateError::Storage(format!("corrupt record under '{}': {e}", self.key))
        })?;

        *self.record.lock().await = state.clone();
        Ok(Some(state))
    }

    /// Apply `update` to the cached record and write the result.
    ///
    /// `update` runs while the write lock is held; it must not block.
    pub async fn persist_with<F>(&self, update: F)
    where
        F: FnOnce(&mut PersistedState) + Send,
    {
        let mut record = self.record.lock().await;
        update(&mut record);

        let serialized = match serde_json::to_string(&*record) {
            Ok(json) => json,
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to serialize session record");
                return;
            }
        };

        match self.store.save(&self.key, &serialized).await {
            Ok(()) => debug!(
                key = %self.key,
                endpoints = record.endpoints.len(),
                "session record persisted"
            ),
            Err(err) => warn!(
                key = %self.key,
                error = %err,
                "failed to persist session record; keeping in-memory state"
            ),
        }
    }
}
