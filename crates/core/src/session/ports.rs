//! Port interfaces for session state persistence and endpoint health
//!
//! These traits define the boundaries between the session services and the
//! infrastructure implementations (SQLite storage, HTTP probing).

use async_trait::async_trait;
use livegate_domain::{ProbeStatus, Result};

/// Generic key-based durable storage
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the value stored under `key`, `None` when absent
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Reachability check against an endpoint's health path
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Probe `base_url`. Implementations bound the request time and fold every
    /// failure into [`ProbeStatus::Inactive`].
    async fn check(&self, base_url: &str) -> ProbeStatus;
}
