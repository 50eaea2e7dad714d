//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    API_TIMEOUT_SECS, DEFAULT_ENDPOINT_TAG, DEFAULT_ENDPOINT_URL, DEFAULT_PIPELINE_CONCURRENCY,
    LIVENESS_API_URL, PROBE_TIMEOUT_SECS,
};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub api: ApiConfig,
    pub pipeline: PipelineConfig,
    pub default_endpoint: DefaultEndpointConfig,
}

/// Durable storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file holding the persisted session record
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: "livegate.db".to_string() }
    }
}

/// External API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub liveness_url: String,
    pub timeout_secs: u64,
    pub probe_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            liveness_url: LIVENESS_API_URL.to_string(),
            timeout_secs: API_TIMEOUT_SECS,
            probe_timeout_secs: PROBE_TIMEOUT_SECS,
        }
    }
}

/// Batch pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of items evaluated at once. 1 keeps the remote API call rate
    /// bounded and diagnostics strictly attributable.
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { concurrency: DEFAULT_PIPELINE_CONCURRENCY }
    }
}

/// Endpoint seeded into an empty registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultEndpointConfig {
    pub tag: String,
    pub url: String,
}

impl Default for DefaultEndpointConfig {
    fn default() -> Self {
        Self { tag: DEFAULT_ENDPOINT_TAG.to_string(), url: DEFAULT_ENDPOINT_URL.to_string() }
    }
}
