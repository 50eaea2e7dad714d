//! # LiveGate Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite key-value storage for the session record
//! - HTTP client, health probe and liveness API client
//! - Filesystem image loading and in-memory preview handles
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `livegate-core`
//! - Depends on `livegate-domain` and `livegate-core`
//! - Contains all "impure" code (I/O, network, database)

pub mod config;
pub mod errors;
pub mod health;
pub mod http;
pub mod integrations;
pub mod media;
pub mod storage;

// Re-export commonly used items
pub use errors::InfraError;
pub use health::HttpEndpointProbe;
pub use http::HttpClient;
pub use integrations::{LivenessClient, ServiceProxy};
pub use media::{FsImageLoader, InMemoryPreviewStore};
pub use storage::SqliteStateStore;
