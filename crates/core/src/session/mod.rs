//! Endpoint and credential orchestration
//!
//! This module provides the process-wide session (endpoint registry plus
//! credential store) and the ports it needs for persistence and probing.

pub mod credential;
pub mod persistence;
pub mod ports;
pub mod registry;
pub mod service;

pub use credential::CredentialStore;
pub use persistence::SessionPersistence;
pub use ports::{HealthProbe, StateStore};
pub use registry::{EndpointRegistry, EndpointSet};
pub use service::ClientSession;
