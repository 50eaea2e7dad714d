//! Shared test helpers for `livegate-core` integration tests.
//!
//! In-memory implementations of every core port so session and pipeline
//! tests can focus on behaviour instead of wiring.

#![allow(dead_code)]

pub mod mocks;

use std::sync::Arc;

use livegate_core::{ClientSession, HealthProbe, StateStore};
use livegate_domain::{DefaultEndpointConfig, InputFile};

pub use mocks::*;

/// Session over `store` and `probe`, seeded with the stock default endpoint.
pub fn session(store: Arc<dyn StateStore>, probe: Arc<dyn HealthProbe>) -> ClientSession {
    ClientSession::new(store, probe, &DefaultEndpointConfig::default())
}

pub fn files(names: &[&str]) -> Vec<InputFile> {
    names.iter().map(|name| InputFile::from_path(format!("/fixtures/{name}"))).collect()
}
