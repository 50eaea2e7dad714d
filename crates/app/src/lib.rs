//! # LiveGate App
//!
//! Application layer - commands, dependency wiring and the `livegate` CLI.
//!
//! This crate contains:
//! - Command functions (endpoints, credential, evaluation, proxy)
//! - Application context (dependency injection)
//! - Tracing initialisation
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Every command logs its execution and publishes a [`Notification`]

pub mod commands;
pub mod context;
pub mod utils;

pub use commands::*;
pub use context::{AppContext, Notification, NotificationLevel};
