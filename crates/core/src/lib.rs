//! # LiveGate Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits)
//! - The client session (endpoint registry and credential store)
//! - The batch evaluation pipeline
//!
//! ## Architecture Principles
//! - Only depends on `livegate-domain`
//! - No database, HTTP, or filesystem code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod batch;
pub mod session;

// Re-export specific items to avoid ambiguity
pub use batch::ports::{
    DecodedImage, ImageLoader, LivenessEvaluator, PipelineObserver, PreviewStore,
};
pub use batch::BatchEvaluationPipeline;
pub use session::ports::{HealthProbe, StateStore};
pub use session::{ClientSession, CredentialStore, EndpointRegistry, EndpointSet};
