//! Batch evaluation
//!
//! This module provides the batch evaluation pipeline and the ports it needs
//! for image access, preview handles, the liveness API and progress
//! observers.

pub mod ordering;
pub mod pipeline;
pub mod ports;

pub use pipeline::BatchEvaluationPipeline;
pub use ports::{DecodedImage, ImageLoader, LivenessEvaluator, PipelineObserver, PreviewStore};
