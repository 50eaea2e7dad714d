//! Domain types and models

pub mod credential;
pub mod endpoint;
pub mod evaluation;
pub mod job;
pub mod media;
pub mod state;

pub use credential::Credential;
pub use endpoint::{
    health_url_for, normalize_base_url, Endpoint, EndpointId, EndpointPatch, ProbeStatus,
};
pub use evaluation::{
    EvaluationItem, EvaluationReport, LivenessRequest, LivenessResponse, TrackingFields,
};
pub use job::{BatchJobState, BatchPhase, JobStatus, PipelineEvent};
pub use media::{ImageInfo, InputFile, PreviewRef};
pub use state::PersistedState;
