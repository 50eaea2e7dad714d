//! Port interfaces for batch evaluation

use async_trait::async_trait;
use livegate_domain::{
    ApiError, Credential, ImageInfo, InputFile, LivenessRequest, LivenessResponse, PipelineEvent,
    PreviewRef, Result,
};

/// Client for the external passive-liveness API
#[async_trait]
pub trait LivenessEvaluator: Send + Sync {
    /// Evaluate one image. Exactly one attempt; no retries.
    async fn evaluate(
        &self,
        request: &LivenessRequest,
        credential: &Credential,
    ) -> std::result::Result<LivenessResponse, ApiError>;
}

/// Decoded local image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub info: ImageInfo,
    pub bytes: Vec<u8>,
}

/// Access to local image files
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Read and decode `file`, deriving its [`ImageInfo`]
    async fn decode(&self, file: &InputFile) -> Result<DecodedImage>;

    /// Read `file` as a base64 payload for the evaluation API
    async fn encode_base64(&self, file: &InputFile) -> Result<String>;
}

/// Holder of transient, revocable preview handles
pub trait PreviewStore: Send + Sync {
    /// Register preview bytes and hand out a reference to them
    fn create(&self, bytes: Vec<u8>, mime_type: &str) -> PreviewRef;

    /// Release a reference. Returns `false` if it was unknown or already
    /// released.
    fn release(&self, preview: &PreviewRef) -> bool;

    /// Number of references currently alive
    fn live_count(&self) -> usize;
}

/// Receiver of pipeline progress notifications
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}
