/// Liveness API client
use std::time::Duration;

use async_trait::async_trait;
use livegate_core::LivenessEvaluator;
use livegate_domain::constants::LIVENESS_API_URL;
use livegate_domain::{
    ApiConfig, ApiError, Credential, LiveGateError, LivenessRequest, LivenessResponse,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::types::provider_error_message;
use crate::http::HttpClient;

/// Client for the passive-liveness evaluation endpoint
pub struct LivenessClient {
    http_client: HttpClient,
    api_url: String,
}

impl LivenessClient {
    /// Create a client posting to the production evaluation URL
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client, api_url: LIVENESS_API_URL.to_string() }
    }

    /// Build a client from configuration (URL and timeout)
    pub fn from_config(config: &ApiConfig) -> Result<Self, LiveGateError> {
        let http_client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(http_client).with_api_url(&config.liveness_url))
    }

    /// Override the evaluation URL
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Evaluation URL in use
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn call_api(
        &self,
        request: &LivenessRequest,
        credential: &Credential,
    ) -> Result<LivenessResponse, ApiError> {
        let response = self
            .http_client
            .post_json(&self.api_url, request, credential)
            .await
            .map_err(transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = provider_error_message(status, &body);
            warn!(status = status.as_u16(), message = %message, "liveness API returned an error");
            return Err(ApiError::Http { status: status.as_u16(), message });
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| ApiError::network(format!("invalid response body: {e}")))?;
        let parsed = LivenessResponse::from_raw(raw);

        debug!(has_result_log = parsed.service_result_log.is_some(), "liveness evaluation received");
        Ok(parsed)
    }
}

#[async_trait]
impl LivenessEvaluator for LivenessClient {
    async fn evaluate(
        &self,
        request: &LivenessRequest,
        credential: &Credential,
    ) -> Result<LivenessResponse, ApiError> {
        if !credential.is_configured() {
            return Err(ApiError::MissingCredential);
        }
        if request.image_buffer.trim().is_empty() {
            return Err(ApiError::MissingPayload);
        }

        info!(payload_len = request.image_buffer.len(), "submitting image for liveness evaluation");
        self.call_api(request, credential).await
    }
}

/// Transport-level failures keep the underlying description.
fn transport_error(err: LiveGateError) -> ApiError {
    match err {
        LiveGateError::Network(message) => ApiError::network(message),
        other => ApiError::network(other.to_string()),
    }
}
