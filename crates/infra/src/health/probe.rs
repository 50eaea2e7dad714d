//! HTTP health probe for configured endpoints
//!
//! Issues `GET <base>/liveness` with a short timeout. Any 2xx answer means
//! the endpoint is reachable; every other outcome, including transport
//! failures and timeouts, maps to [`ProbeStatus::Inactive`]. The probe never
//! returns an error.

use std::time::Duration;

use async_trait::async_trait;
use livegate_core::HealthProbe;
use livegate_domain::constants::PROBE_TIMEOUT_SECS;
use livegate_domain::{health_url_for, LiveGateError, ProbeStatus};
use tracing::debug;

use crate::http::HttpClient;

/// [`HealthProbe`] over HTTP
pub struct HttpEndpointProbe {
    http_client: HttpClient,
}

impl HttpEndpointProbe {
    /// Probe sharing an existing client
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Probe with its own client bounded by `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, LiveGateError> {
        Ok(Self::new(HttpClient::with_timeout(timeout)?))
    }

    /// Probe bounded by the default probe timeout
    pub fn with_default_timeout() -> Result<Self, LiveGateError> {
        Self::with_timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
    }
}

#[async_trait]
impl HealthProbe for HttpEndpointProbe {
    async fn check(&self, base_url: &str) -> ProbeStatus {
        let url = health_url_for(base_url);

        match self.http_client.get(&url).await {
            Ok(response) if response.status().is_success() => ProbeStatus::Active,
            Ok(response) => {
                debug!(url = %url, status = response.status().as_u16(), "health probe rejected");
                ProbeStatus::Inactive
            }
            Err(err) => {
                debug!(url = %url, error = %err, "health probe failed");
                ProbeStatus::Inactive
            }
        }
    }
}
