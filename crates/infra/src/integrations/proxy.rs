//! Pass-through proxy to the selected service instance
//!
//! Forwards opaque JSON payloads (decode, encode, analysis, detokenize) to
//! `<selected endpoint>/<path>`. The credential header is attached when one
//! is configured. Payloads are not interpreted.

use std::sync::Arc;

use livegate_core::ClientSession;
use livegate_domain::{ApiError, LiveGateError};
use serde_json::Value;
use tracing::{debug, warn};

use super::liveness::provider_error_message;
use crate::http::HttpClient;

/// JSON pass-through to the selected endpoint
pub struct ServiceProxy {
    http_client: HttpClient,
    session: Arc<ClientSession>,
}

impl ServiceProxy {
    /// Proxy resolving targets through `session`
    pub fn new(http_client: HttpClient, session: Arc<ClientSession>) -> Self {
        Self { http_client, session }
    }

    /// Full URL for `path` on the selected endpoint, if any
    pub fn target_url(&self, path: &str) -> Option<String> {
        let endpoint = self.session.registry().selected()?;
        Some(join_url(&endpoint.url, path))
    }

    /// POST `body` as JSON and return the JSON response.
    ///
    /// An empty response body yields `Value::Null`.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self
            .target_url(path)
            .ok_or_else(|| ApiError::network("no endpoint selected"))?;

        let credential = self.session.credential().get();
        debug!(url = %url, "forwarding proxy request");
        let response =
            self.http_client.post_json(&url, body, &credential).await.map_err(|err| match err {
                LiveGateError::Network(message) => ApiError::network(message),
                other => ApiError::network(other.to_string()),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::network(e.to_string()))?;

        if !status.is_success() {
            let message = provider_error_message(status, &text);
            warn!(url = %url, status = status.as_u16(), message = %message, "proxy request failed");
            return Err(ApiError::Http { status: status.as_u16(), message });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::network(format!("invalid JSON from {url}: {e}")))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim().trim_start_matches('/'))
}
