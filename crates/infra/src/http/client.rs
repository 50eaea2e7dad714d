use std::time::Duration;

use livegate_domain::constants::{API_KEY_HEADER, API_TIMEOUT_SECS};
use livegate_domain::{Credential, LiveGateError};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::Serialize;
use tracing::debug;

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("livegate/", env!("CARGO_PKG_VERSION"));

/// Single-attempt HTTP transport shared by the liveness client, the health
/// probe and the service proxy.
///
/// Every HTTP status comes back as a response; only transport failures
/// (connect, timeout, malformed request) become errors. Nothing is retried.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Client bounded by the default API timeout
    pub fn new() -> Result<Self, LiveGateError> {
        Self::with_timeout(Duration::from_secs(API_TIMEOUT_SECS))
    }

    /// Client bounded by `timeout` per request
    pub fn with_timeout(timeout: Duration) -> Result<Self, LiveGateError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(|err| LiveGateError::from(InfraError::from(err)))?;

        Ok(Self { client, timeout })
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url`
    pub async fn get(&self, url: &str) -> Result<Response, LiveGateError> {
        self.execute(self.client.get(url)).await
    }

    /// POST `body` as JSON, adding the API key header when `credential` is
    /// configured.
    pub async fn post_json<B>(
        &self,
        url: &str,
        body: &B,
        credential: &Credential,
    ) -> Result<Response, LiveGateError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.client.post(url).json(body);
        if credential.is_configured() {
            builder = builder.header(API_KEY_HEADER, credential.expose());
        }
        self.execute(builder).await
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, LiveGateError> {
        let request = builder.build().map_err(|err| LiveGateError::from(InfraError::from(err)))?;
        let method = request.method().clone();
        let url = request.url().clone();

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = response.status().as_u16(), "http response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "http transport failure");
                Err(InfraError::from(err).into())
            }
        }
    }
}
