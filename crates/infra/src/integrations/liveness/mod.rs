/// Passive-liveness evaluation API integration
///
/// This module provides the client used by the batch pipeline to submit one
/// base64-encoded image per request and collect the provider's verdict.
///
/// # Architecture
///
/// - **Client**: `LivenessClient` - implements the core `LivenessEvaluator`
///   port on top of [`crate::http::HttpClient`]
/// - **Types**: provider error body parsing
///
/// # Usage
///
/// ```no_run
/// use livegate_core::LivenessEvaluator;
/// use livegate_domain::{ApiConfig, Credential, LivenessRequest};
/// use livegate_infra::integrations::liveness::LivenessClient;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = LivenessClient::from_config(&ApiConfig::default())?;
///
/// let request = LivenessRequest::new("iVBORw0KGgo...");
/// let response = client.evaluate(&request, &Credential::new("my-api-key")).await?;
///
/// println!("{}", response.diagnostic());
/// # Ok(())
/// # }
/// ```
///
/// # Error Handling
///
/// - **Missing credential / payload**: rejected locally, nothing is sent
/// - **Transport failures and timeouts**: `ApiError::Network`
/// - **Non-2xx responses**: `ApiError::Http` carrying the provider's
///   `message` field when present
/// - No retries: each call is exactly one attempt
pub mod client;
pub mod types;

pub use client::LivenessClient;
pub use types::provider_error_message;
