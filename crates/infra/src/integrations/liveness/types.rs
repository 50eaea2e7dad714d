/// Provider response types for the liveness API
use reqwest::StatusCode;
use serde::Deserialize;

/// Error body returned by the provider on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProviderErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Human-readable message for a failed response.
///
/// Prefers the body's `message` field, then the status reason phrase, then
/// the raw body text.
pub fn provider_error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty());

    if let Some(message) = from_body {
        return message;
    }

    if let Some(reason) = status.canonical_reason() {
        return reason.to_string();
    }

    let text = body.trim();
    if text.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        text.to_string()
    }
}
