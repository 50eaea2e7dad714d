//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_ENDPOINTS;

/// Main error type for LiveGate
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum LiveGateError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for LiveGate operations
pub type Result<T> = std::result::Result<T, LiveGateError>;

/* -------------------------------------------------------------------------- */
/* Endpoint registry */
/* -------------------------------------------------------------------------- */

/// Invariant violations reported by the endpoint registry.
///
/// Every variant is returned before any mutation happens, so the registry is
/// left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistryError {
    #[error("Endpoint limit reached (max {max})")]
    CapacityExceeded { max: usize },

    #[error("Cannot remove the last remaining endpoint")]
    LastEndpoint,

    #[error("Endpoint not found: {id}")]
    NotFound { id: String },

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl RegistryError {
    /// Capacity error carrying the endpoint limit
    pub fn capacity_exceeded() -> Self {
        Self::CapacityExceeded { max: MAX_ENDPOINTS }
    }

    /// Unknown endpoint `id`
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/* -------------------------------------------------------------------------- */
/* Liveness API */
/* -------------------------------------------------------------------------- */

/// Discriminant of [`ApiError`], handy for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    MissingCredential,
    MissingPayload,
    Network,
    Http,
}

crate::impl_domain_status_conversions!(ApiErrorKind {
    MissingCredential => "missing_credential",
    MissingPayload => "missing_payload",
    Network => "network",
    Http => "http",
});

/// Errors raised by the liveness API client.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// No credential configured; the request was never sent.
    #[error("API key no configurada")]
    MissingCredential,

    /// Empty image payload; the request was never sent.
    #[error("Image payload is empty")]
    MissingPayload,

    /// Transport failure or timeout.
    #[error("{message}")]
    Network { message: String },

    /// Non-2xx response. `message` is the provider's `message` field when the
    /// body carried one.
    #[error("{message}")]
    Http { status: u16, message: String },
}

impl ApiError {
    /// Transport-level failure with its description
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Discriminant of this error
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::MissingCredential => ApiErrorKind::MissingCredential,
            Self::MissingPayload => ApiErrorKind::MissingPayload,
            Self::Network { .. } => ApiErrorKind::Network,
            Self::Http { .. } => ApiErrorKind::Http,
        }
    }

    /// HTTP status code, only present for [`ApiError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Batch pipeline */
/* -------------------------------------------------------------------------- */

/// Job-level pipeline failures. Per-item failures never surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineError {
    #[error("No valid image files were provided")]
    NoValidFiles,

    #[error("Batch job was superseded by a newer run")]
    Superseded,
}

/* -------------------------------------------------------------------------- */
/* Conversions */
/* -------------------------------------------------------------------------- */

impl From<RegistryError> for LiveGateError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { .. } => Self::NotFound(err.to_string()),
            _ => Self::InvalidInput(err.to_string()),
        }
    }
}

impl From<ApiError> for LiveGateError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::MissingCredential | ApiError::MissingPayload => {
                Self::InvalidInput(err.to_string())
            }
            ApiError::Network { .. } | ApiError::Http { .. } => Self::Network(err.to_string()),
        }
    }
}

impl From<PipelineError> for LiveGateError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoValidFiles => Self::InvalidInput(err.to_string()),
            PipelineError::Superseded => Self::Internal(err.to_string()),
        }
    }
}
