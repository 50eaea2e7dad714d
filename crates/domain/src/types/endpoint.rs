//! Endpoint types
//!
//! An endpoint is a configured base URL of a remote service instance. The
//! registry keeps one to three of them with exactly one selected.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::errors::RegistryError;

/// Opaque endpoint identifier.
///
/// Stored as a string so records written by other clients (which may use
/// non-UUID identifiers) still rehydrate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(pub String);

impl EndpointId {
    /// Fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EndpointId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EndpointId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A configured backend endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: EndpointId,
    /// Display label
    pub tag: String,
    /// Normalized base URL (no trailing slash)
    pub url: String,
    /// Last known reachability
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_selected: bool,
}

impl Endpoint {
    /// Build a fresh, unselected and not-yet-probed endpoint.
    pub fn new(tag: impl Into<String>, url: &str) -> Result<Self, RegistryError> {
        Ok(Self {
            id: EndpointId::generate(),
            tag: tag.into().trim().to_string(),
            url: normalize_base_url(url)?,
            is_active: false,
            is_selected: false,
        })
    }

    /// The built-in default endpoint, selected. Cannot fail.
    pub fn builtin_default() -> Self {
        Self {
            id: EndpointId::generate(),
            tag: crate::constants::DEFAULT_ENDPOINT_TAG.to_string(),
            url: crate::constants::DEFAULT_ENDPOINT_URL.to_string(),
            is_active: false,
            is_selected: true,
        }
    }

    /// URL of the health path for this endpoint.
    pub fn health_url(&self) -> String {
        health_url_for(&self.url)
    }
}

/// Partial update for an endpoint.
///
/// Selection is deliberately absent: it only changes through
/// `EndpointRegistry::select` so the single-selection invariant has one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl EndpointPatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.url.is_none() && self.is_active.is_none()
    }
}

/// Result of a health probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Active,
    Inactive,
}

crate::impl_domain_status_conversions!(ProbeStatus {
    Active => "active",
    Inactive => "inactive",
});

impl ProbeStatus {
    /// Whether the endpoint answered the probe
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<bool> for ProbeStatus {
    fn from(reachable: bool) -> Self {
        if reachable {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// Trim and validate a base URL, stripping trailing slashes.
///
/// Only absolute `http`/`https` URLs with a host are accepted.
pub fn normalize_base_url(raw: &str) -> Result<String, RegistryError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: &str| RegistryError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("URL is empty"));
    }

    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("URL has no host"));
    }

    Ok(trimmed.to_string())
}

/// Health URL for an arbitrary (possibly un-normalized) base URL.
pub fn health_url_for(base: &str) -> String {
    format!("{}{}", base.trim().trim_end_matches('/'), crate::constants::HEALTH_PATH)
}
