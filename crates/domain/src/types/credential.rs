//! API credential
//!
//! An opaque secret attached to outbound evaluation requests. The empty string
//! means "not configured".

use serde::{Deserialize, Serialize};

/// API key used for the external evaluation API
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Credential(String);

impl Credential {
    /// Build a credential, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_string())
    }

    /// Whether the credential is non-empty
    pub fn is_configured(&self) -> bool {
        !self.0.is_empty()
    }

    /// Raw secret, for request headers and persistence only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Credential> for String {
    fn from(credential: Credential) -> Self {
        credential.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_configured() {
            f.write_str("Credential(<redacted>)")
        } else {
            f.write_str("Credential(<unset>)")
        }
    }
}
