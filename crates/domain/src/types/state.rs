//! Persisted session record
//!
//! The single durable record holding endpoints and credential, stored under
//! [`STORAGE_KEY`](crate::constants::STORAGE_KEY).

use serde::{Deserialize, Serialize};

use super::credential::Credential;
use super::endpoint::Endpoint;

/// Session record persisted under the storage key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// URL of the selected endpoint, empty when none
    #[serde(default)]
    pub selected_endpoint: String,
    #[serde(default)]
    pub credential: Credential,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_records_with_missing_fields() {
        let state: PersistedState =
            serde_json::from_str(r#"{ "credential": "abc", "endpoints": [] }"#).unwrap();
        assert_eq!(state.credential.expose(), "abc");
        assert!(state.selected_endpoint.is_empty());
    }

    #[test]
    fn writes_camel_case_keys() {
        let json = serde_json::to_value(PersistedState::default()).unwrap();
        assert!(json.get("selectedEndpoint").is_some());
        assert!(json.get("endpoints").is_some());
    }
}
