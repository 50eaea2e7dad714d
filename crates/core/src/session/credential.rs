//! Credential store - the single API key used for evaluation calls

use std::sync::Arc;

use livegate_domain::Credential;
use parking_lot::RwLock;
use tracing::info;

use super::persistence::SessionPersistence;

/// Holder of the session's single API credential
pub struct CredentialStore {
    value: RwLock<Credential>,
    persistence: Arc<SessionPersistence>,
}

impl CredentialStore {
    /// Empty store persisting through `persistence`
    pub fn new(persistence: Arc<SessionPersistence>) -> Self {
        Self { value: RwLock::new(Credential::default()), persistence }
    }

    /// Current credential (possibly unset)
    pub fn get(&self) -> Credential {
        self.value.read().clone()
    }

    /// Whether a non-blank credential is set
    pub fn is_configured(&self) -> bool {
        self.value.read().is_configured()
    }

    /// Replace the credential. Whitespace is trimmed; a blank value clears it.
    pub async fn set(&self, value: &str) -> Credential {
        let credential = Credential::new(value);
        *self.value.write() = credential.clone();
        info!(configured = credential.is_configured(), "credential updated");

        self.persistence
            .persist_with(|record| record.credential = self.value.read().clone())
            .await;
        credential
    }

    pub(crate) fn restore(&self, credential: Credential) {
        *self.value.write() = credential;
    }
}
