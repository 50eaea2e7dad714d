//! Client session - process-wide endpoint and credential state
//!
//! Constructed once at startup and shared through the application context.
//! Rehydration from durable storage is an explicit [`ClientSession::init`]
//! step; [`ClientSession::is_hydrated`] lets dependents tell "not loaded yet"
//! apart from "loaded and empty".

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use livegate_domain::constants::STORAGE_KEY;
use livegate_domain::{DefaultEndpointConfig, Endpoint, PersistedState};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::credential::CredentialStore;
use super::persistence::SessionPersistence;
use super::ports::{HealthProbe, StateStore};
use super::registry::{EndpointRegistry, EndpointSet};

/// Process-wide endpoint registry and credential, with one-shot rehydration
pub struct ClientSession {
    registry: Arc<EndpointRegistry>,
    credential: Arc<CredentialStore>,
    persistence: Arc<SessionPersistence>,
    hydrated: AtomicBool,
    init_lock: Mutex<()>,
}

impl ClientSession {
    /// Create a session seeded with `default_endpoint`.
    ///
    /// An unusable default URL falls back to the built-in default so the
    /// registry is never empty.
    pub fn new(
        store: Arc<dyn StateStore>,
        probe: Arc<dyn HealthProbe>,
        default_endpoint: &DefaultEndpointConfig,
    ) -> Self {
        let persistence = Arc::new(SessionPersistence::new(store, STORAGE_KEY));
        let initial = default_set(default_endpoint);

        Self {
            registry: Arc::new(EndpointRegistry::new(initial, probe, Arc::clone(&persistence))),
            credential: Arc::new(CredentialStore::new(Arc::clone(&persistence))),
            persistence,
            hydrated: AtomicBool::new(false),
            init_lock: Mutex::new(()),
        }
    }

    /// The endpoint registry
    pub fn registry(&self) -> &Arc<EndpointRegistry> {
        &self.registry
    }

    /// The credential store
    pub fn credential(&self) -> &Arc<CredentialStore> {
        &self.credential
    }

    /// Whether [`ClientSession::init`] has completed
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    /// Rehydrate from durable storage. Runs once; later calls are no-ops.
    ///
    /// A missing or unreadable record keeps the seeded defaults. The session
    /// is marked hydrated either way.
    pub async fn init(&self) {
        let _guard = self.init_lock.lock().await;
        if self.is_hydrated() {
            return;
        }

        match self.persistence.load().await {
            Ok(Some(record)) => self.apply(record),
            Ok(None) => info!(key = self.persistence.key(), "no persisted session; using defaults"),
            Err(err) => {
                warn!(error = %err, "failed to load persisted session; using defaults");
            }
        }

        self.hydrated.store(true, Ordering::Release);
    }

    fn apply(&self, record: PersistedState) {
        let configured = record.credential.is_configured();
        self.credential.restore(record.credential);

        if record.endpoints.is_empty() {
            info!(credential_configured = configured, "persisted session has no endpoints");
            return;
        }

        let set = EndpointSet::from_endpoints(record.endpoints, &record.selected_endpoint);
        info!(
            endpoints = set.len(),
            selected = set.selected().map(|e| e.url.as_str()).unwrap_or_default(),
            credential_configured = configured,
            "session rehydrated"
        );
        self.registry.restore(set);
    }
}

fn default_set(config: &DefaultEndpointConfig) -> EndpointSet {
    let mut set = EndpointSet::default();
    match set.add(&config.tag, &config.url) {
        Ok(_) => set,
        Err(err) => {
            warn!(error = %err, "configured default endpoint rejected; using built-in default");
            let builtin = Endpoint::builtin_default();
            let url = builtin.url.clone();
            EndpointSet::from_endpoints(vec![builtin], &url)
        }
    }
}
