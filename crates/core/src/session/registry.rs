//! Endpoint registry - configured backends, selection and reachability
//!
//! Invariants once the registry is non-empty:
//! - it holds between 1 and [`MAX_ENDPOINTS`] endpoints
//! - exactly one endpoint has `is_selected = true`
//!
//! Every operation validates before mutating, so a rejected call leaves the
//! set untouched. Successful mutations are persisted afterwards through
//! [`SessionPersistence`]; persistence failures never roll back.

use std::sync::Arc;

use livegate_domain::constants::MAX_ENDPOINTS;
use livegate_domain::{
    normalize_base_url, Endpoint, EndpointId, EndpointPatch, ProbeStatus, RegistryError,
};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::persistence::SessionPersistence;
use super::ports::HealthProbe;

/* -------------------------------------------------------------------------- */
/* EndpointSet */
/* -------------------------------------------------------------------------- */

/// Ordered endpoint collection enforcing the registry invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointSet {
    endpoints: Vec<Endpoint>,
}

impl EndpointSet {
    /// Build a set from arbitrary endpoints, repairing the invariants.
    ///
    /// Extra entries beyond capacity are dropped. Selection is kept when
    /// exactly one entry is selected; otherwise the entry whose URL equals
    /// `selected_url` wins, falling back to the first entry.
    pub fn from_endpoints(mut endpoints: Vec<Endpoint>, selected_url: &str) -> Self {
        endpoints.truncate(MAX_ENDPOINTS);
        for endpoint in &mut endpoints {
            if let Ok(url) = normalize_base_url(&endpoint.url) {
                endpoint.url = url;
            }
        }

        let selected_count = endpoints.iter().filter(|e| e.is_selected).count();
        if selected_count != 1 && !endpoints.is_empty() {
            let wanted = selected_url.trim().trim_end_matches('/');
            let index = endpoints.iter().position(|e| !wanted.is_empty() && e.url == wanted);
            let index = index.unwrap_or(0);
            for (i, endpoint) in endpoints.iter_mut().enumerate() {
                endpoint.is_selected = i == index;
            }
        }

        Self { endpoints }
    }

    /// Endpoints in registry order
    pub fn as_slice(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Number of endpoints
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether the set holds no endpoints
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoint with identifier `id`
    pub fn get(&self, id: &EndpointId) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| &e.id == id)
    }

    /// The selected endpoint, if any
    pub fn selected(&self) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.is_selected)
    }

    /// Append a new endpoint. The first endpoint of an empty set is selected.
    pub fn add(&mut self, tag: &str, url: &str) -> Result<Endpoint, RegistryError> {
        if self.endpoints.len() >= MAX_ENDPOINTS {
            return Err(RegistryError::capacity_exceeded());
        }

        let mut endpoint = Endpoint::new(tag, url)?;
        endpoint.is_selected = self.endpoints.is_empty();
        self.endpoints.push(endpoint.clone());
        Ok(endpoint)
    }

    /// Merge `patch` into the endpoint `id`. Selection is never touched.
    pub fn update(&mut self, id: &EndpointId, patch: EndpointPatch) -> Result<Endpoint, RegistryError> {
        let index = self.index_of(id)?;
        let url = patch.url.as_deref().map(normalize_base_url).transpose()?;

        let endpoint = &mut self.endpoints[index];
        if let Some(tag) = patch.tag {
            endpoint.tag = tag.trim().to_string();
        }
        if let Some(url) = url {
            if url != endpoint.url {
                // Reachability was measured against the old URL.
                endpoint.is_active = false;
            }
            endpoint.url = url;
        }
        if let Some(active) = patch.is_active {
            endpoint.is_active = active;
        }
        Ok(endpoint.clone())
    }

    /// Remove `id`, moving the selection to the first remaining endpoint if
    /// the removed one was selected.
    pub fn remove(&mut self, id: &EndpointId) -> Result<Endpoint, RegistryError> {
        if self.endpoints.len() <= 1 {
            return Err(RegistryError::LastEndpoint);
        }

        let index = self.index_of(id)?;
        let removed = self.endpoints.remove(index);
        if removed.is_selected {
            if let Some(first) = self.endpoints.first_mut() {
                first.is_selected = true;
            }
        }
        Ok(removed)
    }

    /// Select `id` and deselect every other endpoint.
    pub fn select(&mut self, id: &EndpointId) -> Result<Endpoint, RegistryError> {
        let index = self.index_of(id)?;
        for (i, endpoint) in self.endpoints.iter_mut().enumerate() {
            endpoint.is_selected = i == index;
        }
        Ok(self.endpoints[index].clone())
    }

    /// Record reachability for every endpoint whose URL equals `url`.
    ///
    /// Returns the number of endpoints updated.
    pub fn mark_reachability(&mut self, url: &str, active: bool) -> usize {
        let mut matched = 0;
        for endpoint in self.endpoints.iter_mut().filter(|e| e.url == url) {
            endpoint.is_active = active;
            matched += 1;
        }
        matched
    }

    fn index_of(&self, id: &EndpointId) -> Result<usize, RegistryError> {
        self.endpoints
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| RegistryError::not_found(id.as_str()))
    }
}

/* -------------------------------------------------------------------------- */
/* EndpointRegistry */
/* -------------------------------------------------------------------------- */

/// Registry service: thread-safe [`EndpointSet`] plus probing and persistence.
pub struct EndpointRegistry {
    set: RwLock<EndpointSet>,
    probe: Arc<dyn HealthProbe>,
    persistence: Arc<SessionPersistence>,
}

impl EndpointRegistry {
    /// Registry over `initial`, probing and persisting through the given ports
    pub fn new(
        initial: EndpointSet,
        probe: Arc<dyn HealthProbe>,
        persistence: Arc<SessionPersistence>,
    ) -> Self {
        Self { set: RwLock::new(initial), probe, persistence }
    }

    /// Snapshot of all endpoints in registry order.
    pub fn list(&self) -> Vec<Endpoint> {
        self.set.read().as_slice().to_vec()
    }

    /// Number of endpoints
    pub fn len(&self) -> usize {
        self.set.read().len()
    }

    /// Whether the registry holds no endpoints
    pub fn is_empty(&self) -> bool {
        self.set.read().is_empty()
    }

    /// Endpoint with identifier `id`
    pub fn get(&self, id: &EndpointId) -> Option<Endpoint> {
        self.set.read().get(id).cloned()
    }

    /// The selected endpoint, if any
    pub fn selected(&self) -> Option<Endpoint> {
        self.set.read().selected().cloned()
    }

    /// Add an endpoint and persist the registry
    pub async fn add(&self, tag: &str, url: &str) -> Result<Endpoint, RegistryError> {
        let endpoint = self.set.write().add(tag, url)?;
        info!(endpoint_id = %endpoint.id, url = %endpoint.url, "endpoint added");
        self.persist().await;
        Ok(endpoint)
    }

    /// Apply `patch` to endpoint `id` and persist the registry
    pub async fn update(
        &self,
        id: &EndpointId,
        patch: EndpointPatch,
    ) -> Result<Endpoint, RegistryError> {
        let endpoint = self.set.write().update(id, patch)?;
        info!(endpoint_id = %endpoint.id, url = %endpoint.url, "endpoint updated");
        self.persist().await;
        Ok(endpoint)
    }

    /// Remove endpoint `id` and persist the registry
    pub async fn remove(&self, id: &EndpointId) -> Result<(), RegistryError> {
        let removed = self.set.write().remove(id)?;
        info!(endpoint_id = %removed.id, was_selected = removed.is_selected, "endpoint removed");
        self.persist().await;
        Ok(())
    }

    /// Select endpoint `id` and persist the registry
    pub async fn select(&self, id: &EndpointId) -> Result<(), RegistryError> {
        let selected = self.set.write().select(id)?;
        info!(endpoint_id = %selected.id, url = %selected.url, "endpoint selected");
        self.persist().await;
        Ok(())
    }

    /// Probe the selected endpoint (or `url_override`) and record the result.
    ///
    /// Never fails: unreachable, non-2xx and malformed targets all yield
    /// [`ProbeStatus::Inactive`].
    pub async fn probe(&self, url_override: Option<&str>) -> ProbeStatus {
        let target = match url_override {
            Some(raw) => match normalize_base_url(raw) {
                Ok(url) => url,
                Err(err) => {
                    warn!(error = %err, "probe target is not a valid URL");
                    return ProbeStatus::Inactive;
                }
            },
            None => match self.selected() {
                Some(endpoint) => endpoint.url,
                None => {
                    warn!("probe requested with no selected endpoint");
                    return ProbeStatus::Inactive;
                }
            },
        };

        let status = self.probe.check(&target).await;
        debug!(url = %target, %status, "endpoint probed");

        let matched = self.set.write().mark_reachability(&target, status.is_active());
        if matched > 0 {
            self.persist().await;
        }
        status
    }

    /// Replace the whole set, used when rehydrating.
    pub(crate) fn restore(&self, set: EndpointSet) {
        *self.set.write() = set;
    }

    async fn persist(&self) {
        self.persistence
            .persist_with(|record| {
                let set = self.set.read();
                record.endpoints = set.as_slice().to_vec();
                record.selected_endpoint =
                    set.selected().map(|e| e.url.clone()).unwrap_or_default();
            })
            .await;
    }
}
