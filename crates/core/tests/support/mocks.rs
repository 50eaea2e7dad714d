//! Mock port implementations for testing

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use livegate_core::{
    DecodedImage, HealthProbe, ImageLoader, LivenessEvaluator, PipelineObserver, PreviewStore,
    StateStore,
};
use livegate_domain::{
    ApiError, Credential, ImageInfo, InputFile, LiveGateError, LivenessRequest, LivenessResponse,
    PipelineEvent, PreviewRef, ProbeStatus, Result as DomainResult,
};
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Semaphore;

/* -------------------------------------------------------------------------- */
/* StateStore */
/* -------------------------------------------------------------------------- */

/// In-memory key-value store. Saves can be switched to fail.
#[derive(Default)]
pub struct MemoryStateStore {
    records: Mutex<HashMap<String, String>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStateStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store seeded with a raw record.
    pub fn with_record(key: &str, value: &str) -> Arc<Self> {
        let store = Self::default();
        store.records.lock().insert(key.to_string(), value.to_string());
        Arc::new(store)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn record(&self, key: &str) -> Option<serde_json::Value> {
        let raw = self.records.lock().get(key).cloned()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.records.lock().get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> DomainResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LiveGateError::Storage("disk full".into()));
        }
        self.records.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store whose reads always fail.
pub struct BrokenStateStore;

#[async_trait]
impl StateStore for BrokenStateStore {
    async fn load(&self, _key: &str) -> DomainResult<Option<String>> {
        Err(LiveGateError::Storage("database is locked".into()))
    }

    async fn save(&self, _key: &str, _value: &str) -> DomainResult<()> {
        Err(LiveGateError::Storage("database is locked".into()))
    }
}

/* -------------------------------------------------------------------------- */
/* HealthProbe */
/* -------------------------------------------------------------------------- */

/// Probe answering from a fixed set of reachable base URLs.
#[derive(Default)]
pub struct StaticProbe {
    reachable: HashSet<String>,
    checked: Mutex<Vec<String>>,
}

impl StaticProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reachable(urls: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            reachable: urls.iter().map(|u| (*u).to_string()).collect(),
            checked: Mutex::new(Vec::new()),
        })
    }

    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().clone()
    }
}

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn check(&self, base_url: &str) -> ProbeStatus {
        self.checked.lock().push(base_url.to_string());
        ProbeStatus::from(self.reachable.contains(base_url))
    }
}

/* -------------------------------------------------------------------------- */
/* ImageLoader */
/* -------------------------------------------------------------------------- */

/// Loader producing a fixed 640x480 image for any file; the base64 payload is
/// `b64:<file name>` so evaluator scripts can key on it.
#[derive(Default)]
pub struct MockImageLoader {
    undecodable: HashSet<String>,
    unencodable: HashSet<String>,
}

impl MockImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_decode(mut self, name: &str) -> Self {
        self.undecodable.insert(name.to_string());
        self
    }

    pub fn failing_encode(mut self, name: &str) -> Self {
        self.unencodable.insert(name.to_string());
        self
    }
}

pub fn payload_for(name: &str) -> String {
    format!("b64:{name}")
}

#[async_trait]
impl ImageLoader for MockImageLoader {
    async fn decode(&self, file: &InputFile) -> DomainResult<DecodedImage> {
        if self.undecodable.contains(&file.name) {
            return Err(LiveGateError::Media(format!("cannot decode {}", file.name)));
        }
        Ok(DecodedImage {
            info: ImageInfo {
                width: 640,
                height: 480,
                size_bytes: 2048,
                name: file.name.clone(),
                mime_type: "image/png".into(),
            },
            bytes: vec![0u8; 16],
        })
    }

    async fn encode_base64(&self, file: &InputFile) -> DomainResult<String> {
        if self.unencodable.contains(&file.name) {
            return Err(LiveGateError::Media(format!("cannot read {}", file.name)));
        }
        Ok(payload_for(&file.name))
    }
}

/* -------------------------------------------------------------------------- */
/* LivenessEvaluator */
/* -------------------------------------------------------------------------- */

/// Scripted evaluator: succeeds with `"Live (<payload>)"` unless a failure is
/// registered for the payload. Calls for held payloads wait until
/// [`ScriptedEvaluator::open_gate`].
pub struct ScriptedEvaluator {
    failures: HashMap<String, ApiError>,
    held: HashSet<String>,
    gate: Semaphore,
    requests: Mutex<Vec<LivenessRequest>>,
}

impl Default for ScriptedEvaluator {
    fn default() -> Self {
        Self {
            failures: HashMap::new(),
            held: HashSet::new(),
            gate: Semaphore::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, file_name: &str, error: ApiError) -> Self {
        self.failures.insert(payload_for(file_name), error);
        self
    }

    pub fn holding(mut self, file_name: &str) -> Self {
        self.held.insert(payload_for(file_name));
        self
    }

    pub fn open_gate(&self) {
        self.gate.add_permits(1024);
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<LivenessRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LivenessEvaluator for ScriptedEvaluator {
    async fn evaluate(
        &self,
        request: &LivenessRequest,
        _credential: &Credential,
    ) -> Result<LivenessResponse, ApiError> {
        self.requests.lock().push(request.clone());

        if self.held.contains(&request.image_buffer) {
            let _permit = self.gate.acquire().await.map_err(|e| ApiError::network(e.to_string()))?;
        }

        if let Some(error) = self.failures.get(&request.image_buffer) {
            return Err(error.clone());
        }
        Ok(LivenessResponse::from_raw(json!({
            "serviceResultLog": format!("Live ({})", request.image_buffer),
            "score": 0.97,
        })))
    }
}

/* -------------------------------------------------------------------------- */
/* PreviewStore */
/* -------------------------------------------------------------------------- */

/// Preview store tracking live references and double releases.
#[derive(Default)]
pub struct CountingPreviewStore {
    live: Mutex<HashSet<PreviewRef>>,
    created: AtomicUsize,
    double_releases: AtomicUsize,
}

impl CountingPreviewStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn double_releases(&self) -> usize {
        self.double_releases.load(Ordering::SeqCst)
    }
}

impl PreviewStore for CountingPreviewStore {
    fn create(&self, _bytes: Vec<u8>, _mime_type: &str) -> PreviewRef {
        let preview = PreviewRef::generate();
        self.created.fetch_add(1, Ordering::SeqCst);
        self.live.lock().insert(preview.clone());
        preview
    }

    fn release(&self, preview: &PreviewRef) -> bool {
        let removed = self.live.lock().remove(preview);
        if !removed {
            self.double_releases.fetch_add(1, Ordering::SeqCst);
        }
        removed
    }

    fn live_count(&self) -> usize {
        self.live.lock().len()
    }
}

/* -------------------------------------------------------------------------- */
/* PipelineObserver */
/* -------------------------------------------------------------------------- */

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().push(event.clone());
    }
}
