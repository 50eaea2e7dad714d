//! Application context for dependency injection

mod notifications;

use std::sync::Arc;
use std::time::Duration;

use livegate_core::{BatchEvaluationPipeline, ClientSession, PipelineObserver, StateStore};
use livegate_domain::{AppConfig, PipelineEvent, Result};
use livegate_infra::config;
use livegate_infra::{
    FsImageLoader, HttpClient, HttpEndpointProbe, InMemoryPreviewStore, LivenessClient,
    ServiceProxy, SqliteStateStore,
};
pub use notifications::{Notification, NotificationLevel};
use tokio::sync::broadcast;
use tracing::{debug, info};

const CHANNEL_CAPACITY: usize = 256;

/// Application context - holds all services and shared state
pub struct AppContext {
    pub config: AppConfig,
    pub session: Arc<ClientSession>,
    pub pipeline: Arc<BatchEvaluationPipeline>,
    pub previews: Arc<InMemoryPreviewStore>,
    pub proxy: Arc<ServiceProxy>,
    notifications: broadcast::Sender<Notification>,
    progress: broadcast::Sender<PipelineEvent>,
}

impl AppContext {
    /// Build the context from `LIVEGATE_*` variables or a config file
    pub async fn new() -> Result<Self> {
        let config = config::load()?;
        Self::new_with_config(config).await
    }

    /// Build the context with SQLite storage at `config.storage.path`
    pub async fn new_with_config(config: AppConfig) -> Result<Self> {
        let store = SqliteStateStore::open(&config.storage.path)?;
        Self::with_store(config, Arc::new(store)).await
    }

    /// Build the context over an existing state store.
    ///
    /// The session is rehydrated before this returns.
    pub async fn with_store(config: AppConfig, store: Arc<dyn StateStore>) -> Result<Self> {
        info!(
            storage = %config.storage.path,
            api_url = %config.api.liveness_url,
            concurrency = config.pipeline.concurrency,
            "initializing app context"
        );

        let probe =
            HttpEndpointProbe::with_timeout(Duration::from_secs(config.api.probe_timeout_secs))?;
        let session = Arc::new(ClientSession::new(store, Arc::new(probe), &config.default_endpoint));
        session.init().await;

        let (notifications, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (progress, _) = broadcast::channel(CHANNEL_CAPACITY);

        let previews = Arc::new(InMemoryPreviewStore::new());
        let pipeline = BatchEvaluationPipeline::new(
            Arc::new(LivenessClient::from_config(&config.api)?),
            Arc::new(FsImageLoader::new()),
            previews.clone(),
        )
        .with_config(&config.pipeline)
        .with_observer(Arc::new(ProgressForwarder { sender: progress.clone() }));

        let proxy_client = HttpClient::with_timeout(Duration::from_secs(config.api.timeout_secs))?;
        let proxy = Arc::new(ServiceProxy::new(proxy_client, Arc::clone(&session)));

        info!(endpoints = session.registry().len(), "app context ready");

        Ok(Self {
            config,
            session,
            pipeline: Arc::new(pipeline),
            previews,
            proxy,
            notifications,
            progress,
        })
    }

    /// Subscribe to command outcome notifications
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Subscribe to batch pipeline progress
    pub fn subscribe_progress(&self) -> broadcast::Receiver<PipelineEvent> {
        self.progress.subscribe()
    }

    pub(crate) fn notify(&self, notification: Notification) {
        // No receivers is not an error
        let _ = self.notifications.send(notification);
    }

    /// Release every preview still held by the pipeline
    pub fn shutdown(&self) -> usize {
        let released = self.pipeline.clear();
        info!(released, "app context shut down");
        released
    }
}

struct ProgressForwarder {
    sender: broadcast::Sender<PipelineEvent>,
}

impl PipelineObserver for ProgressForwarder {
    fn on_event(&self, event: &PipelineEvent) {
        if self.sender.send(event.clone()).is_err() {
            debug!("no progress subscribers");
        }
    }
}
