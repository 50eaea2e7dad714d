//! Batch evaluation pipeline - core business logic
//!
//! Runs one job at a time over a set of local files:
//!
//! 1. keep only files with a supported image extension (none left fails the
//!    job with [`PipelineError::NoValidFiles`] before any network activity)
//! 2. per item, in input order: decode, convert to base64, call the liveness
//!    API (skipped when no credential is configured)
//! 3. sort the results by title and finish the job as `Done`
//!
//! Per-item failures are recorded on the item and never fail the job.
//!
//! # Job slot
//!
//! The pipeline owns a single job slot. Starting a run while another one is
//! in flight preempts it: the older run is cancelled, stops before its next
//! item, releases the previews it allocated and returns
//! [`PipelineError::Superseded`]. Previews held by a finished job are released
//! when a new run replaces it or on [`BatchEvaluationPipeline::clear`].

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use livegate_domain::constants::{DEFAULT_PIPELINE_CONCURRENCY, DIAGNOSTIC_MISSING_CREDENTIAL};
use livegate_domain::{
    ApiError, BatchJobState, BatchPhase, Credential, EvaluationItem, InputFile, JobStatus,
    LivenessRequest, PipelineConfig, PipelineError, PipelineEvent, PreviewRef, TrackingFields,
};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ordering::sort_by_title;
use super::ports::{DecodedImage, ImageLoader, LivenessEvaluator, PipelineObserver, PreviewStore};

#[derive(Default)]
struct JobSlot {
    state: BatchJobState,
    cancel: Option<CancellationToken>,
}

/// Batch evaluation pipeline
pub struct BatchEvaluationPipeline {
    evaluator: Arc<dyn LivenessEvaluator>,
    loader: Arc<dyn ImageLoader>,
    previews: Arc<dyn PreviewStore>,
    observers: Vec<Arc<dyn PipelineObserver>>,
    concurrency: usize,
    tracking: TrackingFields,
    slot: Mutex<JobSlot>,
}

impl BatchEvaluationPipeline {
    /// Pipeline with sequential processing and no observers
    pub fn new(
        evaluator: Arc<dyn LivenessEvaluator>,
        loader: Arc<dyn ImageLoader>,
        previews: Arc<dyn PreviewStore>,
    ) -> Self {
        Self {
            evaluator,
            loader,
            previews,
            observers: Vec::new(),
            concurrency: DEFAULT_PIPELINE_CONCURRENCY,
            tracking: TrackingFields::default(),
            slot: Mutex::new(JobSlot::default()),
        }
    }

    /// Apply settings from configuration
    pub fn with_config(self, config: &PipelineConfig) -> Self {
        self.with_concurrency(config.concurrency)
    }

    /// Number of items evaluated at once (minimum 1).
    ///
    /// Attempts always start in input order; with 1 they are strictly
    /// sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Tracking fields forwarded with every evaluation request
    pub fn with_tracking(mut self, tracking: TrackingFields) -> Self {
        self.tracking = tracking;
        self
    }

    /// Add an observer for pipeline events
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Snapshot of the current job state
    pub fn state(&self) -> BatchJobState {
        self.slot.lock().state.clone()
    }

    /// Status of the current job
    pub fn status(&self) -> JobStatus {
        self.slot.lock().state.status
    }

    /// Run a batch job over `files`.
    ///
    /// Returns the final job state. Items in the result are ordered by title,
    /// not by processing order.
    pub async fn run(
        &self,
        files: Vec<InputFile>,
        credential: &Credential,
    ) -> Result<BatchJobState, PipelineError> {
        let job_id = Uuid::new_v4().to_string();
        let submitted = files.len();
        let valid: Vec<InputFile> =
            files.into_iter().filter(InputFile::has_supported_extension).collect();
        let skipped = submitted - valid.len();

        if valid.is_empty() {
            let error = PipelineError::NoValidFiles;
            self.install(BatchJobState::failed(job_id.as_str(), &error), None);
            warn!(job_id = %job_id, submitted, "batch job rejected: no supported image files");
            self.emit(PipelineEvent::Failed { job_id, error: error.clone() });
            return Err(error);
        }

        let token = CancellationToken::new();
        self.install(BatchJobState::running(job_id.as_str()), Some(token.clone()));

        let total = valid.len();
        info!(job_id = %job_id, total, skipped, concurrency = self.concurrency, "batch job started");
        self.emit(PipelineEvent::Started { job_id: job_id.clone(), total });

        let started = Instant::now();
        let processed: Vec<Option<EvaluationItem>> = stream::iter(valid.into_iter().enumerate())
            .map(|(index, file)| self.process_item(&job_id, index, file, credential, &token))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut items: Vec<EvaluationItem> = processed.into_iter().flatten().collect();
        sort_by_title(&mut items);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match self.finish(&token, items, elapsed_ms) {
            Ok(state) => {
                let failed = state.failed_count();
                info!(job_id = %job_id, total, failed, elapsed_ms, "batch job completed");
                self.emit(PipelineEvent::Completed { job_id, total, failed, elapsed_ms });
                Ok(state)
            }
            Err(orphans) => {
                let released = self.release_all(orphans.iter().filter_map(|i| i.preview_ref.as_ref()));
                info!(job_id = %job_id, released, "batch job superseded");
                let error = PipelineError::Superseded;
                self.emit(PipelineEvent::Failed { job_id, error: error.clone() });
                Err(error)
            }
        }
    }

    /// Release every preview of the current job and reset to `Idle`.
    ///
    /// An in-flight run is cancelled and cleans up after itself. Returns the
    /// number of previews released.
    pub fn clear(&self) -> usize {
        let previous = {
            let mut slot = self.slot.lock();
            if let Some(token) = slot.cancel.take() {
                token.cancel();
            }
            std::mem::take(&mut slot.state)
        };

        let released = self.release_all(previous.preview_refs());
        info!(released, "batch results cleared");
        released
    }

    async fn process_item(
        &self,
        job_id: &str,
        index: usize,
        file: InputFile,
        credential: &Credential,
        token: &CancellationToken,
    ) -> Option<EvaluationItem> {
        if token.is_cancelled() {
            return None;
        }

        let title = file.title();
        self.emit_phase(job_id, index, &title, BatchPhase::Validating);
        let DecodedImage { info, bytes } = match self.loader.decode(&file).await {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(job_id, index, file = %file.name, error = %err, "failed to decode image");
                return Some(self.finish_item(job_id, index, EvaluationItem::degraded(&file, err.to_string())));
            }
        };

        let preview = self.previews.create(bytes, &info.mime_type);
        let mut item = EvaluationItem::decoded(&file, info, Some(preview));

        self.emit_phase(job_id, index, &title, BatchPhase::Converting);
        let payload = match self.loader.encode_base64(&file).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(job_id, index, file = %file.name, error = %err, "failed to encode image");
                if let Some(preview) = item.preview_ref.take() {
                    self.previews.release(&preview);
                }
                return Some(self.finish_item(job_id, index, EvaluationItem::degraded(&file, err.to_string())));
            }
        };

        if credential.is_configured() {
            self.emit_phase(job_id, index, &title, BatchPhase::Calling);
            let request = LivenessRequest::new(payload).with_tracking(self.tracking.clone());
            match self.evaluator.evaluate(&request, credential).await {
                Ok(response) => item.record_success(response),
                Err(err) => {
                    warn!(
                        job_id,
                        index,
                        file = %file.name,
                        kind = %err.kind(),
                        status = ?err.status(),
                        error = %err,
                        "liveness evaluation failed"
                    );
                    item.record_failure(err.to_string());
                }
            }
        } else {
            debug!(job_id, index, "no credential configured; skipping evaluation call");
            item.diagnostic = Some(DIAGNOSTIC_MISSING_CREDENTIAL.to_string());
            item.error_message = Some(ApiError::MissingCredential.to_string());
        }

        Some(self.finish_item(job_id, index, item))
    }

    fn finish_item(&self, job_id: &str, index: usize, item: EvaluationItem) -> EvaluationItem {
        self.emit_phase(job_id, index, &item.title, BatchPhase::Done);
        self.emit(PipelineEvent::ItemFinished {
            job_id: job_id.to_string(),
            index,
            title: item.title.clone(),
            failed: item.is_failed(),
        });
        item
    }

    /// Replace the slot's job, cancelling any run still in flight. Previews
    /// held by the replaced job are released.
    fn install(&self, state: BatchJobState, token: Option<CancellationToken>) {
        let previous = {
            let mut slot = self.slot.lock();
            if let Some(running) = slot.cancel.take() {
                info!(
                    job_id = slot.state.job_id.as_deref().unwrap_or_default(),
                    "preempting in-flight batch job"
                );
                running.cancel();
            }
            slot.cancel = token;
            std::mem::replace(&mut slot.state, state)
        };
        self.release_all(previous.preview_refs());
    }

    /// Store the finished job unless this run was cancelled meanwhile; in
    /// that case the items are handed back so their previews can be released.
    fn finish(
        &self,
        token: &CancellationToken,
        items: Vec<EvaluationItem>,
        elapsed_ms: u64,
    ) -> Result<BatchJobState, Vec<EvaluationItem>> {
        let mut slot = self.slot.lock();
        if token.is_cancelled() {
            return Err(items);
        }

        slot.cancel = None;
        slot.state.status = JobStatus::Done;
        slot.state.items = items;
        slot.state.elapsed_ms = Some(elapsed_ms);
        Ok(slot.state.clone())
    }

    fn release_all<'a>(&self, previews: impl Iterator<Item = &'a PreviewRef>) -> usize {
        previews.filter(|preview| self.previews.release(preview)).count()
    }

    fn emit_phase(&self, job_id: &str, index: usize, title: &str, phase: BatchPhase) {
        self.emit(PipelineEvent::ItemPhase {
            job_id: job_id.to_string(),
            index,
            title: title.to_string(),
            phase,
        });
    }

    fn emit(&self, event: PipelineEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}
