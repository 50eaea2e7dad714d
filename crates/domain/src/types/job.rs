//! Batch job state and pipeline events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::evaluation::EvaluationItem;
use super::media::PreviewRef;
use crate::errors::PipelineError;

/// Lifecycle of a batch job: `Idle -> Running -> {Done, Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Done,
    Failed,
}

crate::impl_domain_status_conversions!(JobStatus {
    Idle => "idle",
    Running => "running",
    Done => "done",
    Failed => "failed",
});

impl JobStatus {
    /// Whether the job has finished
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Discrete per-item processing phase.
///
/// Presentation layers interpolate progress from these instead of a
/// timer-driven percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPhase {
    Validating,
    Converting,
    Calling,
    Done,
}

crate::impl_domain_status_conversions!(BatchPhase {
    Validating => "validating",
    Converting => "converting",
    Calling => "calling",
    Done => "done",
});

/// State of the pipeline's single job slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJobState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub status: JobStatus,
    pub items: Vec<EvaluationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl BatchJobState {
    /// Empty slot
    pub fn idle() -> Self {
        Self::default()
    }

    /// Job that has just started
    pub fn running(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            status: JobStatus::Running,
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Job that failed before processing any item
    pub fn failed(job_id: impl Into<String>, error: &PipelineError) -> Self {
        Self {
            job_id: Some(job_id.into()),
            status: JobStatus::Failed,
            error_message: Some(error.to_string()),
            started_at: Some(Utc::now()),
            elapsed_ms: Some(0),
            ..Self::default()
        }
    }

    /// Number of items carrying an error
    pub fn failed_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_failed()).count()
    }

    /// Preview references still held by this job's items.
    pub fn preview_refs(&self) -> impl Iterator<Item = &PreviewRef> {
        self.items.iter().filter_map(|item| item.preview_ref.as_ref())
    }
}

/// Notifications emitted by the batch pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    Started {
        job_id: String,
        total: usize,
    },
    ItemPhase {
        job_id: String,
        index: usize,
        title: String,
        phase: BatchPhase,
    },
    ItemFinished {
        job_id: String,
        index: usize,
        title: String,
        failed: bool,
    },
    Completed {
        job_id: String,
        total: usize,
        failed: usize,
        elapsed_ms: u64,
    },
    Failed {
        job_id: String,
        error: PipelineError,
    },
}
