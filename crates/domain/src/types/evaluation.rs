//! Evaluation request/response types and per-item results

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::media::{ImageInfo, InputFile, PreviewRef};
use crate::constants::{
    DIAGNOSTIC_ERROR_PREFIX, DIAGNOSTIC_NO_RESULT_LOG, DIAGNOSTIC_PROCESSING_ERROR, NOT_AVAILABLE,
};

/* -------------------------------------------------------------------------- */
/* Liveness API payloads */
/* -------------------------------------------------------------------------- */

/// Optional tracking fields forwarded with each evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,
}

/// Body of a passive-liveness evaluation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessRequest {
    /// Base64-encoded image bytes
    pub image_buffer: String,
    #[serde(flatten)]
    pub tracking: TrackingFields,
}

impl LivenessRequest {
    /// Request for a base64 image payload
    pub fn new(image_buffer: impl Into<String>) -> Self {
        Self { image_buffer: image_buffer.into(), tracking: TrackingFields::default() }
    }

    /// Attach tracking fields
    pub fn with_tracking(mut self, tracking: TrackingFields) -> Self {
        self.tracking = tracking;
        self
    }
}

/// Successful provider response.
///
/// The provider payload is kept verbatim in `raw`; `service_result_log` is the
/// human-readable diagnostic extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessResponse {
    pub service_result_log: Option<String>,
    pub raw: Value,
}

impl LivenessResponse {
    /// Wrap a provider payload, extracting `serviceResultLog`
    pub fn from_raw(raw: Value) -> Self {
        let service_result_log =
            raw.get("serviceResultLog").and_then(Value::as_str).map(str::to_string);
        Self { service_result_log, raw }
    }

    /// Diagnostic shown for this response, with a fallback when the provider
    /// omitted `serviceResultLog`.
    pub fn diagnostic(&self) -> String {
        self.service_result_log.clone().unwrap_or_else(|| DIAGNOSTIC_NO_RESULT_LOG.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* Evaluation items */
/* -------------------------------------------------------------------------- */

/// One file's worth of derived metadata plus its evaluation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationItem {
    /// File name without extension
    pub title: String,
    /// Original file name
    pub source_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_ref: Option<PreviewRef>,
    pub resolution: String,
    pub size_formatted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_info: Option<ImageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl EvaluationItem {
    /// Item for a successfully decoded image, before any evaluation.
    pub fn decoded(file: &InputFile, info: ImageInfo, preview: Option<PreviewRef>) -> Self {
        Self {
            title: file.title(),
            source_ref: file.name.clone(),
            preview_ref: preview,
            resolution: info.resolution(),
            size_formatted: info.size_formatted(),
            image_info: Some(info),
            diagnostic: None,
            raw_response: None,
            error_message: None,
        }
    }

    /// Item for a file that could not be decoded or converted.
    pub fn degraded(file: &InputFile, error: impl Into<String>) -> Self {
        Self {
            title: file.title(),
            source_ref: file.name.clone(),
            preview_ref: None,
            resolution: NOT_AVAILABLE.to_string(),
            size_formatted: NOT_AVAILABLE.to_string(),
            image_info: None,
            diagnostic: Some(DIAGNOSTIC_PROCESSING_ERROR.to_string()),
            raw_response: None,
            error_message: Some(error.into()),
        }
    }

    /// Record a successful evaluation, clearing any error
    pub fn record_success(&mut self, response: LivenessResponse) {
        self.diagnostic = Some(response.diagnostic());
        self.raw_response = Some(response.raw);
        self.error_message = None;
    }

    /// Record a failed evaluation as an error diagnostic
    pub fn record_failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.diagnostic = Some(format!("{DIAGNOSTIC_ERROR_PREFIX}{message}"));
        self.error_message = Some(message);
    }

    /// Whether the item carries an error
    pub fn is_failed(&self) -> bool {
        self.error_message.is_some()
    }
}

/* -------------------------------------------------------------------------- */
/* Reports */
/* -------------------------------------------------------------------------- */

/// Outcome of an evaluation command.
///
/// The discriminant is chosen by whoever builds the report, never inferred
/// from the payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvaluationReport {
    Single {
        item: EvaluationItem,
    },
    #[serde(rename_all = "camelCase")]
    Batch {
        job_id: String,
        items: Vec<EvaluationItem>,
        total: usize,
        failed: usize,
        elapsed_ms: u64,
    },
}

impl EvaluationReport {
    /// Items of the report, in display order
    pub fn items(&self) -> &[EvaluationItem] {
        match self {
            Self::Single { item } => std::slice::from_ref(item),
            Self::Batch { items, .. } => items,
        }
    }
}
