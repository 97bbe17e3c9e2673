//! Flow execution outcomes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Error string reported when a payload misses required fields
pub const VALIDATION_FAILED: &str = "Data validation failed";

/// Message reported for flows submitted to an unknown pipeline
pub const PIPELINE_NOT_FOUND: &str = "Pipeline not found";

/// Outcome of a single target invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
}

/// Result of routing a flow through one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Target label
    pub module: String,

    pub status: StepStatus,

    /// Elapsed milliseconds
    pub duration: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    pub fn success(module: impl Into<String>, duration: u64) -> Self {
        Self {
            module: module.into(),
            status: StepStatus::Success,
            duration,
            error: None,
        }
    }

    pub fn failed(module: impl Into<String>, duration: u64, error: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            status: StepStatus::Failed,
            duration,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// A flow that ran through every target
#[derive(Debug, Clone)]
pub struct FlowReport {
    pub flow_id: Uuid,

    /// Total elapsed milliseconds
    pub duration_ms: u64,

    /// Output of the last target
    pub processed_data: Value,

    /// One entry per attempted target, in order
    pub steps: Vec<StepResult>,
}

impl FlowReport {
    /// Steps that failed under log-and-continue
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|s| !s.is_success())
    }
}

/// Top-level result of `process_data_flow`
#[derive(Debug, Clone)]
pub enum FlowOutcome {
    /// The flow reached the end of the pipeline
    Completed(FlowReport),

    /// No pipeline with the requested ID exists; nothing was recorded
    PipelineNotFound,

    /// The payload was rejected before any target ran
    ValidationFailed {
        flow_id: Uuid,
        duration_ms: u64,
        missing: Vec<String>,
    },

    /// A target failed under fail-fast and the remaining targets were skipped
    Aborted {
        flow_id: Uuid,
        duration_ms: u64,
        module: String,
        error: String,
        steps: Vec<StepResult>,
    },
}

impl FlowOutcome {
    /// Check if the flow counts as successful at the top level
    pub fn is_success(&self) -> bool {
        matches!(self, FlowOutcome::Completed(_))
    }

    pub fn flow_id(&self) -> Option<Uuid> {
        match self {
            FlowOutcome::Completed(report) => Some(report.flow_id),
            FlowOutcome::PipelineNotFound => None,
            FlowOutcome::ValidationFailed { flow_id, .. }
            | FlowOutcome::Aborted { flow_id, .. } => Some(*flow_id),
        }
    }

    /// Error string for failed outcomes
    pub fn error_message(&self) -> Option<String> {
        match self {
            FlowOutcome::Completed(_) => None,
            FlowOutcome::PipelineNotFound => Some(PIPELINE_NOT_FOUND.to_string()),
            FlowOutcome::ValidationFailed { .. } => Some(VALIDATION_FAILED.to_string()),
            FlowOutcome::Aborted { error, .. } => Some(error.clone()),
        }
    }

    /// Render the outcome in the `status`-tagged wire shape
    pub fn into_response(self) -> FlowResponse {
        match self {
            FlowOutcome::Completed(report) => FlowResponse {
                status: FlowStatus::Success,
                message: None,
                flow_id: Some(report.flow_id),
                duration: Some(report.duration_ms),
                processed_data: Some(report.processed_data),
                steps: Some(report.steps),
                error: None,
            },
            FlowOutcome::PipelineNotFound => FlowResponse {
                status: FlowStatus::Error,
                message: Some(PIPELINE_NOT_FOUND.to_string()),
                ..FlowResponse::empty()
            },
            FlowOutcome::ValidationFailed {
                flow_id,
                duration_ms,
                ..
            } => FlowResponse {
                status: FlowStatus::Error,
                flow_id: Some(flow_id),
                duration: Some(duration_ms),
                error: Some(VALIDATION_FAILED.to_string()),
                ..FlowResponse::empty()
            },
            FlowOutcome::Aborted {
                flow_id,
                duration_ms,
                error,
                ..
            } => FlowResponse {
                status: FlowStatus::Error,
                flow_id: Some(flow_id),
                duration: Some(duration_ms),
                error: Some(error),
                ..FlowResponse::empty()
            },
        }
    }
}

/// Top-level status string of a flow response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    Success,
    Error,
}

/// Wire representation of a flow outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    pub status: FlowStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepResult>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FlowResponse {
    fn empty() -> Self {
        Self {
            status: FlowStatus::Error,
            message: None,
            flow_id: None,
            duration: None,
            processed_data: None,
            steps: None,
            error: None,
        }
    }
}
