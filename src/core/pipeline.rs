//! Pipeline domain model

use crate::core::schema::ValidationSchema;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a flow reacts to a failing target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHandling {
    /// Abort the flow at the first failing target
    FailFast,
    /// Record the failure and keep routing through the remaining targets
    #[default]
    LogAndContinue,
}

/// Lifecycle status of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    #[default]
    Active,
    Inactive,
}

/// Running counters owned by a pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineMetrics {
    /// Number of flows that reached a top-level outcome
    pub total_flows: u64,

    /// Flows that ran to completion (individual steps may still have failed)
    pub successful_flows: u64,

    /// Flows rejected by validation or aborted by a fail-fast target
    pub failed_flows: u64,

    /// Running mean of successful flow durations, in milliseconds
    pub average_process_time: f64,

    /// When the last flow finished
    pub last_flow_time: Option<DateTime<Utc>>,
}

impl PipelineMetrics {
    /// Record a flow that completed at the top level
    pub fn record_success(&mut self, duration_ms: u64) {
        self.total_flows += 1;
        self.successful_flows += 1;
        self.last_flow_time = Some(Utc::now());

        // Incremental mean over successful flows only
        let n = self.successful_flows as f64;
        self.average_process_time =
            (self.average_process_time * (n - 1.0) + duration_ms as f64) / n;
    }

    /// Record a flow that failed at the top level
    pub fn record_failure(&mut self) {
        self.total_flows += 1;
        self.failed_flows += 1;
        self.last_flow_time = Some(Utc::now());
    }

    /// Zero every counter
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Percentage of flows that succeeded (0.0 when nothing ran yet)
    pub fn success_rate(&self) -> f64 {
        if self.total_flows == 0 {
            return 0.0;
        }
        self.successful_flows as f64 / self.total_flows as f64 * 100.0
    }
}

/// A named route from a source through an ordered list of targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    /// Unique pipeline ID
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// Free-text origin tag
    pub source: String,

    /// Target labels, invoked in this order
    pub targets: Vec<String>,

    /// Payload validation rules
    pub schema: ValidationSchema,

    /// Policy applied when a target fails
    pub error_handling: ErrorHandling,

    pub status: PipelineStatus,

    pub created_at: DateTime<Utc>,

    pub metrics: PipelineMetrics,
}

impl Pipeline {
    /// Create a new active pipeline with zeroed metrics
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        targets: Vec<String>,
        schema: ValidationSchema,
        error_handling: ErrorHandling,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source: source.into(),
            targets,
            schema,
            error_handling,
            status: PipelineStatus::Active,
            created_at: Utc::now(),
            metrics: PipelineMetrics::default(),
        }
    }

    /// Check if the pipeline aborts on the first target failure
    pub fn is_fail_fast(&self) -> bool {
        self.error_handling == ErrorHandling::FailFast
    }
}
