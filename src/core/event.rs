//! Flow lifecycle events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Kind of occurrence recorded in a pipeline's event log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowEventType {
    /// A flow entered the pipeline
    Start,
    /// A target processed the payload
    Step,
    /// A flow finished all targets
    Complete,
    /// A target failed, or the flow as a whole failed
    Error,
}

/// One observable occurrence during a flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEvent {
    /// Assigned by the event log on append
    pub id: Uuid,

    pub pipeline_id: Uuid,

    #[serde(rename = "type")]
    pub event_type: FlowEventType,

    pub timestamp: DateTime<Utc>,

    /// Target label, for step-level events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    pub status: String,

    /// Elapsed milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl FlowEvent {
    /// Create an event stamped with the current time
    pub fn new(pipeline_id: Uuid, event_type: FlowEventType, status: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            pipeline_id,
            event_type,
            timestamp: Utc::now(),
            module: None,
            status: status.into(),
            duration: None,
            data: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Check if this event ends a flow
    pub fn is_terminal(&self) -> bool {
        match self.event_type {
            FlowEventType::Complete => true,
            // Step-level errors carry the failing module
            FlowEventType::Error => self.module.is_none(),
            _ => false,
        }
    }
}
