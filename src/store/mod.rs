//! In-memory state for pipelines, their event logs and metrics
//!
//! A single [`FlowStore`] is created at startup and shared by `Arc` between
//! the execution engine and the HTTP layer. Nothing outlives the process.

pub mod event_log;
pub mod metrics;
pub mod registry;

pub use event_log::{EventLog, DEFAULT_EVENT_LIMIT, MAX_EVENTS_PER_PIPELINE};
pub use metrics::{FlowMetrics, PipelineOverview, RECENT_EVENT_COUNT};

use crate::core::Pipeline;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A pipeline together with the events recorded for it
#[derive(Debug)]
struct PipelineEntry {
    pipeline: Pipeline,
    events: EventLog,
}

impl PipelineEntry {
    fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            events: EventLog::new(MAX_EVENTS_PER_PIPELINE),
        }
    }
}

/// Registry, event logs and metrics for every pipeline
#[derive(Debug, Default)]
pub struct FlowStore {
    entries: RwLock<HashMap<Uuid, PipelineEntry>>,
}

impl FlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered pipelines
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
