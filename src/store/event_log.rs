//! Bounded per-pipeline event log

use super::FlowStore;
use crate::core::FlowEvent;
use std::collections::VecDeque;
use tracing::{debug, info};
use uuid::Uuid;

/// Events retained per pipeline before the oldest are evicted
pub const MAX_EVENTS_PER_PIPELINE: usize = 1000;

/// Events returned when the caller does not ask for a specific amount
pub const DEFAULT_EVENT_LIMIT: usize = 50;

/// Chronological ring of flow events with FIFO eviction
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<FlowEvent>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Append an event, evicting the oldest ones past capacity
    pub fn push(&mut self, event: FlowEvent) {
        self.events.push_back(event);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    /// The `limit` most recent events, newest first
    pub fn recent(&self, limit: usize) -> Vec<FlowEvent> {
        self.events.iter().rev().take(limit).cloned().collect()
    }

    /// Retained events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &FlowEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl FlowStore {
    /// Append an event to a pipeline's log under a fresh ID
    ///
    /// Returns the stored event, or `None` when the pipeline is unknown.
    pub async fn log_flow_event(
        &self,
        pipeline_id: Uuid,
        mut event: FlowEvent,
    ) -> Option<FlowEvent> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&pipeline_id)?;

        event.id = Uuid::new_v4();
        event.pipeline_id = pipeline_id;
        entry.events.push(event.clone());

        debug!(
            "Logged {:?} event for pipeline {} ({} retained)",
            event.event_type,
            pipeline_id,
            entry.events.len()
        );

        Some(event)
    }

    /// The `limit` most recent events of a pipeline, newest first
    pub async fn get_flow_events(&self, pipeline_id: Uuid, limit: usize) -> Vec<FlowEvent> {
        self.entries
            .read()
            .await
            .get(&pipeline_id)
            .map(|entry| entry.events.recent(limit))
            .unwrap_or_default()
    }

    /// Drop all events and zero the metrics of a pipeline, keeping its definition
    ///
    /// Returns `false` when the pipeline is unknown.
    pub async fn clear_pipeline_history(&self, pipeline_id: Uuid) -> bool {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&pipeline_id) else {
            return false;
        };

        let dropped = entry.events.len();
        entry.events.clear();
        entry.pipeline.metrics.reset();

        info!(
            "Cleared history for pipeline {} ({} events dropped)",
            pipeline_id, dropped
        );

        true
    }
}
