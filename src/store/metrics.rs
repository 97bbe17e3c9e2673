//! Metrics aggregation over pipelines and their event logs

use super::{FlowStore, DEFAULT_EVENT_LIMIT};
use crate::core::{FlowEvent, FlowEventType, Pipeline, PipelineMetrics};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

/// Events included per pipeline in the all-pipelines overview
pub const RECENT_EVENT_COUNT: usize = 5;

/// Point-in-time health of one pipeline
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMetrics {
    pub pipeline: Pipeline,

    /// Most recent events, newest first
    pub events: Vec<FlowEvent>,

    /// Flows that ran to completion
    pub completed_flows: u64,

    /// Flows that failed at the top level
    pub failed_flows: u64,

    /// Percentage of successful flows
    pub success_rate: f64,
}

/// Summary row for the all-pipelines view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOverview {
    pub id: Uuid,
    pub name: String,
    pub metrics: PipelineMetrics,
    pub recent_events: Vec<FlowEvent>,
}

impl FlowStore {
    /// Record a flow that completed at the top level
    pub async fn record_flow_success(&self, pipeline_id: Uuid, duration_ms: u64) {
        match self.entries.write().await.get_mut(&pipeline_id) {
            Some(entry) => entry.pipeline.metrics.record_success(duration_ms),
            None => warn!("Dropping success metrics for unknown pipeline {}", pipeline_id),
        }
    }

    /// Record a flow that failed at the top level
    pub async fn record_flow_failure(&self, pipeline_id: Uuid) {
        match self.entries.write().await.get_mut(&pipeline_id) {
            Some(entry) => entry.pipeline.metrics.record_failure(),
            None => warn!("Dropping failure metrics for unknown pipeline {}", pipeline_id),
        }
    }

    /// Health view of a single pipeline
    ///
    /// Flow counts come from the pipeline's running counters. Terminal events
    /// in the log are not recounted because the log is capped and would
    /// undercount long-lived pipelines.
    pub async fn get_flow_metrics(&self, pipeline_id: Uuid) -> Option<FlowMetrics> {
        let entries = self.entries.read().await;
        let entry = entries.get(&pipeline_id)?;
        let metrics = &entry.pipeline.metrics;

        Some(FlowMetrics {
            pipeline: entry.pipeline.clone(),
            events: entry.events.recent(DEFAULT_EVENT_LIMIT),
            completed_flows: metrics.successful_flows,
            failed_flows: metrics.failed_flows,
            success_rate: metrics.success_rate(),
        })
    }

    /// Overview of every pipeline with its latest events
    pub async fn get_all_metrics(&self) -> Vec<PipelineOverview> {
        let entries = self.entries.read().await;
        let mut overview: Vec<PipelineOverview> = entries
            .values()
            .map(|entry| PipelineOverview {
                id: entry.pipeline.id,
                name: entry.pipeline.name.clone(),
                metrics: entry.pipeline.metrics.clone(),
                recent_events: entry.events.recent(RECENT_EVENT_COUNT),
            })
            .collect();

        overview.sort_by(|a, b| a.name.cmp(&b.name));
        overview
    }

    /// Count retained terminal events of a pipeline as (completed, failed)
    pub async fn count_terminal_events(&self, pipeline_id: Uuid) -> (usize, usize) {
        let entries = self.entries.read().await;
        let Some(entry) = entries.get(&pipeline_id) else {
            return (0, 0);
        };

        entry
            .events
            .iter()
            .filter(|event| event.is_terminal())
            .fold((0, 0), |(completed, failed), event| match event.event_type {
                FlowEventType::Complete => (completed + 1, failed),
                _ => (completed, failed + 1),
            })
    }
}
