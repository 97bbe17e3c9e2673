//! Test utility functions for dataflow scenarios

use dataflow::core::{ErrorHandling, FlowEvent, FlowEventType, Pipeline, ValidationSchema};
use dataflow::execution::FlowEngine;
use dataflow::store::FlowStore;
use dataflow::target::{TargetError, TargetInvoker};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock target that records every invocation and rejects configured targets
#[derive(Clone, Default)]
pub struct ScriptedTarget {
    failing: Arc<HashSet<String>>,
    calls: Arc<Mutex<Vec<String>>>,
    simulate_delay: Option<Duration>,
}

impl ScriptedTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every payload handed to the given targets
    pub fn failing(targets: &[&str]) -> Self {
        Self {
            failing: Arc::new(targets.iter().map(|t| t.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.simulate_delay = Some(delay);
        self
    }

    /// Targets invoked so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TargetInvoker for ScriptedTarget {
    async fn invoke(&self, target: &str, payload: Value) -> Result<Value, TargetError> {
        self.calls.lock().unwrap().push(target.to_string());

        if let Some(delay) = self.simulate_delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(target) {
            return Err(TargetError::rejected(target, "scripted failure"));
        }

        let mut output = payload;
        if let Some(object) = output.as_object_mut() {
            let visited = object.entry("visited").or_insert_with(|| json!([]));
            if let Some(list) = visited.as_array_mut() {
                list.push(json!(target));
            }
        }
        Ok(output)
    }
}

/// Build an engine around the scripted target with one registered pipeline
pub async fn setup(
    targets: &[&str],
    required: &[&str],
    error_handling: ErrorHandling,
    invoker: ScriptedTarget,
) -> (FlowEngine<ScriptedTarget>, Pipeline) {
    let engine = FlowEngine::new(Arc::new(FlowStore::new()), invoker);
    let pipeline = engine
        .store()
        .create_pipeline(
            "scenario",
            "test-source",
            targets.iter().map(|t| t.to_string()).collect(),
            ValidationSchema::new(required.iter().map(|f| f.to_string()).collect()),
            error_handling,
        )
        .await;

    (engine, pipeline)
}

/// All retained events of a pipeline, newest first
pub async fn all_events(
    engine: &FlowEngine<ScriptedTarget>,
    pipeline: &Pipeline,
) -> Vec<FlowEvent> {
    engine.store().get_flow_events(pipeline.id, usize::MAX).await
}

/// Modules named by step events, in chronological order
pub fn step_modules(events: &[FlowEvent]) -> Vec<String> {
    events
        .iter()
        .rev()
        .filter(|e| e.event_type == FlowEventType::Step)
        .filter_map(|e| e.module.clone())
        .collect()
}

/// Assert events are ordered newest first
pub fn assert_newest_first(events: &[FlowEvent]) {
    for pair in events.windows(2) {
        assert!(
            pair[0].timestamp >= pair[1].timestamp,
            "events out of order: {:?} before {:?}",
            pair[0].timestamp,
            pair[1].timestamp
        );
    }
}

/// Flow id carried in an event's data
pub fn event_flow_id(event: &FlowEvent) -> String {
    event
        .data
        .as_ref()
        .and_then(|d| d.get("flowId"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| panic!("event {:?} has no flowId", event.event_type))
}
