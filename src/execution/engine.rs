//! Flow engine - drives a payload through a pipeline's targets

use crate::{
    core::{
        FlowEvent, FlowEventType, FlowOutcome, FlowReport, Pipeline, StepResult, VALIDATION_FAILED,
    },
    execution::{ExecutionResult, StepExecutor},
    store::FlowStore,
    target::TargetInvoker,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&FlowEvent) + Send + Sync>;

/// Engine tuning knobs
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Per-target time limit; `None` waits indefinitely
    pub step_timeout: Option<Duration>,
}

/// Runs flows against pipelines held in a shared [`FlowStore`]
pub struct FlowEngine<T> {
    store: Arc<FlowStore>,
    executor: Arc<StepExecutor<T>>,
    event_handlers: Arc<Mutex<Vec<EventHandler>>>,
}

impl<T: TargetInvoker + 'static> FlowEngine<T> {
    pub fn new(store: Arc<FlowStore>, invoker: T) -> Self {
        Self::with_config(store, invoker, EngineConfig::default())
    }

    pub fn with_config(store: Arc<FlowStore>, invoker: T, config: EngineConfig) -> Self {
        let executor = StepExecutor::new(invoker).with_timeout(config.step_timeout);

        Self {
            store,
            executor: Arc::new(executor),
            event_handlers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The store this engine records into
    pub fn store(&self) -> &Arc<FlowStore> {
        &self.store
    }

    /// Add an event handler, called for every event after it is logged
    pub async fn add_event_handler<F>(&self, handler: F)
    where
        F: Fn(&FlowEvent) + Send + Sync + 'static,
    {
        self.event_handlers.lock().await.push(Arc::new(handler));
    }

    /// Log an event and emit it to all handlers
    async fn emit_event(&self, pipeline_id: Uuid, event: FlowEvent) {
        if let Some(stored) = self.store.log_flow_event(pipeline_id, event).await {
            let handlers = self.event_handlers.lock().await;
            for handler in handlers.iter() {
                handler(&stored);
            }
        }
    }

    /// Validate a payload and route it through every target of a pipeline
    pub async fn process_data_flow(&self, pipeline_id: Uuid, data: Value) -> FlowOutcome {
        let Some(pipeline) = self.store.get_pipeline(pipeline_id).await else {
            warn!("Flow submitted to unknown pipeline {}", pipeline_id);
            return FlowOutcome::PipelineNotFound;
        };

        let flow_id = Uuid::new_v4();
        let started = Instant::now();

        info!("Starting flow {} on pipeline {} ({})", flow_id, pipeline.name, pipeline.id);
        self.emit_event(
            pipeline.id,
            FlowEvent::new(pipeline.id, FlowEventType::Start, "started").with_data(json!({
                "flowId": flow_id,
                "source": pipeline.source,
                "targets": pipeline.targets.len(),
            })),
        )
        .await;

        if let Err(missing) = pipeline.schema.validate(&data) {
            warn!("Flow {} failed validation, missing: {:?}", flow_id, missing);
            let duration_ms = elapsed_ms(started);
            self.fail_flow(
                &pipeline,
                flow_id,
                duration_ms,
                json!({
                    "flowId": flow_id,
                    "error": VALIDATION_FAILED,
                    "missing": missing,
                }),
            )
            .await;

            return FlowOutcome::ValidationFailed {
                flow_id,
                duration_ms,
                missing,
            };
        }

        let mut current = data;
        let mut steps = Vec::with_capacity(pipeline.targets.len());

        for target in &pipeline.targets {
            match self.executor.execute(target, current.clone()).await {
                ExecutionResult::Success { output, duration_ms } => {
                    steps.push(StepResult::success(target, duration_ms));
                    self.emit_event(
                        pipeline.id,
                        FlowEvent::new(pipeline.id, FlowEventType::Step, "success")
                            .with_module(target)
                            .with_duration(duration_ms)
                            .with_data(json!({ "flowId": flow_id })),
                    )
                    .await;
                    current = output;
                }
                ExecutionResult::Failed { error, duration_ms } => {
                    let message = error.to_string();

                    if pipeline.is_fail_fast() {
                        let module = error.target().to_string();
                        warn!("Flow {} aborted at target {}: {}", flow_id, module, message);
                        let total_ms = elapsed_ms(started);
                        self.fail_flow(
                            &pipeline,
                            flow_id,
                            total_ms,
                            json!({
                                "flowId": flow_id,
                                "error": message,
                                "failedModule": module,
                            }),
                        )
                        .await;

                        return FlowOutcome::Aborted {
                            flow_id,
                            duration_ms: total_ms,
                            module,
                            error: message,
                            steps,
                        };
                    }

                    warn!("Flow {} continuing past failed target {}: {}", flow_id, target, message);
                    steps.push(StepResult::failed(target, duration_ms, message.clone()));
                    self.emit_event(
                        pipeline.id,
                        FlowEvent::new(pipeline.id, FlowEventType::Error, "failed")
                            .with_module(target)
                            .with_duration(duration_ms)
                            .with_data(json!({ "flowId": flow_id, "error": message })),
                    )
                    .await;
                }
            }
        }

        let duration_ms = elapsed_ms(started);
        let failed_steps = steps.iter().filter(|s| !s.is_success()).count();

        self.store.record_flow_success(pipeline.id, duration_ms).await;
        self.emit_event(
            pipeline.id,
            FlowEvent::new(pipeline.id, FlowEventType::Complete, "completed")
                .with_duration(duration_ms)
                .with_data(json!({
                    "flowId": flow_id,
                    "steps": steps.len(),
                    "failedSteps": failed_steps,
                })),
        )
        .await;

        info!(
            "Flow {} completed on pipeline {} in {}ms ({} failed step(s))",
            flow_id, pipeline.name, duration_ms, failed_steps
        );

        FlowOutcome::Completed(FlowReport {
            flow_id,
            duration_ms,
            processed_data: current,
            steps,
        })
    }

    /// Count a top-level failure and log the terminal error event
    async fn fail_flow(&self, pipeline: &Pipeline, flow_id: Uuid, duration_ms: u64, data: Value) {
        self.store.record_flow_failure(pipeline.id).await;
        self.emit_event(
            pipeline.id,
            FlowEvent::new(pipeline.id, FlowEventType::Error, "failed")
                .with_duration(duration_ms)
                .with_data(data),
        )
        .await;

        info!("Flow {} failed on pipeline {} after {}ms", flow_id, pipeline.name, duration_ms);
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
