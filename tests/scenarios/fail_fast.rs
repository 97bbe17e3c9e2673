//! Test: Fail Fast - the first failing target aborts the flow

use crate::helpers::*;
use dataflow::core::{ErrorHandling, FlowEventType, FlowOutcome, FlowStatus};
use serde_json::json;

#[tokio::test]
async fn test_fail_fast_stops_at_failing_target() {
    let target = ScriptedTarget::failing(&["t2"]);
    let (engine, pipeline) = setup(
        &["t1", "t2", "t3"],
        &[],
        ErrorHandling::FailFast,
        target.clone(),
    )
    .await;

    let outcome = engine.process_data_flow(pipeline.id, json!({"n": 1})).await;

    match &outcome {
        FlowOutcome::Aborted { module, steps, error, .. } => {
            assert_eq!(module, "t2");
            assert!(error.contains("scripted failure"));
            assert!(steps.len() <= 1);
            assert!(steps.iter().all(|s| s.is_success()));
        }
        other => panic!("expected aborted flow, got {:?}", other),
    }

    // t3 is never invoked
    assert_eq!(target.calls(), vec!["t1", "t2"]);

    let events = all_events(&engine, &pipeline).await;
    assert!(events.iter().all(|e| e.module.as_deref() != Some("t3")));
    assert_eq!(step_modules(&events), vec!["t1"]);

    // Terminal error event names the failed module in its data
    let last = &events[0];
    assert_eq!(last.event_type, FlowEventType::Error);
    assert!(last.is_terminal());
    assert_eq!(last.data.as_ref().unwrap()["failedModule"], "t2");

    let response = outcome.into_response();
    assert_eq!(response.status, FlowStatus::Error);
    assert!(response.error.is_some());
}

#[tokio::test]
async fn test_fail_fast_counts_failure() {
    let (engine, pipeline) = setup(
        &["t1", "t2"],
        &[],
        ErrorHandling::FailFast,
        ScriptedTarget::failing(&["t1"]),
    )
    .await;

    engine.process_data_flow(pipeline.id, json!({})).await;

    let metrics = engine.store().get_flow_metrics(pipeline.id).await.unwrap();
    assert_eq!(metrics.failed_flows, 1);
    assert_eq!(metrics.completed_flows, 0);
    assert_eq!(metrics.pipeline.metrics.total_flows, 1);
    assert_eq!(metrics.pipeline.metrics.average_process_time, 0.0);
    assert!(metrics.pipeline.metrics.last_flow_time.is_some());
}
