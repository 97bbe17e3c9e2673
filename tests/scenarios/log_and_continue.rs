//! Test: Log and Continue - failed targets are recorded and skipped

use crate::helpers::*;
use dataflow::core::{ErrorHandling, FlowEventType, FlowOutcome, FlowStatus, StepStatus};
use serde_json::json;

#[tokio::test]
async fn test_failed_target_is_recorded_and_skipped() {
    let target = ScriptedTarget::failing(&["t2"]);
    let (engine, pipeline) = setup(
        &["t1", "t2", "t3"],
        &[],
        ErrorHandling::LogAndContinue,
        target.clone(),
    )
    .await;

    let outcome = engine.process_data_flow(pipeline.id, json!({})).await;
    assert!(outcome.is_success());

    let FlowOutcome::Completed(report) = outcome.clone() else {
        panic!("expected completed flow");
    };

    let statuses: Vec<_> = report.steps.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![StepStatus::Success, StepStatus::Failed, StepStatus::Success]
    );
    assert!(report.steps[1].error.is_some());

    // t3 receives t1's output unchanged by the failed t2
    assert_eq!(target.calls(), vec!["t1", "t2", "t3"]);
    assert_eq!(report.processed_data["visited"], json!(["t1", "t3"]));

    let response = outcome.into_response();
    assert_eq!(response.status, FlowStatus::Success);
    assert_eq!(response.steps.unwrap().len(), 3);
}

#[tokio::test]
async fn test_step_error_event_is_not_terminal() {
    let (engine, pipeline) = setup(
        &["t1", "t2"],
        &[],
        ErrorHandling::LogAndContinue,
        ScriptedTarget::failing(&["t1"]),
    )
    .await;

    engine.process_data_flow(pipeline.id, json!({})).await;

    let events = all_events(&engine, &pipeline).await;
    let step_error = events
        .iter()
        .find(|e| e.event_type == FlowEventType::Error)
        .expect("step error event");
    assert_eq!(step_error.module.as_deref(), Some("t1"));
    assert!(!step_error.is_terminal());
    assert_eq!(events[0].event_type, FlowEventType::Complete);

    assert_eq!(engine.store().count_terminal_events(pipeline.id).await, (1, 0));

    let metrics = engine.store().get_flow_metrics(pipeline.id).await.unwrap();
    assert_eq!(metrics.completed_flows, 1);
    assert_eq!(metrics.failed_flows, 0);
}

#[tokio::test]
async fn test_every_target_failing_still_completes() {
    let (engine, pipeline) = setup(
        &["a", "b"],
        &[],
        ErrorHandling::LogAndContinue,
        ScriptedTarget::failing(&["a", "b"]),
    )
    .await;

    let outcome = engine.process_data_flow(pipeline.id, json!({"keep": true})).await;

    let FlowOutcome::Completed(report) = outcome else {
        panic!("expected completed flow, got {:?}", outcome);
    };
    assert_eq!(report.failed_steps().count(), 2);
    assert_eq!(report.processed_data, json!({"keep": true}));
}
