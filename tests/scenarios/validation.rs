//! Test: Validation - payloads missing required fields never reach targets

use crate::helpers::*;
use dataflow::core::{ErrorHandling, FlowEventType, FlowOutcome, VALIDATION_FAILED};
use serde_json::json;

#[tokio::test]
async fn test_missing_required_field_fails_flow() {
    let target = ScriptedTarget::new();
    let (engine, pipeline) = setup(
        &["a"],
        &["user_id", "amount"],
        ErrorHandling::default(),
        target.clone(),
    )
    .await;

    let outcome = engine.process_data_flow(pipeline.id, json!({"user_id": 1})).await;

    match &outcome {
        FlowOutcome::ValidationFailed { missing, .. } => {
            assert_eq!(missing, &vec!["amount".to_string()])
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(outcome.error_message().as_deref(), Some(VALIDATION_FAILED));
    assert!(target.calls().is_empty());

    let metrics = engine.store().get_flow_metrics(pipeline.id).await.unwrap();
    assert_eq!(metrics.pipeline.metrics.total_flows, 1);
    assert_eq!(metrics.failed_flows, 1);
    assert_eq!(metrics.completed_flows, 0);

    let events = all_events(&engine, &pipeline).await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, FlowEventType::Error);
    assert!(events[0].is_terminal());
    assert_eq!(events[1].event_type, FlowEventType::Start);
}

#[tokio::test]
async fn test_null_field_counts_as_present() {
    let (engine, pipeline) = setup(
        &["a"],
        &["user_id"],
        ErrorHandling::default(),
        ScriptedTarget::new(),
    )
    .await;

    let outcome = engine.process_data_flow(pipeline.id, json!({"user_id": null})).await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_non_object_payload_misses_every_field() {
    let (engine, pipeline) = setup(
        &["a"],
        &["user_id"],
        ErrorHandling::default(),
        ScriptedTarget::new(),
    )
    .await;

    let outcome = engine.process_data_flow(pipeline.id, json!("just a string")).await;

    match outcome {
        FlowOutcome::ValidationFailed { missing, .. } => {
            assert_eq!(missing, vec!["user_id".to_string()])
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}
