//! Test: Success Chain - payloads flow through every target in order

use crate::helpers::*;
use dataflow::core::{ErrorHandling, FlowEventType, FlowOutcome, StepStatus};
use serde_json::json;

#[tokio::test]
async fn test_targets_run_in_declared_order() {
    let target = ScriptedTarget::new();
    let (engine, pipeline) = setup(
        &["validate", "enrich", "store"],
        &[],
        ErrorHandling::FailFast,
        target.clone(),
    )
    .await;

    let outcome = engine.process_data_flow(pipeline.id, json!({"order": 7})).await;

    let FlowOutcome::Completed(report) = outcome else {
        panic!("expected completed flow, got {:?}", outcome);
    };

    // Each target sees the previous target's output
    assert_eq!(target.calls(), vec!["validate", "enrich", "store"]);
    assert_eq!(report.processed_data["visited"], json!(["validate", "enrich", "store"]));
    assert_eq!(report.processed_data["order"], 7);

    let modules: Vec<_> = report.steps.iter().map(|s| s.module.as_str()).collect();
    assert_eq!(modules, vec!["validate", "enrich", "store"]);
    assert!(report.steps.iter().all(|s| s.status == StepStatus::Success));
}

#[tokio::test]
async fn test_event_trail_for_successful_flow() {
    let (engine, pipeline) = setup(
        &["a", "b"],
        &[],
        ErrorHandling::default(),
        ScriptedTarget::new(),
    )
    .await;

    engine.process_data_flow(pipeline.id, json!({})).await;

    let events = all_events(&engine, &pipeline).await;
    let types: Vec<_> = events.iter().rev().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![
            FlowEventType::Start,
            FlowEventType::Step,
            FlowEventType::Step,
            FlowEventType::Complete,
        ]
    );
    assert_eq!(step_modules(&events), vec!["a", "b"]);
    assert_newest_first(&events);

    // Every event of one flow shares its flow id
    let flow_id = event_flow_id(&events[0]);
    assert!(events.iter().all(|e| event_flow_id(e) == flow_id));
}

#[tokio::test]
async fn test_event_ids_are_unique() {
    let (engine, pipeline) = setup(
        &["a"],
        &[],
        ErrorHandling::default(),
        ScriptedTarget::new(),
    )
    .await;

    for _ in 0..3 {
        engine.process_data_flow(pipeline.id, json!({})).await;
    }

    let events = all_events(&engine, &pipeline).await;
    let ids: std::collections::HashSet<_> = events.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), events.len());
    assert!(events.iter().all(|e| e.pipeline_id == pipeline.id));
}

#[tokio::test]
async fn test_non_object_payload_without_schema() {
    let (engine, pipeline) = setup(
        &["a"],
        &[],
        ErrorHandling::default(),
        ScriptedTarget::new(),
    )
    .await;

    let outcome = engine.process_data_flow(pipeline.id, json!([1, 2, 3])).await;

    let FlowOutcome::Completed(report) = outcome else {
        panic!("expected completed flow, got {:?}", outcome);
    };
    assert_eq!(report.processed_data, json!([1, 2, 3]));
}
