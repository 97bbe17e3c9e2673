//! Test: Unknown Pipeline - flows for unregistered ids leave no trace

use crate::helpers::*;
use dataflow::core::{ErrorHandling, FlowOutcome, FlowStatus, PIPELINE_NOT_FOUND};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_unknown_pipeline_creates_no_events() {
    let target = ScriptedTarget::new();
    let (engine, pipeline) = setup(&["a"], &[], ErrorHandling::default(), target.clone()).await;
    let missing = Uuid::new_v4();

    let outcome = engine.process_data_flow(missing, json!({"id": 1})).await;

    assert!(matches!(outcome, FlowOutcome::PipelineNotFound));
    assert!(outcome.flow_id().is_none());
    assert!(target.calls().is_empty());

    assert!(engine.store().get_flow_events(missing, 50).await.is_empty());
    assert!(all_events(&engine, &pipeline).await.is_empty());
    assert!(engine.store().get_flow_metrics(missing).await.is_none());

    let response = outcome.into_response();
    assert_eq!(response.status, FlowStatus::Error);
    assert_eq!(response.message.as_deref(), Some(PIPELINE_NOT_FOUND));
}
