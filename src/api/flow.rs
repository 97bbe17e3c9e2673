//! Flow API Handlers
//!
//! HTTP endpoints for submitting flows and reading or clearing their history.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{
    error::{ApiError, ApiResult},
    parse_pipeline_id, AppState,
};
use crate::core::{FlowOutcome, FlowResponse};
use crate::store::DEFAULT_EVENT_LIMIT;

/// Request body for flow submission
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessFlowRequest {
    pub pipeline_id: Option<String>,
    pub data: Option<Value>,
}

/// Query parameters for event listing
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
}

/// POST /api/data-flow/process
///
/// Always answers 200 once the request is well-formed; flow failures are
/// reported through the `status` field of the body.
pub async fn process_flow(
    State(state): State<AppState>,
    body: Result<Json<ProcessFlowRequest>, JsonRejection>,
) -> ApiResult<Json<FlowResponse>> {
    let Json(req) = body?;

    let (Some(pipeline_id), Some(data)) = (req.pipeline_id, req.data) else {
        return Err(ApiError::BadRequest(
            "Missing required fields: pipelineId, data".to_string(),
        ));
    };

    tracing::debug!("Processing flow for pipeline: {}", pipeline_id);

    let outcome = match parse_pipeline_id(&pipeline_id) {
        Some(id) => state.engine.process_data_flow(id, data).await,
        None => FlowOutcome::PipelineNotFound,
    };

    let flow_id = outcome
        .flow_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    match outcome.error_message() {
        Some(error) => {
            tracing::warn!("Flow {} on pipeline {} failed: {}", flow_id, pipeline_id, error)
        }
        None => tracing::debug!("Flow {} on pipeline {} succeeded", flow_id, pipeline_id),
    }

    Ok(Json(outcome.into_response()))
}

/// GET /api/data-flow/events/{pipeline_id}?limit=
pub async fn get_flow_events(
    State(state): State<AppState>,
    Path(pipeline_id): Path<String>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_EVENT_LIMIT);

    let events = match parse_pipeline_id(&pipeline_id) {
        Some(id) => state.engine.store().get_flow_events(id, limit).await,
        None => Vec::new(),
    };

    Ok(Json(json!({
        "status": "success",
        "count": events.len(),
        "events": events,
    })))
}

/// POST /api/data-flow/clear/{pipeline_id}
pub async fn clear_history(
    State(state): State<AppState>,
    Path(pipeline_id): Path<String>,
) -> ApiResult<Json<Value>> {
    tracing::info!("Clearing history for pipeline: {}", pipeline_id);

    let cleared = match parse_pipeline_id(&pipeline_id) {
        Some(id) => state.engine.store().clear_pipeline_history(id).await,
        None => false,
    };

    if !cleared {
        return Err(ApiError::NotFound(format!("Pipeline {} not found", pipeline_id)));
    }

    Ok(Json(json!({
        "status": "success",
        "message": format!("History cleared for pipeline {}", pipeline_id),
    })))
}
