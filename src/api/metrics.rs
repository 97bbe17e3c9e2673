//! Metrics API Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::{
    error::{ApiError, ApiResult},
    parse_pipeline_id, AppState,
};

/// GET /api/data-flow/metrics/{pipeline_id}
pub async fn get_flow_metrics(
    State(state): State<AppState>,
    Path(pipeline_id): Path<String>,
) -> ApiResult<Json<Value>> {
    tracing::debug!("Getting metrics for pipeline: {}", pipeline_id);

    let not_found = || ApiError::NotFound(format!("Pipeline {} not found", pipeline_id));
    let id = parse_pipeline_id(&pipeline_id).ok_or_else(not_found)?;
    let metrics = state.engine.store().get_flow_metrics(id).await.ok_or_else(not_found)?;

    Ok(Json(json!({ "status": "success", "data": metrics })))
}

/// GET /api/data-flow/metrics
pub async fn get_all_metrics(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let overview = state.engine.store().get_all_metrics().await;
    Ok(Json(json!({ "status": "success", "data": overview })))
}
