//! Pipeline API Handlers
//!
//! HTTP endpoints for pipeline registration and lookup.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{
    error::{ApiError, ApiResult},
    parse_pipeline_id, AppState,
};
use crate::core::{ErrorHandling, ValidationSchema};

/// Request body for pipeline creation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelineRequest {
    pub name: Option<String>,
    pub source: Option<String>,
    pub targets: Option<Vec<String>>,
    #[serde(default)]
    pub schema: Option<ValidationSchema>,
    #[serde(default)]
    pub error_handling: Option<ErrorHandling>,
}

impl CreatePipelineRequest {
    /// Names of required fields that are absent or blank
    fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if blank(&self.source) {
            missing.push("source");
        }
        if self.targets.is_none() {
            missing.push("targets");
        }
        if self.schema.is_none() {
            missing.push("schema");
        }
        missing
    }
}

/// POST /api/data-flow/pipelines
pub async fn create_pipeline(
    State(state): State<AppState>,
    body: Result<Json<CreatePipelineRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = body?;

    let missing = req.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    tracing::info!("Creating pipeline: {}", req.name.as_deref().unwrap_or_default());

    let pipeline = state
        .engine
        .store()
        .create_pipeline(
            req.name.unwrap_or_default(),
            req.source.unwrap_or_default(),
            req.targets.unwrap_or_default(),
            req.schema.unwrap_or_default(),
            req.error_handling.unwrap_or_default(),
        )
        .await;

    Ok(Json(json!({ "status": "success", "pipeline": pipeline })))
}

/// GET /api/data-flow/pipelines
pub async fn list_pipelines(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    tracing::debug!("Listing all pipelines");

    let mut pipelines = state.engine.store().list_pipelines().await;
    pipelines.sort_by_key(|p| p.created_at);

    Ok(Json(json!({
        "status": "success",
        "count": pipelines.len(),
        "pipelines": pipelines,
    })))
}

/// GET /api/data-flow/pipelines/{pipeline_id}
pub async fn get_pipeline(
    State(state): State<AppState>,
    Path(pipeline_id): Path<String>,
) -> ApiResult<Json<Value>> {
    tracing::debug!("Getting pipeline: {}", pipeline_id);

    let not_found = || ApiError::NotFound(format!("Pipeline {} not found", pipeline_id));
    let id = parse_pipeline_id(&pipeline_id).ok_or_else(not_found)?;
    let pipeline = state.engine.store().get_pipeline(id).await.ok_or_else(not_found)?;

    Ok(Json(json!({ "status": "success", "pipeline": pipeline })))
}
