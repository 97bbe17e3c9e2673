//! API Module
//!
//! HTTP API layer over the flow engine.
//! Each submodule handles endpoints for a specific concern.

pub mod auth;
pub mod error;
pub mod flow;
pub mod health;
pub mod metrics;
pub mod pipeline;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::execution::FlowEngine;
use crate::target::SharedInvoker;

/// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FlowEngine<SharedInvoker>>,

    /// Bearer token required on data-flow routes, if any
    pub api_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(engine: Arc<FlowEngine<SharedInvoker>>) -> Self {
        Self {
            engine,
            api_token: None,
        }
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.is_empty()).map(Arc::from);
        self
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let data_flow = Router::new()
        .route(
            "/pipelines",
            post(pipeline::create_pipeline).get(pipeline::list_pipelines),
        )
        .route("/pipelines/{pipeline_id}", get(pipeline::get_pipeline))
        .route("/process", post(flow::process_flow))
        .route("/events/{pipeline_id}", get(flow::get_flow_events))
        .route("/clear/{pipeline_id}", post(flow::clear_history))
        .route("/metrics", get(metrics::get_all_metrics))
        .route("/metrics/{pipeline_id}", get(metrics::get_flow_metrics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/data-flow", data_flow)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Pipeline IDs that are not UUIDs cannot match any pipeline
pub(crate) fn parse_pipeline_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let error = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::InternalError {
        message: "Internal server error".to_string(),
        error,
    }
    .into_response()
}
