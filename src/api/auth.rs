//! Bearer token check for the data-flow routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Reject requests without the configured bearer token
///
/// Every request passes when no token is configured.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    if provided == Some(expected) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Rejected unauthenticated request to {}", request.uri().path());
        Err(ApiError::Unauthorized)
    }
}
