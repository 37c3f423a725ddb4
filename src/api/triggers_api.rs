use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{not_found, preflight, ApiState};
use crate::engine::{catalog, stats};
use crate::error::AppError;

/// Read-only endpoint family routed by the last path segment:
/// `.../list` returns active triggers, `.../stats` the aggregate counters.
pub async fn handle(
    State(state): State<Arc<ApiState>>,
    method: Method,
    Path(path): Path<String>,
) -> Response {
    if method == Method::OPTIONS {
        return preflight().await.into_response();
    }

    let suffix = path.rsplit('/').next().unwrap_or_default();
    let result = match (method, suffix) {
        (Method::GET, "list") => list_active(&state).await,
        (Method::GET, "stats") => trigger_stats(&state).await,
        _ => return not_found().await.into_response(),
    };

    result.unwrap_or_else(IntoResponse::into_response)
}

async fn list_active(state: &ApiState) -> Result<Response, AppError> {
    let triggers = catalog::list(state.store.as_ref(), false).await?;
    Ok(Json(serde_json::json!({ "triggers": triggers })).into_response())
}

async fn trigger_stats(state: &ApiState) -> Result<Response, AppError> {
    let stats = stats::compute(state.store.as_ref()).await?;
    Ok(Json(stats).into_response())
}
