use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use super::ApiState;
use crate::db::models::TriggerCheckResponse;
use crate::engine::resolution;
use crate::error::AppError;

/// Pull a non-empty `message` string out of the request body.
fn message_from_body(body: &[u8]) -> Result<String, AppError> {
    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| AppError::Validation("Request body must be a JSON object".into()))?;

    match payload.get("message") {
        Some(serde_json::Value::String(message)) if !message.is_empty() => Ok(message.clone()),
        Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
            Err(AppError::Validation("message is required".into()))
        }
        Some(_) => Err(AppError::Validation("message must be a string".into())),
    }
}

/// POST /android-trigger-check: answer one incoming chat message.
pub async fn check_trigger(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<TriggerCheckResponse>, AppError> {
    let message = message_from_body(&body)?;
    let resolution = resolution::resolve(state.store.as_ref(), &message).await?;
    Ok(Json(resolution.into()))
}
