use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiState;
use crate::db::models::{CreateTriggerInput, Trigger, TriggerStats, UpdateTriggerInput};
use crate::engine::{catalog, stats as trigger_stats};
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub include_inactive: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
pub struct TriggerList {
    pub triggers: Vec<Trigger>,
}

/// Malformed bodies are validation failures, reported in the usual `{ error }` shape.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

pub async fn list_triggers(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TriggerList>, AppError> {
    let include_inactive = query.include_inactive.unwrap_or(true);
    let triggers = catalog::list(state.store.as_ref(), include_inactive).await?;
    Ok(Json(TriggerList { triggers }))
}

pub async fn get_trigger(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Trigger>, AppError> {
    Ok(Json(catalog::get(state.store.as_ref(), &id).await?))
}

pub async fn create_trigger(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateTriggerInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Trigger>), AppError> {
    let input = body(payload)?;
    let trigger = catalog::create(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(trigger)))
}

pub async fn update_trigger(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTriggerInput>, JsonRejection>,
) -> Result<Json<Trigger>, AppError> {
    let input = body(payload)?;
    Ok(Json(catalog::update(state.store.as_ref(), &id, input).await?))
}

pub async fn delete_trigger(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    catalog::delete(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stats(State(state): State<Arc<ApiState>>) -> Result<Json<TriggerStats>, AppError> {
    Ok(Json(trigger_stats::compute(state.store.as_ref()).await?))
}
