//! Operator-facing trigger management: list, get, create, update, delete.
//!
//! Validation and duplicate checks run before any store mutation. The store's
//! own uniqueness constraint still backs the check when two writers race.

use crate::db::models::{CreateTriggerInput, Trigger, UpdateTriggerInput};
use crate::db::now_timestamp;
use crate::db::store::TriggerStore;
use crate::error::AppError;
use crate::validation::{
    require_response_text, require_trigger_text, require_usage_count, require_valid_id,
};

pub async fn list(
    store: &dyn TriggerStore,
    include_inactive: bool,
) -> Result<Vec<Trigger>, AppError> {
    store.list(!include_inactive).await
}

pub async fn get(store: &dyn TriggerStore, id: &str) -> Result<Trigger, AppError> {
    require_valid_id("id", id)?;
    store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trigger {id}")))
}

pub async fn create(
    store: &dyn TriggerStore,
    input: CreateTriggerInput,
) -> Result<Trigger, AppError> {
    let trigger_text = require_trigger_text(&input.trigger_text)?;
    let response_text = require_response_text(&input.response_text)?;

    if store.find_by_text(&trigger_text).await?.is_some() {
        return Err(AppError::Duplicate(trigger_text));
    }

    let trigger = Trigger {
        id: uuid::Uuid::new_v4().to_string(),
        trigger_text,
        response_text,
        is_active: input.is_active.unwrap_or(true),
        usage_count: 0,
        created_at: now_timestamp(),
        last_used: None,
    };

    let created = store.insert(trigger).await?;
    tracing::info!(trigger_id = %created.id, trigger = %created.trigger_text, "Trigger created");
    Ok(created)
}

pub async fn update(
    store: &dyn TriggerStore,
    id: &str,
    input: UpdateTriggerInput,
) -> Result<Trigger, AppError> {
    require_valid_id("id", id)?;

    let mut changes = UpdateTriggerInput {
        trigger_text: None,
        response_text: None,
        is_active: input.is_active,
        usage_count: None,
    };
    if let Some(ref text) = input.trigger_text {
        changes.trigger_text = Some(require_trigger_text(text)?);
    }
    if let Some(ref text) = input.response_text {
        changes.response_text = Some(require_response_text(text)?);
    }
    if let Some(count) = input.usage_count {
        changes.usage_count = Some(require_usage_count(count)?);
    }

    let current = get(store, id).await?;

    if let Some(ref text) = changes.trigger_text {
        if let Some(existing) = store.find_by_text(text).await? {
            if existing.id != current.id {
                return Err(AppError::Duplicate(text.clone()));
            }
        }
    }

    if changes.is_empty() {
        return Ok(current);
    }

    let updated = store
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trigger {id}")))?;
    tracing::info!(trigger_id = %updated.id, "Trigger updated");
    Ok(updated)
}

pub async fn delete(store: &dyn TriggerStore, id: &str) -> Result<(), AppError> {
    require_valid_id("id", id)?;
    if !store.delete(id).await? {
        return Err(AppError::NotFound(format!("Trigger {id}")));
    }
    tracing::info!(trigger_id = %id, "Trigger deleted");
    Ok(())
}
