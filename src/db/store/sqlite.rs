use async_trait::async_trait;

use super::TriggerStore;
use crate::db::models::{Trigger, UpdateTriggerInput};
use crate::db::repos::triggers as repo;
use crate::db::DbPool;
use crate::error::AppError;

/// `TriggerStore` over the pooled SQLite database.
#[derive(Clone)]
pub struct SqliteTriggerStore {
    pool: DbPool,
}

impl SqliteTriggerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TriggerStore for SqliteTriggerStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Trigger>, AppError> {
        if active_only {
            repo::get_active(&self.pool)
        } else {
            repo::get_all(&self.pool)
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Trigger>, AppError> {
        repo::find_by_id(&self.pool, id)
    }

    async fn find_by_text(&self, trigger_text: &str) -> Result<Option<Trigger>, AppError> {
        repo::find_by_text(&self.pool, trigger_text)
    }

    async fn find_active_by_text(
        &self,
        trigger_text: &str,
    ) -> Result<Option<Trigger>, AppError> {
        repo::find_active_by_text(&self.pool, trigger_text)
    }

    async fn insert(&self, trigger: Trigger) -> Result<Trigger, AppError> {
        repo::insert(&self.pool, &trigger)
    }

    async fn update(
        &self,
        id: &str,
        changes: &UpdateTriggerInput,
    ) -> Result<Option<Trigger>, AppError> {
        repo::update(&self.pool, id, changes)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        repo::delete(&self.pool, id)
    }

    async fn record_usage(&self, id: &str, used_at: &str) -> Result<bool, AppError> {
        repo::record_usage(&self.pool, id, used_at)
    }
}
