//! Storage backends behind one repository trait.
//!
//! Resolution, CRUD and stats are written against [`TriggerStore`] and never
//! see which backend they run on. [`SqliteTriggerStore`] is the production
//! backend; [`MemoryTriggerStore`] serves tests and the demo mode.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::db::models::{Trigger, UpdateTriggerInput};
use crate::error::AppError;

pub use memory::MemoryTriggerStore;
pub use sqlite::SqliteTriggerStore;

#[async_trait]
pub trait TriggerStore: Send + Sync {
    /// Human-readable backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Records ordered by `created_at` descending, newest insert first on ties.
    async fn list(&self, active_only: bool) -> Result<Vec<Trigger>, AppError>;

    async fn get(&self, id: &str) -> Result<Option<Trigger>, AppError>;

    /// Exact match on normalized text, regardless of `is_active`.
    async fn find_by_text(&self, trigger_text: &str) -> Result<Option<Trigger>, AppError>;

    /// Exact match on normalized text among active triggers only.
    async fn find_active_by_text(&self, trigger_text: &str)
        -> Result<Option<Trigger>, AppError>;

    /// Store a fully formed record. A text collision is `AppError::Duplicate`.
    async fn insert(&self, trigger: Trigger) -> Result<Trigger, AppError>;

    /// Apply the present fields. `Ok(None)` when the id is unknown.
    async fn update(
        &self,
        id: &str,
        changes: &UpdateTriggerInput,
    ) -> Result<Option<Trigger>, AppError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// `usage_count += 1` and `last_used = used_at` in one step.
    /// Returns whether the record still existed.
    async fn record_usage(&self, id: &str, used_at: &str) -> Result<bool, AppError>;
}
