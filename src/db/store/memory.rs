use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::TriggerStore;
use crate::db::models::{Trigger, UpdateTriggerInput};
use crate::error::AppError;
use crate::validation::MAX_USAGE_COUNT;

/// Process-local `TriggerStore`. Records live in insertion order.
#[derive(Default)]
pub struct MemoryTriggerStore {
    records: Mutex<Vec<Trigger>>,
}

impl MemoryTriggerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Trigger>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Trigger>>, AppError> {
        self.records
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl TriggerStore for MemoryTriggerStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Trigger>, AppError> {
        let records = self.lock()?;
        let mut out: Vec<Trigger> = records
            .iter()
            .rev()
            .filter(|t| !active_only || t.is_active)
            .cloned()
            .collect();
        // Stable sort keeps newest-insert-first among equal timestamps.
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Option<Trigger>, AppError> {
        Ok(self.lock()?.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_text(&self, trigger_text: &str) -> Result<Option<Trigger>, AppError> {
        Ok(self
            .lock()?
            .iter()
            .find(|t| t.trigger_text == trigger_text)
            .cloned())
    }

    async fn find_active_by_text(
        &self,
        trigger_text: &str,
    ) -> Result<Option<Trigger>, AppError> {
        Ok(self
            .lock()?
            .iter()
            .find(|t| t.is_active && t.trigger_text == trigger_text)
            .cloned())
    }

    async fn insert(&self, trigger: Trigger) -> Result<Trigger, AppError> {
        let mut records = self.lock()?;
        if records.iter().any(|t| t.trigger_text == trigger.trigger_text) {
            return Err(AppError::Duplicate(trigger.trigger_text));
        }
        records.push(trigger.clone());
        Ok(trigger)
    }

    async fn update(
        &self,
        id: &str,
        changes: &UpdateTriggerInput,
    ) -> Result<Option<Trigger>, AppError> {
        let mut records = self.lock()?;
        if let Some(ref text) = changes.trigger_text {
            if records.iter().any(|t| t.id != id && &t.trigger_text == text) {
                return Err(AppError::Duplicate(text.clone()));
            }
        }

        let Some(record) = records.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(ref v) = changes.trigger_text {
            record.trigger_text = v.clone();
        }
        if let Some(ref v) = changes.response_text {
            record.response_text = v.clone();
        }
        if let Some(v) = changes.is_active {
            record.is_active = v;
        }
        if let Some(v) = changes.usage_count {
            record.usage_count = v;
        }
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|t| t.id != id);
        Ok(records.len() < before)
    }

    async fn record_usage(&self, id: &str, used_at: &str) -> Result<bool, AppError> {
        let mut records = self.lock()?;
        match records.iter_mut().find(|t| t.id == id) {
            Some(record) => {
                record.usage_count = record.usage_count.saturating_add(1).min(MAX_USAGE_COUNT);
                record.last_used = Some(used_at.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, text: &str, created_at: &str) -> Trigger {
        Trigger {
            id: id.into(),
            trigger_text: text.into(),
            response_text: "reply".into(),
            is_active: true,
            usage_count: 0,
            created_at: created_at.into(),
            last_used: None,
        }
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_with_insert_tiebreak() {
        let store = MemoryTriggerStore::new();
        store.insert(sample("a", "#A", "2024-01-01T00:00:00.000000Z")).await.unwrap();
        store.insert(sample("b", "#B", "2024-01-01T00:00:00.000000Z")).await.unwrap();
        store.insert(sample("c", "#C", "2023-01-01T00:00:00.000000Z")).await.unwrap();

        let ids: Vec<String> = store.list(false).await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_update_rejects_collision_with_other_record() {
        let store = MemoryTriggerStore::new();
        store.insert(sample("a", "#A", "2024-01-01T00:00:00.000000Z")).await.unwrap();
        store.insert(sample("b", "#B", "2024-01-02T00:00:00.000000Z")).await.unwrap();

        let clash = UpdateTriggerInput {
            trigger_text: Some("#A".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update("b", &clash).await,
            Err(AppError::Duplicate(_))
        ));
        // Renaming a record to its own text is not a collision.
        assert!(store.update("a", &clash).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_record_usage_unknown_id() {
        let store = MemoryTriggerStore::new();
        assert!(!store.record_usage("missing", "2024-01-01T00:00:00.000000Z").await.unwrap());
    }

    #[tokio::test]
    async fn test_record_usage_saturates() {
        let mut at_max = sample("a", "#A", "2024-01-01T00:00:00.000000Z");
        at_max.usage_count = MAX_USAGE_COUNT;
        let mut overflowing = sample("b", "#B", "2024-01-01T00:00:00.000000Z");
        overflowing.usage_count = i64::MAX;
        let store = MemoryTriggerStore::with_records(vec![at_max, overflowing]);

        assert!(store.record_usage("a", "2024-05-01T00:00:00.000000Z").await.unwrap());
        assert!(store.record_usage("b", "2024-05-01T00:00:00.000000Z").await.unwrap());

        assert_eq!(store.get("a").await.unwrap().unwrap().usage_count, MAX_USAGE_COUNT);
        assert_eq!(store.get("b").await.unwrap().unwrap().usage_count, MAX_USAGE_COUNT);
        assert_eq!(store.list(false).await.unwrap().len(), 2);
    }
}
