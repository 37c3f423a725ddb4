use crate::db::models::{Trigger, TriggerStats};
use crate::db::store::TriggerStore;
use crate::error::AppError;

/// Aggregate counters over every stored trigger, active or not.
pub async fn compute(store: &dyn TriggerStore) -> Result<TriggerStats, AppError> {
    let triggers = store.list(false).await?;
    Ok(summarize(&triggers))
}

pub fn summarize(triggers: &[Trigger]) -> TriggerStats {
    let total_triggers = triggers.len() as i64;
    let active_triggers = triggers.iter().filter(|t| t.is_active).count() as i64;
    let total_responses = triggers
        .iter()
        .fold(0i64, |sum, t| sum.saturating_add(t.usage_count));
    let average_usage = if total_triggers > 0 {
        total_responses as f64 / total_triggers as f64
    } else {
        0.0
    };

    TriggerStats {
        total_triggers,
        active_triggers,
        total_responses,
        average_usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MemoryTriggerStore;

    fn trigger(id: &str, active: bool, usage: i64) -> Trigger {
        Trigger {
            id: id.into(),
            trigger_text: format!("#{}", id.to_uppercase()),
            response_text: "r".into(),
            is_active: active,
            usage_count: usage,
            created_at: "2024-01-15T10:30:00.000000Z".into(),
            last_used: None,
        }
    }

    #[test]
    fn test_empty_average_is_zero() {
        assert_eq!(summarize(&[]), TriggerStats::default());
    }

    #[test]
    fn test_summarize_counts_inactive_in_totals() {
        let stats = summarize(&[
            trigger("a", true, 15),
            trigger("b", true, 8),
            trigger("c", true, 23),
            trigger("d", false, 5),
        ]);
        assert_eq!(stats.total_triggers, 4);
        assert_eq!(stats.active_triggers, 3);
        assert_eq!(stats.total_responses, 51);
        assert!((stats.average_usage - 12.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_responses_saturates() {
        let stats = summarize(&[trigger("a", true, i64::MAX), trigger("b", true, 10)]);
        assert_eq!(stats.total_responses, i64::MAX);
    }

    #[tokio::test]
    async fn test_compute_reads_all_records() {
        let store =
            MemoryTriggerStore::with_records(vec![trigger("a", true, 1), trigger("b", false, 2)]);
        let stats = compute(&store).await.unwrap();
        assert_eq!(stats.total_triggers, 2);
        assert_eq!(stats.active_triggers, 1);
        assert!((stats.average_usage - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_json_shape() {
        let stats = summarize(&[trigger("a", true, 3)]);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalTriggers": 1,
                "activeTriggers": 1,
                "totalResponses": 3,
                "averageUsage": 3.0
            })
        );
    }
}
