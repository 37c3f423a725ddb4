use rusqlite::{params, OptionalExtension, Row};

use crate::db::models::{Trigger, UpdateTriggerInput};
use crate::db::DbPool;
use crate::error::AppError;
use crate::validation::MAX_USAGE_COUNT;

fn row_to_trigger(row: &Row) -> rusqlite::Result<Trigger> {
    Ok(Trigger {
        id: row.get("id")?,
        trigger_text: row.get("trigger_text")?,
        response_text: row.get("response_text")?,
        is_active: row.get::<_, i32>("is_active")? != 0,
        usage_count: row.get("usage_count")?,
        created_at: row.get("created_at")?,
        last_used: row.get("last_used")?,
    })
}

/// Map a write failure, turning the UNIQUE(trigger_text) violation into `Duplicate`.
fn map_write_error(err: rusqlite::Error, trigger_text: Option<&str>) -> AppError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            AppError::Duplicate(trigger_text.unwrap_or_default().to_string())
        }
        other => AppError::Database(other),
    }
}

pub fn get_all(pool: &DbPool) -> Result<Vec<Trigger>, AppError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT * FROM triggers ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map([], row_to_trigger)?;
    let triggers = rows.collect::<Result<Vec<_>, _>>().map_err(AppError::Database)?;
    Ok(triggers)
}

pub fn get_active(pool: &DbPool) -> Result<Vec<Trigger>, AppError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT * FROM triggers WHERE is_active = 1 ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map([], row_to_trigger)?;
    let triggers = rows.collect::<Result<Vec<_>, _>>().map_err(AppError::Database)?;
    Ok(triggers)
}

pub fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<Trigger>, AppError> {
    let conn = pool.get()?;
    let trigger = conn
        .query_row(
            "SELECT * FROM triggers WHERE id = ?1",
            params![id],
            row_to_trigger,
        )
        .optional()?;
    Ok(trigger)
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<Trigger, AppError> {
    find_by_id(pool, id)?.ok_or_else(|| AppError::NotFound(format!("Trigger {id}")))
}

/// Exact lookup on the normalized (uppercase) text, active or not.
pub fn find_by_text(pool: &DbPool, trigger_text: &str) -> Result<Option<Trigger>, AppError> {
    let conn = pool.get()?;
    let trigger = conn
        .query_row(
            "SELECT * FROM triggers WHERE trigger_text = ?1",
            params![trigger_text],
            row_to_trigger,
        )
        .optional()?;
    Ok(trigger)
}

pub fn find_active_by_text(
    pool: &DbPool,
    trigger_text: &str,
) -> Result<Option<Trigger>, AppError> {
    let conn = pool.get()?;
    let trigger = conn
        .query_row(
            "SELECT * FROM triggers WHERE trigger_text = ?1 AND is_active = 1",
            params![trigger_text],
            row_to_trigger,
        )
        .optional()?;
    Ok(trigger)
}

pub fn insert(pool: &DbPool, trigger: &Trigger) -> Result<Trigger, AppError> {
    {
        let conn = pool.get()?;
        conn.execute(
            "INSERT INTO triggers
             (id, trigger_text, response_text, is_active, usage_count, created_at, last_used)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                trigger.id,
                trigger.trigger_text,
                trigger.response_text,
                trigger.is_active as i32,
                trigger.usage_count,
                trigger.created_at,
                trigger.last_used,
            ],
        )
        .map_err(|e| map_write_error(e, Some(&trigger.trigger_text)))?;
    }

    get_by_id(pool, &trigger.id)
}

/// Apply only the fields present in `changes`. Returns `None` for an unknown id.
pub fn update(
    pool: &DbPool,
    id: &str,
    changes: &UpdateTriggerInput,
) -> Result<Option<Trigger>, AppError> {
    if changes.is_empty() {
        return find_by_id(pool, id);
    }

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    push_field!(changes.trigger_text.clone(), "trigger_text", sets, values);
    push_field!(changes.response_text.clone(), "response_text", sets, values);
    push_field!(changes.is_active.map(i32::from), "is_active", sets, values);
    push_field!(changes.usage_count, "usage_count", sets, values);

    values.push(Box::new(id.to_string()));
    let sql = format!(
        "UPDATE triggers SET {} WHERE id = ?{}",
        sets.join(", "),
        values.len()
    );

    let rows = {
        let conn = pool.get()?;
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            values.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_ref.as_slice())
            .map_err(|e| map_write_error(e, changes.trigger_text.as_deref()))?
    };

    if rows == 0 {
        return Ok(None);
    }
    find_by_id(pool, id)
}

pub fn delete(pool: &DbPool, id: &str) -> Result<bool, AppError> {
    let conn = pool.get()?;
    let rows = conn.execute("DELETE FROM triggers WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

/// Count one successful match: bump `usage_count` and stamp `last_used` in one statement.
/// The count stops at `MAX_USAGE_COUNT`; SQLite would otherwise promote it to REAL.
pub fn record_usage(pool: &DbPool, id: &str, used_at: &str) -> Result<bool, AppError> {
    let conn = pool.get()?;
    let rows = conn.execute(
        "UPDATE triggers
         SET usage_count = CASE WHEN usage_count < ?3 THEN usage_count + 1 ELSE ?3 END,
             last_used = ?1
         WHERE id = ?2",
        params![used_at, id, MAX_USAGE_COUNT],
    )?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;

    fn sample(id: &str, text: &str, created_at: &str) -> Trigger {
        Trigger {
            id: id.into(),
            trigger_text: text.into(),
            response_text: format!("reply for {text}"),
            is_active: true,
            usage_count: 0,
            created_at: created_at.into(),
            last_used: None,
        }
    }

    #[test]
    fn test_crud_triggers() {
        let pool = init_test_db().unwrap();

        // Insert
        let created =
            insert(&pool, &sample("t1", "#SUPORTE", "2024-02-10T09:15:00.000000Z")).unwrap();
        assert_eq!(created.trigger_text, "#SUPORTE");
        assert!(created.is_active);
        assert_eq!(created.usage_count, 0);
        assert!(created.last_used.is_none());

        // Lookup
        assert_eq!(find_by_text(&pool, "#SUPORTE").unwrap().unwrap().id, "t1");
        assert!(find_by_text(&pool, "#OUTRO").unwrap().is_none());

        // Update
        let updated = update(
            &pool,
            "t1",
            &UpdateTriggerInput {
                response_text: Some("new reply".into()),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.response_text, "new reply");
        assert!(!updated.is_active);
        assert_eq!(updated.trigger_text, "#SUPORTE");
        assert!(find_active_by_text(&pool, "#SUPORTE").unwrap().is_none());

        // Delete
        assert!(delete(&pool, "t1").unwrap());
        assert!(!delete(&pool, "t1").unwrap());
        assert!(matches!(get_by_id(&pool, "t1"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_get_all_newest_first() {
        let pool = init_test_db().unwrap();
        insert(&pool, &sample("old", "#A", "2024-01-15T10:30:00.000000Z")).unwrap();
        insert(&pool, &sample("new", "#B", "2024-03-05T16:20:00.000000Z")).unwrap();
        insert(&pool, &sample("mid", "#C", "2024-02-10T09:15:00.000000Z")).unwrap();

        let ids: Vec<String> = get_all(&pool).unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_get_active_filters_inactive() {
        let pool = init_test_db().unwrap();
        insert(&pool, &sample("a", "#A", "2024-01-15T10:30:00.000000Z")).unwrap();
        let mut inactive = sample("b", "#B", "2024-01-16T10:30:00.000000Z");
        inactive.is_active = false;
        insert(&pool, &inactive).unwrap();

        let active = get_active(&pool).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "a");
        assert_eq!(get_all(&pool).unwrap().len(), 2);
    }

    #[test]
    fn test_unique_violation_is_duplicate() {
        let pool = init_test_db().unwrap();
        insert(&pool, &sample("a", "#A", "2024-01-15T10:30:00.000000Z")).unwrap();
        let result = insert(&pool, &sample("b", "#A", "2024-01-16T10:30:00.000000Z"));
        assert!(matches!(result, Err(AppError::Duplicate(_))));

        insert(&pool, &sample("c", "#C", "2024-01-17T10:30:00.000000Z")).unwrap();
        let result = update(
            &pool,
            "c",
            &UpdateTriggerInput {
                trigger_text: Some("#A".into()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AppError::Duplicate(_))));
    }

    #[test]
    fn test_update_unknown_id_returns_none() {
        let pool = init_test_db().unwrap();
        let result = update(
            &pool,
            "nonexistent-id",
            &UpdateTriggerInput {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_record_usage_increments_once() {
        let pool = init_test_db().unwrap();
        insert(&pool, &sample("a", "#A", "2024-01-15T10:30:00.000000Z")).unwrap();

        assert!(record_usage(&pool, "a", "2024-05-20T14:22:00.000000Z").unwrap());
        assert!(record_usage(&pool, "a", "2024-05-21T14:22:00.000000Z").unwrap());

        let refreshed = get_by_id(&pool, "a").unwrap();
        assert_eq!(refreshed.usage_count, 2);
        assert_eq!(refreshed.last_used.as_deref(), Some("2024-05-21T14:22:00.000000Z"));
        assert_eq!(refreshed.created_at, "2024-01-15T10:30:00.000000Z");

        // Deleted trigger: no row touched
        assert!(!record_usage(&pool, "missing", "2024-05-21T14:22:00.000000Z").unwrap());
    }

    #[test]
    fn test_record_usage_stops_at_max() {
        let pool = init_test_db().unwrap();
        let mut near_max = sample("a", "#A", "2024-01-15T10:30:00.000000Z");
        near_max.usage_count = MAX_USAGE_COUNT - 1;
        insert(&pool, &near_max).unwrap();

        for _ in 0..3 {
            assert!(record_usage(&pool, "a", "2024-05-20T14:22:00.000000Z").unwrap());
        }

        // Row still decodes as INTEGER.
        assert_eq!(get_by_id(&pool, "a").unwrap().usage_count, MAX_USAGE_COUNT);
        assert_eq!(get_all(&pool).unwrap().len(), 1);
    }
}
