use rusqlite::Connection;

use crate::error::AppError;

/// Run the idempotent base schema.
pub fn run(conn: &Connection) -> Result<(), AppError> {
    tracing::debug!("Running database migrations");

    conn.execute_batch(SCHEMA)?;

    tracing::info!("Database migrations complete");
    Ok(())
}

const SCHEMA: &str = r#"

-- ============================================================================
-- Triggers
-- ============================================================================

-- trigger_text is stored uppercase, so the plain UNIQUE constraint is the
-- case-insensitive uniqueness constraint.
CREATE TABLE IF NOT EXISTS triggers (
    id              TEXT PRIMARY KEY,
    trigger_text    TEXT NOT NULL UNIQUE,
    response_text   TEXT NOT NULL,
    is_active       INTEGER NOT NULL DEFAULT 1,
    usage_count     INTEGER NOT NULL DEFAULT 0 CHECK (usage_count >= 0),
    created_at      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_triggers_active     ON triggers(is_active);
CREATE INDEX IF NOT EXISTS idx_triggers_created_at ON triggers(created_at);
"#;

/// Column additions for databases created before the column existed.
pub fn run_incremental(conn: &Connection) -> Result<(), AppError> {
    let has_last_used: bool = conn
        .prepare("SELECT COUNT(*) FROM pragma_table_info('triggers') WHERE name = 'last_used'")?
        .query_row([], |row| row.get::<_, i64>(0))
        .map(|c| c > 0)
        .unwrap_or(false);

    if !has_last_used {
        conn.execute_batch("ALTER TABLE triggers ADD COLUMN last_used TEXT;")?;
        tracing::info!("Added last_used column to triggers");
    }

    Ok(())
}
