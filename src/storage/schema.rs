//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Signal-Sift database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per persisted task table
CREATE TABLE IF NOT EXISTS task_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    label TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    saved_at TEXT NOT NULL,
    row_count INTEGER NOT NULL
);

-- Every working-table row of a run, in table order
CREATE TABLE IF NOT EXISTS task_rows (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES task_runs(id),
    position INTEGER NOT NULL,
    link TEXT NOT NULL,
    title TEXT NOT NULL,
    source TEXT NOT NULL,
    status TEXT NOT NULL,
    content TEXT,
    sentiment TEXT,
    UNIQUE(run_id, position)
);

CREATE INDEX IF NOT EXISTS idx_task_rows_run ON task_rows(run_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
