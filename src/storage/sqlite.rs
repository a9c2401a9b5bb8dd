//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the persistence traits.

use crate::analysis::Sentiment;
use crate::state::{RecordStatus, TaskRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PersistenceSink, RunHistory, StorageError, StorageResult};
use crate::storage::{RunRecord, StoredRow};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite persistence sink
pub struct SqliteSink {
    conn: Connection,
    config_hash: String,
}

impl SqliteSink {
    /// Opens (or creates) the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `config_hash` - Hash of the configuration, stored with every saved run
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path, config_hash: impl Into<String>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            config_hash: config_hash.into(),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory(config_hash: impl Into<String>) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            config_hash: config_hash.into(),
        })
    }

    /// Gets a run by ID
    pub fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, label, config_hash, saved_at, row_count FROM task_runs WHERE id = ?1",
                params![run_id],
                map_run,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }
}

fn map_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        label: row.get(1)?,
        config_hash: row.get(2)?,
        saved_at: row.get(3)?,
        row_count: row.get::<_, i64>(4)? as usize,
    })
}

impl PersistenceSink for SqliteSink {
    fn save(&mut self, rows: &[TaskRecord], label: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO task_runs (label, config_hash, saved_at, row_count) VALUES (?1, ?2, ?3, ?4)",
            params![label, self.config_hash, now, rows.len() as i64],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO task_rows (run_id, position, link, title, source, status, content, sentiment)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (position, record) in rows.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    position as i64,
                    record.link,
                    record.title,
                    record.source,
                    record.status.to_db_string(),
                    record.content,
                    record.sentiment.map(|s| s.to_db_string()),
                ])?;
            }
        }

        tx.commit()?;
        tracing::info!("Saved {} rows as run {} ('{}')", rows.len(), run_id, label);
        Ok(run_id)
    }
}

impl RunHistory for SqliteSink {
    fn list_runs(&self) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, label, config_hash, saved_at, row_count FROM task_runs ORDER BY id DESC",
        )?;
        let runs = stmt
            .query_map([], map_run)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    fn load_rows(&self, run_id: i64) -> StorageResult<Vec<StoredRow>> {
        // Surface a missing run as RunNotFound rather than an empty list
        self.get_run(run_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT position, link, title, source, status, content, sentiment
             FROM task_rows WHERE run_id = ?1 ORDER BY position",
        )?;
        let raw = stmt
            .query_map(params![run_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(position, link, title, source, status, content, sentiment)| {
                let status = RecordStatus::from_db_string(&status).ok_or_else(|| {
                    StorageError::CorruptRow {
                        run_id,
                        reason: format!("unknown status '{}'", status),
                    }
                })?;
                let sentiment = match sentiment {
                    Some(s) => Some(Sentiment::from_db_string(&s).ok_or_else(|| {
                        StorageError::CorruptRow {
                            run_id,
                            reason: format!("unknown sentiment '{}'", s),
                        }
                    })?),
                    None => None,
                };
                Ok(StoredRow {
                    position: position as usize,
                    record: TaskRecord {
                        link,
                        title,
                        source,
                        status,
                        content,
                        sentiment,
                    },
                })
            })
            .collect()
    }
}
