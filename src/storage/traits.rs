//! Persistence sink trait and error types

use crate::state::TaskRecord;
use crate::storage::{RunRecord, StoredRow};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Corrupt row in run {run_id}: {reason}")]
    CorruptRow { run_id: i64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for finished working tables
///
/// The orchestrator calls `save` exactly once per run with every row of the table.
pub trait PersistenceSink {
    /// Saves all rows under a label
    ///
    /// # Arguments
    ///
    /// * `rows` - Every working-table row, in table order, content untruncated
    /// * `label` - Name derived from the task query
    ///
    /// # Returns
    ///
    /// The ID of the persisted run
    fn save(&mut self, rows: &[TaskRecord], label: &str) -> StorageResult<i64>;
}

/// Read access to persisted runs
pub trait RunHistory {
    /// Lists persisted runs, newest first
    fn list_runs(&self) -> StorageResult<Vec<RunRecord>>;

    /// Loads the rows of one run in table order
    fn load_rows(&self, run_id: i64) -> StorageResult<Vec<StoredRow>>;
}
