//! Storage module for persisting task tables
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Saving finished working tables (one run per task)
//! - Reading saved runs back for the history view

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteSink;
pub use traits::{PersistenceSink, RunHistory, StorageError, StorageResult};

use crate::state::TaskRecord;
use std::path::Path;

/// Label used for URL-mode runs
pub const TARGETED_CRAWL_LABEL: &str = "targeted_crawl";

/// Label used when the query contains nothing usable
pub const DEFAULT_LABEL: &str = "task";

/// Opens or creates the SQLite sink at `path`
pub fn open_sink(path: &Path, config_hash: &str) -> StorageResult<SqliteSink> {
    SqliteSink::new(path, config_hash)
}

/// Derives a persistence label from a task query
///
/// Letters and digits are lowercased and kept; every other run of characters becomes
/// a single underscore. `None` (URL mode) maps to `targeted_crawl`.
pub fn persistence_label(query: Option<&str>) -> String {
    let Some(query) = query else {
        return TARGETED_CRAWL_LABEL.to_string();
    };

    let mut label = String::with_capacity(query.len());
    for c in query.chars() {
        if c.is_alphanumeric() {
            label.extend(c.to_lowercase());
        } else if !label.is_empty() && !label.ends_with('_') {
            label.push('_');
        }
    }
    let label = label.trim_end_matches('_');

    if label.is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        label.to_string()
    }
}

/// A persisted run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub label: String,
    pub config_hash: String,
    pub saved_at: String,
    pub row_count: usize,
}

/// A persisted working-table row
#[derive(Debug, Clone)]
pub struct StoredRow {
    pub position: usize,
    pub record: TaskRecord,
}
