//! The working table: an ordered, link-keyed set of task records
//!
//! Insertion order is first-seen order. Each record is created pending and may be
//! resolved exactly once; a second resolution is rejected.

use crate::analysis::Sentiment;
use crate::search::ResultEntry;
use crate::state::RecordStatus;
use std::collections::HashMap;
use thiserror::Error;

/// Number of content characters kept in a table view cell
pub const PREVIEW_CHARS: usize = 150;

/// Errors raised when mutating the working table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("link is not in the working table: {0}")]
    UnknownLink(String),

    #[error("record was already processed: {0}")]
    AlreadyProcessed(String),
}

/// One row of the working table
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub link: String,
    pub title: String,
    pub source: String,
    pub status: RecordStatus,
    pub content: Option<String>,
    pub sentiment: Option<Sentiment>,
}

impl TaskRecord {
    /// Creates a pending record from a search (or synthesized) result
    pub fn pending(entry: ResultEntry) -> Self {
        Self {
            link: entry.link,
            title: entry.title,
            source: entry.source,
            status: RecordStatus::Pending,
            content: None,
            sentiment: None,
        }
    }
}

/// The result of processing one record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Success { content: String, sentiment: Sentiment },
    Failed,
}

/// A copy of a record suitable for display, with content truncated
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub link: String,
    pub title: String,
    pub source: String,
    pub status: RecordStatus,
    pub content: Option<String>,
    pub sentiment: Option<Sentiment>,
}

/// Ordered, link-keyed record set owned by a single task run
#[derive(Debug, Default)]
pub struct WorkingTable {
    records: Vec<TaskRecord>,
    index: HashMap<String, usize>,
}

impl WorkingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from result entries, keeping the first occurrence of each link
    pub fn from_entries(entries: impl IntoIterator<Item = ResultEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Inserts a pending record
    ///
    /// # Returns
    ///
    /// * `true` - The link was new and a record was appended
    /// * `false` - The link was already present; the table is unchanged
    pub fn insert(&mut self, entry: ResultEntry) -> bool {
        if self.index.contains_key(&entry.link) {
            return false;
        }
        self.index.insert(entry.link.clone(), self.records.len());
        self.records.push(TaskRecord::pending(entry));
        true
    }

    pub fn get(&self, link: &str) -> Option<&TaskRecord> {
        self.index.get(link).map(|&i| &self.records[i])
    }

    pub fn contains(&self, link: &str) -> bool {
        self.index.contains_key(link)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Links in table order
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.link.as_str())
    }

    /// Full records in table order (content untruncated)
    pub fn rows(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Resolves a pending record
    ///
    /// # Arguments
    ///
    /// * `link` - Key of the record to resolve
    /// * `outcome` - Extraction result to apply
    ///
    /// # Returns
    ///
    /// * `Ok(RecordStatus)` - The status the record now has
    /// * `Err(TableError)` - The link is unknown or the record was already resolved
    pub fn complete(&mut self, link: &str, outcome: RecordOutcome) -> Result<RecordStatus, TableError> {
        let idx = *self
            .index
            .get(link)
            .ok_or_else(|| TableError::UnknownLink(link.to_string()))?;
        let record = &mut self.records[idx];

        if record.status.is_terminal() {
            return Err(TableError::AlreadyProcessed(link.to_string()));
        }

        match outcome {
            RecordOutcome::Success { content, sentiment } => {
                record.status = RecordStatus::Success;
                record.content = Some(content);
                record.sentiment = Some(sentiment);
            }
            RecordOutcome::Failed => {
                record.status = RecordStatus::Failed;
            }
        }
        Ok(record.status)
    }

    /// Returns a display copy of the table with content truncated
    pub fn display(&self) -> Vec<RowView> {
        self.records
            .iter()
            .map(|r| RowView {
                link: r.link.clone(),
                title: r.title.clone(),
                source: r.source.clone(),
                status: r.status,
                content: r.content.as_deref().map(truncate_preview),
                sentiment: r.sentiment,
            })
            .collect()
    }

    /// Counts rows by status: (pending, success, failed)
    pub fn status_counts(&self) -> (usize, usize, usize) {
        self.records
            .iter()
            .fold((0, 0, 0), |(p, s, f), r| match r.status {
                RecordStatus::Pending => (p + 1, s, f),
                RecordStatus::Success => (p, s + 1, f),
                RecordStatus::Failed => (p, s, f + 1),
            })
    }
}

/// Cuts content to `PREVIEW_CHARS` characters, appending "..." when anything was cut
pub fn truncate_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}
