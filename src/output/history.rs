//! Statistics over persisted runs
//!
//! This module loads every persisted run with its per-status row counts
//! and prints them in a human-readable form.

use crate::analysis::Sentiment;
use crate::state::RecordStatus;
use crate::storage::{RunHistory, RunRecord, StorageResult};
use std::collections::HashMap;

/// Statistics for one persisted run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub run: RunRecord,
    pub rows_by_status: HashMap<RecordStatus, usize>,
    pub rows_by_sentiment: HashMap<Sentiment, usize>,
}

impl RunStatistics {
    /// Number of rows with the given status
    pub fn count(&self, status: RecordStatus) -> usize {
        self.rows_by_status.get(&status).copied().unwrap_or(0)
    }

    /// Percentage of crawled rows that succeeded
    pub fn success_rate(&self) -> f64 {
        let crawled = self.count(RecordStatus::Success) + self.count(RecordStatus::Failed);
        if crawled == 0 {
            0.0
        } else {
            (self.count(RecordStatus::Success) as f64 / crawled as f64) * 100.0
        }
    }
}

/// Statistics for all persisted runs, newest first
#[derive(Debug, Clone, Default)]
pub struct HistoryStatistics {
    pub runs: Vec<RunStatistics>,
}

impl HistoryStatistics {
    /// Total rows across all runs
    pub fn total_rows(&self) -> usize {
        self.runs.iter().map(|r| r.run.row_count).sum()
    }
}

/// Loads statistics for every persisted run
///
/// # Arguments
///
/// * `history` - The storage backend containing persisted runs
///
/// # Returns
///
/// * `Ok(HistoryStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to load statistics
pub fn load_history(history: &dyn RunHistory) -> StorageResult<HistoryStatistics> {
    let mut runs = Vec::new();

    for run in history.list_runs()? {
        let mut rows_by_status = HashMap::new();
        let mut rows_by_sentiment = HashMap::new();
        for row in history.load_rows(run.id)? {
            *rows_by_status.entry(row.record.status).or_insert(0) += 1;
            if let Some(sentiment) = row.record.sentiment {
                *rows_by_sentiment.entry(sentiment).or_insert(0) += 1;
            }
        }
        runs.push(RunStatistics {
            run,
            rows_by_status,
            rows_by_sentiment,
        });
    }

    Ok(HistoryStatistics { runs })
}

/// Prints run statistics to stdout
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_history(stats: &HistoryStatistics) {
    println!("=== Signal-Sift Run History ===\n");

    if stats.runs.is_empty() {
        println!("No persisted runs.");
        return;
    }

    println!("Overview:");
    println!("  Runs: {}", stats.runs.len());
    println!("  Rows: {}", stats.total_rows());
    println!();

    for entry in &stats.runs {
        let run = &entry.run;
        println!("Run #{} [{}] saved {}", run.id, run.label, run.saved_at);
        println!(
            "  Rows: {} (success {}, failed {}, pending {})",
            run.row_count,
            entry.count(RecordStatus::Success),
            entry.count(RecordStatus::Failed),
            entry.count(RecordStatus::Pending)
        );

        if !entry.rows_by_sentiment.is_empty() {
            let sentiments: Vec<String> = Sentiment::all()
                .iter()
                .filter_map(|s| entry.rows_by_sentiment.get(s).map(|n| format!("{} {}", s, n)))
                .collect();
            println!("  Sentiment: {}", sentiments.join(", "));
        }

        println!("  Success Rate: {:.1}%", entry.success_rate());
        println!("  Config Hash: {}", run.config_hash);
        println!();
    }
}
