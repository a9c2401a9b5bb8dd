//! Output module for rendering task progress and results
//!
//! This module handles:
//! - One status line per progress snapshot
//! - Markdown reports of a finished task (table, sentiment, word cloud, summary)
//! - Statistics over persisted runs

pub mod history;
mod markdown;
mod progress;

pub use history::{load_history, print_history, HistoryStatistics, RunStatistics};
pub use markdown::{format_markdown_report, generate_markdown_report};
pub use progress::format_status_line;

use crate::state::ProgressSnapshot;

/// Escapes a value for use inside a markdown table cell
pub(crate) fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Prints the final state of a task to stdout
///
/// # Arguments
///
/// * `snapshot` - The terminal snapshot of the run
pub fn print_final_report(snapshot: &ProgressSnapshot) {
    println!();
    println!("{}", format_markdown_report(snapshot));
}
