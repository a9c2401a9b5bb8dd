//! Single-line rendering of progress snapshots

use crate::state::{ItemPhase, ProgressSnapshot, Stage};

/// Formats a snapshot as one status line
///
/// # Arguments
///
/// * `snapshot` - The snapshot to render
///
/// # Returns
///
/// A line such as `[crawling 2/5] Crawled 2/5: success`
pub fn format_status_line(snapshot: &ProgressSnapshot) -> String {
    let tag = match (&snapshot.stage, &snapshot.item) {
        (Stage::Crawling, Some(item)) => format!("{} {}/{}", snapshot.stage, item.current, item.total),
        (stage, _) => stage.to_string(),
    };

    let mut line = format!("[{}] {}", tag, snapshot.status);
    if let Some(item) = &snapshot.item {
        if let ItemPhase::Processed(_) = item.phase {
            let done = snapshot
                .table
                .iter()
                .filter(|row| row.status.is_terminal())
                .count();
            line.push_str(&format!(" ({} of {} rows done)", done, snapshot.table.len()));
        }
    }
    line
}
