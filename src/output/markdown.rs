//! Markdown report generation
//!
//! This module renders the terminal snapshot of a task as a markdown document:
//! the working table, the sentiment distribution, the top words and the summary.

use crate::output::table_cell;
use crate::state::{ProgressSnapshot, Stage};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Words listed in the report's word-cloud section
const REPORT_WORDS: usize = 20;

/// Writes a markdown report of a finished task
///
/// # Arguments
///
/// * `snapshot` - The terminal snapshot of the run
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(std::io::Error)` - Failed to write the report
pub fn generate_markdown_report(
    snapshot: &ProgressSnapshot,
    output_path: &Path,
) -> std::io::Result<()> {
    let markdown = format_markdown_report(snapshot);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Report written to {}", output_path.display());
    Ok(())
}

/// Formats a snapshot as a markdown report
///
/// # Arguments
///
/// * `snapshot` - The snapshot to render, normally the terminal one
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(snapshot: &ProgressSnapshot) -> String {
    let mut md = String::new();

    md.push_str("# Signal-Sift Task Report\n\n");
    md.push_str(&format!("- **Stage**: {}\n", snapshot.stage));
    md.push_str(&format!("- **Status**: {}\n\n", snapshot.status));

    if let Stage::Failed(_) = snapshot.stage {
        return md;
    }

    md.push_str("## Results\n\n");
    if snapshot.table.is_empty() {
        md.push_str("_No results._\n\n");
    } else {
        md.push_str("| # | Title | Source | Status | Sentiment | Content |\n");
        md.push_str("|---|-------|--------|--------|-----------|---------|\n");
        for (i, row) in snapshot.table.iter().enumerate() {
            md.push_str(&format!(
                "| {} | [{}]({}) | {} | {} | {} | {} |\n",
                i + 1,
                table_cell(&row.title),
                row.link,
                table_cell(&row.source),
                row.status,
                row.sentiment.map(|s| s.to_string()).unwrap_or_default(),
                table_cell(row.content.as_deref().unwrap_or("")),
            ));
        }
        md.push('\n');
    }

    if let Some(chart) = &snapshot.chart {
        md.push_str("## Sentiment\n\n");
        md.push_str("| Sentiment | Pages | Share |\n");
        md.push_str("|-----------|-------|-------|\n");
        for slice in &chart.slices {
            md.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                slice.label, slice.count, slice.percent
            ));
        }
        md.push_str(&format!("\nTotal crawled pages: {}\n\n", chart.total));
    }

    if let Some(cloud) = &snapshot.word_cloud {
        if !cloud.words.is_empty() {
            md.push_str("## Top Words\n\n");
            let words: Vec<String> = cloud
                .words
                .iter()
                .take(REPORT_WORDS)
                .map(|(word, count)| format!("{} ({})", word, count))
                .collect();
            md.push_str(&words.join(", "));
            md.push_str("\n\n");
        }
    }

    md.push_str("## Summary\n\n");
    md.push_str(&snapshot.summary);
    md.push('\n');

    md
}
