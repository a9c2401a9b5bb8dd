//! LLM summary: gating, the summarizer interface and report formatting

mod gate;
mod openai;

pub use gate::{
    api_key_usable, GateDecision, SummaryGate, API_KEY_PLACEHOLDER, SKIPPED, SKIPPED_NO_KEY,
};
pub use openai::OpenAiSummarizer;

use crate::config::LlmConfig;
use async_trait::async_trait;
use thiserror::Error;

/// Summarizer errors
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Connection failed or timed out
    #[error("network error: {0}")]
    Network(String),

    /// Credentials were rejected
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Non-2xx response other than an auth failure
    #[error("API error: {0}")]
    Api(String),

    /// Unexpected response body
    #[error("parse error: {0}")]
    Parse(String),
}

/// Produces a text summary of the crawled corpus
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        settings: &LlmConfig,
        corpus: &str,
        query: &str,
    ) -> Result<String, SummarizeError>;
}

/// Summary text when the summarizer call fails
pub fn summary_failure_text(err: &SummarizeError) -> String {
    format!("LLM analysis failed: {}", err)
}

/// Formats a summary as a markdown report followed by the crawled sources
pub fn format_summary_for_display(summary: &str, links: &[String]) -> String {
    let mut report = String::from("## Intelligence Summary\n\n");
    report.push_str(summary.trim());
    report.push_str("\n\n### Sources\n\n");

    if links.is_empty() {
        report.push_str("_No sources crawled._\n");
    }
    for (i, link) in links.iter().enumerate() {
        report.push_str(&format!("{}. <{}>\n", i + 1, link));
    }
    report
}
