use crate::state::{Corpus, TaskRequest};

/// Placeholder shipped in sample configs; a key containing it is treated as unset
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

/// Summary text when the summary is not applicable to the run
pub const SKIPPED: &str = "LLM analysis skipped.";

/// Summary text when no usable API key is configured
pub const SKIPPED_NO_KEY: &str = "LLM analysis skipped (API key not set).";

/// Whether the summarizer should be called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Do not call; use this text as the summary
    Skip(&'static str),
    Invoke,
}

/// Decides whether a finished crawl gets an LLM summary
pub struct SummaryGate;

impl SummaryGate {
    /// Applies the skip rules in order: URL mode, direct mode, empty corpus, then key check
    pub fn decide(request: &TaskRequest, corpus: &Corpus, api_key: &str) -> GateDecision {
        if request.is_url_mode() || request.is_direct() || corpus.is_empty() {
            return GateDecision::Skip(SKIPPED);
        }

        if !api_key_usable(api_key) {
            return GateDecision::Skip(SKIPPED_NO_KEY);
        }

        GateDecision::Invoke
    }
}

/// A key is usable when it is non-blank, not the placeholder and longer than 10 chars
pub fn api_key_usable(api_key: &str) -> bool {
    let key = api_key.trim();
    !key.is_empty() && !key.contains(API_KEY_PLACEHOLDER) && key.chars().count() > 10
}
