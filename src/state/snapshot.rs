//! Progress snapshots emitted by the orchestrator

use crate::analysis::{SentimentChart, WordCloud};
use crate::state::{RecordStatus, RowView};
use std::fmt;
use std::time::Duration;

/// Why a task stopped before crawling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalReason {
    DriverUnavailable,
    NoEngines,
    EmptyUrlList,
    NoResults,
}

impl FatalReason {
    /// The status message shown for this failure
    pub fn message(&self) -> &'static str {
        match self {
            Self::DriverUnavailable => {
                "Error: browser driver unavailable. Check the [browser] configuration."
            }
            Self::NoEngines => "Error: select at least one engine.",
            Self::EmptyUrlList => "Error: the URL list is empty.",
            Self::NoResults => "No relevant results found.",
        }
    }
}

/// Pipeline stage of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Searching,
    Deduplicating,
    Crawling,
    Visualizing,
    Persisting,
    Summarizing,
    Done,
    Failed(FatalReason),
}

impl Stage {
    /// Returns true for the last snapshot of a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Searching => "searching",
            Self::Deduplicating => "deduplicating",
            Self::Crawling => "crawling",
            Self::Visualizing => "visualizing",
            Self::Persisting => "persisting",
            Self::Summarizing => "summarizing",
            Self::Done => "done",
            Self::Failed(_) => "failed",
        };
        write!(f, "{}", name)
    }
}

/// What happened to the current crawl item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemPhase {
    /// About to sleep for this long before extracting
    Pacing(Duration),
    /// Extraction finished with this status
    Processed(RecordStatus),
}

/// Per-item crawl progress (1-based `current`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemProgress {
    pub current: usize,
    pub total: usize,
    pub phase: ItemPhase,
}

/// One observable state of a running task
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub stage: Stage,
    pub status: String,
    pub summary: String,
    pub table: Vec<RowView>,
    pub chart: Option<SentimentChart>,
    pub word_cloud: Option<WordCloud>,
    pub item: Option<ItemProgress>,
}
