//! Signal-Sift: paced open-web intelligence gathering
//!
//! This crate turns a topic search (or a list of URLs) into a table of extracted
//! page content tagged with sentiment, persists the table, and optionally asks an
//! LLM for a summary. Progress is reported as a sequence of snapshots that the
//! caller pulls one at a time.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod output;
pub mod search;
pub mod state;
pub mod storage;
pub mod summary;
pub mod wipe;

use thiserror::Error;

/// Main error type for Signal-Sift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Search error: {0}")]
    Search(#[from] search::SearchError),

    #[error("Browser session error: {0}")]
    Session(#[from] crawler::SessionError),

    #[error("Summarizer error: {0}")]
    Summarize(#[from] summary::SummarizeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid wipe pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Signal-Sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{TaskOrchestrator, TaskSettings, Toolkit};
pub use search::{EngineName, ResultEntry, TimePeriod};
pub use state::{ProgressSnapshot, RecordStatus, Stage, TaskRecord, TaskRequest, WorkingTable};
