//! Search engine adapters and result aggregation
//!
//! Each supported engine is reached through a [`SearchAdapter`]. The
//! [`SearchAggregator`] queries the selected engines in order and merges their
//! results, keeping the first occurrence of every link.

mod aggregator;
mod engines;

pub use aggregator::{dedupe_entries, SearchAggregator};
pub use engines::{build_search_client, parse_results, HtmlSearchAdapter};

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Source label used for URL-mode pseudo-results
pub const USER_DEFINED_SOURCE: &str = "User Defined";

/// Supported search engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineName {
    Bing,
    DuckDuckGo,
    Baidu,
    Yandex,
}

impl EngineName {
    pub fn all() -> [Self; 4] {
        [Self::Bing, Self::DuckDuckGo, Self::Baidu, Self::Yandex]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bing => "Bing",
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Baidu => "Baidu",
            Self::Yandex => "Yandex",
        }
    }
}

impl fmt::Display for EngineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EngineName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bing" => Ok(Self::Bing),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            "baidu" => Ok(Self::Baidu),
            "yandex" => Ok(Self::Yandex),
            other => Err(format!(
                "unknown engine '{}' (expected Bing, DuckDuckGo, Baidu or Yandex)",
                other
            )),
        }
    }
}

/// Recency window applied to search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimePeriod {
    #[default]
    AllTime,
    Day,
    Week,
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AllTime => "all",
            Self::Day => "day",
            Self::Week => "week",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TimePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "all time" | "any" => Ok(Self::AllTime),
            "day" | "24h" | "past 24 hours" => Ok(Self::Day),
            "week" | "past week" => Ok(Self::Week),
            other => Err(format!(
                "unknown time period '{}' (expected all, day or week)",
                other
            )),
        }
    }
}

/// A single search result (or a synthesized URL-mode entry)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub link: String,
    pub title: String,
    pub source: String,
}

impl ResultEntry {
    /// Synthesizes the entry for the `n`-th (1-based) user supplied URL
    pub fn user_defined(url: impl Into<String>, n: usize) -> Self {
        Self {
            link: url.into(),
            title: format!("URL Target {}", n),
            source: USER_DEFINED_SOURCE.to_string(),
        }
    }
}

/// Errors raised by search adapters
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search engine returned HTTP {0}")]
    HttpStatus(u16),

    #[error("failed to parse results page: {0}")]
    Parse(String),
}

/// One search engine backend
#[async_trait]
pub trait SearchAdapter: Send + Sync {
    /// The engine this adapter queries
    fn engine(&self) -> EngineName;

    /// Runs a query and returns at most `max_results` entries in engine rank order
    async fn search(
        &self,
        query: &str,
        period: TimePeriod,
        max_results: usize,
    ) -> Result<Vec<ResultEntry>, SearchError>;
}
