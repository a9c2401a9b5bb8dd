//! Visualization data: sentiment distribution and word frequencies
//!
//! Only the data behind the chart and the word cloud is produced; drawing is left
//! to whatever presents the snapshot.

use crate::analysis::sentiment::tokenize;
use crate::analysis::Sentiment;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised while building visual artifacts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VisualError {
    #[error("no data to visualize")]
    NoData,

    #[error("invalid font path: {0}")]
    InvalidFont(String),
}

/// One slice of the sentiment pie
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub label: Sentiment,
    pub count: usize,
    pub percent: f64,
}

/// Sentiment distribution over the crawled pages
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentChart {
    pub slices: Vec<ChartSlice>,
    pub total: usize,
}

/// Word frequencies for a word cloud, most frequent first
#[derive(Debug, Clone, PartialEq)]
pub struct WordCloud {
    pub font_path: String,
    pub words: Vec<(String, usize)>,
}

/// Builds the visual artifacts of a finished crawl
pub trait VisualizationBuilder: Send + Sync {
    fn build_chart(&self, sentiments: &[Sentiment]) -> Result<SentimentChart, VisualError>;

    fn build_word_cloud(&self, text: &str, font_path: &str) -> Result<WordCloud, VisualError>;
}

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "more", "most", "my",
    "new", "no", "not", "of", "on", "one", "or", "our", "out", "over", "said", "says", "she", "so",
    "some", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "to", "up", "was", "we", "were", "what", "when", "which", "who", "will", "with", "would",
    "you", "your",
];

/// Counting visualizer
pub struct TallyVisualizer {
    max_words: usize,
    stopwords: HashSet<&'static str>,
}

impl TallyVisualizer {
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words,
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }
}

impl Default for TallyVisualizer {
    fn default() -> Self {
        Self::new(100)
    }
}

impl VisualizationBuilder for TallyVisualizer {
    fn build_chart(&self, sentiments: &[Sentiment]) -> Result<SentimentChart, VisualError> {
        if sentiments.is_empty() {
            return Err(VisualError::NoData);
        }

        let total = sentiments.len();
        let slices = Sentiment::all()
            .into_iter()
            .filter_map(|label| {
                let count = sentiments.iter().filter(|s| **s == label).count();
                (count > 0).then(|| ChartSlice {
                    label,
                    count,
                    percent: count as f64 * 100.0 / total as f64,
                })
            })
            .collect();

        Ok(SentimentChart { slices, total })
    }

    fn build_word_cloud(&self, text: &str, font_path: &str) -> Result<WordCloud, VisualError> {
        if font_path.trim().is_empty() {
            return Err(VisualError::InvalidFont(font_path.to_string()));
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in tokenize(text) {
            if token.chars().count() < 3
                || self.stopwords.contains(token.as_str())
                || token.chars().all(|c| c.is_ascii_digit())
            {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }

        if counts.is_empty() {
            return Err(VisualError::NoData);
        }

        let mut words: Vec<(String, usize)> = counts.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(self.max_words);

        Ok(WordCloud {
            font_path: font_path.to_string(),
            words,
        })
    }
}
