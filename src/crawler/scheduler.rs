//! Crawl scheduling and pacing
//!
//! The scheduler plans the first N links of the working table and processes them
//! strictly one at a time, sleeping a jittered delay before each extraction.

use crate::analysis::SentimentScorer;
use crate::config::PacingConfig;
use crate::crawler::session::{BrowserSession, Extraction};
use crate::state::{Corpus, RecordOutcome, RecordStatus, TableError, WorkingTable};
use rand::Rng;
use std::time::Duration;

/// Uniform delay range applied before each extraction (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    min_secs: f64,
    max_secs: f64,
}

impl Pacing {
    /// Creates a pacing range; bounds are reordered if given backwards and clamped at zero
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        let (lo, hi) = if min_secs <= max_secs {
            (min_secs, max_secs)
        } else {
            (max_secs, min_secs)
        };
        Self {
            min_secs: lo.max(0.0),
            max_secs: hi.max(0.0),
        }
    }

    pub fn from_config(config: &PacingConfig) -> Self {
        Self::new(config.min_delay_secs, config.max_delay_secs)
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_secs, self.max_secs)
    }

    /// Samples a delay uniformly from the range
    pub fn sample(&self) -> Duration {
        if self.max_secs <= self.min_secs {
            return Duration::from_secs_f64(self.min_secs);
        }
        let secs = rand::rng().random_range(self.min_secs..=self.max_secs);
        Duration::from_secs_f64(secs)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(2.0, 4.0)
    }
}

/// A planned extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlItem {
    /// 0-based position in the crawl plan
    pub index: usize,
    pub link: String,
}

/// Sequential, paced extraction over a bounded prefix of the working table
pub struct CrawlScheduler {
    plan: Vec<String>,
    cursor: usize,
    pacing: Pacing,
}

impl CrawlScheduler {
    /// Plans the first `crawl_count` links of the table, in table order
    ///
    /// # Arguments
    ///
    /// * `table` - The populated working table
    /// * `crawl_count` - Upper bound on extractions
    /// * `pacing` - Delay range applied before each extraction
    pub fn new(table: &WorkingTable, crawl_count: usize, pacing: Pacing) -> Self {
        let plan: Vec<String> = table.links().take(crawl_count).map(String::from).collect();
        tracing::info!(
            "Planned {} of {} results for extraction",
            plan.len(),
            table.len()
        );
        Self {
            plan,
            cursor: 0,
            pacing,
        }
    }

    /// Number of planned extractions
    pub fn total(&self) -> usize {
        self.plan.len()
    }

    /// Planned links in order
    pub fn planned_links(&self) -> &[String] {
        &self.plan
    }

    /// Returns the next planned item still present in the table
    pub fn next_item(&mut self, table: &WorkingTable) -> Option<CrawlItem> {
        while self.cursor < self.plan.len() {
            let index = self.cursor;
            self.cursor += 1;

            let link = &self.plan[index];
            if table.contains(link) {
                return Some(CrawlItem {
                    index,
                    link: link.clone(),
                });
            }
            tracing::debug!("Skipping {}: no longer in the working table", link);
        }
        None
    }

    /// Samples the delay for the next extraction
    pub fn next_delay(&self) -> Duration {
        self.pacing.sample()
    }

    /// Sleeps `delay`, extracts the item and records the outcome
    ///
    /// # Arguments
    ///
    /// * `item` - The item returned by `next_item`
    /// * `delay` - Pause before the request
    /// * `session` - Extraction session
    /// * `table` - Working table receiving the outcome
    /// * `corpus` - Receives content and sentiment of successful extractions
    /// * `scorer` - Sentiment scorer
    ///
    /// # Returns
    ///
    /// * `Ok(RecordStatus)` - The status recorded for the item
    /// * `Err(TableError)` - The record was already processed or has vanished
    pub async fn process(
        &self,
        item: &CrawlItem,
        delay: Duration,
        session: &mut dyn BrowserSession,
        table: &mut WorkingTable,
        corpus: &mut Corpus,
        scorer: &dyn SentimentScorer,
    ) -> Result<RecordStatus, TableError> {
        tokio::time::sleep(delay).await;

        match session.extract(&item.link).await {
            Extraction::Success(content) => {
                let sentiment = scorer.score(&content);
                let status = table.complete(
                    &item.link,
                    RecordOutcome::Success {
                        content: content.clone(),
                        sentiment,
                    },
                )?;
                corpus.push(&content, sentiment);
                Ok(status)
            }
            Extraction::Failure(reason) => {
                tracing::debug!("Extraction failed for {}: {}", item.link, reason);
                table.complete(&item.link, RecordOutcome::Failed)
            }
        }
    }
}
