use crate::search::{EngineName, HtmlSearchAdapter, ResultEntry, SearchAdapter, TimePeriod};
use reqwest::Client;
use std::collections::{HashMap, HashSet};

/// Queries the selected engines in order and merges their results
pub struct SearchAggregator {
    adapters: HashMap<EngineName, Box<dyn SearchAdapter>>,
}

impl SearchAggregator {
    /// Creates an aggregator with no adapters registered
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Creates an aggregator with an HTML adapter for every supported engine
    pub fn with_html_adapters(client: Client) -> Self {
        let mut aggregator = Self::new();
        for engine in EngineName::all() {
            aggregator.register(Box::new(HtmlSearchAdapter::new(engine, client.clone())));
        }
        aggregator
    }

    /// Registers an adapter, replacing any previous one for the same engine
    pub fn register(&mut self, adapter: Box<dyn SearchAdapter>) {
        self.adapters.insert(adapter.engine(), adapter);
    }

    /// Runs the query against each engine and returns the deduplicated results
    ///
    /// An engine that fails, or has no registered adapter, contributes nothing.
    ///
    /// # Arguments
    ///
    /// * `engines` - Engines to query, in caller order
    /// * `query` - Search text
    /// * `period` - Recency window
    /// * `max_per_engine` - Maximum results requested from each engine
    pub async fn aggregate(
        &self,
        engines: &[EngineName],
        query: &str,
        period: TimePeriod,
        max_per_engine: usize,
    ) -> Vec<ResultEntry> {
        let mut all = Vec::new();

        for engine in engines {
            let Some(adapter) = self.adapters.get(engine) else {
                tracing::warn!("No search adapter registered for {}", engine);
                continue;
            };

            match adapter.search(query, period, max_per_engine).await {
                Ok(results) => {
                    tracing::info!("{} returned {} results", engine, results.len());
                    all.extend(results);
                }
                Err(e) => {
                    tracing::warn!("Search via {} failed: {}", engine, e);
                }
            }
        }

        let unique = dedupe_entries(all);
        tracing::info!("Search produced {} unique results", unique.len());
        unique
    }
}

impl Default for SearchAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes repeated links, keeping each link's first occurrence and order
pub fn dedupe_entries(entries: Vec<ResultEntry>) -> Vec<ResultEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.link.clone()))
        .collect()
}
