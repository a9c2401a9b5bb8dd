//! Task orchestrator: the pull-driven pipeline state machine
//!
//! Each call to [`TaskOrchestrator::next_snapshot`] performs the work announced by
//! the previous snapshot and returns the next one:
//! - Acquiring the browser session
//! - Searching (search mode) or synthesizing entries (URL mode)
//! - One pacing snapshot and one processed snapshot per crawled item
//! - Building visual data, persisting the table and requesting the summary
//!
//! After the terminal snapshot (`Done` or `Failed`) it returns `None`.

use crate::analysis::{
    LexiconScorer, SentimentChart, SentimentScorer, TallyVisualizer, VisualizationBuilder,
    WordCloud,
};
use crate::config::{Config, LlmConfig};
use crate::crawler::fetcher::HttpSessionProvider;
use crate::crawler::scheduler::{CrawlItem, CrawlScheduler, Pacing};
use crate::crawler::session::{BrowserSession, SessionGuard, SessionProvider};
use crate::search::{build_search_client, ResultEntry, SearchAggregator, SearchError};
use crate::state::{
    Corpus, FatalReason, ItemPhase, ItemProgress, ProgressSnapshot, Stage, TaskRequest,
    WorkingTable,
};
use crate::storage::{open_sink, persistence_label, PersistenceSink};
use crate::summary::{
    format_summary_for_display, summary_failure_text, GateDecision, OpenAiSummarizer,
    Summarizer, SummaryGate,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const STATUS_STARTING: &str = "Starting task...";
const STATUS_CRAWL_READY: &str = "Search complete, starting crawl...";
const STATUS_VISUALIZING: &str = "Building sentiment chart and word cloud...";
const STATUS_PERSISTING: &str = "Saving results...";
const STATUS_SUMMARIZING: &str = "Requesting AI summary...";
const STATUS_DONE: &str = "Task complete!";
const SUMMARY_PENDING: &str = "Awaiting analysis results...";

/// Per-run settings
#[derive(Debug, Clone)]
pub struct TaskSettings {
    pub llm: LlmConfig,
    pub pacing: Pacing,
    pub font_path: String,
}

/// Collaborators used by a task run
#[derive(Clone)]
pub struct Toolkit {
    pub sessions: Arc<dyn SessionProvider>,
    pub aggregator: Arc<SearchAggregator>,
    pub scorer: Arc<dyn SentimentScorer>,
    pub visuals: Arc<dyn VisualizationBuilder>,
    pub summarizer: Arc<dyn Summarizer>,
    pub sink: Arc<Mutex<dyn PersistenceSink + Send>>,
}

impl Toolkit {
    /// Builds the production collaborators from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Loaded configuration
    /// * `config_hash` - Hash of the configuration, stored with every persisted run
    ///
    /// # Returns
    ///
    /// * `Ok(Toolkit)` - HTTP sessions, HTML search engines, SQLite sink and OpenAI summarizer
    /// * `Err(SiftError)` - The search client, database or summarizer could not be created
    pub fn from_config(config: &Config, config_hash: &str) -> crate::Result<Self> {
        let search_client = build_search_client(&config.browser).map_err(SearchError::Network)?;
        let sink = open_sink(Path::new(&config.output.database_path), config_hash)?;
        let summarizer =
            OpenAiSummarizer::new(Duration::from_secs(config.browser.timeout_secs.max(60)))?;

        tracing::info!("Toolkit ready (database {})", config.output.database_path);

        Ok(Self {
            sessions: Arc::new(HttpSessionProvider::new(config.browser.clone())),
            aggregator: Arc::new(SearchAggregator::with_html_adapters(search_client)),
            scorer: Arc::new(LexiconScorer::new()),
            visuals: Arc::new(TallyVisualizer::default()),
            summarizer: Arc::new(summarizer),
            sink: Arc::new(Mutex::new(sink)),
        })
    }
}

/// Work to perform on the next pull
enum Step {
    Start,
    Plan,
    Search,
    Pace,
    Extract(CrawlItem, Duration),
    Visualize,
    Persist,
    Summarize,
    Finished,
}

/// Drives one task request through the pipeline
pub struct TaskOrchestrator {
    request: TaskRequest,
    settings: TaskSettings,
    toolkit: Toolkit,
    step: Step,
    guard: Option<SessionGuard>,
    table: WorkingTable,
    corpus: Corpus,
    scheduler: Option<CrawlScheduler>,
    status: String,
    summary: String,
    chart: Option<SentimentChart>,
    word_cloud: Option<WordCloud>,
}

impl TaskOrchestrator {
    /// Creates an orchestrator; no work happens until the first `next_snapshot`
    pub fn new(request: TaskRequest, settings: TaskSettings, toolkit: Toolkit) -> Self {
        Self {
            request,
            settings,
            toolkit,
            step: Step::Start,
            guard: None,
            table: WorkingTable::new(),
            corpus: Corpus::new(),
            scheduler: None,
            status: String::new(),
            summary: SUMMARY_PENDING.to_string(),
            chart: None,
            word_cloud: None,
        }
    }

    /// The working table built so far (full content)
    pub fn table(&self) -> &WorkingTable {
        &self.table
    }

    /// Returns true while a session is held
    pub fn holds_session(&self) -> bool {
        self.guard.as_ref().is_some_and(|g| g.is_active())
    }

    /// Performs the next unit of work and returns the resulting snapshot
    ///
    /// # Returns
    ///
    /// * `Some(ProgressSnapshot)` - The next observable state
    /// * `None` - The run has already emitted its terminal snapshot
    pub async fn next_snapshot(&mut self) -> Option<ProgressSnapshot> {
        let step = std::mem::replace(&mut self.step, Step::Finished);
        let snapshot = match step {
            Step::Start => self.start().await,
            Step::Plan => self.plan(),
            Step::Search => self.search().await,
            Step::Pace => self.pace(),
            Step::Extract(item, delay) => self.extract(item, delay).await,
            Step::Visualize => self.visualize(),
            Step::Persist => self.persist(),
            Step::Summarize => self.summarize().await,
            Step::Finished => return None,
        };
        Some(snapshot)
    }

    async fn start(&mut self) -> ProgressSnapshot {
        if let TaskRequest::UrlList { urls } = &self.request {
            if urls.is_empty() {
                return self.fail(FatalReason::EmptyUrlList, None);
            }
        }

        match self.toolkit.sessions.acquire().await {
            Ok(session) => {
                tracing::info!("Browser session acquired");
                self.guard = Some(SessionGuard::new(session));
                self.status = STATUS_STARTING.to_string();
                self.step = Step::Plan;
                self.snapshot(Stage::Init, None)
            }
            Err(e) => {
                tracing::error!("Failed to acquire browser session: {}", e);
                self.fail(FatalReason::DriverUnavailable, Some(e.to_string()))
            }
        }
    }

    fn plan(&mut self) -> ProgressSnapshot {
        match &self.request {
            TaskRequest::UrlList { urls } => {
                let entries: Vec<ResultEntry> = urls
                    .iter()
                    .enumerate()
                    .map(|(i, url)| ResultEntry::user_defined(url.clone(), i + 1))
                    .collect();
                self.populate(entries);
                self.status = STATUS_CRAWL_READY.to_string();
                self.step = Step::Pace;
                self.snapshot(Stage::Deduplicating, None)
            }
            TaskRequest::Search(params) => {
                if params.engines.is_empty() {
                    return self.fail(FatalReason::NoEngines, None);
                }
                let names: Vec<&str> = params.engines.iter().map(|e| e.as_str()).collect();
                self.status = format!("Searching via {}...", names.join(", "));
                self.step = Step::Search;
                self.snapshot(Stage::Searching, None)
            }
        }
    }

    async fn search(&mut self) -> ProgressSnapshot {
        let TaskRequest::Search(params) = &self.request else {
            return self.fail(FatalReason::NoResults, None);
        };

        tracing::info!(
            "Searching '{}' via {} engine(s), period {}",
            params.query,
            params.engines.len(),
            params.time_period
        );
        let results = self
            .toolkit
            .aggregator
            .aggregate(
                &params.engines,
                &params.query,
                params.time_period,
                params.search_count as usize,
            )
            .await;

        if results.is_empty() {
            return self.fail(FatalReason::NoResults, None);
        }

        self.populate(results);
        self.status = STATUS_CRAWL_READY.to_string();
        self.step = Step::Pace;
        self.snapshot(Stage::Deduplicating, None)
    }

    fn populate(&mut self, entries: Vec<ResultEntry>) {
        self.table = WorkingTable::from_entries(entries);
        self.scheduler = Some(CrawlScheduler::new(
            &self.table,
            self.request.crawl_count(),
            self.settings.pacing,
        ));
    }

    fn pace(&mut self) -> ProgressSnapshot {
        let next = self
            .scheduler
            .as_mut()
            .and_then(|s| s.next_item(&self.table).map(|item| (item, s.next_delay(), s.total())));

        match next {
            Some((item, delay, total)) => {
                let current = item.index + 1;
                tracing::debug!("Crawling {}/{}: {}", current, total, item.link);
                self.status = format!(
                    "Crawling {}/{}... (delay {:.1}s)",
                    current,
                    total,
                    delay.as_secs_f64()
                );
                self.step = Step::Extract(item, delay);
                self.snapshot(
                    Stage::Crawling,
                    Some(ItemProgress {
                        current,
                        total,
                        phase: ItemPhase::Pacing(delay),
                    }),
                )
            }
            None => self.after_crawl(),
        }
    }

    async fn extract(&mut self, item: CrawlItem, delay: Duration) -> ProgressSnapshot {
        let total = self.scheduler.as_ref().map(|s| s.total()).unwrap_or(0);
        let current = item.index + 1;

        let outcome = match (self.scheduler.as_ref(), self.guard.as_mut()) {
            (Some(scheduler), Some(guard)) => {
                scheduler
                    .process(
                        &item,
                        delay,
                        guard as &mut dyn BrowserSession,
                        &mut self.table,
                        &mut self.corpus,
                        self.toolkit.scorer.as_ref(),
                    )
                    .await
            }
            _ => Err(crate::state::TableError::UnknownLink(item.link.clone())),
        };

        let status = match outcome {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Could not record {}: {}", item.link, e);
                self.table
                    .get(&item.link)
                    .map(|r| r.status)
                    .unwrap_or(crate::state::RecordStatus::Failed)
            }
        };

        self.status = format!("Crawled {}/{}: {}", current, total, status);
        self.step = Step::Pace;
        self.snapshot(
            Stage::Crawling,
            Some(ItemProgress {
                current,
                total,
                phase: ItemPhase::Processed(status),
            }),
        )
    }

    fn after_crawl(&mut self) -> ProgressSnapshot {
        let (pending, success, failed) = self.table.status_counts();
        tracing::info!(
            "Crawl finished: {} success, {} failed, {} not crawled",
            success,
            failed,
            pending
        );

        if self.corpus.is_empty() {
            self.status = STATUS_PERSISTING.to_string();
            self.step = Step::Persist;
            self.snapshot(Stage::Persisting, None)
        } else {
            self.status = STATUS_VISUALIZING.to_string();
            self.step = Step::Visualize;
            self.snapshot(Stage::Visualizing, None)
        }
    }

    fn visualize(&mut self) -> ProgressSnapshot {
        match self.toolkit.visuals.build_chart(self.corpus.sentiments()) {
            Ok(chart) => self.chart = Some(chart),
            Err(e) => tracing::warn!("Sentiment chart skipped: {}", e),
        }
        match self
            .toolkit
            .visuals
            .build_word_cloud(self.corpus.text(), &self.settings.font_path)
        {
            Ok(cloud) => self.word_cloud = Some(cloud),
            Err(e) => tracing::warn!("Word cloud skipped: {}", e),
        }

        self.status = STATUS_PERSISTING.to_string();
        self.step = Step::Persist;
        self.snapshot(Stage::Persisting, None)
    }

    fn persist(&mut self) -> ProgressSnapshot {
        let label = persistence_label(self.request.query());
        match self.toolkit.sink.lock() {
            Ok(mut sink) => match sink.save(self.table.rows(), &label) {
                Ok(run_id) => tracing::info!("Persisted {} rows (run {})", self.table.len(), run_id),
                Err(e) => tracing::warn!("Failed to persist results: {}", e),
            },
            Err(e) => tracing::warn!("Persistence sink unavailable: {}", e),
        }

        match SummaryGate::decide(&self.request, &self.corpus, &self.settings.llm.api_key) {
            GateDecision::Invoke => {
                self.status = STATUS_SUMMARIZING.to_string();
                self.step = Step::Summarize;
                self.snapshot(Stage::Summarizing, None)
            }
            GateDecision::Skip(reason) => {
                tracing::info!("{}", reason);
                self.summary = reason.to_string();
                self.finish()
            }
        }
    }

    async fn summarize(&mut self) -> ProgressSnapshot {
        let query = self.request.query().unwrap_or_default();
        let result = self
            .toolkit
            .summarizer
            .summarize(&self.settings.llm, self.corpus.text(), query)
            .await;

        self.summary = match result {
            Ok(text) => {
                let links = self
                    .scheduler
                    .as_ref()
                    .map(|s| s.planned_links().to_vec())
                    .unwrap_or_default();
                format_summary_for_display(&text, &links)
            }
            Err(e) => {
                tracing::warn!("Summarization failed: {}", e);
                summary_failure_text(&e)
            }
        };
        self.finish()
    }

    fn finish(&mut self) -> ProgressSnapshot {
        self.release_session();
        tracing::info!("Task complete");
        self.status = STATUS_DONE.to_string();
        self.step = Step::Finished;
        self.snapshot(Stage::Done, None)
    }

    fn fail(&mut self, reason: FatalReason, detail: Option<String>) -> ProgressSnapshot {
        self.release_session();
        tracing::warn!("Task stopped: {:?}", reason);
        self.status = match detail {
            Some(detail) => format!("{} ({})", reason.message(), detail),
            None => reason.message().to_string(),
        };
        self.step = Step::Finished;
        self.snapshot(Stage::Failed(reason), None)
    }

    fn release_session(&mut self) {
        if let Some(mut guard) = self.guard.take() {
            guard.release();
        }
    }

    fn snapshot(&self, stage: Stage, item: Option<ItemProgress>) -> ProgressSnapshot {
        ProgressSnapshot {
            stage,
            status: self.status.clone(),
            summary: self.summary.clone(),
            table: self.table.display(),
            chart: self.chart.clone(),
            word_cloud: self.word_cloud.clone(),
            item,
        }
    }
}
