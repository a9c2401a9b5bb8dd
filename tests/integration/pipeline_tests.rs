//! Integration tests for the task pipeline
//!
//! These tests drive the orchestrator end-to-end with in-process fakes for the
//! browser session, search engines, summarizer and persistence sink. Pacing sleeps
//! run on a paused clock.

use async_trait::async_trait;
use signal_sift::analysis::{
    LexiconScorer, Sentiment, SentimentChart, TallyVisualizer, VisualError, VisualizationBuilder,
    WordCloud,
};
use signal_sift::config::{Config, LlmConfig};
use signal_sift::crawler::{
    drive, BrowserSession, Extraction, Pacing, SessionError, SessionProvider,
};
use signal_sift::search::{
    EngineName, ResultEntry, SearchAdapter, SearchAggregator, SearchError, TimePeriod,
    USER_DEFINED_SOURCE,
};
use signal_sift::state::{FatalReason, ItemPhase, ProgressSnapshot, RecordStatus, Stage};
use signal_sift::storage::{PersistenceSink, StorageError, StorageResult};
use signal_sift::summary::{SummarizeError, Summarizer, SKIPPED, SKIPPED_NO_KEY};
use signal_sift::{TaskOrchestrator, TaskRecord, TaskRequest, TaskSettings, Toolkit};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;

const VALID_KEY: &str = "sk-test-0123456789abcdef";

type ContentFn = fn(&str) -> Extraction;

fn positive_page(link: &str) -> Extraction {
    if link.contains("fail") {
        Extraction::Failure("HTTP 500".to_string())
    } else {
        Extraction::Success(format!("{} reports bitcoin rally and strong gains", link))
    }
}

fn failing_page(_link: &str) -> Extraction {
    Extraction::Failure("connection failed".to_string())
}

fn long_page(_link: &str) -> Extraction {
    Extraction::Success("x".repeat(500))
}

struct FakeSession {
    content: ContentFn,
    extracted: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn extract(&mut self, link: &str) -> Extraction {
        self.extracted.fetch_add(1, Ordering::SeqCst);
        (self.content)(link)
    }

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeProvider {
    available: bool,
    content: ContentFn,
    acquired: Arc<AtomicUsize>,
    extracted: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl SessionProvider for FakeProvider {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        if !self.available {
            return Err(SessionError::Unavailable("no driver".to_string()));
        }
        Ok(Box::new(FakeSession {
            content: self.content,
            extracted: self.extracted.clone(),
            released: self.released.clone(),
        }))
    }
}

struct FixedEngine {
    engine: EngineName,
    results: Vec<ResultEntry>,
}

#[async_trait]
impl SearchAdapter for FixedEngine {
    fn engine(&self) -> EngineName {
        self.engine
    }

    async fn search(
        &self,
        _query: &str,
        _period: TimePeriod,
        max_results: usize,
    ) -> Result<Vec<ResultEntry>, SearchError> {
        Ok(self.results.iter().take(max_results).cloned().collect())
    }
}

struct FakeSummarizer {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(
        &self,
        _settings: &LlmConfig,
        corpus: &str,
        query: &str,
    ) -> Result<String, SummarizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SummarizeError::Api("HTTP 500".to_string()));
        }
        Ok(format!("{}: {} chars analysed", query, corpus.len()))
    }
}

/// Records every save attempt; when `fail` is set each attempt is rejected
#[derive(Default)]
struct RecordingSink {
    fail: bool,
    saves: Vec<(Vec<TaskRecord>, String)>,
}

impl PersistenceSink for RecordingSink {
    fn save(&mut self, rows: &[TaskRecord], label: &str) -> StorageResult<i64> {
        self.saves.push((rows.to_vec(), label.to_string()));
        if self.fail {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        Ok(self.saves.len() as i64)
    }
}

struct FailingVisuals;

impl VisualizationBuilder for FailingVisuals {
    fn build_chart(&self, _sentiments: &[Sentiment]) -> Result<SentimentChart, VisualError> {
        Err(VisualError::NoData)
    }

    fn build_word_cloud(&self, _text: &str, font_path: &str) -> Result<WordCloud, VisualError> {
        Err(VisualError::InvalidFont(font_path.to_string()))
    }
}

/// Builder for a toolkit of fakes plus the counters observing them
struct Harness {
    available: bool,
    content: ContentFn,
    engines: Vec<(EngineName, Vec<ResultEntry>)>,
    summarizer_fails: bool,
    sink_fails: bool,
    visuals_fail: bool,
    api_key: String,
    acquired: Arc<AtomicUsize>,
    extracted: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    summaries: Arc<AtomicUsize>,
    sink: Arc<Mutex<RecordingSink>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            available: true,
            content: positive_page,
            engines: vec![],
            summarizer_fails: false,
            sink_fails: false,
            visuals_fail: false,
            api_key: VALID_KEY.to_string(),
            acquired: Arc::new(AtomicUsize::new(0)),
            extracted: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
            summaries: Arc::new(AtomicUsize::new(0)),
            sink: Arc::new(Mutex::new(RecordingSink::default())),
        }
    }

    fn engine(mut self, engine: EngineName, links: &[&str]) -> Self {
        let results = links
            .iter()
            .enumerate()
            .map(|(i, link)| ResultEntry {
                link: link.to_string(),
                title: format!("{} result {}", engine, i + 1),
                source: engine.to_string(),
            })
            .collect();
        self.engines.push((engine, results));
        self
    }

    fn orchestrator(&self, request: TaskRequest) -> TaskOrchestrator {
        let mut aggregator = SearchAggregator::new();
        for (engine, results) in &self.engines {
            aggregator.register(Box::new(FixedEngine {
                engine: *engine,
                results: results.clone(),
            }));
        }

        self.sink.lock().unwrap().fail = self.sink_fails;
        let visuals: Arc<dyn VisualizationBuilder> = if self.visuals_fail {
            Arc::new(FailingVisuals)
        } else {
            Arc::new(TallyVisualizer::default())
        };

        let toolkit = Toolkit {
            sessions: Arc::new(FakeProvider {
                available: self.available,
                content: self.content,
                acquired: self.acquired.clone(),
                extracted: self.extracted.clone(),
                released: self.released.clone(),
            }),
            aggregator: Arc::new(aggregator),
            scorer: Arc::new(LexiconScorer::new()),
            visuals,
            summarizer: Arc::new(FakeSummarizer {
                fail: self.summarizer_fails,
                calls: self.summaries.clone(),
            }),
            sink: self.sink.clone(),
        };

        let settings = TaskSettings {
            llm: LlmConfig {
                api_key: self.api_key.clone(),
                ..LlmConfig::default()
            },
            pacing: Pacing::new(2.0, 4.0),
            font_path: "DejaVuSans.ttf".to_string(),
        };

        TaskOrchestrator::new(request, settings, toolkit)
    }

    fn saves(&self) -> Vec<(Vec<TaskRecord>, String)> {
        self.sink.lock().unwrap().saves.clone()
    }

    fn count(counter: &Arc<AtomicUsize>) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn search_request(engines: &[EngineName], query: &str, crawl_count: u32) -> TaskRequest {
    TaskRequest::search(engines.iter().copied(), query, TimePeriod::AllTime, 10, crawl_count)
}

async fn run_to_end(orchestrator: &mut TaskOrchestrator) -> Vec<ProgressSnapshot> {
    let mut snapshots = Vec::new();
    drive(orchestrator, |s| snapshots.push(s.clone())).await;
    snapshots
}

fn processed_count(snapshots: &[ProgressSnapshot]) -> usize {
    snapshots
        .iter()
        .filter(|s| matches!(s.item.map(|i| i.phase), Some(ItemPhase::Processed(_))))
        .count()
}

#[tokio::test(start_paused = true)]
async fn test_search_crawl_partial_table() {
    let harness = Harness::new().engine(
        EngineName::Bing,
        &["https://a.example/", "https://b.example/", "https://c.example/"],
    );
    let mut orchestrator =
        harness.orchestrator(search_request(&[EngineName::Bing], "bitcoin etf", 2));

    let snapshots = run_to_end(&mut orchestrator).await;
    let stages: Vec<Stage> = snapshots.iter().map(|s| s.stage).collect();
    assert_eq!(
        stages,
        vec![
            Stage::Init,
            Stage::Searching,
            Stage::Deduplicating,
            Stage::Crawling,
            Stage::Crawling,
            Stage::Crawling,
            Stage::Crawling,
            Stage::Visualizing,
            Stage::Persisting,
            Stage::Summarizing,
            Stage::Done,
        ]
    );

    let last = snapshots.last().unwrap();
    let statuses: Vec<RecordStatus> = last.table.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![RecordStatus::Success, RecordStatus::Success, RecordStatus::Pending]
    );
    assert!(last.chart.is_some());
    assert!(last.word_cloud.is_some());
    assert!(last.summary.starts_with("## Intelligence Summary"));
    assert!(last.summary.contains("1. <https://a.example/>"));
    assert!(last.summary.contains("2. <https://b.example/>"));
    assert!(!last.summary.contains("https://c.example/"));

    assert_eq!(Harness::count(&harness.summaries), 1);
    assert_eq!(Harness::count(&harness.released), 1);
    assert!(!orchestrator.holds_session());
    assert!(orchestrator.next_snapshot().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_engine_results_are_deduplicated_in_order() {
    let harness = Harness::new()
        .engine(
            EngineName::Bing,
            &["https://a.example/", "https://b.example/", "https://c.example/"],
        )
        .engine(
            EngineName::DuckDuckGo,
            &["https://b.example/", "https://d.example/"],
        );
    let mut orchestrator = harness.orchestrator(search_request(
        &[EngineName::Bing, EngineName::DuckDuckGo],
        "bitcoin",
        10,
    ));

    run_to_end(&mut orchestrator).await;

    let links: Vec<&str> = orchestrator.table().links().collect();
    assert_eq!(
        links,
        vec![
            "https://a.example/",
            "https://b.example/",
            "https://c.example/",
            "https://d.example/"
        ]
    );
    let b = orchestrator.table().get("https://b.example/").unwrap();
    assert_eq!(b.source, "Bing");
}

#[tokio::test(start_paused = true)]
async fn test_crawl_is_bounded_by_crawl_count() {
    let links: Vec<String> = (1..=8).map(|i| format!("https://site{}.example/", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    let harness = Harness::new().engine(EngineName::Bing, &link_refs);
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "solana", 5));

    let snapshots = run_to_end(&mut orchestrator).await;

    assert_eq!(processed_count(&snapshots), 5);
    assert_eq!(Harness::count(&harness.extracted), 5);
    let (pending, success, failed) = orchestrator.table().status_counts();
    assert_eq!((pending, success + failed), (3, 5));

    for (i, link) in links.iter().enumerate() {
        let record = orchestrator.table().get(link).unwrap();
        assert_eq!(record.status.is_terminal(), i < 5, "row {}", i);
    }
}

#[tokio::test(start_paused = true)]
async fn test_item_progress_alternates_pacing_and_processed() {
    let harness = Harness::new().engine(
        EngineName::Bing,
        &["https://ok.example/", "https://fail.example/"],
    );
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "eth", 2));

    let snapshots = run_to_end(&mut orchestrator).await;
    let items: Vec<_> = snapshots.iter().filter_map(|s| s.item).collect();
    assert_eq!(items.len(), 4);

    for (i, item) in items.iter().enumerate() {
        assert_eq!(item.total, 2);
        assert_eq!(item.current, i / 2 + 1);
        match (i % 2, item.phase) {
            (0, ItemPhase::Pacing(delay)) => {
                let secs = delay.as_secs_f64();
                assert!((2.0..=4.0).contains(&secs), "delay {}", secs);
            }
            (1, ItemPhase::Processed(_)) => {}
            other => panic!("unexpected phase order: {:?}", other),
        }
    }
    assert_eq!(items[1].phase, ItemPhase::Processed(RecordStatus::Success));
    assert_eq!(items[3].phase, ItemPhase::Processed(RecordStatus::Failed));
}

#[tokio::test(start_paused = true)]
async fn test_announced_delay_is_slept_before_each_extraction() {
    let harness = Harness::new().engine(
        EngineName::Bing,
        &["https://a.example/", "https://b.example/", "https://c.example/"],
    );
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "sol", 3));

    let start = Instant::now();
    let mut announced = Duration::ZERO;
    let mut processed = 0;
    while let Some(snapshot) = orchestrator.next_snapshot().await {
        match snapshot.item.map(|i| i.phase) {
            Some(ItemPhase::Pacing(delay)) => announced += delay,
            Some(ItemPhase::Processed(_)) => {
                processed += 1;
                assert!(
                    start.elapsed() >= announced,
                    "item {}: slept {:?}, announced {:?}",
                    processed,
                    start.elapsed(),
                    announced
                );
            }
            None => {}
        }
    }

    assert_eq!(processed, 3);
    assert!(announced >= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_display_content_is_truncated() {
    let mut harness = Harness::new().engine(EngineName::Bing, &["https://long.example/"]);
    harness.content = long_page;
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "news", 1));

    let snapshots = run_to_end(&mut orchestrator).await;

    let shown = snapshots
        .last()
        .unwrap()
        .table[0]
        .content
        .clone()
        .unwrap();
    assert!(shown.chars().count() <= 153);
    assert!(shown.ends_with("..."));

    let full = orchestrator.table().get("https://long.example/").unwrap();
    assert_eq!(full.content.as_deref().map(|c| c.len()), Some(500));

    let saves = harness.saves();
    assert_eq!(saves[0].0[0].content.as_deref().map(|c| c.len()), Some(500));
}

#[tokio::test(start_paused = true)]
async fn test_persists_exactly_once_with_all_rows() {
    let harness = Harness::new().engine(
        EngineName::Bing,
        &["https://a.example/", "https://b.example/", "https://c.example/"],
    );
    let mut orchestrator =
        harness.orchestrator(search_request(&[EngineName::Bing], "BTC ETF approval", 1));

    run_to_end(&mut orchestrator).await;

    let saves = harness.saves();
    assert_eq!(saves.len(), 1);
    let (rows, label) = &saves[0];
    assert_eq!(rows.len(), 3);
    assert_eq!(label, "btc_etf_approval");
    assert_eq!(rows[0].status, RecordStatus::Success);
    assert_eq!(rows[1].status, RecordStatus::Pending);
}

#[tokio::test(start_paused = true)]
async fn test_save_and_visual_failures_do_not_stop_the_run() {
    let mut harness = Harness::new().engine(
        EngineName::Bing,
        &["https://a.example/", "https://b.example/"],
    );
    harness.sink_fails = true;
    harness.visuals_fail = true;
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "xrp", 2));

    let snapshots = run_to_end(&mut orchestrator).await;

    let last = snapshots.last().unwrap();
    assert_eq!(last.stage, Stage::Done);
    assert!(last.chart.is_none());
    assert!(last.word_cloud.is_none());
    assert!(last.summary.starts_with("## Intelligence Summary"));
    assert!(snapshots.iter().any(|s| s.stage == Stage::Summarizing));

    assert_eq!(harness.saves().len(), 1);
    assert_eq!(Harness::count(&harness.summaries), 1);
    assert_eq!(Harness::count(&harness.acquired), 1);
    assert_eq!(Harness::count(&harness.released), 1);
    assert!(!orchestrator.holds_session());
}

#[test]
fn test_toolkit_from_config_opens_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("runs.db");
    let mut config = Config::default();
    config.output.database_path = db_path.to_string_lossy().into_owned();

    let toolkit = Toolkit::from_config(&config, "hash").unwrap();

    let run_id = toolkit.sink.lock().unwrap().save(&[], "smoke").unwrap();
    assert!(run_id > 0);
    assert!(db_path.exists());
}

#[test]
fn test_toolkit_from_config_reports_storage_error() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.output.database_path = dir
        .path()
        .join("missing")
        .join("runs.db")
        .to_string_lossy()
        .into_owned();

    let result = Toolkit::from_config(&config, "hash");

    assert!(matches!(result, Err(signal_sift::SiftError::Storage(_))));
}

#[tokio::test(start_paused = true)]
async fn test_url_list_crawls_every_url_without_summary() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(TaskRequest::url_list([
        "https://one.example/",
        "https://two.example/",
    ]));

    let snapshots = run_to_end(&mut orchestrator).await;
    let last = snapshots.last().unwrap();

    assert_eq!(last.stage, Stage::Done);
    assert!(!snapshots.iter().any(|s| s.stage == Stage::Searching));
    assert_eq!(last.table.len(), 2);
    for (i, row) in last.table.iter().enumerate() {
        assert_eq!(row.status, RecordStatus::Success);
        assert_eq!(row.source, USER_DEFINED_SOURCE);
        assert_eq!(row.title, format!("URL Target {}", i + 1));
    }
    assert_eq!(last.summary, SKIPPED);
    assert_eq!(Harness::count(&harness.summaries), 0);
    assert_eq!(harness.saves()[0].1, "targeted_crawl");
}

#[tokio::test(start_paused = true)]
async fn test_url_list_duplicates_collapse() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(TaskRequest::from_url_text(
        "https://a.example/\n\n  https://a.example/  \nhttps://b.example/\n",
    ));

    run_to_end(&mut orchestrator).await;

    assert_eq!(orchestrator.table().len(), 2);
    assert_eq!(Harness::count(&harness.extracted), 2);
}

#[tokio::test(start_paused = true)]
async fn test_preset_is_direct_crawl() {
    let harness = Harness::new().engine(EngineName::Bing, &["https://coin.example/"]);
    let mut orchestrator = harness.orchestrator(TaskRequest::preset(
        "BTC",
        [EngineName::Bing],
        TimePeriod::Day,
        10,
        5,
    ));

    let snapshots = run_to_end(&mut orchestrator).await;
    let last = snapshots.last().unwrap();

    assert_eq!(last.summary, SKIPPED);
    assert_eq!(Harness::count(&harness.summaries), 0);
    assert_eq!(harness.saves()[0].1, "btc_crypto_news");
}

#[tokio::test(start_paused = true)]
async fn test_missing_api_key_skips_summary() {
    for key in ["", "YOUR_API_KEY", "short"] {
        let mut harness = Harness::new().engine(EngineName::Bing, &["https://a.example/"]);
        harness.api_key = key.to_string();
        let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "q", 1));

        let snapshots = run_to_end(&mut orchestrator).await;

        assert_eq!(snapshots.last().unwrap().summary, SKIPPED_NO_KEY, "key {:?}", key);
        assert!(!snapshots.iter().any(|s| s.stage == Stage::Summarizing));
        assert_eq!(Harness::count(&harness.summaries), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn test_empty_corpus_skips_visuals_and_summary() {
    let mut harness = Harness::new().engine(
        EngineName::Bing,
        &["https://a.example/", "https://b.example/"],
    );
    harness.content = failing_page;
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "q", 2));

    let snapshots = run_to_end(&mut orchestrator).await;
    let last = snapshots.last().unwrap();

    assert!(!snapshots.iter().any(|s| s.stage == Stage::Visualizing));
    assert_eq!(last.stage, Stage::Done);
    assert!(last.chart.is_none());
    assert!(last.word_cloud.is_none());
    assert_eq!(last.summary, SKIPPED);
    assert_eq!(harness.saves().len(), 1);
    assert!(last.table.iter().all(|r| r.status == RecordStatus::Failed));
}

#[tokio::test(start_paused = true)]
async fn test_summarizer_failure_degrades_to_text() {
    let mut harness = Harness::new().engine(EngineName::Bing, &["https://a.example/"]);
    harness.summarizer_fails = true;
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "q", 1));

    let snapshots = run_to_end(&mut orchestrator).await;
    let last = snapshots.last().unwrap();

    assert_eq!(last.stage, Stage::Done);
    assert!(last.summary.starts_with("LLM analysis failed:"));
    assert_eq!(harness.saves().len(), 1);
    assert_eq!(Harness::count(&harness.released), 1);
}

#[tokio::test(start_paused = true)]
async fn test_driver_unavailable_is_single_snapshot() {
    let mut harness = Harness::new().engine(EngineName::Bing, &["https://a.example/"]);
    harness.available = false;
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "q", 1));

    let snapshots = run_to_end(&mut orchestrator).await;

    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].stage, Stage::Failed(FatalReason::DriverUnavailable));
    assert!(snapshots[0].status.starts_with("Error: browser driver unavailable"));
    assert!(harness.saves().is_empty());
    assert_eq!(Harness::count(&harness.released), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_engines_releases_session() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(search_request(&[], "q", 1));

    let snapshots = run_to_end(&mut orchestrator).await;
    let stages: Vec<Stage> = snapshots.iter().map(|s| s.stage).collect();

    assert_eq!(
        stages,
        vec![Stage::Init, Stage::Failed(FatalReason::NoEngines)]
    );
    assert_eq!(snapshots[1].status, "Error: select at least one engine.");
    assert_eq!(Harness::count(&harness.acquired), 1);
    assert_eq!(Harness::count(&harness.released), 1);
    assert!(harness.saves().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_empty_url_list_never_acquires() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(TaskRequest::from_url_text("  \n \n"));

    let snapshots = run_to_end(&mut orchestrator).await;

    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].stage, Stage::Failed(FatalReason::EmptyUrlList));
    assert_eq!(Harness::count(&harness.acquired), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_results_stops_before_crawl() {
    let harness = Harness::new().engine(EngineName::Bing, &[]);
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "q", 5));

    let snapshots = run_to_end(&mut orchestrator).await;
    let last = snapshots.last().unwrap();

    assert_eq!(last.stage, Stage::Failed(FatalReason::NoResults));
    assert_eq!(last.status, "No relevant results found.");
    assert_eq!(Harness::count(&harness.extracted), 0);
    assert_eq!(Harness::count(&harness.released), 1);
    assert!(harness.saves().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_run_releases_session() {
    let harness = Harness::new().engine(
        EngineName::Bing,
        &["https://a.example/", "https://b.example/"],
    );
    let mut orchestrator = harness.orchestrator(search_request(&[EngineName::Bing], "q", 2));

    for _ in 0..4 {
        assert!(orchestrator.next_snapshot().await.is_some());
    }
    assert!(orchestrator.holds_session());
    assert_eq!(Harness::count(&harness.released), 0);

    drop(orchestrator);

    assert_eq!(Harness::count(&harness.released), 1);
    assert!(harness.saves().is_empty());
}
