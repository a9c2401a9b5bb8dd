//! Signal-Sift main entry point
//!
//! This is the command-line interface for the Signal-Sift intelligence pipeline.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use signal_sift::config::{load_config_with_hash, Config};
use signal_sift::crawler::{check_session, drive, Extraction, HttpSessionProvider, Pacing};
use signal_sift::output::{
    format_status_line, generate_markdown_report, load_history, print_final_report, print_history,
};
use signal_sift::state::SearchParams;
use signal_sift::storage::open_sink;
use signal_sift::wipe::wipe_artifacts;
use signal_sift::{EngineName, Stage, TaskOrchestrator, TaskRequest, TaskSettings, TimePeriod, Toolkit};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Signal-Sift: paced open-web intelligence gathering
///
/// Signal-Sift searches the web (or takes a list of URLs), extracts page text
/// with a paced session, tags each page with a sentiment, persists the results
/// and optionally asks an LLM for a summary.
#[derive(Parser, Debug)]
#[command(name = "signal-sift")]
#[command(version = "1.0.0")]
#[command(about = "Paced open-web intelligence gathering", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the web for a topic and crawl the top results
    Search {
        /// Topic to search for
        #[arg(long)]
        query: String,

        #[command(flatten)]
        search: SearchArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Direct crawl of "<COIN> Crypto News" (no LLM summary)
    Preset {
        /// Coin ticker, one of the configured presets
        coin: String,

        #[command(flatten)]
        search: SearchArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Crawl a list of URLs
    Urls {
        /// File with one URL per line
        file: Option<PathBuf>,

        /// URL to crawl (repeatable)
        #[arg(long = "url", value_name = "URL")]
        urls: Vec<String>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Show persisted runs and exit
    History,

    /// Delete databases, exports, logs and caches
    Wipe {
        /// Directory to clean
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Check that an extraction session can be acquired and used
    Doctor {
        /// Page fetched through the session
        #[arg(long, default_value = "https://example.com/")]
        target_url: String,
    },
}

/// Search options; unset values fall back to the `[search]` configuration
#[derive(Args, Debug)]
struct SearchArgs {
    /// Search engine (repeatable): Bing, DuckDuckGo, Baidu, Yandex
    #[arg(long = "engine", value_name = "ENGINE")]
    engines: Vec<String>,

    /// Time window: all, day or week
    #[arg(long)]
    time_period: Option<String>,

    /// Results requested from each engine
    #[arg(long)]
    search_count: Option<u32>,

    /// Maximum results to crawl
    #[arg(long)]
    crawl_count: Option<u32>,
}

/// Options shared by task commands
#[derive(Args, Debug)]
struct RunArgs {
    /// Show the resolved request without running it
    #[arg(long)]
    dry_run: bool,

    /// Also write the final markdown report to this file
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// LLM API key (overrides [llm] api-key)
    #[arg(long, env = "SIGNAL_SIFT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// LLM API base URL (overrides [llm] base-url)
    #[arg(long)]
    base_url: Option<String>,

    /// LLM model name (overrides [llm] model-name)
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using defaults"),
    }
    let (config, config_hash) = match load_config_with_hash(cli.config.as_deref()) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Search { query, search, run } => {
            let request = build_search_request(&config, &query, &search, false)?;
            handle_task(config, config_hash, request, run).await
        }
        Command::Preset { coin, search, run } => {
            let coin = coin.trim().to_ascii_uppercase();
            if !config.search.presets.iter().any(|p| p.eq_ignore_ascii_case(&coin)) {
                bail!(
                    "unknown preset '{}' (configured: {})",
                    coin,
                    config.search.presets.join(", ")
                );
            }
            let request = build_search_request(&config, &coin, &search, true)?;
            handle_task(config, config_hash, request, run).await
        }
        Command::Urls { file, urls, run } => {
            let request = build_url_request(file.as_deref(), &urls)?;
            handle_task(config, config_hash, request, run).await
        }
        Command::History => handle_history(&config, &config_hash),
        Command::Wipe { dir } => handle_wipe(&config, &dir),
        Command::Doctor { target_url } => handle_doctor(&config, &target_url).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("signal_sift=info,warn"),
            1 => EnvFilter::new("signal_sift=debug,info"),
            2 => EnvFilter::new("signal_sift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves search options against the configuration
///
/// For presets `topic` is the coin ticker and the request is a direct crawl.
fn build_search_request(
    config: &Config,
    topic: &str,
    args: &SearchArgs,
    preset: bool,
) -> anyhow::Result<TaskRequest> {
    let engine_names = if args.engines.is_empty() {
        &config.search.engines
    } else {
        &args.engines
    };
    let engines = engine_names
        .iter()
        .map(|name| name.parse::<EngineName>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(anyhow::Error::msg)?;

    let time_period: TimePeriod = args
        .time_period
        .as_deref()
        .unwrap_or(config.search.time_period.as_str())
        .parse()
        .map_err(anyhow::Error::msg)?;

    let search_count = args.search_count.unwrap_or(config.search.search_count);
    let crawl_count = args.crawl_count.unwrap_or(config.search.crawl_count);
    if search_count == 0 || crawl_count == 0 {
        bail!("search and crawl counts must be at least 1");
    }

    Ok(if preset {
        TaskRequest::preset(topic, engines, time_period, search_count, crawl_count)
    } else {
        TaskRequest::search(engines, topic, time_period, search_count, crawl_count)
    })
}

/// Builds a URL-mode request from a file and/or `--url` arguments
fn build_url_request(file: Option<&Path>, urls: &[String]) -> anyhow::Result<TaskRequest> {
    let mut text = String::new();
    if let Some(path) = file {
        text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read URL list {}", path.display()))?;
    }
    for url in urls {
        text.push('\n');
        text.push_str(url);
    }
    Ok(TaskRequest::from_url_text(&text))
}

/// Handles the dry-run mode: shows the resolved request
fn handle_dry_run(config: &Config, request: &TaskRequest, settings: &TaskSettings) {
    println!("=== Signal-Sift Dry Run ===\n");

    match request {
        TaskRequest::Search(SearchParams {
            engines,
            query,
            time_period,
            search_count,
            crawl_count,
            direct_mode,
        }) => {
            println!("Search Task:");
            println!("  Query: {}", query);
            let names: Vec<&str> = engines.iter().map(|e| e.as_str()).collect();
            println!("  Engines: {}", names.join(", "));
            println!("  Time period: {}", time_period);
            println!("  Results per engine: {}", search_count);
            println!("  Crawl count: {}", crawl_count);
            println!("  Direct crawl: {}", if *direct_mode { "yes" } else { "no" });
        }
        TaskRequest::UrlList { urls } => {
            println!("URL Task ({}):", urls.len());
            for url in urls {
                println!("  - {}", url);
            }
        }
    }

    let (min, max) = settings.pacing.bounds();
    println!("\nPacing: {:.1}s to {:.1}s before each page", min, max);
    println!("Database: {}", config.output.database_path);
    println!("LLM model: {} ({})", settings.llm.model_name, settings.llm.base_url);

    println!("\n✓ Configuration is valid");
}

/// Handles a task command: runs the pipeline and renders every snapshot
async fn handle_task(
    config: Config,
    config_hash: String,
    request: TaskRequest,
    run: RunArgs,
) -> anyhow::Result<()> {
    let mut llm = config.llm.clone();
    if let Some(key) = run.api_key {
        llm.api_key = key;
    }
    if let Some(base_url) = run.base_url {
        llm.base_url = base_url;
    }
    if let Some(model) = run.model {
        llm.model_name = model;
    }

    let settings = TaskSettings {
        llm,
        pacing: Pacing::from_config(&config.pacing),
        font_path: config.output.font_path.clone(),
    };

    if run.dry_run {
        handle_dry_run(&config, &request, &settings);
        return Ok(());
    }

    let toolkit = Toolkit::from_config(&config, &config_hash).with_context(|| {
        format!(
            "failed to set up task (database {})",
            config.output.database_path
        )
    })?;

    let mut orchestrator = TaskOrchestrator::new(request, settings, toolkit);
    let last = drive(&mut orchestrator, |s| println!("{}", format_status_line(s))).await;

    let Some(last) = last else {
        return Ok(());
    };

    print_final_report(&last);
    if let Some(path) = &run.report {
        generate_markdown_report(&last, path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        println!("✓ Report written to: {}", path.display());
    }

    if let Stage::Failed(reason) = last.stage {
        bail!("task stopped: {}", reason.message());
    }
    Ok(())
}

/// Handles the history command: shows persisted runs
fn handle_history(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let sink = open_sink(Path::new(&config.output.database_path), config_hash)?;
    let stats = load_history(&sink)?;
    print_history(&stats);

    Ok(())
}

/// Handles the wipe command
fn handle_wipe(config: &Config, dir: &Path) -> anyhow::Result<()> {
    tracing::info!("Wiping artifacts in {}", dir.display());
    let report = wipe_artifacts(dir, &config.wipe)?;

    for (path, reason) in &report.failures {
        println!("  ✗ {}: {}", path.display(), reason);
    }
    println!("{}", report.message());

    Ok(())
}

/// Handles the doctor command: acquires a session, extracts one page and releases it
async fn handle_doctor(config: &Config, target_url: &str) -> anyhow::Result<()> {
    println!("=== Signal-Sift Doctor ===\n");
    println!("Session:");
    println!("  Timeout: {}s", config.browser.timeout_secs);
    println!("  User agents: {}", config.browser.user_agents.len());
    println!("  Target: {}\n", target_url);

    let provider = HttpSessionProvider::new(config.browser.clone());
    match check_session(&provider, target_url).await {
        Ok(Extraction::Success(text)) => {
            println!("✓ Session acquired and released");
            println!("✓ Extracted {} characters", text.chars().count());
            Ok(())
        }
        Ok(Extraction::Failure(reason)) => {
            println!("✓ Session acquired and released");
            println!("✗ Extraction failed: {}", reason);
            bail!("extraction failed")
        }
        Err(e) => {
            println!("✗ {}", e);
            bail!("session unavailable")
        }
    }
}
