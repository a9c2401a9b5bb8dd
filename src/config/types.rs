use serde::Deserialize;

/// Main configuration structure for Signal-Sift
///
/// Every section falls back to its defaults, so an empty file (or no file at all)
/// yields a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub browser: BrowserConfig,
    pub pacing: PacingConfig,
    pub llm: LlmConfig,
    pub output: OutputConfig,
    pub wipe: WipeConfig,
}

/// Default search parameters for task commands
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Engines selected when the command line names none
    pub engines: Vec<String>,

    /// Time window for search results: "all", "day" or "week"
    #[serde(rename = "time-period")]
    pub time_period: String,

    /// Maximum results requested from each engine
    #[serde(rename = "search-count")]
    pub search_count: u32,

    /// Maximum number of results to crawl
    #[serde(rename = "crawl-count")]
    pub crawl_count: u32,

    /// Coin tickers accepted by the `preset` command
    pub presets: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: vec!["Bing".to_string()],
            time_period: "all".to_string(),
            search_count: 10,
            crawl_count: 5,
            presets: ["BTC", "ETH", "SOL", "BNB"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Content extraction session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Extracted text is cut to this many characters
    #[serde(rename = "max-content-chars")]
    pub max_content_chars: usize,

    /// User agents rotated across extraction requests
    #[serde(rename = "user-agents")]
    pub user_agents: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_content_chars: 20_000,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15".to_string(),
            ],
        }
    }
}

/// Jittered delay inserted before every extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Lower bound of the delay range (seconds)
    #[serde(rename = "min-delay-secs")]
    pub min_delay_secs: f64,

    /// Upper bound of the delay range (seconds)
    #[serde(rename = "max-delay-secs")]
    pub max_delay_secs: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: 2.0,
            max_delay_secs: 4.0,
        }
    }
}

/// LLM summarizer settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// OpenAI-compatible API root (without `/chat/completions`)
    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "model-name")]
    pub model_name: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model_name: "gpt-3.5-turbo".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Font handed to the word cloud renderer
    #[serde(rename = "font-path")]
    pub font_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./signal-sift.db".to_string(),
            font_path: "DejaVuSans.ttf".to_string(),
        }
    }
}

/// Evidence wipe targets
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WipeConfig {
    /// Glob patterns for files directly inside the wipe directory ("*.db", "crawl-?.log")
    pub patterns: Vec<String>,

    /// Directories (relative to the wipe root) removed recursively
    #[serde(rename = "cache-dirs")]
    pub cache_dirs: Vec<String>,
}

impl Default for WipeConfig {
    fn default() -> Self {
        Self {
            patterns: ["*.db", "*.db-wal", "*.db-shm", "*.csv", "*.log", "*.tmp", "*.txt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cache_dirs: vec!["cache".to_string(), ".cache".to_string()],
        }
    }
}
