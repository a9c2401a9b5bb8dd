use crate::config::types::{
    BrowserConfig, Config, LlmConfig, OutputConfig, PacingConfig, SearchConfig, WipeConfig,
};
use crate::search::{EngineName, TimePeriod};
use crate::wipe::FilePattern;
use crate::ConfigError;
use url::Url;

/// Upper bound accepted for `search-count`
const MAX_SEARCH_COUNT: u32 = 50;

/// Upper bound accepted for the pacing delay (seconds)
const MAX_DELAY_SECS: f64 = 60.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_browser_config(&config.browser)?;
    validate_pacing_config(&config.pacing)?;
    validate_llm_config(&config.llm)?;
    validate_output_config(&config.output)?;
    validate_wipe_config(&config.wipe)?;
    Ok(())
}

/// Validates search defaults
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    for engine in &config.engines {
        engine
            .parse::<EngineName>()
            .map_err(|e| ConfigError::Validation(format!("search.engines: {}", e)))?;
    }

    config
        .time_period
        .parse::<TimePeriod>()
        .map_err(|e| ConfigError::Validation(format!("search.time-period: {}", e)))?;

    if config.search_count < 1 || config.search_count > MAX_SEARCH_COUNT {
        return Err(ConfigError::Validation(format!(
            "search-count must be between 1 and {}, got {}",
            MAX_SEARCH_COUNT, config.search_count
        )));
    }

    if config.crawl_count < 1 {
        return Err(ConfigError::Validation(format!(
            "crawl-count must be >= 1, got {}",
            config.crawl_count
        )));
    }

    for preset in &config.presets {
        if preset.trim().is_empty() || !preset.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::Validation(format!(
                "presets must be alphanumeric tickers, got '{}'",
                preset
            )));
        }
    }

    Ok(())
}

/// Validates extraction session configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.max_content_chars == 0 {
        return Err(ConfigError::Validation(
            "max-content-chars must be >= 1".to_string(),
        ));
    }

    if config.user_agents.iter().all(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user-agents must contain at least one non-empty entry".to_string(),
        ));
    }

    Ok(())
}

/// Validates the pacing delay range
fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    let (min, max) = (config.min_delay_secs, config.max_delay_secs);

    if !min.is_finite() || !max.is_finite() || min < 0.0 {
        return Err(ConfigError::Validation(format!(
            "pacing delays must be finite and non-negative, got {}..{}",
            min, max
        )));
    }

    if min > max {
        return Err(ConfigError::Validation(format!(
            "min-delay-secs ({}) must not exceed max-delay-secs ({})",
            min, max
        )));
    }

    if max > MAX_DELAY_SECS {
        return Err(ConfigError::Validation(format!(
            "max-delay-secs must be <= {}, got {}",
            MAX_DELAY_SECS, max
        )));
    }

    Ok(())
}

/// Validates LLM settings
///
/// An empty API key is accepted here; the summary gate decides at run time.
fn validate_llm_config(config: &LlmConfig) -> Result<(), ConfigError> {
    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid llm.base-url: {}", e)))?;

    if config.model_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "model-name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates wipe targets
fn validate_wipe_config(config: &WipeConfig) -> Result<(), ConfigError> {
    if config.patterns.is_empty() {
        return Err(ConfigError::Validation(
            "wipe.patterns cannot be empty".to_string(),
        ));
    }

    for pattern in &config.patterns {
        FilePattern::parse(pattern)?;
    }

    for dir in &config.cache_dirs {
        if dir.is_empty() || dir.contains("..") || dir.starts_with('/') {
            return Err(ConfigError::InvalidPattern(format!(
                "cache-dirs entries must be relative names, got '{}'",
                dir
            )));
        }
    }

    Ok(())
}
