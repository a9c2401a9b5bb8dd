//! Configuration module for Signal-Sift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use signal_sift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("signal-sift.toml")).unwrap();
//! println!("Default engines: {:?}", config.search.engines);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, LlmConfig, OutputConfig, PacingConfig, SearchConfig, WipeConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
