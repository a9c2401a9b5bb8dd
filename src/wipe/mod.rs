//! Evidence wipe: removes task artifacts (databases, exports, logs) and cache directories
//!
//! This is a maintenance operation; the task pipeline never calls it.

mod matcher;

pub use matcher::FilePattern;

use crate::config::WipeConfig;
use crate::{ConfigError, SiftError};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of an evidence wipe
#[derive(Debug, Default)]
pub struct WipeReport {
    /// Files and directories removed (a directory counts once, whatever it contained)
    pub deleted: usize,
    /// Paths that could not be removed, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl WipeReport {
    /// Human-readable status line
    pub fn message(&self) -> String {
        let mut msg = if self.deleted > 0 {
            format!(
                "Wipe complete: {} artifacts removed (data, logs and caches).",
                self.deleted
            )
        } else {
            "Disk clean: nothing to delete.".to_string()
        };
        if !self.failures.is_empty() {
            msg.push_str(&format!(" {} item(s) could not be removed.", self.failures.len()));
        }
        msg
    }
}

/// Deletes files matching the glob patterns directly inside `dir` and removes the
/// configured cache directories
///
/// # Arguments
///
/// * `dir` - Directory to clean (not descended into, except for cache directories)
/// * `config` - Patterns and cache directory names
///
/// # Returns
///
/// * `Ok(WipeReport)` - Count of removed items and per-item failures
/// * `Err(SiftError::Config)` - A configured pattern is invalid
/// * `Err(SiftError::Io)` - `dir` is missing or not a directory
pub fn wipe_artifacts(dir: &Path, config: &WipeConfig) -> crate::Result<WipeReport> {
    let patterns = config
        .patterns
        .iter()
        .map(|p| FilePattern::parse(p))
        .collect::<Result<Vec<_>, ConfigError>>()?;

    if !fs::metadata(dir)?.is_dir() {
        return Err(SiftError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", dir.display()),
        )));
    }

    let mut report = WipeReport::default();
    let mut files = BTreeSet::new();

    for pattern in &patterns {
        let entries = glob::glob(&pattern.within(dir))
            .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", pattern.as_str(), e)))?;

        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    files.insert(path);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Cannot read {}: {}", e.path().display(), e.error());
                    report
                        .failures
                        .push((e.path().to_path_buf(), e.error().to_string()));
                }
            }
        }
    }

    for path in files {
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed {}", path.display());
                report.deleted += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to remove file {}: {}", path.display(), e);
                report.failures.push((path, e.to_string()));
            }
        }
    }

    for name in &config.cache_dirs {
        let path = dir.join(name);
        if !path.is_dir() {
            continue;
        }
        match fs::remove_dir_all(&path) {
            Ok(()) => {
                tracing::debug!("Removed cache directory {}", path.display());
                report.deleted += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to remove cache directory {}: {}", path.display(), e);
                report.failures.push((path, e.to_string()));
            }
        }
    }

    tracing::info!("{}", report.message());
    Ok(report)
}
