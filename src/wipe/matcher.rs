use crate::ConfigError;
use std::path::Path;

/// A glob pattern for files directly inside the wipe directory
///
/// Any `glob` syntax is accepted ("*.csv", "crawl-?.log", "export-[0-9].csv",
/// "notes.txt") as long as it stays within one path component: separators and
/// the recursive "**" wildcard are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    raw: String,
}

impl FilePattern {
    /// Parses and validates a pattern string
    ///
    /// # Returns
    ///
    /// * `Ok(FilePattern)` - A single-component glob pattern
    /// * `Err(ConfigError::InvalidPattern)` - Empty, "." or "..", contains a path
    ///   separator or "**", or is not valid glob syntax
    ///
    /// # Examples
    ///
    /// ```
    /// use signal_sift::wipe::FilePattern;
    ///
    /// assert_eq!(FilePattern::parse(" *.log ").unwrap().as_str(), "*.log");
    /// assert!(FilePattern::parse("**/*.log").is_err());
    /// assert!(FilePattern::parse("logs/*.log").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = pattern.trim();

        if pattern.is_empty()
            || pattern == "."
            || pattern == ".."
            || pattern.contains('/')
            || pattern.contains('\\')
            || pattern.contains("**")
        {
            return Err(ConfigError::InvalidPattern(pattern.to_string()));
        }

        glob::Pattern::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", pattern, e)))?;

        Ok(Self {
            raw: pattern.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Full glob expression for this pattern inside `dir`
    ///
    /// Glob metacharacters in `dir` itself are escaped so only the file name part
    /// is treated as a pattern.
    pub fn within(&self, dir: &Path) -> String {
        let escaped = glob::Pattern::escape(&dir.to_string_lossy());
        Path::new(&escaped)
            .join(&self.raw)
            .to_string_lossy()
            .into_owned()
    }
}
