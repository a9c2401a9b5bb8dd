//! Browser session abstraction
//!
//! A session is acquired once per task run and must be released exactly once,
//! whichever way the run ends. [`SessionGuard`] owns the session and releases it
//! on drop, so abandonment and unwinding are covered as well as normal completion.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while acquiring a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("driver unavailable: {0}")]
    Unavailable(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result of extracting one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Visible text of the page (never empty)
    Success(String),
    /// Human-readable reason the page produced no content
    Failure(String),
}

/// An acquired content extraction session
#[async_trait]
pub trait BrowserSession: Send {
    /// Loads `link` and returns its visible text
    ///
    /// Failures are reported in-band; extraction is attempted once.
    async fn extract(&mut self, link: &str) -> Extraction;

    /// Releases underlying resources; later `extract` calls fail
    fn release(&mut self);
}

/// Hands out sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, SessionError>;
}

/// Owns a session and releases it exactly once
pub struct SessionGuard {
    session: Option<Box<dyn BrowserSession>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn BrowserSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Returns true until the session has been released
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }
}

#[async_trait]
impl BrowserSession for SessionGuard {
    async fn extract(&mut self, link: &str) -> Extraction {
        match self.session.as_mut() {
            Some(session) => session.extract(link).await,
            None => Extraction::Failure("session already released".to_string()),
        }
    }

    fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.release();
            tracing::debug!("Browser session released");
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}
