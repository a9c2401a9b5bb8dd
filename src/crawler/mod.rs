//! Crawler module: sessions, extraction, scheduling and task orchestration
//!
//! This module contains the core pipeline, including:
//! - The browser session abstraction and its HTTP implementation
//! - HTML text extraction
//! - Paced, sequential crawl scheduling
//! - The task orchestrator that sequences a whole run
//! - A one-page session check used by the `doctor` command

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod session;

pub use coordinator::{TaskOrchestrator, TaskSettings, Toolkit};
pub use fetcher::{build_http_client, HttpSession, HttpSessionProvider};
pub use parser::{extract_text, extract_title};
pub use scheduler::{CrawlItem, CrawlScheduler, Pacing};
pub use session::{BrowserSession, Extraction, SessionError, SessionGuard, SessionProvider};

/// Runs a request to completion, handing every snapshot to `on_snapshot`
///
/// # Arguments
///
/// * `orchestrator` - A freshly created orchestrator
/// * `on_snapshot` - Called once per snapshot, in order
///
/// # Returns
///
/// The terminal snapshot, or `None` if the orchestrator had already finished
pub async fn drive<F>(
    orchestrator: &mut TaskOrchestrator,
    mut on_snapshot: F,
) -> Option<crate::state::ProgressSnapshot>
where
    F: FnMut(&crate::state::ProgressSnapshot),
{
    let mut last = None;
    while let Some(snapshot) = orchestrator.next_snapshot().await {
        on_snapshot(&snapshot);
        last = Some(snapshot);
    }
    last
}

/// Acquires a session, extracts one page and releases the session
///
/// # Arguments
///
/// * `sessions` - The session provider to check
/// * `target_url` - Page to extract
///
/// # Returns
///
/// * `Ok(Extraction)` - The session worked; the extraction result is returned as-is
/// * `Err(SiftError::Session)` - No session could be acquired
pub async fn check_session(
    sessions: &dyn SessionProvider,
    target_url: &str,
) -> crate::Result<Extraction> {
    let mut guard = SessionGuard::new(sessions.acquire().await?);
    tracing::info!("Session acquired, extracting {}", target_url);

    let extraction = guard.extract(target_url).await;
    guard.release();
    Ok(extraction)
}
