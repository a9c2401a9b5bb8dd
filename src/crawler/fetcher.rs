//! HTTP-backed browser session
//!
//! This module provides the shipped [`SessionProvider`]:
//! - Building the HTTP client from the `[browser]` configuration
//! - Rotating user agents across requests
//! - Classifying fetch failures into readable diagnostics
//! - Turning HTML responses into page text

use crate::config::BrowserConfig;
use crate::crawler::parser::extract_text;
use crate::crawler::session::{BrowserSession, Extraction, SessionError, SessionProvider};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client for extraction sessions
///
/// # Arguments
///
/// * `config` - The browser configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &BrowserConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Provides [`HttpSession`]s
pub struct HttpSessionProvider {
    config: BrowserConfig,
}

impl HttpSessionProvider {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        let user_agents: Vec<String> = self
            .config
            .user_agents
            .iter()
            .filter(|ua| !ua.trim().is_empty())
            .cloned()
            .collect();
        if user_agents.is_empty() {
            return Err(SessionError::Unavailable(
                "no user agents configured".to_string(),
            ));
        }

        let client = build_http_client(&self.config)?;
        tracing::debug!(
            "Acquired HTTP session ({} user agents, {}s timeout)",
            user_agents.len(),
            self.config.timeout_secs
        );

        Ok(Box::new(HttpSession {
            client: Some(client),
            user_agents,
            next_agent: 0,
            max_chars: self.config.max_content_chars,
        }))
    }
}

/// Extraction session backed by a reqwest client
pub struct HttpSession {
    client: Option<Client>,
    user_agents: Vec<String>,
    next_agent: usize,
    max_chars: usize,
}

impl HttpSession {
    fn rotate_user_agent(&mut self) -> String {
        let ua = self.user_agents[self.next_agent % self.user_agents.len()].clone();
        self.next_agent = (self.next_agent + 1) % self.user_agents.len();
        ua
    }
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn extract(&mut self, link: &str) -> Extraction {
        let user_agent = self.rotate_user_agent();
        let Some(client) = self.client.as_ref() else {
            return Extraction::Failure("session already released".to_string());
        };

        let response = match client
            .get(link)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,text/plain;q=0.8")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "request timed out".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request error: {}", e)
                };
                return Extraction::Failure(reason);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Extraction::Failure(format!("HTTP {}", status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let is_html = content_type.is_empty()
            || content_type.contains("text/html")
            || content_type.contains("application/xhtml");
        if !is_html && !content_type.contains("text/plain") {
            return Extraction::Failure(format!("unsupported content type: {}", content_type));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Extraction::Failure(format!("failed to read body: {}", e)),
        };

        let text = if is_html {
            extract_text(&body, self.max_chars)
        } else {
            body.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .chars()
                .take(self.max_chars)
                .collect()
        };

        if text.is_empty() {
            Extraction::Failure("page contained no extractable text".to_string())
        } else {
            Extraction::Success(text)
        }
    }

    fn release(&mut self) {
        self.client = None;
    }
}
