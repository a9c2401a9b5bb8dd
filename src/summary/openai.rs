//! OpenAI-compatible chat completions summarizer

use crate::config::LlmConfig;
use crate::summary::{SummarizeError, Summarizer};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Corpus characters sent to the model; the rest is dropped
const MAX_PROMPT_CHARS: usize = 12_000;

const SYSTEM_PROMPT: &str = "You are an intelligence analyst. Summarize the supplied news \
content into a concise briefing: key events, overall market sentiment, notable risks and \
opportunities. Use short markdown bullet points.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Summarizer backed by `{base_url}/chat/completions`
#[derive(Clone)]
pub struct OpenAiSummarizer {
    http_client: Client,
}

impl OpenAiSummarizer {
    pub fn new(timeout: Duration) -> Result<Self, SummarizeError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummarizeError::Network(e.to_string()))?;
        Ok(Self { http_client })
    }

    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(
        &self,
        settings: &LlmConfig,
        corpus: &str,
        query: &str,
    ) -> Result<String, SummarizeError> {
        let start = std::time::Instant::now();

        let excerpt: String = corpus.chars().take(MAX_PROMPT_CHARS).collect();
        let request = ChatRequest {
            model: &settings.model_name,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: format!("Topic: {}\n\nContent:\n{}", query, excerpt),
                },
            ],
            temperature: 0.3,
        };

        let url = format!(
            "{}/chat/completions",
            settings.base_url.trim_end_matches('/')
        );
        let response = self
            .http_client
            .post(url)
            .header("Authorization", format!("Bearer {}", settings.api_key.trim()))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "LLM request failed");
                SummarizeError::Network(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = %status, "LLM API rejected credentials");
            return Err(SummarizeError::Auth(format!("HTTP {}", status.as_u16())));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "LLM API error");
            return Err(SummarizeError::Api(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Parse(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SummarizeError::Parse("response contained no message".into()))?;

        debug!(
            model = %settings.model_name,
            duration_ms = start.elapsed().as_millis(),
            "LLM chat completion"
        );

        Ok(content)
    }
}
