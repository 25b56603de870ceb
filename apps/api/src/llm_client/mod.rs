//! LLM Client: the single point of entry for calls to the chat endpoint.
//!
//! No other module talks to the LLM server directly; everything goes through
//! the `ChatBackend` trait so handlers and tests can swap the transport.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// Replies are short narrative pieces; the server caps generation here.
const MAX_TOKENS: u32 = 200;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can answer a prompt given a structured context.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, context: &Value, message: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    user_message: &'a str,
    context: &'a Value,
    temperature: f32,
    max_tokens: u32,
}

/// HTTP client for the chat server, with retry on 429 and 5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(endpoint: String, temperature: f32) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one chat request and returns the decoded JSON body.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, context: &Value, message: &str) -> Result<Value, LlmError> {
        let request_body = ChatRequest {
            user_message: message,
            context,
            temperature: self.temperature,
            max_tokens: MAX_TOKENS,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&self.endpoint)
                .json(&request_body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM server returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: Value = response.json().await?;
            debug!(status = status.as_u16(), "LLM call succeeded");
            return Ok(body);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn chat(&self, context: &Value, message: &str) -> Result<String, LlmError> {
        let body = self.call(context, message).await?;
        let text = reply_text(body);
        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text)
    }
}

/// Pulls the reply out of whichever shape the server answered with:
/// `output`, then `choices[0].text`, then a bare string, else the raw JSON.
pub fn reply_text(body: Value) -> String {
    if let Some(output) = body.get("output") {
        return match output {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }
    if let Some(first) = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
    {
        return first
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
    }
    match body {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Parses a reply that was asked to be JSON, tolerating markdown fences.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}
