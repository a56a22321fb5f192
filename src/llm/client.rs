/// Chat-completion client implementation.
///
/// This module provides `LlmClient` for making synchronous HTTP requests to an
/// OpenAI-compatible `/chat/completions` endpoint, along with error types and
/// the builder used to configure it.
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Errors that can occur when talking to the chat API.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Well-formed response that did not carry a completion
    #[error("LLM API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// A single system + user exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
}

/// Builder for constructing `LlmClient` instances.
///
/// # Examples
///
/// ```
/// use filingqa::llm::LlmClientBuilder;
///
/// let client = LlmClientBuilder::new()
///     .base_url("http://localhost:8080/v1")
///     .api_key("test")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "http://localhost:8080/v1");
/// ```
#[derive(Debug, Default)]
pub struct LlmClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
}

impl LlmClientBuilder {
    /// Creates a new `LlmClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the chat API (e.g., "https://api.openai.com/v1").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name used for every request.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the bearer token sent with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the `LlmClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// Unset values fall back to `OPENAI_BASE_URL`, `OPENAI_MODEL` and
    /// `OPENAI_API_KEY`, then to `https://api.openai.com/v1` and `gpt-4o-mini`.
    /// A missing API key is logged but not an error; requests will simply be
    /// rejected by the server.
    pub fn build(self) -> Result<LlmClient, LlmError> {
        let base_url = self
            .base_url
            .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let model = self
            .model
            .or_else(|| std::env::var("OPENAI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_key = self
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_default();
        if api_key.is_empty() {
            warn!("OPENAI_API_KEY not set; chat requests will fail until it is provided");
        }

        reqwest::Url::parse(&base_url)
            .map_err(|e| LlmError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // Requests block until the server answers; only connecting is bounded.
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(LlmError::Network)?;

        Ok(LlmClient {
            client,
            base_url,
            model,
            api_key,
        })
    }
}

/// Synchronous HTTP client for an OpenAI-compatible chat API.
///
/// Should be constructed using `LlmClientBuilder`.
pub struct LlmClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// Trait for chat completion operations.
///
/// This is the seam the pipeline calls through, so unit tests can plug in a
/// scripted implementation instead of a network client.
pub trait LlmClientTrait: Send + Sync {
    /// Sends one system + user exchange and returns the completion text.
    fn complete(&self, request: &ChatRequest<'_>) -> Result<String, LlmError>;
}

impl LlmClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn complete_internal(&self, request: &ChatRequest<'_>) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = request_body(&self.model, request);

        debug!(model = %self.model, max_tokens = request.max_tokens, "sending chat request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(LlmError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Http {
                status: status.as_u16(),
            });
        }

        let text = response.text().map_err(LlmError::Network)?;
        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(LlmError::Serialization)?;

        completion_text(&json)
    }
}

impl LlmClientTrait for LlmClient {
    fn complete(&self, request: &ChatRequest<'_>) -> Result<String, LlmError> {
        self.complete_internal(request)
    }
}

fn request_body(model: &str, request: &ChatRequest<'_>) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {"role": "system", "content": request.system},
            {"role": "user", "content": request.prompt}
        ],
        "temperature": 0,
        "max_tokens": request.max_tokens
    })
}

/// Pulls `choices[0].message.content` out of a chat completion response.
fn completion_text(json: &serde_json::Value) -> Result<String, LlmError> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| LlmError::Api {
            message: "Missing 'choices[0].message.content' in API response".to_string(),
        })
}
