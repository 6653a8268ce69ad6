//! OpenRouter-compatible chat completion client
//!
//! Provides an async HTTP client with:
//! - Usage tracking and an optional token budget
//! - Model fallback on availability errors
//! - Rate limit handling with exponential backoff

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use reqwest::Client as HttpClient;
use tracing::{debug, error, info, warn};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::types::{ChatRequest, ChatResponse, LlmResponse, Message};
use super::usage::{TokenUsage, UsageTracker};

/// OpenRouter API base URL
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Maximum number of attempts for rate-limited requests
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BACKOFF_BASE_MS: u64 = 1000;

const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert educator writing precise, rigorous \
definitions for a structured knowledge graph. Follow the output format you are asked for exactly.";

/// Chat completion client
///
/// Cheap to clone; clones share the usage tracker.
#[derive(Clone)]
pub struct LlmClient {
    http_client: HttpClient,
    config: LlmConfig,
    api_key: String,
    base_url: String,
    system_prompt: String,
    max_attempts: u32,
    usage: Arc<UsageTracker>,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.base_url)
            .field("default_model", &self.config.default_model)
            .field("token_budget", &self.usage.budget())
            .finish()
    }
}

/// Builder for creating an LlmClient
#[derive(Default)]
pub struct LlmClientBuilder {
    config: Option<LlmConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
    system_prompt: Option<String>,
    usage: Option<Arc<UsageTracker>>,
    timeout_secs: Option<u64>,
    max_attempts: Option<u32>,
}

impl LlmClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: LlmConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL (defaults to `llm.base_url`, then OpenRouter)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Share a usage tracker (defaults to one built from `llm.token_budget`)
    pub fn usage_tracker(mut self, tracker: Arc<UsageTracker>) -> Self {
        self.usage = Some(tracker);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Attempts per model before a rate limit is reported (at least 1)
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    pub fn build(self) -> Result<LlmClient> {
        let config = self.config.unwrap_or_default();
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::LLMError("API key is required".to_string()))?;

        let timeout_secs = self.timeout_secs.unwrap_or(config.timeout_secs);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::NetworkError)?;

        let base_url = self
            .base_url
            .or_else(|| config.base_url.clone())
            .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let usage = self
            .usage
            .unwrap_or_else(|| Arc::new(UsageTracker::new(config.token_budget)));

        Ok(LlmClient {
            http_client,
            config,
            api_key,
            base_url,
            system_prompt: self
                .system_prompt
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            max_attempts: self.max_attempts.unwrap_or(MAX_RETRY_ATTEMPTS),
            usage,
        })
    }
}

impl LlmClient {
    pub fn new(config: LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        LlmClientBuilder::new()
            .config(config)
            .api_key(api_key)
            .build()
    }

    pub fn builder() -> LlmClientBuilder {
        LlmClientBuilder::new()
    }

    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    pub fn fallback_models(&self) -> &[String] {
        &self.config.fallback_models
    }

    pub fn usage(&self) -> &Arc<UsageTracker> {
        &self.usage
    }

    pub(crate) fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Make a chat completion request against one model
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        model: Option<&str>,
    ) -> Result<LlmResponse> {
        let model = model.unwrap_or(&self.config.default_model);

        if let Some(budget) = self.usage.budget()
            && self.usage.is_over_budget()
        {
            return Err(Error::TokenBudgetExceeded(self.usage.total_tokens(), budget));
        }

        let request = ChatRequest::new(model, messages)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        self.execute_request(&request).await
    }

    /// Try the default model, then each fallback on recoverable errors
    pub async fn complete_with_fallback(&self, messages: Vec<Message>) -> Result<LlmResponse> {
        let mut models = vec![self.config.default_model.clone()];
        models.extend(self.config.fallback_models.iter().cloned());

        let mut last_error = None;

        for model in &models {
            debug!(model = %model, "Attempting chat completion");

            match self.complete(messages.clone(), Some(model)).await {
                Ok(response) => {
                    info!(model = %model, tokens = response.tokens_used(), "Chat completion successful");
                    return Ok(response);
                }
                Err(Error::RateLimited(secs)) => {
                    warn!(model = %model, wait_secs = secs, "Rate limited, trying next model");
                    last_error = Some(Error::RateLimited(secs));
                }
                Err(Error::LLMError(msg)) if is_model_error(&msg) => {
                    warn!(model = %model, error = %msg, "Model error, trying next model");
                    last_error = Some(Error::LLMError(msg));
                }
                Err(e) => {
                    error!(model = %model, error = %e, "Non-recoverable error");
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::NoSuitableModel("All models failed".to_string())))
    }

    async fn execute_request(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.send_request(request).await {
                Ok(response) => {
                    self.usage.record(
                        &response.model,
                        TokenUsage::new(response.input_tokens, response.output_tokens),
                    );
                    return Ok(response);
                }
                Err(Error::RateLimited(wait_secs)) if attempts < self.max_attempts => {
                    let backoff = calculate_backoff(attempts, wait_secs);
                    warn!(
                        attempt = attempts,
                        wait_ms = backoff,
                        "Rate limited, retrying after backoff"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_request(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("X-Title", "Knowledge Tree")
            .json(request)
            .send()
            .await
            .map_err(Error::NetworkError)?;

        let status = response.status();

        if !status.is_success() {
            return self.handle_error_response(status, response).await;
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMError(format!("Failed to parse response: {}", e)))?;

        LlmResponse::from_chat_response(chat_response)
            .ok_or_else(|| Error::LLMError("Empty response from API".to_string()))
    }

    async fn handle_error_response<T>(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(Error::LLMError("Unauthorized: Invalid API key".to_string())),
            429 => {
                let wait_secs = extract_retry_after(&body).unwrap_or(60);
                Err(Error::RateLimited(wait_secs))
            }
            400 => Err(Error::LLMError(format!("Bad request: {}", body))),
            402 => Err(Error::LLMError(
                "Payment required: Insufficient credits on the API account".to_string(),
            )),
            403 => Err(Error::LLMError(format!("Forbidden: {}", body))),
            404 => Err(Error::LLMError(format!(
                "Model not found or endpoint unavailable: {}",
                body
            ))),
            500..=599 => Err(Error::LLMError(format!("Server error ({}): {}", status, body))),
            _ => Err(Error::LLMError(format!("HTTP error {}: {}", status, body))),
        }
    }
}

/// Check if an error message indicates a model-specific error
fn is_model_error(msg: &str) -> bool {
    let model_error_patterns = [
        "model not found",
        "unavailable",
        "not available",
        "no available provider",
        "overloaded",
        "capacity",
    ];

    let msg_lower = msg.to_lowercase();
    model_error_patterns
        .iter()
        .any(|pattern| msg_lower.contains(pattern))
}

/// Backoff delay in milliseconds with up to 10% jitter
fn calculate_backoff(attempt: u32, suggested_wait: u64) -> u64 {
    let base = BACKOFF_BASE_MS * 2u64.pow(attempt.saturating_sub(1));
    let delay = base.max(suggested_wait.saturating_mul(1000));

    let jitter = (delay / 10).max(1);
    delay + rand::thread_rng().gen_range(0..jitter)
}

/// Extract a retry-after value from an error body
fn extract_retry_after(body: &str) -> Option<u64> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;

    json.get("retry_after")
        .or_else(|| json.get("error").and_then(|e| e.get("retry_after")))
        .and_then(|v| v.as_u64())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LlmConfig {
        LlmConfig {
            default_model: "test/model".to_string(),
            fallback_models: vec!["fallback/model".to_string()],
            temperature: 0.2,
            max_tokens: 512,
            timeout_secs: 5,
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_client_builder() {
        let client = LlmClient::builder()
            .config(test_config())
            .api_key("test-key")
            .base_url("https://example.com/v1/")
            .build()
            .unwrap();

        assert_eq!(client.default_model(), "test/model");
        assert_eq!(client.base_url, "https://example.com/v1");
        assert_eq!(client.max_attempts, MAX_RETRY_ATTEMPTS);
    }

    #[test]
    fn test_builder_uses_config_base_url_and_budget() {
        let config = LlmConfig {
            base_url: Some("http://localhost:9999".to_string()),
            token_budget: Some(500),
            ..test_config()
        };
        let client = LlmClient::new(config, "k").unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.usage().budget(), Some(500));
    }

    #[test]
    fn test_client_builder_requires_api_key() {
        assert!(LlmClient::builder().config(test_config()).build().is_err());
        assert!(LlmClient::new(test_config(), "  ").is_err());
    }

    #[test]
    fn test_clones_share_usage() {
        let client = LlmClient::new(test_config(), "test-key").unwrap();
        let cloned = client.clone();
        client.usage().record("m", TokenUsage::new(4, 4));
        assert_eq!(cloned.usage().total_tokens(), 8);
    }

    #[tokio::test]
    async fn test_budget_checked_before_request() {
        let tracker = Arc::new(UsageTracker::new(Some(10)));
        tracker.record("m", TokenUsage::new(8, 4));

        let client = LlmClient::builder()
            .config(test_config())
            .api_key("k")
            // Nothing listens here; the budget check must fire first
            .base_url("http://127.0.0.1:9")
            .usage_tracker(tracker)
            .build()
            .unwrap();

        let err = client
            .complete(vec![Message::user("hi")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TokenBudgetExceeded(12, 10)));
    }

    #[test]
    fn test_client_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LlmClient>();
    }

    #[test]
    fn test_is_model_error() {
        assert!(is_model_error("Model not found"));
        assert!(is_model_error("The model is unavailable"));
        assert!(is_model_error("No available provider for this model"));
        assert!(!is_model_error("Invalid API key"));
    }

    #[test]
    fn test_calculate_backoff() {
        assert!(calculate_backoff(1, 0) >= BACKOFF_BASE_MS);
        assert!(calculate_backoff(2, 0) >= BACKOFF_BASE_MS * 2);
        assert!(calculate_backoff(1, 5) >= 5000);
        assert!(calculate_backoff(1, 0) < BACKOFF_BASE_MS + BACKOFF_BASE_MS / 10);
    }

    #[test]
    fn test_extract_retry_after() {
        assert_eq!(extract_retry_after(r#"{"retry_after": 30}"#), Some(30));
        assert_eq!(extract_retry_after(r#"{"error": {"retry_after": 60}}"#), Some(60));
        assert_eq!(extract_retry_after(r#"{"message": "rate limited"}"#), None);
        assert_eq!(extract_retry_after("not json"), None);
    }
}
