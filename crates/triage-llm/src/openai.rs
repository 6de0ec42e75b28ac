//! OpenAI Provider Implementation
//!
//! Schema-constrained chat completions against the OpenAI API (or any
//! endpoint speaking the same `/chat/completions` protocol).
//!
//! # Features
//!
//! - `response_format: json_schema` with strict mode
//! - Configurable endpoint for proxies and compatible servers
//! - Explicit request timeout
//! - Refusals and unparseable content surface as a missing payload, not an error
//!
//! # Examples
//!
//! ```no_run
//! use triage_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("sk-...").unwrap();
//! ```

use crate::LlmError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use triage_domain::{CompletionRequest, ParsedCompletion, StructuredCompletion};

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

pub use triage_domain::DEFAULT_MODEL;

/// Default timeout for completion requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// OpenAI chat completions provider
pub struct OpenAiProvider {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

/// Response from the chat completions API (only the fields read here)
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider against the default endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with an explicit request timeout
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Unauthorized("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            client,
        })
    }

    /// Use a different API root (e.g. `http://localhost:8080/v1`)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// The API root requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn into_parsed(response: ChatCompletionResponse) -> Result<ParsedCompletion, LlmError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?;

        if let Some(refusal) = choice.message.refusal {
            warn!("Model refused the request: {}", refusal);
            return Ok(ParsedCompletion {
                parsed: None,
                refusal: Some(refusal),
            });
        }

        let Some(content) = choice.message.content else {
            return Ok(ParsedCompletion::empty());
        };

        match serde_json::from_str(&content) {
            Ok(value) => Ok(ParsedCompletion::parsed(value)),
            Err(e) => {
                warn!(
                    "Completion content is not valid JSON (finish_reason: {}): {}",
                    choice.finish_reason.as_deref().unwrap_or("unknown"),
                    e
                );
                Ok(ParsedCompletion::empty())
            }
        }
    }
}

#[async_trait]
impl StructuredCompletion for OpenAiProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<ParsedCompletion, Self::Error> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!("POST {} (model {})", url, request.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let body = response
                .json::<ChatCompletionResponse>()
                .await
                .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
            return Self::into_parsed(body);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(LlmError::Unauthorized(format!("HTTP {}: {}", status, error_text)))
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(LlmError::RateLimitExceeded),
            reqwest::StatusCode::NOT_FOUND => Err(LlmError::ModelNotAvailable(request.model.clone())),
            _ => Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text))),
        }
    }
}
