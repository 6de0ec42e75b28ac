//! Triage LLM Provider Layer
//!
//! Implementations of the `StructuredCompletion` trait from `triage-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI chat completions with `json_schema` response format
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use triage_domain::{CompletionRequest, JsonSchemaFormat, StructuredCompletion};
//! use triage_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new(json!({ "answer": 42 }));
//! let schema = JsonSchemaFormat { name: "Answer".into(), strict: true, schema: json!({}) };
//! let request = CompletionRequest::structured("model", "system", "user", schema);
//!
//! let completion = provider.complete(&request).await.unwrap();
//! assert_eq!(completion.parsed, Some(json!({ "answer": 42 })));
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use triage_domain::{CompletionRequest, ParsedCompletion, StructuredCompletion};

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// API key rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Parsed(Option<Value>),
    Error,
}

/// Mock structured-completion provider for deterministic testing
///
/// Returns pre-configured parsed payloads keyed by the request's user prompt,
/// without making any network calls. Every request is recorded so tests can
/// assert on what was sent.
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Option<Value>,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a MockProvider returning `response` for all prompts
    pub fn new(response: Value) -> Self {
        Self::with_default(Some(response))
    }

    /// Create a MockProvider whose default completion has no parsed payload
    pub fn empty() -> Self {
        Self::with_default(None)
    }

    fn with_default(default_response: Option<Value>) -> Self {
        Self {
            default_response,
            responses: Arc::new(Mutex::new(HashMap::new())),
            delays: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific parsed payload for a given user prompt
    pub fn add_response(&mut self, user_prompt: impl Into<String>, response: Value) {
        lock(&self.responses).insert(user_prompt.into(), MockReply::Parsed(Some(response)));
    }

    /// Make the completion for a given user prompt come back without a payload
    pub fn add_null(&mut self, user_prompt: impl Into<String>) {
        lock(&self.responses).insert(user_prompt.into(), MockReply::Parsed(None));
    }

    /// Configure to return an error for a specific user prompt
    pub fn add_error(&mut self, user_prompt: impl Into<String>) {
        lock(&self.responses).insert(user_prompt.into(), MockReply::Error);
    }

    /// Delay the completion for a specific user prompt
    pub fn add_delay(&mut self, user_prompt: impl Into<String>, delay: Duration) {
        lock(&self.delays).insert(user_prompt.into(), delay);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Reset the recorded requests
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl StructuredCompletion for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<ParsedCompletion, Self::Error> {
        lock(&self.requests).push(request.clone());

        let prompt = request.user_prompt().unwrap_or_default().to_string();

        let delay = lock(&self.delays).get(&prompt).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = lock(&self.responses).get(&prompt).cloned();
        match reply {
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            Some(MockReply::Parsed(parsed)) => Ok(ParsedCompletion {
                parsed,
                refusal: None,
            }),
            None => Ok(ParsedCompletion {
                parsed: self.default_response.clone(),
                refusal: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use triage_domain::JsonSchemaFormat;

    fn request(user_prompt: &str) -> CompletionRequest {
        let schema = JsonSchemaFormat {
            name: "Test".to_string(),
            strict: true,
            schema: json!({ "type": "object" }),
        };
        CompletionRequest::structured("test-model", "system", user_prompt, schema)
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new(json!({ "ok": true }));
        let result = provider.complete(&request("any prompt")).await.unwrap();
        assert_eq!(result.parsed, Some(json!({ "ok": true })));
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", json!("world"));
        provider.add_response("foo", json!("bar"));

        assert_eq!(provider.complete(&request("hello")).await.unwrap().parsed, Some(json!("world")));
        assert_eq!(provider.complete(&request("foo")).await.unwrap().parsed, Some(json!("bar")));
        assert_eq!(provider.complete(&request("unknown")).await.unwrap().parsed, None);
    }

    #[tokio::test]
    async fn test_mock_provider_null_override() {
        let mut provider = MockProvider::new(json!(1));
        provider.add_null("declined");
        assert_eq!(provider.complete(&request("declined")).await.unwrap().parsed, None);
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new(json!({}));
        assert_eq!(provider.call_count(), 0);

        provider.complete(&request("prompt1")).await.unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.complete(&request("prompt2")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1].user_prompt(), Some("prompt2"));

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.complete(&request("bad prompt")).await;
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new(json!({}));
        let provider2 = provider1.clone();

        provider1.complete(&request("test")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
