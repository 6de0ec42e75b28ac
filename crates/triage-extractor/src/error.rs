//! Error types for the Extractor

use thiserror::Error;
use triage_domain::RepoLocatorError;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error (transport, auth, rate limit)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Extraction timeout
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),

    /// Output schema could not be derived or loaded
    #[error("Failed to generate schema: {0}")]
    SchemaUnavailable(String),

    /// Repository locator could not be parsed
    #[error(transparent)]
    InvalidLocator(#[from] RepoLocatorError),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// File system error
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

impl From<std::io::Error> for ExtractorError {
    fn from(e: std::io::Error) -> Self {
        ExtractorError::Io(e.to_string())
    }
}
