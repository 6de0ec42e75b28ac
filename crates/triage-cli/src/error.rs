//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required environment variable missing or empty
    #[error("{0} environment variable is not set")]
    MissingCredential(String),

    /// GitHub client error
    #[error("GitHub error: {0}")]
    GitHub(#[from] triage_github::GitHubError),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] triage_llm::LlmError),

    /// Triage run error
    #[error(transparent)]
    Extractor(#[from] triage_extractor::ExtractorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
