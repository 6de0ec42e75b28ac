//! Configuration for the Extractor

use crate::error::ExtractorError;
use crate::prompt::DEFAULT_SYSTEM_PROMPT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Extractor and Pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Model identifier sent with every completion request
    pub model: String,

    /// Directory for the schema cache, run logs and results
    pub output_dir: PathBuf,

    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// System prompt template file; the bundled template is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_path: Option<PathBuf>,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err("output_dir must not be empty".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Read the system prompt template.
    ///
    /// Returns the file at `prompt_path` when set, otherwise the bundled
    /// issue-triage template.
    pub fn load_system_prompt(&self) -> Result<String, ExtractorError> {
        match &self.prompt_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                ExtractorError::Config(format!(
                    "Failed to read prompt template {}: {}",
                    path.display(),
                    e
                ))
            }),
            None => Ok(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: triage_domain::DEFAULT_MODEL.to_string(),
            output_dir: PathBuf::from("./out"),
            extraction_timeout_secs: 120,
            prompt_path: None,
        }
    }
}
