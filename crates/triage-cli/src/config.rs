//! Configuration and credentials for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use triage_extractor::ExtractorConfig;

/// Environment variable holding the OpenAI API key (required)
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable holding a GitHub token (optional)
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Environment variable overriding the completion endpoint (optional)
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Output settings
    #[serde(default)]
    pub settings: Settings,

    /// API endpoints
    #[serde(default)]
    pub endpoints: Endpoints,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// API endpoint overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoints {
    /// GitHub REST API root (e.g. a GitHub Enterprise host)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_api: Option<String>,

    /// Chat completions API root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api: Option<String>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Configuration file path under a home directory.
    pub fn path_in(home: &Path) -> PathBuf {
        home.join(".triage").join("config.toml")
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.triage/config.toml` is
    /// read when present and defaults are used otherwise, including when no
    /// home directory can be resolved.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from_home(dirs::home_dir().as_deref()),
        }
    }

    fn load_from_home(home: Option<&Path>) -> Result<Self> {
        match home.map(Self::path_in) {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

/// Secrets and endpoint overrides read from the environment.
#[derive(Clone)]
pub struct Credentials {
    /// OpenAI API key
    pub openai_api_key: String,

    /// GitHub token; unauthenticated requests when absent
    pub github_token: Option<String>,

    /// Completion endpoint override
    pub openai_base_url: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("openai_base_url", &self.openai_base_url)
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a variable lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// `MissingCredential` when `OPENAI_API_KEY` is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let openai_api_key = non_empty(OPENAI_API_KEY)
            .ok_or_else(|| CliError::MissingCredential(OPENAI_API_KEY.to_string()))?;

        Ok(Self {
            openai_api_key,
            github_token: non_empty(GITHUB_TOKEN),
            openai_base_url: non_empty(OPENAI_BASE_URL),
        })
    }

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.extractor.output_dir, PathBuf::from("./out"));
        assert!(config.endpoints.github_api.is_none());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[extractor]
model = "gpt-4o-mini"
output_dir = "results"

[settings]
format = "json"

[endpoints]
github_api = "https://github.example.com/api/v3"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();

        assert_eq!(config.extractor.model, "gpt-4o-mini");
        assert_eq!(config.extractor.output_dir, PathBuf::from("results"));
        assert_eq!(config.extractor.extraction_timeout_secs, 120);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(
            config.endpoints.github_api.as_deref(),
            Some("https://github.example.com/api/v3")
        );
    }

    #[test]
    fn test_load_without_home_uses_defaults() {
        let config = Config::load_from_home(None).unwrap();
        assert_eq!(config.extractor.output_dir, PathBuf::from("./out"));
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_load_from_home() {
        let home = TempDir::new().unwrap();
        assert!(Config::load_from_home(Some(home.path())).unwrap().settings.color);

        let path = Config::path_in(home.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[settings]\ncolor = false\n").unwrap();

        let config = Config::load_from_home(Some(home.path())).unwrap();
        assert!(!config.settings.color);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/nonexistent/triage.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "extractor = 3").unwrap();
        assert!(matches!(Config::load(Some(path.as_path())), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_credentials_require_openai_key() {
        let result = Credentials::from_lookup(lookup(&[(GITHUB_TOKEN, "ghp_x")]));
        match result {
            Err(CliError::MissingCredential(name)) => assert_eq!(name, OPENAI_API_KEY),
            other => panic!("Expected MissingCredential, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_openai_key_is_missing() {
        let result = Credentials::from_lookup(lookup(&[(OPENAI_API_KEY, "  ")]));
        assert!(matches!(result, Err(CliError::MissingCredential(_))));
    }

    #[test]
    fn test_credentials_optional_values() {
        let credentials = Credentials::from_lookup(lookup(&[
            (OPENAI_API_KEY, "sk-test"),
            (GITHUB_TOKEN, ""),
            (OPENAI_BASE_URL, "http://localhost:8080/v1"),
        ]))
        .unwrap();

        assert_eq!(credentials.openai_api_key, "sk-test");
        assert!(credentials.github_token.is_none());
        assert_eq!(
            credentials.openai_base_url.as_deref(),
            Some("http://localhost:8080/v1")
        );
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let credentials = Credentials::from_lookup(lookup(&[
            (OPENAI_API_KEY, "sk-secret"),
            (GITHUB_TOKEN, "ghp_secret"),
        ]))
        .unwrap();

        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("ghp_secret"));
    }
}
