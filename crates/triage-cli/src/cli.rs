//! Command-line arguments.

use crate::config::{Config, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

/// Repository triaged when none is given
pub const DEFAULT_REPO: &str = "saoudrizwan/claude-dev";

/// Triage GitHub issues with schema-constrained LLM extraction.
#[derive(Debug, Parser)]
#[command(name = "triage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Repository to triage (owner/repo or a GitHub URL)
    #[arg(default_value = DEFAULT_REPO)]
    pub repo_url: String,

    /// Directory for the schema cache, run logs and results
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Model used for extraction
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt template file (must contain {{labels}})
    #[arg(short, long)]
    pub prompt: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (results path only)
    Quiet,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

impl Cli {
    /// Apply flag overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(out_dir) = &self.out_dir {
            config.extractor.output_dir = out_dir.clone();
        }
        if let Some(model) = &self.model {
            config.extractor.model = model.clone();
        }
        if let Some(prompt) = &self.prompt {
            config.extractor.prompt_path = Some(prompt.clone());
        }
        if let Some(format) = self.format {
            config.settings.format = format.into();
        }
        if self.no_color {
            config.settings.color = false;
        }
    }
}
