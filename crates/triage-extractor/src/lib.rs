//! Triage Extractor
//!
//! Schema-constrained extraction of triage metadata from GitHub issues.
//!
//! # Overview
//!
//! The output schema is derived once from [`IssueTriageMetadata`](triage_domain::IssueTriageMetadata)
//! and cached next to the results. Each issue is rendered into a fixed Markdown
//! layout and sent to a `StructuredCompletion` provider together with a system
//! prompt listing the repository's labels. Every call leaves a run log behind.
//!
//! # Architecture
//!
//! ```text
//! RecordSource → RepoSnapshot ─┐
//!                              ├→ Extractor (×5, concurrent) → results file
//! SchemaProvider → schema ─────┘
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use triage_extractor::{ExtractorConfig, Pipeline, DEFAULT_SYSTEM_PROMPT};
//! use triage_github::GitHubClient;
//! use triage_llm::OpenAiProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = GitHubClient::new(None)?;
//! let provider = OpenAiProvider::new("sk-...")?;
//! let pipeline = Pipeline::new(source, provider, ExtractorConfig::default(), DEFAULT_SYSTEM_PROMPT);
//!
//! let report = pipeline.run("octocat/hello-world").await?;
//! println!("{} of {} issues triaged", report.extracted_count(), report.results.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod pipeline;
mod prompt;
mod run_log;
mod schema;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use pipeline::{Pipeline, TriageReport, TriagedIssue, ISSUE_BATCH_LIMIT};
pub use prompt::{
    format_labels, label_tokens, render_issue, render_system_prompt, DEFAULT_SYSTEM_PROMPT,
};
pub use run_log::{run_log_path, RunLogEntry};
pub use schema::{derive_schema, inline_annotated_refs, make_strict, reshape, SchemaProvider};
