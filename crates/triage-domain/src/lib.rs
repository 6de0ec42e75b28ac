//! Triage Domain Layer
//!
//! Core types and trait interfaces for schema-constrained issue triage.
//! Infrastructure (HTTP clients, LLM providers, file output) lives in other
//! crates and plugs in through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **Record**: one GitHub issue ingested for extraction
//! - **Tag**: a GitHub label, used to steer the extraction instructions
//! - **Output schema**: the strict JSON Schema the completion endpoint must follow
//! - **Triage metadata**: the structured result extracted for a single issue
//! - **Fetched**: explicit success/degraded outcome of a record fetch
//!
//! ## Architecture
//!
//! ```text
//! RecordSource → Issues ─┐
//!                        ├→ StructuredCompletion → IssueTriageMetadata
//! JsonSchemaFormat ──────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod completion;
pub mod fetched;
pub mod issue;
pub mod repo;
pub mod traits;
pub mod triage;

// Re-exports for convenience
pub use completion::{
    ChatMessage, CompletionRequest, JsonSchemaFormat, ParsedCompletion, ResponseFormat, Role,
    DEFAULT_MODEL,
};
pub use fetched::Fetched;
pub use issue::{GitHubIssue, GitHubLabel, PullRequest, Reactions, RepoSnapshot, User};
pub use repo::{RepoLocator, RepoLocatorError};
pub use traits::{RecordSource, StructuredCompletion};
pub use triage::{IssueTriageMetadata, IssueType, Priority, Severity};
