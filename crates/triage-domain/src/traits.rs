//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the triage pipeline and
//! infrastructure. Implementations live in other crates.

use crate::{CompletionRequest, Fetched, ParsedCompletion, RepoLocator, RepoSnapshot};
use async_trait::async_trait;

/// Source of the records to triage
///
/// Implemented by the infrastructure layer (triage-github)
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch labels and issues for a repository.
    ///
    /// Never fails: a failed fetch is reported as [`Fetched::Degraded`] with an
    /// empty snapshot.
    async fn fetch(&self, locator: &RepoLocator) -> Fetched<RepoSnapshot>;
}

/// Schema-constrained chat completion endpoint
///
/// Implemented by the infrastructure layer (triage-llm)
#[async_trait]
pub trait StructuredCompletion: Send + Sync {
    /// Error type for completion calls
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run one completion and return the first choice's parsed payload
    async fn complete(&self, request: &CompletionRequest) -> Result<ParsedCompletion, Self::Error>;
}
