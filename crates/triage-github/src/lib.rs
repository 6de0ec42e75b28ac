//! Triage GitHub Record Source
//!
//! Fetches repository labels and the first page of issues from the GitHub REST
//! API and exposes them through the `RecordSource` trait from `triage-domain`.
//!
//! # Failure policy
//!
//! The lower-level [`GitHubClient::fetch_labels`] and
//! [`GitHubClient::fetch_issues`] return `Result`s. The `RecordSource`
//! implementation never fails: if either request fails, both collections are
//! dropped and the outcome is [`Fetched::Degraded`](triage_domain::Fetched)
//! with an empty snapshot.
//!
//! # Examples
//!
//! ```no_run
//! use triage_domain::{RecordSource, RepoLocator};
//! use triage_github::GitHubClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GitHubClient::new(std::env::var("GITHUB_TOKEN").ok())?;
//! let fetched = client.fetch(&RepoLocator::new("octocat", "hello-world")).await;
//! println!("{} issues", fetched.value().issues.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;

use thiserror::Error;

pub use client::{GitHubClient, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};

/// Errors that can occur while talking to GitHub
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Credentials rejected (401/403)
    #[error("Unauthorized: HTTP {0}")]
    Unauthorized(u16),

    /// Repository not found or not visible with the given credentials
    #[error("Repository not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be constructed
    #[error("Client configuration error: {0}")]
    Config(String),
}
