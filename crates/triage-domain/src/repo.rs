//! Repository locator parsing

use std::fmt;
use thiserror::Error;

/// Errors produced when a repository locator cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoLocatorError {
    /// Fewer than two path segments were found
    #[error("Invalid repository URL provided: '{0}' (expected .../owner/repo)")]
    MissingSegments(String),
}

/// Owner/repository pair identifying a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoLocator {
    /// Account or organization that owns the repository
    pub owner: String,

    /// Repository name
    pub repo: String,
}

impl RepoLocator {
    /// Create a locator from already-split parts
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse the trailing two path segments of a URL-like string.
    ///
    /// Accepts `owner/repo`, `https://github.com/owner/repo`, and the same with
    /// a trailing slash or `.git` suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use triage_domain::RepoLocator;
    ///
    /// let locator = RepoLocator::parse("https://github.com/octocat/hello-world").unwrap();
    /// assert_eq!(locator.owner, "octocat");
    /// assert_eq!(locator.repo, "hello-world");
    /// ```
    pub fn parse(input: &str) -> Result<Self, RepoLocatorError> {
        let segments: Vec<&str> = input
            .trim()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if segments.len() < 2 {
            return Err(RepoLocatorError::MissingSegments(input.to_string()));
        }

        let owner = segments[segments.len() - 2];
        let repo = segments[segments.len() - 1];
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        if owner.is_empty() || repo.is_empty() {
            return Err(RepoLocatorError::MissingSegments(input.to_string()));
        }

        Ok(Self::new(owner, repo))
    }
}

impl fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
