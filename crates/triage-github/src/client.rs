//! GitHub REST client

use crate::GitHubError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use triage_domain::{Fetched, GitHubIssue, GitHubLabel, RecordSource, RepoLocator, RepoSnapshot};

/// Default GitHub API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default timeout for GitHub requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = concat!("triage/", env!("CARGO_PKG_VERSION"));

/// GitHub API client for labels and issues
#[derive(Debug, Clone)]
pub struct GitHubClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl GitHubClient {
    /// Create a client against `api.github.com`.
    ///
    /// `token` is sent as `Authorization: token <token>` when present and
    /// non-empty; without it requests are unauthenticated and rate-limited.
    pub fn new(token: Option<String>) -> Result<Self, GitHubError> {
        Self::with_timeout(token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(token: Option<String>, timeout: Duration) -> Result<Self, GitHubError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GitHubError::Config(e.to_string()))?;

        Ok(Self {
            base_url: DEFAULT_API_BASE.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            client,
        })
    }

    /// Point the client at another API root (GitHub Enterprise, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether requests carry credentials
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn repo_url(&self, locator: &RepoLocator) -> String {
        format!("{}/repos/{}/{}", self.base_url, locator.owner, locator.repo)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url).header("Accept", ACCEPT_V3);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| GitHubError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| GitHubError::InvalidResponse(format!("Failed to parse {}: {}", url, e)));
        }

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(GitHubError::Unauthorized(status.as_u16()))
            }
            reqwest::StatusCode::NOT_FOUND => Err(GitHubError::NotFound(url.to_string())),
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(GitHubError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    /// Fetch all labels of a repository (first page)
    pub async fn fetch_labels(&self, locator: &RepoLocator) -> Result<Vec<GitHubLabel>, GitHubError> {
        self.get_json(&format!("{}/labels", self.repo_url(locator))).await
    }

    /// Fetch the first page of issues of a repository
    pub async fn fetch_issues(&self, locator: &RepoLocator) -> Result<Vec<GitHubIssue>, GitHubError> {
        self.get_json(&format!("{}/issues", self.repo_url(locator))).await
    }
}

#[async_trait]
impl RecordSource for GitHubClient {
    async fn fetch(&self, locator: &RepoLocator) -> Fetched<RepoSnapshot> {
        let (labels, issues) = tokio::join!(self.fetch_labels(locator), self.fetch_issues(locator));

        match (labels, issues) {
            (Ok(labels), Ok(issues)) => {
                debug!(
                    "Fetched {} labels and {} issues for {}",
                    labels.len(),
                    issues.len(),
                    locator
                );
                Fetched::Complete(RepoSnapshot { labels, issues })
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Error fetching data from GitHub for {}: {}", locator, e);
                Fetched::degraded(RepoSnapshot::empty(), e.to_string())
            }
        }
    }
}
