//! GitHub record model
//!
//! Typed views of the `/labels` and `/issues` payloads of the GitHub REST API.
//! Only the fields the triage pipeline reads are modelled; everything else in
//! the payload is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// A repository label (a "tag" attachable to issues)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubLabel {
    /// Numeric label id
    pub id: u64,

    /// Label name (e.g. "bug")
    pub name: String,

    /// Hex color without the leading '#'
    #[serde(default)]
    pub color: String,

    /// Whether this is one of GitHub's default labels
    #[serde(default)]
    pub default: bool,

    /// Free-text description; GitHub sends `null` for labels without one
    #[serde(default)]
    pub description: Option<String>,
}

/// Author of an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// GitHub login
    pub login: String,

    /// Numeric user id
    pub id: u64,
}

/// Reaction tally on an issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions {
    /// Sum of all reactions
    #[serde(default)]
    pub total_count: u64,

    /// 👍
    #[serde(rename = "+1", default)]
    pub plus_one: u64,

    /// 👎
    #[serde(rename = "-1", default)]
    pub minus_one: u64,

    /// 😄
    #[serde(default)]
    pub laugh: u64,

    /// 🎉
    #[serde(default)]
    pub hooray: u64,

    /// 😕
    #[serde(default)]
    pub confused: u64,

    /// ❤️
    #[serde(default)]
    pub heart: u64,

    /// 🚀
    #[serde(default)]
    pub rocket: u64,

    /// 👀
    #[serde(default)]
    pub eyes: u64,
}

/// Pull request link attached to an issue entry.
///
/// The issues endpoint returns pull requests as well; those carry this object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// API URL of the pull request
    pub url: String,

    /// Browser URL of the pull request
    pub html_url: String,

    /// Merge timestamp, if merged
    #[serde(default)]
    pub merged_at: Option<String>,
}

/// A single issue as returned by `GET /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubIssue {
    /// Globally unique issue id (used to name run logs)
    pub id: u64,

    /// Repository-local issue number
    pub number: u64,

    /// Issue title
    pub title: String,

    /// Issue body; `null` when the reporter left it empty
    #[serde(default)]
    pub body: Option<String>,

    /// Labels currently applied
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,

    /// "open" or "closed"
    pub state: String,

    /// Number of comments
    #[serde(default)]
    pub comments: u64,

    /// Reporter
    pub user: User,

    /// Creation timestamp (ISO-8601, as sent by the API)
    pub created_at: String,

    /// Last update timestamp (ISO-8601, as sent by the API)
    pub updated_at: String,

    /// Reaction tally
    #[serde(default)]
    pub reactions: Reactions,

    /// Present when the entry is a pull request
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

/// Labels and issues fetched for one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    /// Repository labels
    pub labels: Vec<GitHubLabel>,

    /// First page of repository issues
    pub issues: Vec<GitHubIssue>,
}

impl RepoSnapshot {
    /// Snapshot with no labels and no issues
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when neither labels nor issues were fetched
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.issues.is_empty()
    }
}
