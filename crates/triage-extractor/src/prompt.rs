//! Prompt composition: template token substitution and issue rendering

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use triage_domain::{GitHubIssue, GitHubLabel};

/// Bundled system prompt for issue triage; contains a `{{labels}}` token
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/issue-triage-metadata.prompt");

/// Sentinel rendered for absent values
const NONE: &str = "None";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"));

/// Replace every `{{name}}` in `template` with `tokens[name]`.
///
/// Names without an entry are left verbatim. Substituted values are not
/// scanned again.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use triage_extractor::render_system_prompt;
///
/// let tokens = HashMap::from([("labels".to_string(), "bug, docs".to_string())]);
/// assert_eq!(render_system_prompt("Labels: {{labels}}", &tokens), "Labels: bug, docs");
/// assert_eq!(render_system_prompt("Labels: {{labels}}", &HashMap::new()), "Labels: {{labels}}");
/// ```
pub fn render_system_prompt(template: &str, tokens: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match tokens.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// One `- name: description` line per label
pub fn format_labels(labels: &[GitHubLabel]) -> String {
    labels
        .iter()
        .map(|label| {
            format!(
                "- {}: {}",
                label.name,
                label.description.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Token map for the triage system prompt
pub fn label_tokens(labels: &[GitHubLabel]) -> HashMap<String, String> {
    HashMap::from([("labels".to_string(), format_labels(labels))])
}

fn format_reactions(issue: &GitHubIssue) -> String {
    let r = &issue.reactions;
    format!(
        "\n      +1: {}, -1: {}, \n      laugh: {}, hooray: {}, \n      confused: {}, heart: {}, \n      rocket: {}, eyes: {}\n    ",
        r.plus_one, r.minus_one, r.laugh, r.hooray, r.confused, r.heart, r.rocket, r.eyes
    )
}

/// Render an issue as the user message for extraction.
///
/// The layout (section order, headers, indentation, `None` sentinels) is fixed
/// so identical issues always produce byte-identical prompts.
pub fn render_issue(issue: &GitHubIssue) -> String {
    let label_names = if issue.labels.is_empty() {
        NONE.to_string()
    } else {
        issue
            .labels
            .iter()
            .map(|label| label.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let pull_request = match &issue.pull_request {
        Some(pr) => format!("Associated Pull Request: {}", pr.html_url),
        None => NONE.to_string(),
    };

    let lines = [
        String::new(),
        "  ### GitHub Issue Details".to_string(),
        "  ".to_string(),
        format!("  **Title**: {}", issue.title),
        "  ".to_string(),
        "  **Description**:".to_string(),
        format!("  {}", issue.body.as_deref().unwrap_or(NONE)),
        "  ".to_string(),
        "  **Labels**: ".to_string(),
        format!("  {}", label_names),
        "  ".to_string(),
        "  **Current State**: ".to_string(),
        format!("  {}", issue.state),
        "  ".to_string(),
        "  **Number of Comments**: ".to_string(),
        format!("  {}", issue.comments),
        "  ".to_string(),
        "  **Reported By**: ".to_string(),
        format!("  {}", issue.user.login),
        "  ".to_string(),
        "  **Created At**: ".to_string(),
        format!("  {}", issue.created_at),
        "  ".to_string(),
        "  **Last Updated At**: ".to_string(),
        format!("  {}", issue.updated_at),
        "  ".to_string(),
        "  **Reactions**:".to_string(),
        format!("  {}", format_reactions(issue)),
        "  ".to_string(),
        "  **Associated Pull Request**: ".to_string(),
        format!("  {}", pull_request),
        String::new(),
    ];

    lines.join("\n")
}
