//! Structured triage output
//!
//! `IssueTriageMetadata` is the type the output schema is derived from. The doc
//! comments on its fields end up as `description`s in the generated schema, so
//! they are written as instructions to the model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// Variant doc comments would turn each enum into a `oneOf` in the derived
// schema, which strict mode rejects. Keep variants undocumented.

/// Severity level of an issue: Critical, Major, Minor or Trivial
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Trivial,
}

/// How soon an issue needs to be addressed: High, Medium or Low
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Classification of an issue
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum IssueType {
    Bug,
    Enhancement,
    Performance,
    Security,
    Documentation,
}

macro_rules! display_as_debug {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        })*
    };
}

display_as_debug!(Severity, Priority, IssueType);

/// Metadata representing extracted data for automating triaging of any type of issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IssueTriageMetadata {
    /// Suggested title for the issue report based on the issue description.
    /// Automatically generated title that succinctly summarizes the problem or request.
    /// Example: "Enhancement: Add support for two-factor authentication"
    pub suggested_title: String,

    /// Suggested labels based on the content of the issue.
    /// Labels like component, priority, issue type, etc., automatically assigned.
    /// Example: ["enhancement", "security", "high-priority"]
    pub suggested_labels: Vec<String>,

    /// Severity level of the issue, indicating how critical the issue is (if applicable).
    /// Derived from the issue description, relevant to bugs, security issues, or critical enhancements.
    /// Example: "Critical"
    pub severity: Severity,

    /// Priority level of the issue, indicating how soon the issue needs to be addressed.
    /// Useful for both bugs and other issue types like enhancements or performance improvements.
    /// Example: "High"
    pub priority: Priority,

    /// Assessment of the potential impact or risk of the issue.
    /// Describes how the issue affects the system, users, or business.
    /// Example: "High impact: Security vulnerability affecting user authentication"
    pub impact: String,

    /// The environment details where the issue occurred, if applicable (e.g., OS, browser, device).
    /// Extracted from the issue description, relevant for bugs and performance issues.
    /// Example: "Windows 10, Chrome 92, Lenovo ThinkPad"
    pub environment: Option<String>,

    /// The software version where the issue was encountered or is relevant.
    /// Useful for both bugs (regression testing) and enhancement requests (version planning).
    /// Example: "v2.3.1"
    pub version: Option<String>,

    /// Stack trace or error logs associated with the issue, if applicable (mainly for bugs or crashes).
    /// Extracted from the issue report, often included for debugging.
    /// Example: "NullReferenceException at AuthService.authenticate() in authentication.js:42"
    pub stack_trace: Option<String>,

    /// Steps to reproduce the issue, particularly for bugs or performance issues.
    /// Helps developers replicate the problem or validate that it exists.
    /// Example: ["Open Chrome", "Go to login page", "Submit empty form", "Observe error"]
    pub repro_steps: Option<Vec<String>>,

    /// Error codes extracted from the issue description or logs, applicable to bugs or crashes.
    /// Helps identify specific error messages or codes related to the issue.
    /// Example: ["401", "ECONNRESET"]
    pub error_codes: Option<Vec<String>>,

    /// The specific module or component affected by the issue.
    /// Derived from the issue content, helps route the issue to the correct team.
    /// Example: "Authentication"
    pub component: Option<String>,

    /// The type of issue, such as bug, enhancement, performance issue, security vulnerability, or documentation.
    /// Helps classify the issue for proper triaging and tracking.
    /// Example: "Enhancement"
    pub issue_type: IssueType,

    /// A short, auto-generated summary of the issue meant for developers or project managers.
    /// Provides a concise explanation of the issue, its potential causes, and what area of the code might need attention.
    /// Example: "Security vulnerability in authentication module, allowing unauthorized access when cookies are disabled."
    pub developer_summary: String,
}

impl IssueTriageMetadata {
    /// True for results worth surfacing: Critical/Major severity or High priority
    pub fn is_notable(&self) -> bool {
        matches!(self.severity, Severity::Critical | Severity::Major)
            || self.priority == Priority::High
    }

    /// One-line summary used when logging notable results
    pub fn summary_line(&self, issue_id: u64) -> String {
        format!(
            "[{}] [{}] {} - Severity: {} - Priority: {}",
            issue_id,
            self.suggested_labels.join("|"),
            self.suggested_title,
            self.severity,
            self.priority
        )
    }
}
