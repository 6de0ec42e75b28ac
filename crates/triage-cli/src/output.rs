//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use triage_domain::{IssueTriageMetadata, Priority, Severity};
use triage_extractor::TriageReport;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a completed triage run.
    pub fn format_report(&self, report: &TriageReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(report.output_path.display().to_string()),
        }
    }

    fn format_report_table(&self, report: &TriageReport) -> String {
        let mut sections = vec![format!(
            "{}/{}: {} labels, {} issues fetched",
            report.owner, report.repo, report.labels_fetched, report.issues_fetched
        )];

        if report.fetch_degraded {
            sections.push(self.warning("Fetching from GitHub failed; no issues were triaged"));
        }

        if report.results.is_empty() {
            sections.push(self.colorize("No issues triaged.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["#", "Title", "Severity", "Priority", "Type", "Suggested Labels"]);

            for result in &report.results {
                let number = result.number.to_string();
                match &result.metadata {
                    Some(meta) => builder.push_record([
                        number,
                        meta.suggested_title.clone(),
                        self.severity(meta.severity),
                        self.priority(meta.priority),
                        meta.issue_type.to_string(),
                        meta.suggested_labels.join(", "),
                    ]),
                    None => builder.push_record([
                        number,
                        result.title.clone(),
                        self.colorize("(no result)", "yellow"),
                        "-".to_string(),
                        "-".to_string(),
                        "-".to_string(),
                    ]),
                }
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            sections.push(table.to_string());

            let notable: Vec<String> = report
                .notable()
                .map(|(issue, meta)| self.notable(issue.id, meta))
                .collect();
            if !notable.is_empty() {
                sections.push("Notable issues:".to_string());
                sections.extend(notable);
            }
        }

        sections.push(self.success(&format!(
            "{} of {} results written to {}",
            report.extracted_count(),
            report.results.len(),
            report.output_path.display()
        )));

        sections.join("\n")
    }

    /// Severity, colored by urgency.
    pub fn severity(&self, severity: Severity) -> String {
        let color = match severity {
            Severity::Critical => "red",
            Severity::Major => "yellow",
            Severity::Minor => "blue",
            Severity::Trivial => "",
        };
        self.colorize(&severity.to_string(), color)
    }

    /// Priority, colored by urgency.
    pub fn priority(&self, priority: Priority) -> String {
        let color = match priority {
            Priority::High => "red",
            Priority::Medium => "yellow",
            Priority::Low => "",
        };
        self.colorize(&priority.to_string(), color)
    }

    /// One-line notice for a notable result.
    pub fn notable(&self, issue_id: u64, meta: &IssueTriageMetadata) -> String {
        self.colorize(&meta.summary_line(issue_id), "magenta")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}
