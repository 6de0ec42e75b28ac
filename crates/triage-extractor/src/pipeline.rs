//! End-to-end triage run: fetch, derive schema, extract in a batch, persist

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::prompt::{label_tokens, render_issue, render_system_prompt};
use crate::run_log::epoch_millis;
use crate::schema::SchemaProvider;
use futures::future::try_join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use triage_domain::{
    GitHubIssue, IssueTriageMetadata, RecordSource, RepoLocator, StructuredCompletion,
};

/// Number of issues sent for extraction per run
pub const ISSUE_BATCH_LIMIT: usize = 5;

/// One issue of the batch with its extraction result
#[derive(Debug, Clone, Serialize)]
pub struct TriagedIssue {
    /// GitHub issue id
    pub id: u64,
    /// Issue number within the repository
    pub number: u64,
    /// Original issue title
    pub title: String,
    /// Extracted metadata; `None` when the model produced nothing usable
    pub metadata: Option<IssueTriageMetadata>,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct TriageReport {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Whether the record fetch failed and the run continued with no records
    pub fetch_degraded: bool,
    /// Labels returned by the source
    pub labels_fetched: usize,
    /// Issues returned by the source
    pub issues_fetched: usize,
    /// Batch results in fetch order
    pub results: Vec<TriagedIssue>,
    /// Results file
    pub output_path: PathBuf,
}

impl TriageReport {
    /// Results that produced metadata
    pub fn extracted_count(&self) -> usize {
        self.results.iter().filter(|r| r.metadata.is_some()).count()
    }

    /// Results with Critical/Major severity or High priority
    pub fn notable(&self) -> impl Iterator<Item = (&TriagedIssue, &IssueTriageMetadata)> {
        self.results.iter().filter_map(|result| {
            result
                .metadata
                .as_ref()
                .filter(|meta| meta.is_notable())
                .map(|meta| (result, meta))
        })
    }
}

/// Issue triage over one repository
pub struct Pipeline<S, P>
where
    S: RecordSource,
    P: StructuredCompletion,
{
    source: S,
    extractor: Extractor<P>,
    schemas: SchemaProvider,
    output_dir: PathBuf,
    system_template: String,
}

impl<S, P> Pipeline<S, P>
where
    S: RecordSource,
    P: StructuredCompletion,
{
    /// Create a pipeline.
    ///
    /// `system_template` is the system prompt with a `{{labels}}` token,
    /// rendered once per run from the fetched labels.
    pub fn new(
        source: S,
        provider: P,
        config: ExtractorConfig,
        system_template: impl Into<String>,
    ) -> Self {
        Self {
            source,
            extractor: Extractor::new(provider, &config),
            schemas: SchemaProvider::new(&config.output_dir),
            output_dir: config.output_dir,
            system_template: system_template.into(),
        }
    }

    /// Triage the first issues of `repo_url` and write the results file.
    ///
    /// # Errors
    ///
    /// Fails on an unusable schema, an unparseable locator, or the first
    /// extraction error of the batch. A failed fetch is not an error: the run
    /// completes with an empty result set and `fetch_degraded` set.
    pub async fn run(&self, repo_url: &str) -> Result<TriageReport, ExtractorError> {
        ensure_dir(&self.output_dir).await?;

        let schema = self.schemas.load::<IssueTriageMetadata>().await?;
        let locator = RepoLocator::parse(repo_url)?;

        info!("Fetching labels and issues for {}", locator);
        let fetched = self.source.fetch(&locator).await;
        if let Some(reason) = fetched.reason() {
            warn!("Fetch for {} degraded, continuing without records: {}", locator, reason);
        }
        let fetch_degraded = fetched.is_degraded();
        let snapshot = fetched.into_inner();
        info!(
            "Fetched {} labels and {} issues",
            snapshot.labels.len(),
            snapshot.issues.len()
        );

        let system_prompt =
            render_system_prompt(&self.system_template, &label_tokens(&snapshot.labels));

        let batch: Vec<&GitHubIssue> = snapshot.issues.iter().take(ISSUE_BATCH_LIMIT).collect();
        let user_prompts: Vec<String> = batch.iter().map(|issue| render_issue(issue)).collect();

        let extractions = batch.iter().zip(&user_prompts).map(|(issue, user_prompt)| {
            self.extractor.extract::<IssueTriageMetadata>(
                issue.id,
                &schema,
                &system_prompt,
                user_prompt,
            )
        });
        let results = try_join_all(extractions).await?;

        for (issue, metadata) in batch.iter().zip(&results) {
            if let Some(metadata) = metadata.as_ref().filter(|m| m.is_notable()) {
                info!("{}", metadata.summary_line(issue.id));
            }
        }

        let output_path = self
            .output_dir
            .join(format!("issue_triage_metadata_{}.json", epoch_millis()));
        tokio::fs::write(&output_path, serde_json::to_string_pretty(&results)?).await?;
        info!("Wrote {} results to {}", results.len(), output_path.display());

        let results = batch
            .into_iter()
            .zip(results)
            .map(|(issue, metadata)| TriagedIssue {
                id: issue.id,
                number: issue.number,
                title: issue.title.clone(),
                metadata,
            })
            .collect();

        Ok(TriageReport {
            owner: locator.owner,
            repo: locator.repo,
            fetch_degraded,
            labels_fetched: snapshot.labels.len(),
            issues_fetched: snapshot.issues.len(),
            results,
            output_path,
        })
    }
}

async fn ensure_dir(dir: &Path) -> Result<(), ExtractorError> {
    if !tokio::fs::try_exists(dir).await? {
        tokio::fs::create_dir_all(dir).await?;
        debug!("Created output directory {}", dir.display());
    }
    Ok(())
}
