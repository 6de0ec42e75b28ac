//! Per-call audit files pairing the outbound request with its parsed result

use crate::error::ExtractorError;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use triage_domain::CompletionRequest;

/// One run log file body
#[derive(Debug, Serialize)]
pub struct RunLogEntry<'a> {
    /// Request exactly as sent
    pub config: &'a CompletionRequest,

    /// Parsed payload, `null` when the model returned none
    #[serde(rename = "resData")]
    pub res_data: Option<&'a Value>,
}

/// Milliseconds since the Unix epoch
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// `<dir>/llm-run-log_id<id>_<millis>.json`
pub fn run_log_path(dir: &Path, record_id: u64, millis: u128) -> PathBuf {
    dir.join(format!("llm-run-log_id{}_{}.json", record_id, millis))
}

/// Write a run log for `record_id`. Never overwrites an existing file.
pub async fn write_run_log(
    dir: &Path,
    record_id: u64,
    entry: &RunLogEntry<'_>,
) -> Result<PathBuf, ExtractorError> {
    let path = run_log_path(dir, record_id, epoch_millis());
    let body = serde_json::to_vec_pretty(entry)?;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .map_err(|e| ExtractorError::Io(format!("{}: {}", path.display(), e)))?;
    file.write_all(&body).await?;
    file.flush().await?;

    Ok(path)
}
