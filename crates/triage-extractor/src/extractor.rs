//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::run_log::{write_run_log, RunLogEntry};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};
use triage_domain::{CompletionRequest, JsonSchemaFormat, StructuredCompletion};

/// Runs one schema-constrained completion per record
pub struct Extractor<P>
where
    P: StructuredCompletion,
{
    provider: P,
    model: String,
    output_dir: PathBuf,
    timeout: Duration,
}

impl<P> Extractor<P>
where
    P: StructuredCompletion,
{
    /// Create a new Extractor
    pub fn new(provider: P, config: &ExtractorConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            output_dir: config.output_dir.clone(),
            timeout: config.extraction_timeout(),
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The underlying completion provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Extract a `T` from one record.
    ///
    /// Sends a single completion request bound to `schema` and writes a run
    /// log once the call returns. `Ok(None)` means the call succeeded but
    /// produced no usable payload (refusal, empty content, or a value that
    /// does not deserialize into `T`).
    ///
    /// # Errors
    ///
    /// `Timeout` when the call exceeds the configured limit, `Llm` for
    /// provider failures, `Io` when the run log cannot be written.
    pub async fn extract<T>(
        &self,
        record_id: u64,
        schema: &JsonSchemaFormat,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Option<T>, ExtractorError>
    where
        T: DeserializeOwned,
    {
        let request =
            CompletionRequest::structured(&self.model, system_prompt, user_prompt, schema.clone());

        debug!("Extracting {} for record {}", schema.name, record_id);

        let completion = timeout(self.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| ExtractorError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        let log_path = write_run_log(
            &self.output_dir,
            record_id,
            &RunLogEntry {
                config: &request,
                res_data: completion.parsed.as_ref(),
            },
        )
        .await?;
        debug!("Run log written to {}", log_path.display());

        let Some(value) = completion.parsed else {
            debug!("No parsed payload for record {}", record_id);
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                warn!("Payload for record {} does not match {}: {}", record_id, schema.name, e);
                Ok(None)
            }
        }
    }
}
