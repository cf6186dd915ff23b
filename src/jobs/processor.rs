//! Job processor that runs the pipeline for queued jobs.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use super::store::JobStore;
use crate::pipeline::{CancelToken, PipelineDriver};
use crate::types::{PackingConfig, StartPackJobRequest};

/// Processor that runs packing jobs on a blocking worker.
pub struct JobProcessor {
    config: PackingConfig,
}

impl JobProcessor {
    /// Create a new job processor.
    pub fn new(config: PackingConfig) -> Self {
        Self { config }
    }

    /// Run a job to completion, mirroring progress into the store.
    ///
    /// Must be called from a blocking context; the store is locked with
    /// `blocking_write`.
    pub fn process_job(
        &self,
        job_id: Uuid,
        request: StartPackJobRequest,
        cancel: CancelToken,
        job_store: Arc<RwLock<JobStore>>,
    ) {
        info!(job_id = %job_id, documents = request.files.len(), "Starting job processing");

        if let Some(job) = job_store.blocking_write().get_job_mut(job_id) {
            job.start();
        }

        let mut config = self.config.clone();
        config.output_dir = self.config.output_dir.join(job_id.to_string());

        let driver = PipelineDriver::new(config).with_cancel_token(cancel);
        let formatter = request.format.formatter();
        let report = driver.run_with(&request.files, request.format, formatter.as_ref(), |index, document| {
            if let Some(job) = job_store.blocking_write().get_job_mut(job_id) {
                job.update_document(index, document.clone());
            }
        });

        match driver.write_output(&report) {
            Ok(outputs) => {
                info!(
                    job_id = %job_id,
                    chunks = report.total_chunks(),
                    bundles = report.output.bundles.len(),
                    cancelled = report.cancelled,
                    "Job processing complete"
                );
                if let Some(job) = job_store.blocking_write().get_job_mut(job_id) {
                    job.complete(report.output.manifest.clone(), outputs, report.cancelled);
                }
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Failed to write job output");
                if let Some(job) = job_store.blocking_write().get_job_mut(job_id) {
                    job.fail(e.to_string());
                }
            }
        }
    }
}
