//! Job store for tracking packing job status.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::output::{Manifest, OutputFormat};
use crate::pipeline::CancelToken;
use crate::types::{DocumentReport, PackJobStatus, PackJobStatusResponse};

/// In-memory job store for tracking packing jobs.
pub struct JobStore {
    jobs: HashMap<Uuid, JobRecord>,
}

/// Internal record for tracking a job.
#[derive(Debug, Clone)]
pub struct JobRecord {
    /// ID of the job
    pub job_id: Uuid,
    /// Current status
    pub status: PackJobStatus,
    /// Output representation for the run
    pub format: OutputFormat,
    /// Per-document progress, in queue order
    pub documents: Vec<DocumentReport>,
    /// Manifest of the written bundles, once finished
    pub manifest: Option<Manifest>,
    /// Files written by the job
    pub outputs: Vec<PathBuf>,
    /// Error message if the job failed
    pub error: Option<String>,
    /// Token shared with the worker running the job
    pub cancel: CancelToken,
    /// When the worker picked the job up
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state
    pub completed_at: Option<DateTime<Utc>>,
    /// When the job was queued
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new job record with every document pending.
    pub fn new(job_id: Uuid, files: &[PathBuf], format: OutputFormat) -> Self {
        Self {
            job_id,
            status: PackJobStatus::Pending,
            format,
            documents: files.iter().cloned().map(DocumentReport::pending).collect(),
            manifest: None,
            outputs: Vec::new(),
            error: None,
            cancel: CancelToken::new(),
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Mark the job as started.
    pub fn start(&mut self) {
        self.status = PackJobStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Replace the report of one queued document.
    pub fn update_document(&mut self, index: usize, report: DocumentReport) {
        if let Some(slot) = self.documents.get_mut(index) {
            *slot = report;
        }
    }

    /// Mark the job as finished with its written output.
    pub fn complete(&mut self, manifest: Manifest, outputs: Vec<PathBuf>, cancelled: bool) {
        self.status = if cancelled {
            PackJobStatus::Cancelled
        } else {
            PackJobStatus::Completed
        };
        self.manifest = Some(manifest);
        self.outputs = outputs;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the job as failed.
    pub fn fail(&mut self, error: String) {
        self.status = PackJobStatus::Failed;
        self.error = Some(error);
        self.completed_at = Some(Utc::now());
    }

    /// Check if the job reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            PackJobStatus::Completed | PackJobStatus::Cancelled | PackJobStatus::Failed
        )
    }

    /// Convert to response type.
    pub fn to_response(&self) -> PackJobStatusResponse {
        PackJobStatusResponse {
            job_id: self.job_id,
            status: self.status,
            format: self.format,
            documents: self.documents.clone(),
            chunks_emitted: self.documents.iter().map(|d| d.chunks).sum(),
            manifest: self.manifest.clone(),
            outputs: self.outputs.clone(),
            error: self.error.clone(),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

impl JobStore {
    /// Create a new job store.
    pub fn new() -> Self {
        Self {
            jobs: HashMap::new(),
        }
    }

    /// Create a new job and return its ID.
    pub fn create_job(&mut self, files: &[PathBuf], format: OutputFormat) -> Uuid {
        let job_id = Uuid::new_v4();
        self.jobs.insert(job_id, JobRecord::new(job_id, files, format));
        job_id
    }

    /// Get a job by ID.
    pub fn get_job(&self, job_id: Uuid) -> Option<&JobRecord> {
        self.jobs.get(&job_id)
    }

    /// Get a mutable reference to a job.
    pub fn get_job_mut(&mut self, job_id: Uuid) -> Option<&mut JobRecord> {
        self.jobs.get_mut(&job_id)
    }

    /// Cancellation token of a job.
    pub fn cancel_token(&self, job_id: Uuid) -> Option<CancelToken> {
        self.jobs.get(&job_id).map(|j| j.cancel.clone())
    }

    /// Request cancellation of a job that has not finished.
    pub fn cancel_job(&mut self, job_id: Uuid) -> bool {
        match self.jobs.get(&job_id) {
            Some(job) if !job.is_finished() => {
                job.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// Get job status as response.
    pub fn get_job_status(&self, job_id: Uuid) -> Option<PackJobStatusResponse> {
        self.jobs.get(&job_id).map(|j| j.to_response())
    }

    /// Clean up old finished jobs (older than 1 hour).
    pub fn cleanup_old_jobs(&mut self) {
        let cutoff = Utc::now() - chrono::Duration::hours(1);
        self.jobs.retain(|_, job| {
            if job.is_finished() {
                job.completed_at.map_or(true, |t| t > cutoff)
            } else {
                true
            }
        });
    }

    /// Get count of jobs by status.
    pub fn get_job_counts(&self) -> HashMap<PackJobStatus, usize> {
        let mut counts = HashMap::new();
        for job in self.jobs.values() {
            *counts.entry(job.status).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentStatus;

    fn files() -> Vec<PathBuf> {
        vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]
    }

    #[test]
    fn test_job_lifecycle() {
        let mut store = JobStore::new();
        let job_id = store.create_job(&files(), OutputFormat::Structured);

        let status = store.get_job_status(job_id).unwrap();
        assert_eq!(status.status, PackJobStatus::Pending);
        assert_eq!(status.documents.len(), 2);
        assert!(status.documents.iter().all(|d| d.status == DocumentStatus::Pending));

        let job = store.get_job_mut(job_id).unwrap();
        job.start();
        let mut report = job.documents[0].clone();
        report.status = DocumentStatus::Done;
        report.chunks = 5;
        job.update_document(0, report);

        let status = store.get_job_status(job_id).unwrap();
        assert_eq!(status.status, PackJobStatus::Running);
        assert_eq!(status.chunks_emitted, 5);
        assert!(status.started_at.is_some());
    }

    #[test]
    fn test_cancel_only_running_jobs() {
        let mut store = JobStore::new();
        let job_id = store.create_job(&files(), OutputFormat::Text);

        assert!(store.cancel_job(job_id));
        assert!(store.cancel_token(job_id).unwrap().is_cancelled());

        store.get_job_mut(job_id).unwrap().fail("disk full".to_string());
        assert!(!store.cancel_job(job_id));
        assert!(!store.cancel_job(Uuid::new_v4()));
    }

    #[test]
    fn test_cleanup_keeps_recent_jobs() {
        let mut store = JobStore::new();
        let finished = store.create_job(&files(), OutputFormat::Text);
        let running = store.create_job(&files(), OutputFormat::Text);

        {
            let job = store.get_job_mut(finished).unwrap();
            job.fail("boom".to_string());
            job.completed_at = Some(Utc::now() - chrono::Duration::hours(2));
        }
        store.get_job_mut(running).unwrap().start();

        store.cleanup_old_jobs();
        assert!(store.get_job(finished).is_none());
        assert!(store.get_job(running).is_some());
        assert_eq!(store.get_job_counts().get(&PackJobStatus::Running), Some(&1));
    }
}
