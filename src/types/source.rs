//! Document status types and request/response definitions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::output::{Manifest, OutputFormat};

/// Processing state of one queued document.
///
/// Documents move `Pending -> Processing -> Done | Error` exactly once per
/// run; there is no path back to `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Queued, not yet opened
    Pending,
    /// Currently being extracted and chunked
    Processing,
    /// All pages consumed and buffered text flushed
    Done,
    /// Document could not be processed
    Error(String),
}

impl DocumentStatus {
    /// Check if the document reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Done | DocumentStatus::Error(_))
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Pending => write!(f, "pending"),
            DocumentStatus::Processing => write!(f, "processing"),
            DocumentStatus::Done => write!(f, "done"),
            DocumentStatus::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Per-document outcome of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Document name used as the chunk source
    pub name: String,

    /// Path the document was read from
    pub path: PathBuf,

    /// Current status
    pub status: DocumentStatus,

    /// Pages read successfully
    pub pages_read: usize,

    /// Pages skipped after an extraction failure
    pub pages_skipped: usize,

    /// Chunk records emitted for this document
    pub chunks: usize,
}

impl DocumentReport {
    /// Create a pending report for a queued path.
    pub fn pending(path: PathBuf) -> Self {
        Self {
            name: document_name(&path),
            path,
            status: DocumentStatus::Pending,
            pages_read: 0,
            pages_skipped: 0,
            chunks: 0,
        }
    }
}

/// Name a document by its file name, falling back to the full path.
pub fn document_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Request to start a packing job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPackJobRequest {
    /// Files to process, in queue order
    pub files: Vec<PathBuf>,

    /// Output representation for the whole run
    #[serde(default)]
    pub format: OutputFormat,
}

/// Response when starting a packing job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPackJobResponse {
    /// ID of the created job
    pub job_id: Uuid,

    /// Whether the job was accepted
    pub accepted: bool,

    /// Number of documents queued
    pub documents: usize,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status of a packing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackJobStatus {
    /// Job is queued but not started
    Pending,
    /// Job is currently running
    Running,
    /// Job reached the end of its queue
    Completed,
    /// Job stopped early on request
    Cancelled,
    /// Job could not write its output
    Failed,
}

/// Response with job status information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackJobStatusResponse {
    /// ID of the job
    pub job_id: Uuid,

    /// Current status
    pub status: PackJobStatus,

    /// Output representation
    pub format: OutputFormat,

    /// Per-document progress, in queue order
    pub documents: Vec<DocumentReport>,

    /// Total chunk records emitted so far
    pub chunks_emitted: usize,

    /// Manifest of the written bundles, once finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,

    /// Files written by the job
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<PathBuf>,

    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When the job started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the job completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_name_from_path() {
        assert_eq!(document_name(std::path::Path::new("/data/in/report.pdf")), "report.pdf");
        assert_eq!(document_name(std::path::Path::new("notes.txt")), "notes.txt");
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(DocumentStatus::Error("bad file".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"state": "error", "message": "bad file"}));

        let json = serde_json::to_value(DocumentStatus::Done).unwrap();
        assert_eq!(json, serde_json::json!({"state": "done"}));
    }

    #[test]
    fn test_request_defaults_to_text() {
        let request: StartPackJobRequest =
            serde_json::from_value(serde_json::json!({"files": ["a.pdf"]})).unwrap();
        assert_eq!(request.format, OutputFormat::Text);
        assert_eq!(request.files, vec![PathBuf::from("a.pdf")]);
    }
}
