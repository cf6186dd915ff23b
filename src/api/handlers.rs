//! HTTP request handlers for the packing service.

use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::jobs::{JobProcessor, JobStore};
use crate::types::{PackingConfig, StartPackJobRequest, StartPackJobResponse};

/// Application state shared across handlers.
pub struct AppState {
    pub job_store: Arc<RwLock<JobStore>>,
    pub config: PackingConfig,
    /// Root that every submitted file path must stay inside
    pub input_dir: PathBuf,
}

impl AppState {
    /// Create state with an empty job store.
    pub fn new(config: PackingConfig, input_dir: PathBuf) -> Self {
        Self {
            job_store: Arc::new(RwLock::new(JobStore::new())),
            config,
            input_dir,
        }
    }
}

/// Resolve a submitted file path against the input directory.
///
/// Only relative paths made of plain components are accepted. A path that
/// exists must still lie under the root once symlinks are resolved; a
/// missing file is passed through and fails later as a document error.
pub fn resolve_input(root: &FsPath, requested: &FsPath) -> Option<PathBuf> {
    let plain = requested
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !plain || requested.as_os_str().is_empty() {
        return None;
    }

    let resolved = root.join(requested);
    match (resolved.canonicalize(), root.canonicalize()) {
        (Ok(file), Ok(root)) if !file.starts_with(&root) => None,
        _ => Some(resolved),
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Start a packing job.
pub async fn start_pack_job(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartPackJobRequest>,
) -> Json<StartPackJobResponse> {
    let documents = request.files.len();

    if documents == 0 {
        return Json(StartPackJobResponse {
            job_id: Uuid::nil(),
            accepted: false,
            documents: 0,
            message: Some("No files provided".to_string()),
        });
    }

    let mut files = Vec::with_capacity(documents);
    for requested in &request.files {
        match resolve_input(&state.input_dir, requested) {
            Some(path) => files.push(path),
            None => {
                warn!(path = %requested.display(), "Rejected path outside the input directory");
                return Json(StartPackJobResponse {
                    job_id: Uuid::nil(),
                    accepted: false,
                    documents: 0,
                    message: Some(format!(
                        "Path is not inside the input directory: {}",
                        requested.display()
                    )),
                });
            }
        }
    }
    let request = StartPackJobRequest {
        files,
        format: request.format,
    };

    info!(documents, format = %request.format, "Received pack job request");

    let (job_id, cancel) = {
        let mut store = state.job_store.write().await;
        store.cleanup_old_jobs();
        let job_id = store.create_job(&request.files, request.format);
        let cancel = store.cancel_token(job_id).unwrap_or_default();
        (job_id, cancel)
    };

    let processor = JobProcessor::new(state.config.clone());
    let job_store = Arc::clone(&state.job_store);

    tokio::spawn(async move {
        let worker_store = Arc::clone(&job_store);
        let result = tokio::task::spawn_blocking(move || {
            processor.process_job(job_id, request, cancel, worker_store);
        })
        .await;

        if let Err(e) = result {
            error!(job_id = %job_id, error = %e, "Job worker panicked");
            if let Some(job) = job_store.write().await.get_job_mut(job_id) {
                job.fail(format!("worker panicked: {}", e));
            }
        }
    });

    Json(StartPackJobResponse {
        job_id,
        accepted: true,
        documents,
        message: None,
    })
}

/// Get job status.
pub async fn get_job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, StatusCode> {
    let store = state.job_store.read().await;

    match store.get_job_status(job_id) {
        Some(status) => Ok(Json(status)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Cancel response.
#[derive(Debug, Serialize)]
pub struct CancelJobResponse {
    job_id: Uuid,
    cancelled: bool,
}

/// Request cancellation of a running job.
pub async fn cancel_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<CancelJobResponse>, StatusCode> {
    let mut store = state.job_store.write().await;

    if store.get_job(job_id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }

    let cancelled = store.cancel_job(job_id);
    info!(job_id = %job_id, cancelled, "Cancel requested");

    Ok(Json(CancelJobResponse { job_id, cancelled }))
}

/// Active packing configuration.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<PackingConfig> {
    Json(state.config.clone())
}
