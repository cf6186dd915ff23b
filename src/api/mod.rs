//! HTTP surface for queuing and monitoring packing jobs.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::AppState;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Packing jobs
        .route("/pack/jobs", post(handlers::start_pack_job))
        .route("/pack/jobs/:job_id", get(handlers::get_job_status))
        .route("/pack/jobs/:job_id/cancel", post(handlers::cancel_job))
        // Configuration
        .route("/pack/config", get(handlers::get_config))
        // State
        .with_state(state)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::types::{PackJobStatus, PackJobStatusResponse, PackingConfig, StartPackJobResponse};

    fn app(config: PackingConfig, input_dir: &std::path::Path) -> Router {
        router(Arc::new(AppState::new(config, input_dir.to_path_buf())))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_health_check() {
        let response = tokio_test::block_on(handlers::health_check());
        assert_eq!(response.0.status, "healthy");
    }

    #[tokio::test]
    async fn test_empty_job_rejected() {
        let response = app(PackingConfig::default(), std::path::Path::new("."))
            .oneshot(post_json("/pack/jobs", serde_json::json!({"files": []})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: StartPackJobResponse = body_json(response).await;
        assert!(!body.accepted);
        assert_eq!(body.job_id, Uuid::nil());
    }

    #[tokio::test]
    async fn test_unknown_job_not_found() {
        let uri = format!("/pack/jobs/{}", Uuid::new_v4());
        let response = app(PackingConfig::default(), std::path::Path::new("."))
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_job_runs_to_completion() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("guide.txt");
        std::fs::write(&doc, "A guide sentence for testing. ".repeat(200)).unwrap();

        let app = app(
            PackingConfig {
                output_dir: dir.path().join("out"),
                ..Default::default()
            },
            dir.path(),
        );

        let response = app
            .clone()
            .oneshot(post_json(
                "/pack/jobs",
                serde_json::json!({"files": ["guide.txt"], "format": "structured"}),
            ))
            .await
            .unwrap();
        let started: StartPackJobResponse = body_json(response).await;
        assert!(started.accepted);
        assert_eq!(started.documents, 1);

        let uri = format!("/pack/jobs/{}", started.job_id);
        let mut status: Option<PackJobStatusResponse> = None;
        for _ in 0..100 {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            let current: PackJobStatusResponse = body_json(response).await;
            if current.status == PackJobStatus::Completed {
                status = Some(current);
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let status = status.expect("job did not complete");
        assert!(status.chunks_emitted > 1);
        let manifest = status.manifest.unwrap();
        assert_eq!(manifest.total_files, 1);
        assert_eq!(manifest.total_chunks_approx, status.chunks_emitted);
        assert_eq!(status.documents[0].path, doc);
    }

    #[tokio::test]
    async fn test_paths_outside_input_dir_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let inside = dir.path().join("in");
        std::fs::create_dir(&inside).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "not for packing").unwrap();
        let app = app(PackingConfig::default(), &inside);

        let outside = dir.path().join("secret.txt");
        let requests = [
            serde_json::json!({"files": [outside]}),
            serde_json::json!({"files": ["../secret.txt"]}),
            serde_json::json!({"files": ["ok.txt", "nested/../../secret.txt"]}),
        ];
        for body in requests {
            let response = app.clone().oneshot(post_json("/pack/jobs", body)).await.unwrap();
            let started: StartPackJobResponse = body_json(response).await;
            assert!(!started.accepted);
            assert_eq!(started.job_id, Uuid::nil());
            assert!(started.message.unwrap().contains("secret.txt"));
        }
    }

    #[test]
    fn test_resolve_input() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        assert_eq!(
            handlers::resolve_input(root, std::path::Path::new("docs/a.pdf")),
            Some(root.join("docs/a.pdf"))
        );
        assert_eq!(handlers::resolve_input(root, std::path::Path::new("")), None);
        assert_eq!(handlers::resolve_input(root, std::path::Path::new("/etc/passwd")), None);
        assert_eq!(handlers::resolve_input(root, std::path::Path::new("a/../../b.txt")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_input_rejects_symlink_escape() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("in");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "not for packing").unwrap();
        std::os::unix::fs::symlink(dir.path().join("secret.txt"), root.join("link.txt")).unwrap();
        std::fs::write(root.join("real.txt"), "packable").unwrap();

        assert_eq!(handlers::resolve_input(&root, std::path::Path::new("link.txt")), None);
        assert_eq!(
            handlers::resolve_input(&root, std::path::Path::new("real.txt")),
            Some(root.join("real.txt"))
        );
    }
}
