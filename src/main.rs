//! Docpack Service - Main Entry Point
//!
//! Queues documents for chunking and bundle packing over HTTP.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docpack::api::{self, handlers::AppState};
use docpack::types::ServiceConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "docpack=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ServiceConfig::from_env();

    info!("Starting Docpack Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        target_size = config.packing.target_size,
        overlap_window = config.packing.overlap_window,
        max_bundle_size = config.packing.max_bundle_size,
        input_dir = %config.input_dir.display(),
        output_dir = %config.packing.output_dir.display(),
        "Packing configuration"
    );

    let state = Arc::new(AppState::new(config.packing, config.input_dir));
    let app = api::router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
