//! Logging initialization and the metrics listener.

use axum::{
    http::{header, Response, StatusCode},
    routing::get,
    serve, Extension, Router,
};
use prometheus_client::{encoding::text::encode, registry::Registry};
use std::{net::SocketAddr, sync::Arc};
use tracing::Level;

/// Initializes the global JSON log subscriber at the provided level.
pub fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_line_number(true)
        .with_file(true)
        .init();
}

/// Builds a router serving the registry in Prometheus text format.
pub fn metrics_router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route(
            "/metrics",
            get(|Extension(registry): Extension<Arc<Registry>>| async move {
                let mut buffer = String::new();
                encode(&mut buffer, &registry).expect("failed to encode metrics");
                Response::builder()
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
                    .body(buffer)
                    .expect("failed to create response")
            }),
        )
        .layer(Extension(registry))
}

/// Serves the metrics router on the provided address.
///
/// Runs until the listener fails; callers spawn this as a detached task.
pub async fn serve_metrics(addr: SocketAddr, registry: Arc<Registry>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, metrics_router(registry).into_make_service()).await
}
