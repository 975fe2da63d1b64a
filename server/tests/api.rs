use prometheus_client::registry::Registry;
use quickindex_engine::{Dataset, Engine};
use quickindex_server::{
    api::{self, AppState, ErrorResponse, Metrics, SearchResponse},
    telemetry,
};
use std::sync::Arc;

/// Boots the service router over the standard test dataset on an
/// ephemeral port and returns the base URL.
async fn start_server() -> String {
    let dataset = Dataset::from(vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]);
    let state = Arc::new(AppState::new(Engine::new(dataset), Metrics::default()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api::router(state).into_make_service())
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_search_exact_match() {
    let base = start_server().await;
    let response = reqwest::get(format!("{base}/api/v1/search/500"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: SearchResponse = response.json().await.unwrap();
    assert_eq!(body.value, 500);
    assert_eq!(body.index, 4);
    assert_eq!(body.message, "Exact match found");
}

#[tokio::test]
async fn test_search_approximate_match() {
    let base = start_server().await;
    let response = reqwest::get(format!("{base}/api/v1/search/440"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: SearchResponse = response.json().await.unwrap();
    assert_eq!(body.value, 400);
    assert_eq!(body.index, 3);
    assert_eq!(body.message, "Approximate match within 10% tolerance");
}

#[tokio::test]
async fn test_search_not_found() {
    let base = start_server().await;
    let response = reqwest::get(format!("{base}/api/v1/search/9999"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error, "Value not found");
    assert_eq!(body.message, "No suitable match found for value 9999");
}

#[tokio::test]
async fn test_search_non_integer() {
    let base = start_server().await;
    let response = reqwest::get(format!("{base}/api/v1/search/abc"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error, "Validation error");
}

#[tokio::test]
async fn test_search_negative_value() {
    let base = start_server().await;
    let response = reqwest::get(format!("{base}/api/v1/search/-100"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn test_search_value_above_limit() {
    let base = start_server().await;
    let response = reqwest::get(format!("{base}/api/v1/search/1000001"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error, "Validation error");
}

#[tokio::test]
async fn test_root() {
    let base = start_server().await;
    let response = reqwest::get(&base).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Quick Index API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health() {
    let base = start_server().await;
    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_listener() {
    let metrics = Metrics::default();
    let mut registry = Registry::default();
    metrics.register(&mut registry);
    metrics.searches.inc();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            telemetry::metrics_router(Arc::new(registry)).into_make_service(),
        )
        .await
        .unwrap();
    });

    let response = reqwest::get(format!("http://{addr}/metrics")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("searches_total 1"));
    assert!(body.contains("misses_total 0"));
}
