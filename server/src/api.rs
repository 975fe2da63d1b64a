//! HTTP routes, payloads, and the mapping from engine outcomes to
//! transport-level results.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus_client::{metrics::counter::Counter, registry::Registry};
use quickindex_engine::{Engine, Outcome};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{atomic::AtomicU64, Arc};
use thiserror::Error as ThisError;
use tracing::info;

/// Largest value accepted by the search endpoint.
pub const MAX_QUERY: i64 = 1_000_000;

/// Returns the version of the crate.
pub const fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Counters tracking how queries resolve.
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    /// Queries that passed validation and reached the engine.
    pub searches: Counter<u64, AtomicU64>,
    /// Queries resolved by the exact phase.
    pub exact: Counter<u64, AtomicU64>,
    /// Queries resolved by the approximate phase.
    pub approximate: Counter<u64, AtomicU64>,
    /// Queries with no suitable match.
    pub misses: Counter<u64, AtomicU64>,
    /// Queries rejected by validation.
    pub rejected: Counter<u64, AtomicU64>,
}

impl Metrics {
    /// Registers all counters against the provided registry.
    pub fn register(&self, registry: &mut Registry) {
        registry.register("searches", "Queries reaching the engine", self.searches.clone());
        registry.register(
            "exact_matches",
            "Queries resolved by the exact phase",
            self.exact.clone(),
        );
        registry.register(
            "approximate_matches",
            "Queries resolved by the approximate phase",
            self.approximate.clone(),
        );
        registry.register("misses", "Queries with no suitable match", self.misses.clone());
        registry.register(
            "rejected",
            "Queries rejected by validation",
            self.rejected.clone(),
        );
    }
}

/// Shared state handed to every request handler.
///
/// Constructed once at startup and passed in by reference; nothing here
/// is mutable after construction, so handlers share it without locking.
pub struct AppState {
    engine: Engine,
    metrics: Metrics,
}

impl AppState {
    /// Creates state over a loaded engine.
    pub const fn new(engine: Engine, metrics: Metrics) -> Self {
        Self { engine, metrics }
    }
}

/// A successful search result.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SearchResponse {
    pub value: i64,
    pub index: usize,
    pub message: String,
}

/// An error payload returned to the caller.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Failures surfaced by the HTTP boundary.
#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum ApiError {
    /// The query failed validation and never reached the engine.
    #[error("value must be an integer between 0 and 1000000, got {0:?}")]
    Validation(String),

    /// The engine found no exact or tolerance-bounded match. An expected
    /// negative outcome, not a fault.
    #[error("No suitable match found for value {0}")]
    NotFound(i64),

    /// An unanticipated failure; detail stays in the server logs.
    #[error("An unexpected error occurred")]
    Internal,
}

impl ApiError {
    /// The transport status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error tag carried in the payload.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation error",
            Self::NotFound(_) => "Value not found",
            Self::Internal => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.tag().to_string(),
            message: self.to_string(),
        };
        (self.status(), Json(payload)).into_response()
    }
}

/// Builds the service router over the provided state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/search/{value}", get(search))
        .with_state(state)
}

/// Service identity.
async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Quick Index API",
        "version": crate_version(),
    }))
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// Resolves a search request.
async fn search(
    State(state): State<Arc<AppState>>,
    Path(value): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    info!(%value, "received search request");
    let target = match parse_target(&value) {
        Ok(target) => target,
        Err(e) => {
            state.metrics.rejected.inc();
            return Err(e);
        }
    };
    state.metrics.searches.inc();
    match state.engine.search(target) {
        Outcome::Exact { value, index } => {
            state.metrics.exact.inc();
            Ok(Json(SearchResponse {
                value,
                index,
                message: "Exact match found".to_string(),
            }))
        }
        Outcome::Approximate { value, index } => {
            state.metrics.approximate.inc();
            Ok(Json(SearchResponse {
                value,
                index,
                message: format!(
                    "Approximate match within {}% tolerance",
                    state.engine.tolerance_percent()
                ),
            }))
        }
        Outcome::NoMatch => {
            state.metrics.misses.inc();
            Err(ApiError::NotFound(target))
        }
    }
}

/// Parses and bounds-checks a raw path value before it reaches the
/// engine.
fn parse_target(raw: &str) -> Result<i64, ApiError> {
    let value: i64 = raw
        .parse()
        .map_err(|_| ApiError::Validation(raw.to_string()))?;
    if !(0..=MAX_QUERY).contains(&value) {
        return Err(ApiError::Validation(raw.to_string()));
    }
    Ok(value)
}
