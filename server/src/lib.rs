//! HTTP service answering nearest-value lookups against a static,
//! sorted, in-memory dataset.
//!
//! The algorithmic core lives in [quickindex_engine]; this crate is the
//! boundary around it: YAML/environment configuration ([config]), axum
//! routing and request validation ([api]), and logging plus a metrics
//! endpoint ([telemetry]). The dataset is loaded once at startup and the
//! process refuses to serve if loading fails.

pub mod api;
pub mod config;
pub mod telemetry;
