//! Resolve integer queries against a static, pre-sorted dataset.
//!
//! The engine is split into two pieces: a [Dataset] loader that reads a
//! newline-delimited list of integers into memory, and an [Engine] that
//! resolves queries against it in two phases (an exact binary search,
//! then a tolerance-bounded linear scan). The dataset is immutable after
//! load, so any number of concurrent queries can share it without
//! coordination.

mod dataset;
pub use dataset::{Dataset, Error, Policy};
mod search;
pub use search::{Engine, Outcome, DEFAULT_TOLERANCE_PERCENT};
