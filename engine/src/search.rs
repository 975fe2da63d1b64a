//! Two-phase lookup over a loaded dataset.

use crate::Dataset;
use tracing::{debug, info, warn};

/// Default percentage of the target a candidate may deviate by and still
/// count as an approximate match.
pub const DEFAULT_TOLERANCE_PERCENT: f64 = 10.0;

/// The result of resolving a query against a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The target itself is present in the dataset.
    Exact { value: i64, index: usize },
    /// The target is absent but a value within tolerance of it is present.
    Approximate { value: i64, index: usize },
    /// Neither phase produced a candidate.
    NoMatch,
}

/// Resolves integer queries against an ascending [Dataset].
///
/// Queries run in two ordered phases, first success wins: a binary
/// search for the target itself, then a linear scan for the closest
/// value within a percentage-of-target tolerance. Each query is a pure
/// computation over the immutable dataset, so an engine can be shared
/// across any number of concurrent callers.
#[derive(Clone, Debug)]
pub struct Engine {
    dataset: Dataset,
    tolerance_percent: f64,
}

impl Engine {
    /// Creates an engine with the default tolerance.
    pub fn new(dataset: Dataset) -> Self {
        Self::with_tolerance(dataset, DEFAULT_TOLERANCE_PERCENT)
    }

    /// Creates an engine with the provided tolerance percentage.
    pub fn with_tolerance(dataset: Dataset, tolerance_percent: f64) -> Self {
        Self {
            dataset,
            tolerance_percent,
        }
    }

    /// Returns the tolerance percentage applied by the approximate phase.
    pub const fn tolerance_percent(&self) -> f64 {
        self.tolerance_percent
    }

    /// Returns the dataset this engine resolves queries against.
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Resolves `target` against the dataset.
    ///
    /// An empty dataset always yields [Outcome::NoMatch]: the exact
    /// phase starts exhausted and the approximate phase scans nothing.
    pub fn search(&self, target: i64) -> Outcome {
        debug!(target, "searching");
        if let Some(index) = self.exact(target) {
            info!(target, index, "exact match");
            return Outcome::Exact {
                value: target,
                index,
            };
        }
        if let Some(index) = self.closest(target) {
            let value = self.dataset[index];
            info!(target, value, index, "approximate match");
            return Outcome::Approximate { value, index };
        }
        warn!(target, "no match");
        Outcome::NoMatch
    }

    /// Binary search for the target itself.
    ///
    /// Requires the dataset be ascending-sorted; the result is
    /// unspecified otherwise.
    fn exact(&self, target: i64) -> Option<usize> {
        self.dataset.as_ref().binary_search(&target).ok()
    }

    /// Linear scan for the closest value within tolerance of the target.
    ///
    /// The tolerance bound is computed from the target, not from each
    /// candidate, and keeps the target's sign: a negative target yields
    /// a negative bound that no absolute difference can satisfy. Only a
    /// strictly smaller difference replaces the current best, so the
    /// first index achieving the minimum difference wins.
    fn closest(&self, target: i64) -> Option<usize> {
        let tolerance = target as f64 * (self.tolerance_percent / 100.0);
        let mut best: Option<(i64, usize)> = None;
        for (index, &value) in self.dataset.as_ref().iter().enumerate() {
            let diff = (value - target).abs();
            if diff as f64 <= tolerance && best.is_none_or(|(min, _)| diff < min) {
                best = Some((diff, index));
            }
        }
        best.map(|(_, index)| index)
    }
}
