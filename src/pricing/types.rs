//! Valuation result types.

use serde::{Deserialize, Serialize};

/// Currency for all estimates produced by this engine.
pub const CURRENCY: &str = "EUR";

/// A priced estimate with range and confidence.
///
/// Invariants, enforced at construction: `low <= point_estimate <= high`
/// and `confidence` in `[0, 1]`. Created once per request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Point estimate in whole euros
    pub point_estimate: i64,
    /// Lower bound of the estimate range
    pub low: i64,
    /// Upper bound of the estimate range
    pub high: i64,
    /// Fixed per-tier reliability constant (not a statistical measure)
    pub confidence: f64,
    /// Always "EUR"
    pub currency: String,
}

impl ValuationResult {
    /// Build a result from a point estimate and range factors, clamping the
    /// confidence into `[0, 1]`.
    pub fn from_point(point: f64, low_factor: f64, high_factor: f64, confidence: f64) -> Self {
        // Bounds derive from the rounded point, not the raw input, so a
        // fractional point cannot shift them by a euro.
        let point_estimate = point.round() as i64;
        let low = (point_estimate as f64 * low_factor).round() as i64;
        let high = (point_estimate as f64 * high_factor).round() as i64;

        Self {
            point_estimate,
            low: low.min(point_estimate),
            high: high.max(point_estimate),
            confidence: confidence.clamp(0.0, 1.0),
            currency: CURRENCY.to_string(),
        }
    }
}
