//! Comparable asset and price distribution types.

use serde::{Deserialize, Serialize};

use crate::extraction::{AssetCategory, AttributeMap};

/// A reference asset used to benchmark an estimate.
///
/// Drawn from a static or queried pool; read-only for this engine. The
/// similarity score is precomputed upstream (0-100) and only used for
/// ranking here, never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableAsset {
    pub id: String,
    pub category: AssetCategory,
    pub title: String,
    /// Asking or sale price in euros
    pub price: f64,
    pub attributes: AttributeMap,
    /// Precomputed similarity ranking (0-100)
    pub similarity_score: f64,
}

/// Price band derived from the comparable average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

/// Price distribution over the merged comparable prices and the caller's
/// own estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDistribution {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Value at `floor(n/2)` of the ascending merged array
    pub median: f64,
    /// Position of the estimate within the merged array (0-100)
    pub percentile_of_estimate: u32,
    pub band: PriceBand,
}
