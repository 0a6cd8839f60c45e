//! Comparable selection and price distribution statistics.

use std::sync::Arc;
use tracing::warn;

use super::pool::ComparableSource;
use super::types::{ComparableAsset, PriceBand, PriceDistribution};
use crate::extraction::AssetCategory;

/// Default number of comparables returned to callers.
pub const DEFAULT_LIMIT: usize = 5;

/// Number of top comparables feeding the price distribution.
const DISTRIBUTION_POOL_SIZE: usize = 20;

/// Ranks and samples comparable assets from a pool source.
pub struct ComparablesSelector {
    source: Arc<dyn ComparableSource>,
}

impl ComparablesSelector {
    pub fn new(source: Arc<dyn ComparableSource>) -> Self {
        Self { source }
    }

    /// Top comparables for a category, best similarity first.
    ///
    /// A failing or empty pool yields an empty list, never an error.
    pub async fn select(&self, category: AssetCategory, limit: usize) -> Vec<ComparableAsset> {
        let pool = self.candidates(category).await;
        rank(pool, limit)
    }

    /// Price distribution over the top comparables merged with the caller's
    /// own estimate.
    pub async fn distribution(&self, category: AssetCategory, estimate: f64) -> PriceDistribution {
        let pool = self.candidates(category).await;
        let top = rank(pool, DISTRIBUTION_POOL_SIZE);
        let prices: Vec<f64> = top.iter().map(|c| c.price).collect();
        compute_distribution(&prices, estimate)
    }

    async fn candidates(&self, category: AssetCategory) -> Vec<ComparableAsset> {
        match self.source.candidates(category).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!(
                    category = %category,
                    error = %e,
                    "Comparable pool unavailable, returning empty set"
                );
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Pure Ranking and Statistics
// ============================================================================

/// Sort descending by similarity score and truncate. The sort is stable,
/// so ties retain pool order.
pub fn rank(mut pool: Vec<ComparableAsset>, limit: usize) -> Vec<ComparableAsset> {
    pool.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pool.truncate(limit);
    pool
}

/// Merge comparable prices with the estimate and compute the distribution.
///
/// The merged array always contains at least the estimate itself, so every
/// statistic is defined even for an empty pool (percentile is then 0).
pub fn compute_distribution(comparable_prices: &[f64], estimate: f64) -> PriceDistribution {
    let mut merged: Vec<f64> = comparable_prices.to_vec();
    merged.push(estimate);
    merged.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = merged.len();
    let min = merged[0];
    let max = merged[n - 1];
    let avg = merged.iter().sum::<f64>() / n as f64;
    let median = merged[n / 2];

    // First matching index when duplicate values exist
    let index = merged
        .iter()
        .position(|&p| p == estimate)
        .unwrap_or(0);
    let percentile_of_estimate = ((index as f64 / n as f64) * 100.0).round() as u32;

    PriceDistribution {
        min,
        max,
        avg,
        median,
        percentile_of_estimate,
        band: PriceBand {
            low: avg * 0.85,
            mid: avg,
            high: avg * 1.15,
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
