//! Market context types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extraction::AssetCategory;

// ============================================================================
// Data Source
// ============================================================================

/// Whether a signal was derived from aggregated real records or from the
/// static heuristic tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Derived from >= 3 aggregated regional records
    Database,
    /// Static heuristic fallback
    Estimated,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Estimated => write!(f, "estimated"),
        }
    }
}

// ============================================================================
// Trend
// ============================================================================

/// Price trend direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rising => write!(f, "steigend"),
            Self::Falling => write!(f, "fallend"),
            Self::Stable => write!(f, "stabil"),
        }
    }
}

/// Regional price trend signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendInfo {
    pub direction: TrendDirection,
    /// Signed change over the period (%)
    pub percentage: f64,
    /// Period the percentage refers to (e.g. "90d", "12m")
    pub period: String,
    pub description: String,
    pub data_source: DataSource,
}

// ============================================================================
// Supply / Demand
// ============================================================================

/// Demand pressure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
    High,
    Medium,
    Low,
}

impl DemandLevel {
    /// Display label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "Hohe Nachfrage",
            Self::Medium => "Ausgeglichener Markt",
            Self::Low => "Käufermarkt",
        }
    }
}

/// Supply/demand signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyDemand {
    pub status: DemandLevel,
    pub label: String,
    pub description: String,
    /// Active listing count in the detected region, when aggregate data
    /// was available
    pub active_listings: Option<usize>,
}

// ============================================================================
// Seasonal
// ============================================================================

/// Seasonal demand impact for the current quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalImpact {
    Positive,
    Neutral,
    Negative,
}

/// Seasonal signal for the current month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalInfo {
    /// Month of year (1-12)
    pub current_month: u32,
    pub impact: SeasonalImpact,
    pub description: String,
}

// ============================================================================
// Regional Price Statistics
// ============================================================================

/// Price statistics over the aggregated regional records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalPriceStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sample_size: usize,
}

// ============================================================================
// Market Context
// ============================================================================

/// Synthesized market context for a category and region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Detected region, when the location matched the dictionary
    pub region: Option<String>,
    pub trend: TrendInfo,
    pub supply_demand: SupplyDemand,
    pub seasonal: Option<SeasonalInfo>,
    /// Present only when derived from aggregate data
    pub price_stats: Option<RegionalPriceStats>,
}

// ============================================================================
// Aggregate Input Rows
// ============================================================================

/// One row from the external aggregate asset query
/// (`{category, status="active"}` → `{price, location, created_at}[]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateListing {
    pub price: f64,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Read-only source of active listing rows, supplied by the caller.
///
/// Queried once per request; any error degrades silently to the heuristic
/// tables (the context is then flagged `estimated`).
#[async_trait::async_trait]
pub trait ListingAggregateSource: Send + Sync {
    async fn active_listings(
        &self,
        category: AssetCategory,
    ) -> anyhow::Result<Vec<AggregateListing>>;
}
