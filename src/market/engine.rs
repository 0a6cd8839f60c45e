//! Market context synthesis.
//!
//! Combines region detection, aggregate listing data (when available) and
//! static heuristic tables into trend, supply/demand and seasonal signals.
//! The decision point is fixed: at least three active records for the
//! detected region switch the context to `data_source=database`; everything
//! below that falls back to the `(category, premium region)` heuristic table
//! and is flagged `estimated` — never an error.

use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;
use tracing::warn;

use super::regions::{detect_region, is_premium_region};
use super::types::*;
use crate::extraction::AssetCategory;

/// Minimum regional records required for database-derived signals.
const MIN_DATABASE_RECORDS: usize = 3;

/// Dead band around zero within which a trend counts as stable (%).
const STABLE_BAND_PERCENT: f64 = 2.0;

/// Market context engine.
///
/// Holds only an optional aggregate source; all computation is a pure
/// function of the inputs and the clock.
pub struct MarketContextEngine {
    source: Option<Arc<dyn ListingAggregateSource>>,
}

impl MarketContextEngine {
    /// Create an engine without aggregate data (heuristics only).
    pub fn new() -> Self {
        Self { source: None }
    }

    /// Create an engine backed by an aggregate listing source.
    pub fn with_source(source: Arc<dyn ListingAggregateSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Synthesize market context for a category and optional location.
    ///
    /// The aggregate source is queried with a single attempt; failures
    /// degrade silently to the heuristic tables.
    pub async fn context(&self, category: AssetCategory, location: Option<&str>) -> MarketContext {
        let rows = match &self.source {
            Some(source) => match source.active_listings(category).await {
                Ok(rows) => Some(rows),
                Err(e) => {
                    warn!(
                        category = %category,
                        error = %e,
                        "Aggregate listing query failed, using heuristic market context"
                    );
                    None
                }
            },
            None => None,
        };

        synthesize(category, location, rows.as_deref(), Utc::now())
    }
}

impl Default for MarketContextEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Pure Synthesis
// ============================================================================

/// Pure context synthesis from explicit inputs. `rows` is `None` when no
/// aggregate source was available (as opposed to an empty result).
pub fn synthesize(
    category: AssetCategory,
    location: Option<&str>,
    rows: Option<&[AggregateListing]>,
    now: DateTime<Utc>,
) -> MarketContext {
    let region = location.and_then(detect_region);
    let premium = region.map(is_premium_region).unwrap_or(false);

    // Rows belonging to the detected region, resolved with the same
    // dictionary scan as the request location.
    let regional: Vec<&AggregateListing> = match (rows, region) {
        (Some(rows), Some(region)) => rows
            .iter()
            .filter(|row| detect_region(&row.location) == Some(region))
            .collect(),
        _ => Vec::new(),
    };

    let active_listings = rows.map(|_| regional.len());

    let (trend, price_stats) = if regional.len() >= MIN_DATABASE_RECORDS {
        let trend = database_trend(&regional);
        let stats = price_statistics(&regional);
        (trend, Some(stats))
    } else {
        (estimated_trend(category, premium), None)
    };

    let supply_demand = supply_demand(category, premium, regional.len(), active_listings);
    let seasonal = Some(seasonal_info(category, now.month()));

    MarketContext {
        region: region.map(str::to_string),
        trend,
        supply_demand,
        seasonal,
        price_stats,
    }
}

/// Trend over aggregated rows: mean price of the newer half measured against
/// the older half, split by `created_at`.
fn database_trend(regional: &[&AggregateListing]) -> TrendInfo {
    let mut sorted: Vec<&AggregateListing> = regional.to_vec();
    sorted.sort_by_key(|row| row.created_at);

    let mid = sorted.len() / 2;
    let older_avg = mean(sorted[..mid].iter().map(|r| r.price));
    let newer_avg = mean(sorted[mid..].iter().map(|r| r.price));

    let percentage = if older_avg > 0.0 {
        (newer_avg - older_avg) / older_avg * 100.0
    } else {
        0.0
    };

    let direction = if percentage > STABLE_BAND_PERCENT {
        TrendDirection::Rising
    } else if percentage < -STABLE_BAND_PERCENT {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    };

    TrendInfo {
        direction,
        percentage: (percentage * 10.0).round() / 10.0,
        period: "90d".to_string(),
        description: format!(
            "Preisniveau {} auf Basis von {} aktiven Inseraten in der Region",
            direction,
            sorted.len()
        ),
        data_source: DataSource::Database,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    collected.iter().sum::<f64>() / collected.len() as f64
}

/// Fixed heuristic trend table, keyed by `(category, premium region)`.
fn estimated_trend(category: AssetCategory, premium: bool) -> TrendInfo {
    let (direction, percentage, description) = match (category, premium) {
        (AssetCategory::RealEstate, true) => (
            TrendDirection::Rising,
            4.8,
            "Anhaltend hohe Nachfrage in den Premiumlagen",
        ),
        (AssetCategory::RealEstate, false) => (
            TrendDirection::Rising,
            2.1,
            "Moderat steigende Preise außerhalb der Metropolregionen",
        ),
        (AssetCategory::Watch, true) => (
            TrendDirection::Rising,
            6.5,
            "Starke Nachfrage auf dem Sekundärmarkt für Luxusuhren",
        ),
        (AssetCategory::Watch, false) => (
            TrendDirection::Stable,
            1.5,
            "Stabiler Sekundärmarkt für Markenuhren",
        ),
        (AssetCategory::Vehicle, true) => (
            TrendDirection::Stable,
            0.8,
            "Gebrauchtwagenpreise in den Ballungsräumen weitgehend stabil",
        ),
        (AssetCategory::Vehicle, false) => (
            TrendDirection::Falling,
            -1.9,
            "Leicht nachgebende Gebrauchtwagenpreise",
        ),
    };

    TrendInfo {
        direction,
        percentage,
        period: "12m".to_string(),
        description: description.to_string(),
        data_source: DataSource::Estimated,
    }
}

/// Supply/demand classification.
///
/// Real estate: premium regions are high demand outright; otherwise the
/// active listing count decides (<5 high, <15 medium, else low). Other
/// categories: <10 high, else medium.
fn supply_demand(
    category: AssetCategory,
    premium: bool,
    count: usize,
    active_listings: Option<usize>,
) -> SupplyDemand {
    let status = match category {
        AssetCategory::RealEstate => {
            if premium {
                DemandLevel::High
            } else if count < 5 {
                DemandLevel::High
            } else if count < 15 {
                DemandLevel::Medium
            } else {
                DemandLevel::Low
            }
        }
        _ => {
            if count < 10 {
                DemandLevel::High
            } else {
                DemandLevel::Medium
            }
        }
    };

    let description = match status {
        DemandLevel::High => "Wenige vergleichbare Angebote, Nachfrage übersteigt das Angebot",
        DemandLevel::Medium => "Angebot und Nachfrage halten sich die Waage",
        DemandLevel::Low => "Breites Angebot, Käufer haben Verhandlungsspielraum",
    };

    SupplyDemand {
        status,
        label: status.label().to_string(),
        description: description.to_string(),
        active_listings,
    }
}

/// Fixed quarter-of-year seasonal mapping, distinct per category.
fn seasonal_info(category: AssetCategory, month: u32) -> SeasonalInfo {
    let quarter = (month - 1) / 3 + 1;

    let (impact, description) = match category {
        AssetCategory::RealEstate => match quarter {
            2 | 3 => (
                SeasonalImpact::Positive,
                "Frühjahr und Sommer sind Hauptsaison für Immobilienkäufe",
            ),
            _ => (
                SeasonalImpact::Neutral,
                "Saisonal durchschnittliche Nachfrage am Immobilienmarkt",
            ),
        },
        AssetCategory::Watch => match quarter {
            4 => (
                SeasonalImpact::Positive,
                "Das Weihnachtsgeschäft belebt die Nachfrage nach Luxusuhren",
            ),
            1 => (
                SeasonalImpact::Negative,
                "Nachfragedelle nach dem Jahreswechsel",
            ),
            _ => (
                SeasonalImpact::Neutral,
                "Saisonal durchschnittliche Nachfrage am Uhrenmarkt",
            ),
        },
        AssetCategory::Vehicle => match quarter {
            2 | 4 => (
                SeasonalImpact::Positive,
                "Frühjahrs- und Herbstsaison beleben den Fahrzeugmarkt",
            ),
            _ => (
                SeasonalImpact::Neutral,
                "Saisonal durchschnittliche Nachfrage am Fahrzeugmarkt",
            ),
        },
    };

    SeasonalInfo {
        current_month: month,
        impact,
        description: description.to_string(),
    }
}

/// Price statistics over the regional rows.
fn price_statistics(regional: &[&AggregateListing]) -> RegionalPriceStats {
    let prices: Vec<f64> = regional.iter().map(|r| r.price).collect();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = prices.iter().sum::<f64>() / prices.len() as f64;

    RegionalPriceStats {
        min,
        max,
        avg,
        sample_size: prices.len(),
    }
}

// ============================================================================
// Tests
// ============================================================================
