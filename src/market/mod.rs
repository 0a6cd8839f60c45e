//! Market context.
//!
//! Turns category + region (+ optional aggregate listing data) into trend,
//! supply/demand and seasonal signals. Signals derived from at least three
//! aggregated regional records are flagged `database`; everything else comes
//! from the fixed heuristic tables and is flagged `estimated`.

pub mod engine;
pub mod regions;
pub mod types;

pub use engine::{synthesize, MarketContextEngine};
pub use regions::{detect_region, is_premium_region, CITY_REGIONS, PREMIUM_REGIONS};
pub use types::{
    AggregateListing, DataSource, DemandLevel, ListingAggregateSource, MarketContext,
    RegionalPriceStats, SeasonalImpact, SeasonalInfo, SupplyDemand, TrendDirection, TrendInfo,
};
