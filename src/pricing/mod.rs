//! Pricing heuristics.
//!
//! Turns a partial attribute map into a priced estimate with range and
//! confidence. Pure computation; no I/O, no randomness.

pub mod calculator;
pub mod types;

pub use calculator::{PricingConfig, RealEstatePricing, ValuationCalculator, VehiclePricing, WatchPricing};
pub use types::{ValuationResult, CURRENCY};
