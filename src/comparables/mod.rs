//! Comparable assets.
//!
//! Ranks reference assets by precomputed similarity and benchmarks the
//! caller's estimate against their price distribution.

pub mod pool;
pub mod selector;
pub mod types;

pub use pool::{ComparableSource, StaticComparablePool};
pub use selector::{compute_distribution, rank, ComparablesSelector, DEFAULT_LIMIT};
pub use types::{ComparableAsset, PriceBand, PriceDistribution};
