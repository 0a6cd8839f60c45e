//! Valuation engine orchestration.
//!
//! Wires the pipeline per request: validate → extract attributes → price →
//! market context, comparables and distribution in parallel → assemble.
//! Every entity is created fresh per request and discarded with the
//! response; the engine itself only holds configuration and clients built
//! once at startup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::common::error::{Error, Result};
use crate::common::Config;
use crate::comparables::{
    ComparableAsset, ComparableSource, ComparablesSelector, PriceDistribution,
    StaticComparablePool, DEFAULT_LIMIT,
};
use crate::extraction::{AssetCategory, AttributeExtractor, AttributeMap};
use crate::market::{ListingAggregateSource, MarketContext, MarketContextEngine};
use crate::pricing::{ValuationCalculator, ValuationResult};
use crate::report;

/// A single valuation request.
#[derive(Debug, Clone, Deserialize)]
pub struct AppraisalRequest {
    pub category: AssetCategory,
    /// Free-text or partially structured asset description
    pub description: String,
    /// Optional location; when absent, the description text is used for
    /// region detection
    #[serde(default)]
    pub location: Option<String>,
}

/// The assembled result of one valuation request.
#[derive(Debug, Clone, Serialize)]
pub struct Appraisal {
    pub id: Uuid,
    pub category: AssetCategory,
    pub attributes: AttributeMap,
    pub valuation: ValuationResult,
    pub market: MarketContext,
    pub comparables: Vec<ComparableAsset>,
    pub distribution: PriceDistribution,
    pub generated_at: DateTime<Utc>,
}

/// The asset valuation and market-context engine.
pub struct ValuationEngine {
    extractor: AttributeExtractor,
    calculator: ValuationCalculator,
    market: MarketContextEngine,
    comparables: ComparablesSelector,
}

impl ValuationEngine {
    /// Create an engine from configuration with the built-in comparable
    /// pool and no aggregate market data.
    pub fn new(config: &Config) -> Self {
        Self::with_sources(config, None, Arc::new(StaticComparablePool::new()))
    }

    /// Create an engine with explicit external collaborators.
    pub fn with_sources(
        config: &Config,
        aggregate: Option<Arc<dyn ListingAggregateSource>>,
        pool: Arc<dyn ComparableSource>,
    ) -> Self {
        let market = match aggregate {
            Some(source) => MarketContextEngine::with_source(source),
            None => MarketContextEngine::new(),
        };

        Self {
            extractor: AttributeExtractor::new(config),
            calculator: ValuationCalculator::new(),
            market,
            comparables: ComparablesSelector::new(pool),
        }
    }

    /// Probe the delegated extraction service. `None` when extraction runs
    /// on local rules only.
    pub async fn extraction_health(&self) -> Option<bool> {
        self.extractor.health_check().await
    }

    /// Run the full valuation pipeline for one request.
    ///
    /// The only caller-visible failure is an invalid request; every other
    /// failure mode degrades to a deterministic fallback inside the
    /// individual components.
    pub async fn appraise(&self, request: &AppraisalRequest) -> Result<Appraisal> {
        if request.description.trim().is_empty() {
            return Err(Error::InvalidInput(
                "asset description must not be empty".into(),
            ));
        }

        let attributes = self
            .extractor
            .extract(&request.description, request.category)
            .await;
        debug!(
            category = %request.category,
            field_count = attributes.len(),
            "Attributes extracted"
        );

        let valuation = self.calculator.evaluate(request.category, &attributes)?;

        // Independent downstream computations; no ordering between them.
        let location_text = request
            .location
            .as_deref()
            .unwrap_or(&request.description);
        let (market, comparables, distribution) = tokio::join!(
            self.market.context(request.category, Some(location_text)),
            self.comparables.select(request.category, DEFAULT_LIMIT),
            self.comparables
                .distribution(request.category, valuation.point_estimate as f64),
        );

        Ok(Appraisal {
            id: Uuid::new_v4(),
            category: request.category,
            attributes,
            valuation,
            market,
            comparables,
            distribution,
            generated_at: Utc::now(),
        })
    }

    /// Run the pipeline and render the printable report document.
    pub async fn appraise_report(&self, request: &AppraisalRequest) -> Result<Vec<u8>> {
        let appraisal = self.appraise(request).await?;
        Ok(report::render(
            appraisal.category,
            &appraisal.valuation,
            &appraisal.attributes,
            &appraisal.market,
            &appraisal.comparables,
            &appraisal.distribution,
            appraisal.generated_at,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fields;

    fn engine() -> ValuationEngine {
        ValuationEngine::new(&Config::default())
    }

    #[tokio::test]
    async fn test_appraise_real_estate_end_to_end() {
        let request = AppraisalRequest {
            category: AssetCategory::RealEstate,
            description: "Helle 3-Zimmer Wohnung in München, 120 qm, Balkon".to_string(),
            location: Some("München".to_string()),
        };

        let appraisal = engine().appraise(&request).await.unwrap();

        assert_eq!(appraisal.attributes.number(fields::AREA), Some(120.0));
        // Tier 1 location: 120 * 12500
        assert_eq!(appraisal.valuation.point_estimate, 1_500_000);
        assert_eq!(appraisal.market.region.as_deref(), Some("München"));
        assert!(!appraisal.comparables.is_empty());
        assert!(appraisal.distribution.percentile_of_estimate <= 100);
    }

    #[tokio::test]
    async fn test_appraise_rejects_empty_description() {
        let request = AppraisalRequest {
            category: AssetCategory::Watch,
            description: "   ".to_string(),
            location: None,
        };

        let err = engine().appraise(&request).await.unwrap_err();
        assert!(err.is_caller_visible());
    }

    #[tokio::test]
    async fn test_comparables_limited_and_sorted() {
        let request = AppraisalRequest {
            category: AssetCategory::Vehicle,
            description: "Porsche 911, 2021, 22000 km".to_string(),
            location: None,
        };

        let appraisal = engine().appraise(&request).await.unwrap();

        assert!(appraisal.comparables.len() <= DEFAULT_LIMIT);
        let scores: Vec<f64> = appraisal
            .comparables
            .iter()
            .map(|c| c.similarity_score)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_report_bytes_render() {
        let request = AppraisalRequest {
            category: AssetCategory::Watch,
            description: "Rolex Submariner 2019, Box und Papiere".to_string(),
            location: Some("Hamburg".to_string()),
        };

        let bytes = engine().appraise_report(&request).await.unwrap();
        let doc = String::from_utf8(bytes).unwrap();
        assert!(doc.contains("Uhrenbewertung"));
        assert!(doc.contains("Rolex"));
    }
}
