//! End-to-end integration tests for the valuation pipeline.
//!
//! Drives the full flow: free text → attribute extraction → pricing →
//! market context / comparables / distribution → report assembly, including
//! every degradation path (failing delegate, failing aggregate query,
//! empty comparable pool).

use chrono::{Duration, Utc};
use std::sync::Arc;

use wertwerk::common::Config;
use wertwerk::comparables::{ComparableAsset, ComparableSource, StaticComparablePool};
use wertwerk::engine::{AppraisalRequest, ValuationEngine};
use wertwerk::extraction::{fields, AssetCategory};
use wertwerk::market::{AggregateListing, DataSource, ListingAggregateSource};

// ============================================================================
// Mock Collaborators
// ============================================================================

/// Aggregate source with a fixed set of active listings.
struct FixedAggregateSource {
    rows: Vec<AggregateListing>,
}

#[async_trait::async_trait]
impl ListingAggregateSource for FixedAggregateSource {
    async fn active_listings(
        &self,
        _category: AssetCategory,
    ) -> anyhow::Result<Vec<AggregateListing>> {
        Ok(self.rows.clone())
    }
}

/// Comparable source that always fails.
struct BrokenPool;

#[async_trait::async_trait]
impl ComparableSource for BrokenPool {
    async fn candidates(
        &self,
        _category: AssetCategory,
    ) -> anyhow::Result<Vec<ComparableAsset>> {
        anyhow::bail!("inventory service unreachable")
    }
}

fn munich_listings(count: usize) -> Vec<AggregateListing> {
    (0..count)
        .map(|i| AggregateListing {
            price: 1_000_000.0 + (i as f64) * 50_000.0,
            location: "München Schwabing".to_string(),
            created_at: Utc::now() - Duration::days((count - i) as i64),
        })
        .collect()
}

// ============================================================================
// Full Pipeline
// ============================================================================

#[tokio::test]
async fn test_full_pipeline_with_database_market_context() {
    let engine = ValuationEngine::with_sources(
        &Config::default(),
        Some(Arc::new(FixedAggregateSource {
            rows: munich_listings(6),
        })),
        Arc::new(StaticComparablePool::new()),
    );

    let request = AppraisalRequest {
        category: AssetCategory::RealEstate,
        description: "Penthouse in München, 120 qm, Dachterrasse, Baujahr 2019".to_string(),
        location: Some("München".to_string()),
    };

    let appraisal = engine.appraise(&request).await.unwrap();

    // Extraction
    assert_eq!(appraisal.attributes.number(fields::AREA), Some(120.0));
    assert_eq!(appraisal.attributes.number(fields::LOCATION_TIER), Some(1.0));
    assert_eq!(appraisal.attributes.flag(fields::HAS_BALCONY), Some(true));

    // Pricing: tier 1, 120 m²
    assert_eq!(appraisal.valuation.point_estimate, 1_500_000);
    assert_eq!(appraisal.valuation.low, 1_320_000);
    assert_eq!(appraisal.valuation.high, 1_680_000);
    assert_eq!(appraisal.valuation.confidence, 0.78);

    // Market context: six regional records flip to database mode
    assert_eq!(appraisal.market.trend.data_source, DataSource::Database);
    assert_eq!(appraisal.market.supply_demand.active_listings, Some(6));
    let stats = appraisal.market.price_stats.as_ref().unwrap();
    assert_eq!(stats.sample_size, 6);

    // Comparables and distribution
    assert!(!appraisal.comparables.is_empty());
    assert!(appraisal.distribution.percentile_of_estimate <= 100);
}

#[tokio::test]
async fn test_rendered_report_covers_all_sections() {
    let engine = ValuationEngine::new(&Config::default());

    let request = AppraisalRequest {
        category: AssetCategory::Vehicle,
        description: "Porsche 911 Carrera, 2021, 22000 km, unfallfrei".to_string(),
        location: Some("Stuttgart".to_string()),
    };

    let bytes = engine.appraise_report(&request).await.unwrap();
    let doc = String::from_utf8(bytes).unwrap();

    assert!(doc.contains("WERTWERK"));
    assert!(doc.contains("Fahrzeugbewertung"));
    assert!(doc.contains("Objektmerkmale"));
    assert!(doc.contains("Marktumfeld"));
    assert!(doc.contains("Vergleichsobjekte"));
    assert!(doc.contains("Methodik"));
    assert!(doc.contains("Alle Angaben ohne Gewähr"));
}

// ============================================================================
// Degradation Paths
// ============================================================================

#[tokio::test]
async fn test_failing_delegate_still_extracts_keywords() {
    // Delegated extraction is configured but unreachable; the request must
    // still succeed on the local rule tables — no error surfaces.
    let mut config = Config::default();
    config.extraction.enabled = true;
    config.extraction.endpoint = "http://127.0.0.1:9/extract".to_string();
    config.extraction.timeout_secs = 1;

    let engine = ValuationEngine::new(&config);
    let request = AppraisalRequest {
        category: AssetCategory::Watch,
        description: "Rolex Daytona 2019, Box und Papiere".to_string(),
        location: None,
    };

    let appraisal = engine.appraise(&request).await.unwrap();
    assert_eq!(appraisal.attributes.text(fields::BRAND), Some("Rolex"));
    assert!(!appraisal.attributes.is_empty());
    // Tier 1 brand price
    assert_eq!(appraisal.valuation.point_estimate, 18_000);
}

#[tokio::test]
async fn test_broken_comparable_pool_degrades_to_empty() {
    let engine = ValuationEngine::with_sources(&Config::default(), None, Arc::new(BrokenPool));

    let request = AppraisalRequest {
        category: AssetCategory::Watch,
        description: "Omega Speedmaster 2021".to_string(),
        location: None,
    };

    let appraisal = engine.appraise(&request).await.unwrap();

    // Empty comparable set is not an error; the distribution collapses to
    // the single-element array around the estimate.
    assert!(appraisal.comparables.is_empty());
    assert_eq!(appraisal.distribution.percentile_of_estimate, 0);
    assert_eq!(
        appraisal.distribution.min,
        appraisal.valuation.point_estimate as f64
    );
}

#[tokio::test]
async fn test_too_few_regional_rows_flags_estimated() {
    let engine = ValuationEngine::with_sources(
        &Config::default(),
        Some(Arc::new(FixedAggregateSource {
            rows: munich_listings(2),
        })),
        Arc::new(StaticComparablePool::new()),
    );

    let request = AppraisalRequest {
        category: AssetCategory::RealEstate,
        description: "Wohnung in München, 80 qm".to_string(),
        location: Some("München".to_string()),
    };

    let appraisal = engine.appraise(&request).await.unwrap();
    assert_eq!(appraisal.market.trend.data_source, DataSource::Estimated);
    assert!(appraisal.market.price_stats.is_none());
}

#[tokio::test]
async fn test_invalid_request_is_the_only_visible_error() {
    let engine = ValuationEngine::new(&Config::default());

    // Real estate description with no extractable area
    let request = AppraisalRequest {
        category: AssetCategory::RealEstate,
        description: "Schönes Objekt in guter Lage".to_string(),
        location: None,
    };

    let err = engine.appraise(&request).await.unwrap_err();
    assert!(err.is_caller_visible());
}

// ============================================================================
// Serialization Shape
// ============================================================================

#[tokio::test]
async fn test_appraisal_serializes_for_callers() {
    let engine = ValuationEngine::new(&Config::default());

    let request = AppraisalRequest {
        category: AssetCategory::Watch,
        description: "Rolex Submariner 2020".to_string(),
        location: Some("Hamburg".to_string()),
    };

    let appraisal = engine.appraise(&request).await.unwrap();
    let json = serde_json::to_value(&appraisal).unwrap();

    // The request id serializes as a hyphenated UUID string
    let id = json["id"].as_str().unwrap();
    assert_eq!(id.len(), 36);
    assert_eq!(id.matches('-').count(), 4);

    assert_eq!(json["category"], "watch");
    assert_eq!(json["valuation"]["currency"], "EUR");
    assert_eq!(json["attributes"]["brand"], "Rolex");
    assert!(json["market"]["trend"]["data_source"].is_string());
    assert!(json["distribution"]["band"]["mid"].is_number());
}
