//! Valuation calculator.
//!
//! Pure, deterministic pricing per category: same attributes in, same
//! estimate out. All constants live in [`PricingConfig`]; the defaults are
//! the contract the integration tests pin down.

use chrono::{Datelike, Utc};

use super::types::ValuationResult;
use crate::common::error::{Error, Result};
use crate::extraction::{fields, AssetCategory, AttributeMap};

// ============================================================================
// Pricing Configuration
// ============================================================================

/// Real estate pricing constants (€/m² by location tier).
#[derive(Debug, Clone)]
pub struct RealEstatePricing {
    pub base_per_sqm_tier1: f64,
    pub base_per_sqm_tier2: f64,
    pub base_per_sqm_tier3: f64,
    pub low_factor: f64,
    pub high_factor: f64,
    pub confidence_tier1: f64,
    pub confidence_other: f64,
}

impl Default for RealEstatePricing {
    fn default() -> Self {
        Self {
            base_per_sqm_tier1: 12_500.0,
            base_per_sqm_tier2: 8_500.0,
            base_per_sqm_tier3: 6_000.0,
            low_factor: 0.88,
            high_factor: 1.12,
            confidence_tier1: 0.78,
            confidence_other: 0.72,
        }
    }
}

/// Watch pricing constants (point estimate by brand tier).
#[derive(Debug, Clone)]
pub struct WatchPricing {
    pub point_tier1: f64,
    pub point_tier2: f64,
    pub point_tier3: f64,
    pub low_factor: f64,
    pub high_factor: f64,
    pub confidence: f64,
}

impl Default for WatchPricing {
    fn default() -> Self {
        Self {
            point_tier1: 18_000.0,
            point_tier2: 8_500.0,
            point_tier3: 4_200.0,
            low_factor: 0.82,
            high_factor: 1.18,
            confidence: 0.74,
        }
    }
}

/// Vehicle pricing constants (age-decayed base price with mileage discount).
#[derive(Debug, Clone)]
pub struct VehiclePricing {
    pub base_price: f64,
    pub age_decay_per_year: f64,
    pub age_factor_floor: f64,
    pub mileage_threshold: f64,
    pub mileage_factor_above: f64,
    pub mileage_factor_below: f64,
    pub low_factor: f64,
    pub high_factor: f64,
    pub confidence: f64,
}

impl Default for VehiclePricing {
    fn default() -> Self {
        Self {
            base_price: 220_000.0,
            age_decay_per_year: 0.05,
            age_factor_floor: 0.6,
            mileage_threshold: 60_000.0,
            mileage_factor_above: 0.88,
            mileage_factor_below: 0.93,
            low_factor: 0.85,
            high_factor: 1.15,
            confidence: 0.72,
        }
    }
}

/// All pricing constants, per category.
#[derive(Debug, Clone, Default)]
pub struct PricingConfig {
    pub real_estate: RealEstatePricing,
    pub watch: WatchPricing,
    pub vehicle: VehiclePricing,
}

// ============================================================================
// Calculator
// ============================================================================

/// Tiered, decayed pricing heuristics per asset category.
pub struct ValuationCalculator {
    config: PricingConfig,
}

impl ValuationCalculator {
    /// Create a calculator with the default pricing constants.
    pub fn new() -> Self {
        Self {
            config: PricingConfig::default(),
        }
    }

    /// Create with custom pricing constants.
    pub fn with_config(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Evaluate attributes using today's year for vehicle age decay.
    pub fn evaluate(
        &self,
        category: AssetCategory,
        attributes: &AttributeMap,
    ) -> Result<ValuationResult> {
        self.evaluate_at(category, attributes, Utc::now().year())
    }

    /// Evaluate attributes against an explicit reference year.
    ///
    /// The reference year only affects vehicle age decay; it is a parameter
    /// so the calculator stays a pure function of its inputs.
    pub fn evaluate_at(
        &self,
        category: AssetCategory,
        attributes: &AttributeMap,
        reference_year: i32,
    ) -> Result<ValuationResult> {
        match category {
            AssetCategory::RealEstate => self.evaluate_real_estate(attributes),
            AssetCategory::Watch => Ok(self.evaluate_watch(attributes)),
            AssetCategory::Vehicle => Ok(self.evaluate_vehicle(attributes, reference_year)),
        }
    }

    fn evaluate_real_estate(&self, attributes: &AttributeMap) -> Result<ValuationResult> {
        let pricing = &self.config.real_estate;

        let area = attributes
            .number(fields::AREA)
            .ok_or_else(|| Error::InvalidInput("real estate valuation requires an area".into()))?;
        if !area.is_finite() || area <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "real estate area must be positive, got {}",
                area
            )));
        }

        let tier = tier_of(attributes, fields::LOCATION_TIER);
        let base = match tier {
            1 => pricing.base_per_sqm_tier1,
            2 => pricing.base_per_sqm_tier2,
            _ => pricing.base_per_sqm_tier3,
        };
        let confidence = if tier == 1 {
            pricing.confidence_tier1
        } else {
            pricing.confidence_other
        };

        Ok(ValuationResult::from_point(
            area * base,
            pricing.low_factor,
            pricing.high_factor,
            confidence,
        ))
    }

    fn evaluate_watch(&self, attributes: &AttributeMap) -> ValuationResult {
        let pricing = &self.config.watch;

        let point = match tier_of(attributes, fields::BRAND_TIER) {
            1 => pricing.point_tier1,
            2 => pricing.point_tier2,
            _ => pricing.point_tier3,
        };

        ValuationResult::from_point(
            point,
            pricing.low_factor,
            pricing.high_factor,
            pricing.confidence,
        )
    }

    fn evaluate_vehicle(&self, attributes: &AttributeMap, reference_year: i32) -> ValuationResult {
        let pricing = &self.config.vehicle;

        // Missing year or mileage takes the most conservative factor,
        // mirroring the missing-tier rule.
        let age_factor = match attributes.number(fields::YEAR) {
            Some(year) => {
                let age = (reference_year as f64 - year).max(0.0);
                (1.0 - age * pricing.age_decay_per_year).max(pricing.age_factor_floor)
            }
            None => pricing.age_factor_floor,
        };

        let mileage_factor = match attributes.number(fields::MILEAGE) {
            Some(mileage) if mileage <= pricing.mileage_threshold => pricing.mileage_factor_below,
            _ => pricing.mileage_factor_above,
        };

        ValuationResult::from_point(
            pricing.base_price * age_factor * mileage_factor,
            pricing.low_factor,
            pricing.high_factor,
            pricing.confidence,
        )
    }
}

impl Default for ValuationCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Tier lookup with the conservative default: absent or out-of-range tiers
/// are treated as the lowest tier (3).
fn tier_of(attributes: &AttributeMap, field: &str) -> u8 {
    attributes
        .number(field)
        .filter(|t| t.is_finite() && (1.0..=3.0).contains(t))
        .map(|t| t as u8)
        .unwrap_or(3)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, f64)]) -> AttributeMap {
        let mut map = AttributeMap::new();
        for (field, value) in pairs {
            map.set_number(field, *value);
        }
        map
    }

    #[test]
    fn test_real_estate_tier1_reference_case() {
        let calc = ValuationCalculator::new();
        let map = attrs(&[(fields::AREA, 120.0), (fields::LOCATION_TIER, 1.0)]);

        let result = calc.evaluate(AssetCategory::RealEstate, &map).unwrap();
        assert_eq!(result.point_estimate, 1_500_000);
        assert_eq!(result.low, 1_320_000);
        assert_eq!(result.high, 1_680_000);
        assert_eq!(result.confidence, 0.78);
        assert_eq!(result.currency, "EUR");
    }

    #[test]
    fn test_real_estate_missing_tier_defaults_to_lowest() {
        let calc = ValuationCalculator::new();
        let map = attrs(&[(fields::AREA, 100.0)]);

        let result = calc.evaluate(AssetCategory::RealEstate, &map).unwrap();
        assert_eq!(result.point_estimate, 600_000);
        assert_eq!(result.confidence, 0.72);
    }

    #[test]
    fn test_real_estate_missing_area_is_invalid_input() {
        let calc = ValuationCalculator::new();
        let err = calc
            .evaluate(AssetCategory::RealEstate, &AttributeMap::new())
            .unwrap_err();
        assert!(err.is_caller_visible());

        let err = calc
            .evaluate(AssetCategory::RealEstate, &attrs(&[(fields::AREA, 0.0)]))
            .unwrap_err();
        assert!(err.is_caller_visible());
    }

    #[test]
    fn test_watch_tiers() {
        let calc = ValuationCalculator::new();

        let result = calc
            .evaluate(AssetCategory::Watch, &attrs(&[(fields::BRAND_TIER, 1.0)]))
            .unwrap();
        assert_eq!(result.point_estimate, 18_000);
        assert_eq!(result.low, 14_760);
        assert_eq!(result.high, 21_240);
        assert_eq!(result.confidence, 0.74);

        // Missing brand tier: conservative tier 3
        let result = calc
            .evaluate(AssetCategory::Watch, &AttributeMap::new())
            .unwrap();
        assert_eq!(result.point_estimate, 4_200);
    }

    #[test]
    fn test_vehicle_reference_case() {
        let calc = ValuationCalculator::new();
        let map = attrs(&[(fields::YEAR, 2021.0), (fields::MILEAGE, 22_000.0)]);

        // Evaluated in 2025: age factor 0.8, mileage factor 0.93
        let result = calc.evaluate_at(AssetCategory::Vehicle, &map, 2025).unwrap();
        assert_eq!(result.point_estimate, 163_680);
        assert_eq!(result.low, 139_128);
        assert_eq!(result.high, 188_232);
        assert_eq!(result.confidence, 0.72);
    }

    #[test]
    fn test_vehicle_age_factor_floor() {
        let calc = ValuationCalculator::new();
        let map = attrs(&[(fields::YEAR, 1995.0), (fields::MILEAGE, 10_000.0)]);

        let result = calc.evaluate_at(AssetCategory::Vehicle, &map, 2025).unwrap();
        // age factor clamped at 0.6
        assert_eq!(result.point_estimate, (220_000.0_f64 * 0.6 * 0.93).round() as i64);
    }

    #[test]
    fn test_vehicle_high_mileage_discount() {
        let calc = ValuationCalculator::new();
        let map = attrs(&[(fields::YEAR, 2023.0), (fields::MILEAGE, 90_000.0)]);

        let result = calc.evaluate_at(AssetCategory::Vehicle, &map, 2025).unwrap();
        assert_eq!(
            result.point_estimate,
            (220_000.0_f64 * 0.9 * 0.88).round() as i64
        );
    }

    #[test]
    fn test_vehicle_missing_attributes_are_conservative() {
        let calc = ValuationCalculator::new();
        let result = calc
            .evaluate_at(AssetCategory::Vehicle, &AttributeMap::new(), 2025)
            .unwrap();
        assert_eq!(
            result.point_estimate,
            (220_000.0_f64 * 0.6 * 0.88).round() as i64
        );
    }

    #[test]
    fn test_range_invariant_across_categories() {
        let calc = ValuationCalculator::new();
        let cases = [
            (
                AssetCategory::RealEstate,
                attrs(&[(fields::AREA, 37.5), (fields::LOCATION_TIER, 2.0)]),
            ),
            (AssetCategory::Watch, attrs(&[(fields::BRAND_TIER, 2.0)])),
            (
                AssetCategory::Vehicle,
                attrs(&[(fields::YEAR, 2010.0), (fields::MILEAGE, 140_000.0)]),
            ),
        ];

        for (category, map) in cases {
            let result = calc.evaluate_at(category, &map, 2025).unwrap();
            assert!(result.low <= result.point_estimate, "{:?}", category);
            assert!(result.point_estimate <= result.high, "{:?}", category);
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let calc = ValuationCalculator::new();
        let map = attrs(&[(fields::AREA, 88.0), (fields::LOCATION_TIER, 2.0)]);

        let first = calc.evaluate(AssetCategory::RealEstate, &map).unwrap();
        for _ in 0..3 {
            assert_eq!(calc.evaluate(AssetCategory::RealEstate, &map).unwrap(), first);
        }
    }
}
