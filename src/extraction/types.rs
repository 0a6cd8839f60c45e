//! Attribute extraction types.
//!
//! Defines the asset taxonomy and the typed, partially-filled attribute map
//! shared by the rule-based and delegated extraction strategies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Asset Category
// ============================================================================

/// Top-level asset taxonomy.
///
/// The category selects the attribute schema, the extraction rule set, and
/// the pricing formula. It is fixed for the lifetime of a valuation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Residential real estate (Wohnimmobilien)
    RealEstate,
    /// Luxury wristwatches
    Watch,
    /// Vehicles
    Vehicle,
}

impl AssetCategory {
    /// All categories, in a fixed order.
    pub const ALL: [AssetCategory; 3] = [Self::RealEstate, Self::Watch, Self::Vehicle];
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RealEstate => write!(f, "real_estate"),
            Self::Watch => write!(f, "watch"),
            Self::Vehicle => write!(f, "vehicle"),
        }
    }
}

impl std::str::FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "real_estate" | "realestate" | "immobilie" => Ok(Self::RealEstate),
            "watch" | "uhr" => Ok(Self::Watch),
            "vehicle" | "car" | "fahrzeug" => Ok(Self::Vehicle),
            _ => Err(format!("Unknown asset category: {}", s)),
        }
    }
}

// ============================================================================
// Attribute Values
// ============================================================================

/// A single typed attribute value.
///
/// A field is either present with the correct type or absent from the map
/// entirely; there is no null value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Numeric value (areas, counts, mileage, years, tiers)
    Number(f64),
    /// Free-text or enumerated value (brand, model, condition)
    Text(String),
    /// Boolean feature flag (balcony, papers, ...)
    Flag(bool),
}

impl AttributeValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

// ============================================================================
// Attribute Map
// ============================================================================

/// Category-specific partial attribute map.
///
/// Built incrementally by the extractor; consumed read-only by the pricing
/// calculator and the report renderer. Keys are the schema field names in
/// [`fields`]. A `BTreeMap` keeps iteration order deterministic, which the
/// report's attribute table relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(BTreeMap<String, AttributeValue>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_number(&mut self, field: &str, value: f64) {
        self.0.insert(field.to_string(), AttributeValue::Number(value));
    }

    pub fn set_text(&mut self, field: &str, value: impl Into<String>) {
        self.0
            .insert(field.to_string(), AttributeValue::Text(value.into()));
    }

    pub fn set_flag(&mut self, field: &str, value: bool) {
        self.0.insert(field.to_string(), AttributeValue::Flag(value));
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(AttributeValue::as_number)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(AttributeValue::as_text)
    }

    pub fn flag(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(AttributeValue::as_flag)
    }

    pub fn get(&self, field: &str) -> Option<&AttributeValue> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.0.iter()
    }
}

// ============================================================================
// Schema Field Names
// ============================================================================

/// Attribute schema field names, grouped per category.
pub mod fields {
    // Real estate
    pub const AREA: &str = "area";
    pub const ROOMS: &str = "rooms";
    pub const FLOOR: &str = "floor";
    pub const PROPERTY_TYPE: &str = "property_type";
    pub const LOCATION_TIER: &str = "location_tier";
    pub const HAS_BALCONY: &str = "has_balcony";
    pub const HAS_GARDEN: &str = "has_garden";
    pub const HAS_PARKING: &str = "has_parking";

    // Watch
    pub const BRAND: &str = "brand";
    pub const MODEL: &str = "model";
    pub const BRAND_TIER: &str = "brand_tier";
    pub const HAS_BOX: &str = "has_box";
    pub const HAS_PAPERS: &str = "has_papers";

    // Vehicle
    pub const MILEAGE: &str = "mileage";
    pub const VEHICLE_TYPE: &str = "vehicle_type";
    pub const RISK_TIER: &str = "risk_tier";

    // Shared
    pub const YEAR: &str = "year";
    pub const CONDITION: &str = "condition";
}
