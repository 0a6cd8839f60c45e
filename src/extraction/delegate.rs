//! Delegated attribute extraction via an external NL service.
//!
//! Sends a per-category system prompt plus the raw listing text to a
//! configured extraction service and parses the structured response into a
//! typed per-category payload. Exactly one attempt is made per request;
//! any failure (network, non-2xx, malformed or invalid JSON) is reported to
//! the caller, which falls back to the local rule tables.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::types::{fields, AssetCategory, AttributeMap};
use crate::common::config::ExtractionConfig;

/// Configuration for the delegated extraction client.
#[derive(Debug, Clone)]
pub struct DelegateClientConfig {
    /// Extraction service endpoint
    pub endpoint: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl From<&ExtractionConfig> for DelegateClientConfig {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Client for the external extraction service.
///
/// Constructed once at startup and passed by reference into the engine;
/// there is no lazily-created module-level client.
pub struct DelegateClient {
    config: DelegateClientConfig,
    client: reqwest::Client,
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct DelegateRequest {
    system_prompt: String,
    user_text: String,
}

#[derive(Debug, Deserialize)]
struct DelegateResponse {
    /// Structured extraction result as a JSON object
    content: serde_json::Value,
}

/// Typed real-estate payload. Unknown fields in the response are discarded
/// by serde rather than trusted at runtime.
#[derive(Debug, Default, Deserialize)]
struct RealEstatePayload {
    area: Option<f64>,
    rooms: Option<f64>,
    floor: Option<f64>,
    year: Option<f64>,
    property_type: Option<String>,
    condition: Option<String>,
    location_tier: Option<f64>,
    has_balcony: Option<bool>,
    has_garden: Option<bool>,
    has_parking: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct WatchPayload {
    brand: Option<String>,
    model: Option<String>,
    year: Option<f64>,
    condition: Option<String>,
    brand_tier: Option<f64>,
    has_box: Option<bool>,
    has_papers: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct VehiclePayload {
    brand: Option<String>,
    model: Option<String>,
    year: Option<f64>,
    mileage: Option<f64>,
    vehicle_type: Option<String>,
    condition: Option<String>,
    risk_tier: Option<f64>,
}

// ============================================================================
// Client
// ============================================================================

impl DelegateClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DelegateClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { config, client }
    }

    /// Extract attributes via the external service. Single attempt.
    pub async fn extract(&self, text: &str, category: AssetCategory) -> Result<AttributeMap> {
        let request = DelegateRequest {
            system_prompt: system_prompt(category),
            user_text: text.to_string(),
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Extraction service request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Extraction service returned status {}",
                response.status()
            ));
        }

        let body: DelegateResponse = response
            .json()
            .await
            .context("Extraction service returned malformed JSON")?;

        let map = parse_payload(category, body.content)?;
        debug!(
            category = %category,
            field_count = map.len(),
            "Delegated extraction succeeded"
        );
        Ok(map)
    }

    /// Probe the service endpoint. Used for startup diagnostics only.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(&self.config.endpoint)
            .send()
            .await
            .map(|r| !r.status().is_server_error())
            .unwrap_or(false)
    }
}

// ============================================================================
// System Prompts
// ============================================================================

/// Fixed per-category prompt template: field names, enumerations, and one
/// example object.
pub fn system_prompt(category: AssetCategory) -> String {
    match category {
        AssetCategory::RealEstate => concat!(
            "Extract real estate attributes from the listing text. ",
            "Respond with a single JSON object using these fields: ",
            "area (number, m²), rooms (number), floor (number), year (number), ",
            "property_type (apartment|house|townhouse|villa|penthouse|plot), ",
            "condition (new|renovated|maintained|needs_renovation), ",
            "location_tier (1|2|3), has_balcony (bool), has_garden (bool), ",
            "has_parking (bool). Omit fields that are not mentioned. Example: ",
            r#"{"area": 89.5, "rooms": 3, "property_type": "apartment", "has_balcony": true}"#
        )
        .to_string(),
        AssetCategory::Watch => concat!(
            "Extract watch attributes from the listing text. ",
            "Respond with a single JSON object using these fields: ",
            "brand (string), model (string), year (number), ",
            "condition (unworn|new|very_good|good|worn), brand_tier (1|2|3), ",
            "has_box (bool), has_papers (bool). ",
            "Omit fields that are not mentioned. Example: ",
            r#"{"brand": "Rolex", "model": "Submariner", "year": 2019, "has_papers": true}"#
        )
        .to_string(),
        AssetCategory::Vehicle => concat!(
            "Extract vehicle attributes from the listing text. ",
            "Respond with a single JSON object using these fields: ",
            "brand (string), model (string), year (number), mileage (number, km), ",
            "vehicle_type (sedan|coupe|convertible|estate|suv), ",
            "condition (new|full_service_history|accident_free|used), ",
            "risk_tier (1|2|3). Omit fields that are not mentioned. Example: ",
            r#"{"brand": "Porsche", "model": "911", "year": 2021, "mileage": 22000}"#
        )
        .to_string(),
    }
}

// ============================================================================
// Payload Parsing
// ============================================================================

/// Parse the structured response into an attribute map, discarding values
/// that fail validation (non-finite or negative numbers, empty strings,
/// out-of-range tiers).
fn parse_payload(category: AssetCategory, content: serde_json::Value) -> Result<AttributeMap> {
    let mut map = AttributeMap::new();

    match category {
        AssetCategory::RealEstate => {
            let payload: RealEstatePayload =
                serde_json::from_value(content).context("Invalid real estate payload")?;
            set_number(&mut map, fields::AREA, payload.area);
            set_number(&mut map, fields::ROOMS, payload.rooms);
            set_number(&mut map, fields::FLOOR, payload.floor);
            set_number(&mut map, fields::YEAR, payload.year);
            set_text(&mut map, fields::PROPERTY_TYPE, payload.property_type);
            set_text(&mut map, fields::CONDITION, payload.condition);
            set_tier(&mut map, fields::LOCATION_TIER, payload.location_tier);
            set_flag(&mut map, fields::HAS_BALCONY, payload.has_balcony);
            set_flag(&mut map, fields::HAS_GARDEN, payload.has_garden);
            set_flag(&mut map, fields::HAS_PARKING, payload.has_parking);
        }
        AssetCategory::Watch => {
            let payload: WatchPayload =
                serde_json::from_value(content).context("Invalid watch payload")?;
            set_text(&mut map, fields::BRAND, payload.brand);
            set_text(&mut map, fields::MODEL, payload.model);
            set_number(&mut map, fields::YEAR, payload.year);
            set_text(&mut map, fields::CONDITION, payload.condition);
            set_tier(&mut map, fields::BRAND_TIER, payload.brand_tier);
            set_flag(&mut map, fields::HAS_BOX, payload.has_box);
            set_flag(&mut map, fields::HAS_PAPERS, payload.has_papers);
        }
        AssetCategory::Vehicle => {
            let payload: VehiclePayload =
                serde_json::from_value(content).context("Invalid vehicle payload")?;
            set_text(&mut map, fields::BRAND, payload.brand);
            set_text(&mut map, fields::MODEL, payload.model);
            set_number(&mut map, fields::YEAR, payload.year);
            set_number(&mut map, fields::MILEAGE, payload.mileage);
            set_text(&mut map, fields::VEHICLE_TYPE, payload.vehicle_type);
            set_text(&mut map, fields::CONDITION, payload.condition);
            set_tier(&mut map, fields::RISK_TIER, payload.risk_tier);
        }
    }

    Ok(map)
}

fn set_number(map: &mut AttributeMap, field: &str, value: Option<f64>) {
    if let Some(value) = value {
        if value.is_finite() && value >= 0.0 {
            map.set_number(field, value);
        }
    }
}

fn set_tier(map: &mut AttributeMap, field: &str, value: Option<f64>) {
    if let Some(value) = value {
        if value.is_finite() && (1.0..=3.0).contains(&value) {
            map.set_number(field, value.round());
        }
    }
}

fn set_text(map: &mut AttributeMap, field: &str, value: Option<String>) {
    if let Some(value) = value {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            map.set_text(field, trimmed);
        }
    }
}

fn set_flag(map: &mut AttributeMap, field: &str, value: Option<bool>) {
    if let Some(value) = value {
        map.set_flag(field, value);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_real_estate_payload_discards_unknown_fields() {
        let content = json!({
            "area": 120.0,
            "rooms": 4,
            "property_type": "villa",
            "has_balcony": true,
            "shoe_size": 44,
            "nested": {"junk": true}
        });

        let map = parse_payload(AssetCategory::RealEstate, content).unwrap();
        assert_eq!(map.number(fields::AREA), Some(120.0));
        assert_eq!(map.text(fields::PROPERTY_TYPE), Some("villa"));
        assert_eq!(map.flag(fields::HAS_BALCONY), Some(true));
        assert!(!map.contains("shoe_size"));
    }

    #[test]
    fn test_parse_payload_discards_invalid_values() {
        let content = json!({
            "area": -50.0,
            "brand_tier": 9,
            "rooms": 3.0,
            "condition": "   "
        });

        let map = parse_payload(AssetCategory::RealEstate, content).unwrap();
        assert!(!map.contains(fields::AREA));
        assert_eq!(map.number(fields::ROOMS), Some(3.0));
        assert!(!map.contains(fields::CONDITION));
    }

    #[test]
    fn test_parse_payload_rejects_non_object() {
        let result = parse_payload(AssetCategory::Watch, json!("not an object"));
        assert!(result.is_err());
    }

    #[test]
    fn test_tier_rounded_into_range() {
        let content = json!({"brand": "Omega", "brand_tier": 2.4});
        let map = parse_payload(AssetCategory::Watch, content).unwrap();
        assert_eq!(map.number(fields::BRAND_TIER), Some(2.0));
    }

    #[test]
    fn test_system_prompt_names_schema_fields() {
        let prompt = system_prompt(AssetCategory::RealEstate);
        assert!(prompt.contains("area"));
        assert!(prompt.contains("has_balcony"));
        assert!(prompt.contains("Example"));

        let prompt = system_prompt(AssetCategory::Vehicle);
        assert!(prompt.contains("mileage"));
        assert!(prompt.contains("risk_tier"));
    }
}
