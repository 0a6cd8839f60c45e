//! Attribute extraction.
//!
//! Turns free-text asset descriptions into category-specific partial
//! attribute maps using two interchangeable strategies:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    AttributeExtractor                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Delegated (optional)          Local rules (default)         │
//! │    external NL service    ─▶     ordered rule tables         │
//! │    single attempt, any           regex + keyword chains,     │
//! │    failure falls through         always succeeds             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Extraction never fails: on any delegated-strategy failure the same input
//! is re-run through the local rule tables, and the worst case result is an
//! empty map.

pub mod delegate;
pub mod rules;
pub mod types;

pub use delegate::{system_prompt, DelegateClient, DelegateClientConfig};
pub use rules::{extract_local, VEHICLE_BRANDS, WATCH_BRANDS};
pub use types::{fields, AssetCategory, AttributeMap, AttributeValue};

use tracing::warn;

use crate::common::Config;

/// Facade over the two extraction strategies.
pub struct AttributeExtractor {
    delegate: Option<DelegateClient>,
}

impl AttributeExtractor {
    /// Create an extractor from service configuration. The delegated client
    /// is constructed once here, not lazily per request.
    pub fn new(config: &Config) -> Self {
        let delegate = if config.extraction.enabled && !config.extraction.endpoint.is_empty() {
            Some(DelegateClient::new(DelegateClientConfig::from(
                &config.extraction,
            )))
        } else {
            None
        };

        Self { delegate }
    }

    /// Create an extractor that only uses the local rule tables.
    pub fn local_only() -> Self {
        Self { delegate: None }
    }

    /// Probe the delegated extraction service at startup. `None` when no
    /// delegate is configured.
    pub async fn health_check(&self) -> Option<bool> {
        match &self.delegate {
            Some(delegate) => Some(delegate.health_check().await),
            None => None,
        }
    }

    /// Extract attributes from free text. Never fails; returns the best
    /// partial map obtained (possibly empty).
    pub async fn extract(&self, text: &str, category: AssetCategory) -> AttributeMap {
        if let Some(delegate) = &self.delegate {
            match delegate.extract(text, category).await {
                Ok(map) if !map.is_empty() => return map,
                Ok(_) => {
                    warn!(
                        category = %category,
                        "Delegated extraction returned an empty map, using local rules"
                    );
                }
                Err(e) => {
                    warn!(
                        category = %category,
                        error = %e,
                        "Delegated extraction failed, using local rules"
                    );
                }
            }
        }

        extract_local(text, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_only_extractor_matches_rule_tables() {
        let extractor = AttributeExtractor::local_only();
        let map = extractor
            .extract("3-Zimmer Wohnung, 75 qm, Balkon", AssetCategory::RealEstate)
            .await;

        assert_eq!(map, extract_local("3-Zimmer Wohnung, 75 qm, Balkon", AssetCategory::RealEstate));
        assert_eq!(map.number(fields::AREA), Some(75.0));
    }

    #[tokio::test]
    async fn test_unreachable_delegate_falls_back_to_rules() {
        // Dead endpoint: the single delegated attempt fails, local rules
        // must still produce keyword matches without surfacing an error.
        let delegate = DelegateClient::new(DelegateClientConfig {
            endpoint: "http://127.0.0.1:9/extract".to_string(),
            api_key: String::new(),
            timeout: std::time::Duration::from_millis(200),
        });
        let extractor = AttributeExtractor {
            delegate: Some(delegate),
        };

        let map = extractor
            .extract("Rolex Submariner 2019", AssetCategory::Watch)
            .await;

        assert_eq!(map.text(fields::BRAND), Some("Rolex"));
        assert_eq!(map.number(fields::YEAR), Some(2019.0));
    }

    #[tokio::test]
    async fn test_health_check_reports_delegate_state() {
        // No delegate configured: nothing to probe
        assert_eq!(AttributeExtractor::local_only().health_check().await, None);

        // Dead endpoint reports unhealthy without failing
        let delegate = DelegateClient::new(DelegateClientConfig {
            endpoint: "http://127.0.0.1:9/extract".to_string(),
            api_key: String::new(),
            timeout: std::time::Duration::from_millis(200),
        });
        let extractor = AttributeExtractor {
            delegate: Some(delegate),
        };
        assert_eq!(extractor.health_check().await, Some(false));
    }
}
