//! Region detection.
//!
//! A fixed, ordered city dictionary scanned by unscoped substring matching
//! on the lower-cased location text. The first dictionary entry whose key
//! occurs anywhere in the text wins. This is deliberately ambiguous for
//! multi-city strings: "Berliner Straße, München" resolves to Berlin because
//! "berlin" precedes "münchen" in the dictionary. A known limitation of the
//! matching scheme, kept as-is rather than guessed around.

/// Ordered city → region dictionary.
pub const CITY_REGIONS: &[(&str, &str)] = &[
    ("berlin", "Berlin"),
    ("hamburg", "Hamburg"),
    ("münchen", "München"),
    ("muenchen", "München"),
    ("frankfurt", "Frankfurt"),
    ("köln", "Köln"),
    ("koeln", "Köln"),
    ("düsseldorf", "Düsseldorf"),
    ("duesseldorf", "Düsseldorf"),
    ("stuttgart", "Stuttgart"),
    ("leipzig", "Leipzig"),
    ("dresden", "Dresden"),
    ("hannover", "Hannover"),
    ("nürnberg", "Nürnberg"),
];

/// Regions with structurally elevated demand.
pub const PREMIUM_REGIONS: &[&str] = &["München", "Hamburg", "Berlin"];

/// Detect the region for a raw location string.
pub fn detect_region(location: &str) -> Option<&'static str> {
    let lower = location.to_lowercase();
    CITY_REGIONS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, region)| *region)
}

/// Whether a region carries the premium-demand heuristics.
pub fn is_premium_region(region: &str) -> bool {
    PREMIUM_REGIONS.contains(&region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_region_case_insensitive() {
        assert_eq!(detect_region("Wohnung in MÜNCHEN Schwabing"), Some("München"));
        assert_eq!(detect_region("hamburg altona"), Some("Hamburg"));
        assert_eq!(detect_region("Kleinstadt im Allgäu"), None);
    }

    #[test]
    fn test_multi_city_string_resolves_by_dictionary_order() {
        // Documented ambiguity: the street name wins because "berlin" comes
        // first in the dictionary, not because it is the intended city.
        assert_eq!(detect_region("Berliner Straße 12, München"), Some("Berlin"));
    }

    #[test]
    fn test_umlaut_transliteration_entries() {
        assert_eq!(detect_region("Muenchen Zentrum"), Some("München"));
        assert_eq!(detect_region("Koeln Ehrenfeld"), Some("Köln"));
    }

    #[test]
    fn test_premium_regions() {
        assert!(is_premium_region("München"));
        assert!(is_premium_region("Berlin"));
        assert!(!is_premium_region("Leipzig"));
    }
}
