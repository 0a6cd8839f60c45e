//! Local rule-based attribute extraction.
//!
//! The default (and fallback) extraction strategy: fixed, ordered rule
//! tables applied to lower-cased listing text. Every tie-break is carried by
//! table order, so the tables below are the testable contract:
//!
//! - numeric fields: `(\d+[.,]?\d*)\s*<kw>` then `(\d+)[-\s]*<kw>`, keywords
//!   tried in list order, first match wins, comma decimals normalized
//! - year fields: first standalone 4-digit token in 1900-2099
//! - enumerated fields: ordered contains-chain with a guaranteed default
//! - brand fields: first candidate in LIST order found anywhere in the text
//!   wins, regardless of where it occurs in the text
//! - boolean fields: presence of any keyword in a synonym set
//! - tier fields: membership classification into tiers 1/2/3

use regex::Regex;

use super::types::{fields, AssetCategory, AttributeMap};

// ============================================================================
// Rule Tables
// ============================================================================

/// Numeric field rule: keywords tried in order against both number patterns.
pub struct NumericRule {
    pub field: &'static str,
    pub keywords: &'static [&'static str],
}

/// Enumerated field rule: ordered `(keyword, value)` branches plus a default
/// that guarantees a value for required enums.
pub struct EnumRule {
    pub field: &'static str,
    pub branches: &'static [(&'static str, &'static str)],
    pub default: &'static str,
}

/// Boolean field rule: any keyword present sets the flag.
pub struct FlagRule {
    pub field: &'static str,
    pub keywords: &'static [&'static str],
}

/// Tier rule: membership lists for tiers 1 and 2; everything else is tier 3.
pub struct TierRule {
    pub field: &'static str,
    pub tier_one: &'static [&'static str],
    pub tier_two: &'static [&'static str],
}

const REAL_ESTATE_NUMERIC: &[NumericRule] = &[
    NumericRule {
        field: fields::AREA,
        keywords: &["qm", "m²", "m2", "quadratmeter"],
    },
    NumericRule {
        field: fields::ROOMS,
        keywords: &["zimmer"],
    },
    NumericRule {
        field: fields::FLOOR,
        keywords: &["etage", "og", "stock"],
    },
];

const REAL_ESTATE_ENUMS: &[EnumRule] = &[
    EnumRule {
        field: fields::PROPERTY_TYPE,
        branches: &[
            ("penthouse", "penthouse"),
            ("villa", "villa"),
            ("reihenhaus", "townhouse"),
            ("haus", "house"),
            ("wohnung", "apartment"),
            ("grundstück", "plot"),
        ],
        default: "apartment",
    },
    EnumRule {
        field: fields::CONDITION,
        branches: &[
            ("neubau", "new"),
            ("erstbezug", "new"),
            ("kernsaniert", "renovated"),
            ("saniert", "renovated"),
            ("renovierungsbedürftig", "needs_renovation"),
            ("renoviert", "renovated"),
            ("gepflegt", "maintained"),
        ],
        default: "maintained",
    },
];

const REAL_ESTATE_FLAGS: &[FlagRule] = &[
    FlagRule {
        field: fields::HAS_BALCONY,
        keywords: &["balkon", "terrasse", "dachterrasse", "loggia"],
    },
    FlagRule {
        field: fields::HAS_GARDEN,
        keywords: &["garten"],
    },
    FlagRule {
        field: fields::HAS_PARKING,
        keywords: &["tiefgarage", "garage", "stellplatz", "parkplatz"],
    },
];

const REAL_ESTATE_LOCATION_TIER: TierRule = TierRule {
    field: fields::LOCATION_TIER,
    tier_one: &["münchen", "muenchen", "starnberg", "grünwald", "sylt"],
    tier_two: &[
        "hamburg",
        "berlin",
        "frankfurt",
        "düsseldorf",
        "stuttgart",
        "köln",
    ],
};

/// Watch brand candidates, scanned in this order. The first list entry whose
/// token appears anywhere in the text wins, even when another candidate
/// occurs earlier in the text.
pub const WATCH_BRANDS: &[&str] = &[
    "Rolex",
    "Patek Philippe",
    "Audemars Piguet",
    "A. Lange",
    "Omega",
    "IWC",
    "Jaeger-LeCoultre",
    "Breitling",
    "Cartier",
    "Tudor",
    "Tag Heuer",
    "Seiko",
];

const WATCH_ENUMS: &[EnumRule] = &[EnumRule {
    field: fields::CONDITION,
    branches: &[
        ("ungetragen", "unworn"),
        ("neu", "new"),
        ("sehr gut", "very_good"),
        ("getragen", "worn"),
        ("gut", "good"),
    ],
    default: "good",
}];

const WATCH_FLAGS: &[FlagRule] = &[
    FlagRule {
        field: fields::HAS_BOX,
        keywords: &["originalbox", "box"],
    },
    FlagRule {
        field: fields::HAS_PAPERS,
        keywords: &["papiere", "zertifikat", "papers"],
    },
];

const WATCH_BRAND_TIER: TierRule = TierRule {
    field: fields::BRAND_TIER,
    tier_one: &["rolex", "patek philippe", "audemars piguet", "a. lange"],
    tier_two: &["omega", "iwc", "jaeger-lecoultre", "breitling", "cartier"],
};

/// Vehicle brand candidates, scanned in this order (same tie-break as watches).
pub const VEHICLE_BRANDS: &[&str] = &[
    "Porsche",
    "Ferrari",
    "Lamborghini",
    "Mercedes",
    "BMW",
    "Audi",
    "Volkswagen",
    "Tesla",
];

const VEHICLE_NUMERIC: &[NumericRule] = &[NumericRule {
    field: fields::MILEAGE,
    keywords: &["km", "kilometer"],
}];

const VEHICLE_ENUMS: &[EnumRule] = &[
    EnumRule {
        field: fields::VEHICLE_TYPE,
        branches: &[
            ("cabrio", "convertible"),
            ("roadster", "convertible"),
            ("coupé", "coupe"),
            ("coupe", "coupe"),
            ("kombi", "estate"),
            ("suv", "suv"),
            ("limousine", "sedan"),
        ],
        default: "sedan",
    },
    EnumRule {
        field: fields::CONDITION,
        branches: &[
            ("neuwagen", "new"),
            ("scheckheftgepflegt", "full_service_history"),
            ("unfallfrei", "accident_free"),
            ("gebraucht", "used"),
        ],
        default: "used",
    },
];

const VEHICLE_RISK_TIER: TierRule = TierRule {
    field: fields::RISK_TIER,
    tier_one: &["porsche", "mercedes"],
    tier_two: &["ferrari", "lamborghini", "bmw", "audi"],
};

// ============================================================================
// Extraction Entry Point
// ============================================================================

/// Run the rule tables for the given category over the listing text.
///
/// Deterministic: repeated calls with the same input yield the same map.
pub fn extract_local(text: &str, category: AssetCategory) -> AttributeMap {
    let mut map = AttributeMap::new();
    let lower = text.to_lowercase();

    match category {
        AssetCategory::RealEstate => {
            apply_numeric_rules(&mut map, &lower, REAL_ESTATE_NUMERIC);
            apply_year_rule(&mut map, &lower);
            apply_enum_rules(&mut map, &lower, REAL_ESTATE_ENUMS);
            apply_flag_rules(&mut map, &lower, REAL_ESTATE_FLAGS);
            let tier = classify_tier(&lower, &REAL_ESTATE_LOCATION_TIER);
            map.set_number(REAL_ESTATE_LOCATION_TIER.field, tier);
        }
        AssetCategory::Watch => {
            apply_year_rule(&mut map, &lower);
            apply_enum_rules(&mut map, &lower, WATCH_ENUMS);
            apply_flag_rules(&mut map, &lower, WATCH_FLAGS);
            if let Some((brand, model)) = find_brand(text, WATCH_BRANDS) {
                let tier = classify_tier(&brand.to_lowercase(), &WATCH_BRAND_TIER);
                map.set_text(fields::BRAND, brand);
                if let Some(model) = model {
                    map.set_text(fields::MODEL, model);
                }
                map.set_number(WATCH_BRAND_TIER.field, tier);
            }
        }
        AssetCategory::Vehicle => {
            apply_numeric_rules(&mut map, &lower, VEHICLE_NUMERIC);
            apply_year_rule(&mut map, &lower);
            apply_enum_rules(&mut map, &lower, VEHICLE_ENUMS);
            if let Some((brand, model)) = find_brand(text, VEHICLE_BRANDS) {
                let tier = classify_tier(&brand.to_lowercase(), &VEHICLE_RISK_TIER);
                map.set_text(fields::BRAND, brand);
                if let Some(model) = model {
                    map.set_text(fields::MODEL, model);
                }
                map.set_number(VEHICLE_RISK_TIER.field, tier);
            }
        }
    }

    map
}

// ============================================================================
// Rule Application
// ============================================================================

fn apply_numeric_rules(map: &mut AttributeMap, lower: &str, rules: &[NumericRule]) {
    for rule in rules {
        if let Some(value) = extract_numeric(lower, rule.keywords) {
            map.set_number(rule.field, value);
        }
    }
}

/// Try both number patterns per keyword, keywords in list order.
fn extract_numeric(lower: &str, keywords: &[&str]) -> Option<f64> {
    for keyword in keywords {
        let escaped = regex::escape(keyword);

        // "89,5 qm" / "120qm"
        let decimal = Regex::new(&format!(r"(\d+[.,]?\d*)\s*{}", escaped)).ok()?;
        if let Some(caps) = decimal.captures(lower) {
            if let Some(value) = parse_decimal(&caps[1]) {
                return Some(value);
            }
        }

        // "3-zimmer" / "3 zimmer"
        let dashed = Regex::new(&format!(r"(\d+)[-\s]*{}", escaped)).ok()?;
        if let Some(caps) = dashed.captures(lower) {
            if let Some(value) = parse_decimal(&caps[1]) {
                return Some(value);
            }
        }
    }
    None
}

/// Comma decimal separators are normalized to dot before parsing.
fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse().ok()
}

/// First standalone 4-digit token in 1900-2099.
fn apply_year_rule(map: &mut AttributeMap, lower: &str) {
    let year_re = match Regex::new(r"\b((?:19|20)\d{2})\b") {
        Ok(re) => re,
        Err(_) => return,
    };
    if let Some(caps) = year_re.captures(lower) {
        if let Ok(year) = caps[1].parse::<f64>() {
            map.set_number(fields::YEAR, year);
        }
    }
}

fn apply_enum_rules(map: &mut AttributeMap, lower: &str, rules: &[EnumRule]) {
    for rule in rules {
        let value = rule
            .branches
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, value)| *value)
            .unwrap_or(rule.default);
        map.set_text(rule.field, value);
    }
}

fn apply_flag_rules(map: &mut AttributeMap, lower: &str, rules: &[FlagRule]) {
    for rule in rules {
        if rule.keywords.iter().any(|keyword| lower.contains(keyword)) {
            map.set_flag(rule.field, true);
        }
    }
}

/// Scan the candidate list in LIST order; the first candidate whose token
/// appears anywhere in the text wins. The model is the word-character run
/// immediately following the matched brand token.
fn find_brand(text: &str, candidates: &[&str]) -> Option<(String, Option<String>)> {
    for candidate in candidates {
        let pattern = format!("(?i){}", regex::escape(candidate));
        let brand_re = Regex::new(&pattern).ok()?;
        if let Some(found) = brand_re.find(text) {
            let model = extract_model(&text[found.end()..]);
            return Some(((*candidate).to_string(), model));
        }
    }
    None
}

fn extract_model(remainder: &str) -> Option<String> {
    let model_re = Regex::new(r"[\w][\w-]*").ok()?;
    model_re.find(remainder).map(|m| m.as_str().to_string())
}

fn classify_tier(subject_lower: &str, rule: &TierRule) -> f64 {
    if rule.tier_one.iter().any(|entry| subject_lower.contains(entry)) {
        1.0
    } else if rule.tier_two.iter().any(|entry| subject_lower.contains(entry)) {
        2.0
    } else {
        3.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_estate_numeric_extraction() {
        let map = extract_local(
            "Helle 3-Zimmer Wohnung, 89,5 qm, 4. Etage mit Balkon",
            AssetCategory::RealEstate,
        );

        assert_eq!(map.number(fields::AREA), Some(89.5));
        assert_eq!(map.number(fields::ROOMS), Some(3.0));
        assert_eq!(map.text(fields::PROPERTY_TYPE), Some("apartment"));
        assert_eq!(map.flag(fields::HAS_BALCONY), Some(true));
    }

    #[test]
    fn test_comma_decimal_normalized() {
        let map = extract_local("120,75 qm Neubau", AssetCategory::RealEstate);
        assert_eq!(map.number(fields::AREA), Some(120.75));
        assert_eq!(map.text(fields::CONDITION), Some("new"));
    }

    #[test]
    fn test_year_in_range() {
        let map = extract_local("Baujahr 2018, saniert", AssetCategory::RealEstate);
        assert_eq!(map.number(fields::YEAR), Some(2018.0));

        // 4-digit tokens outside 1900-2099 are not years
        let map = extract_local("Referenz 3517", AssetCategory::RealEstate);
        assert_eq!(map.number(fields::YEAR), None);
    }

    #[test]
    fn test_year_not_taken_from_longer_digit_runs() {
        let map = extract_local("Porsche 911, 22000 km", AssetCategory::Vehicle);
        assert_eq!(map.number(fields::YEAR), None);
        assert_eq!(map.number(fields::MILEAGE), Some(22000.0));
    }

    #[test]
    fn test_enum_default_branch_guarantees_value() {
        let map = extract_local("Objekt ohne weitere Angaben", AssetCategory::RealEstate);
        assert_eq!(map.text(fields::PROPERTY_TYPE), Some("apartment"));
        assert_eq!(map.text(fields::CONDITION), Some("maintained"));
    }

    #[test]
    fn test_brand_tie_break_is_list_order() {
        // Omega appears first in the text, Rolex first in the candidate list
        let map = extract_local(
            "Tausche Omega Seamaster gegen Rolex Submariner",
            AssetCategory::Watch,
        );
        assert_eq!(map.text(fields::BRAND), Some("Rolex"));
        assert_eq!(map.text(fields::MODEL), Some("Submariner"));
        assert_eq!(map.number(fields::BRAND_TIER), Some(1.0));
    }

    #[test]
    fn test_brand_match_is_case_insensitive() {
        let map = extract_local("verkaufe ROLEX datejust 2015", AssetCategory::Watch);
        assert_eq!(map.text(fields::BRAND), Some("Rolex"));
        assert_eq!(map.text(fields::MODEL), Some("datejust"));
        assert_eq!(map.number(fields::YEAR), Some(2015.0));
    }

    #[test]
    fn test_watch_without_brand_has_no_tier() {
        let map = extract_local("Schöne Uhr, guter Zustand", AssetCategory::Watch);
        assert_eq!(map.text(fields::BRAND), None);
        assert_eq!(map.number(fields::BRAND_TIER), None);
        // Enum default still guaranteed
        assert_eq!(map.text(fields::CONDITION), Some("good"));
    }

    #[test]
    fn test_location_tier_classification() {
        let map = extract_local("Penthouse in München", AssetCategory::RealEstate);
        assert_eq!(map.number(fields::LOCATION_TIER), Some(1.0));
        assert_eq!(map.text(fields::PROPERTY_TYPE), Some("penthouse"));

        let map = extract_local("Wohnung in Berlin", AssetCategory::RealEstate);
        assert_eq!(map.number(fields::LOCATION_TIER), Some(2.0));

        let map = extract_local("Haus in Leipzig", AssetCategory::RealEstate);
        assert_eq!(map.number(fields::LOCATION_TIER), Some(3.0));
    }

    #[test]
    fn test_vehicle_extraction() {
        let map = extract_local(
            "Porsche 911 Carrera, Baujahr 2021, 22000 km, unfallfrei, Cabrio",
            AssetCategory::Vehicle,
        );

        assert_eq!(map.text(fields::BRAND), Some("Porsche"));
        assert_eq!(map.text(fields::MODEL), Some("911"));
        assert_eq!(map.number(fields::YEAR), Some(2021.0));
        assert_eq!(map.number(fields::MILEAGE), Some(22000.0));
        assert_eq!(map.text(fields::VEHICLE_TYPE), Some("convertible"));
        assert_eq!(map.text(fields::CONDITION), Some("accident_free"));
        assert_eq!(map.number(fields::RISK_TIER), Some(1.0));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "Rolex Daytona 2019, Box und Papiere, ungetragen";
        let first = extract_local(text, AssetCategory::Watch);
        for _ in 0..5 {
            assert_eq!(extract_local(text, AssetCategory::Watch), first);
        }
    }

    #[test]
    fn test_flags_absent_when_no_keyword() {
        let map = extract_local("Wohnung, 60 qm", AssetCategory::RealEstate);
        assert!(!map.contains(fields::HAS_BALCONY));
        assert!(!map.contains(fields::HAS_GARDEN));
    }
}
