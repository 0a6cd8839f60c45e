//! Fixed report texts: attribute labels, methodology, market factors and
//! the legal disclaimer.
//!
//! The attribute table is driven by the ordered label dictionaries below;
//! fields that are absent, empty, zero or `false` are skipped entirely so
//! the table never shows a blank row.

use crate::extraction::{fields, AssetCategory, AttributeMap, AttributeValue};

/// Ordered `(field, label)` dictionary per category.
pub fn label_dictionary(category: AssetCategory) -> &'static [(&'static str, &'static str)] {
    match category {
        AssetCategory::RealEstate => &[
            (fields::AREA, "Wohnfläche (m²)"),
            (fields::ROOMS, "Zimmer"),
            (fields::FLOOR, "Etage"),
            (fields::YEAR, "Baujahr"),
            (fields::PROPERTY_TYPE, "Objektart"),
            (fields::CONDITION, "Zustand"),
            (fields::LOCATION_TIER, "Lagekategorie"),
            (fields::HAS_BALCONY, "Balkon/Terrasse"),
            (fields::HAS_GARDEN, "Garten"),
            (fields::HAS_PARKING, "Stellplatz"),
        ],
        AssetCategory::Watch => &[
            (fields::BRAND, "Marke"),
            (fields::MODEL, "Modell"),
            (fields::YEAR, "Baujahr"),
            (fields::CONDITION, "Zustand"),
            (fields::BRAND_TIER, "Markenkategorie"),
            (fields::HAS_BOX, "Originalbox"),
            (fields::HAS_PAPERS, "Papiere"),
        ],
        AssetCategory::Vehicle => &[
            (fields::BRAND, "Marke"),
            (fields::MODEL, "Modell"),
            (fields::YEAR, "Erstzulassung"),
            (fields::MILEAGE, "Laufleistung (km)"),
            (fields::VEHICLE_TYPE, "Fahrzeugtyp"),
            (fields::CONDITION, "Zustand"),
            (fields::RISK_TIER, "Risikoklasse"),
        ],
    }
}

/// Rows for the attribute table: `(label, rendered value)` for every field
/// of the dictionary that carries a displayable value.
pub fn attribute_rows(
    category: AssetCategory,
    attributes: &AttributeMap,
) -> Vec<(&'static str, String)> {
    label_dictionary(category)
        .iter()
        .filter_map(|(field, label)| {
            attributes
                .get(field)
                .and_then(display_value)
                .map(|value| (*label, value))
        })
        .collect()
}

/// Render a value for the table; `None` suppresses the row
/// (absent handled upstream, empty string, zero, `false` here).
fn display_value(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::Number(n) if *n == 0.0 => None,
        AttributeValue::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
        AttributeValue::Number(n) => Some(format!("{:.1}", n)),
        AttributeValue::Text(s) if s.is_empty() => None,
        AttributeValue::Text(s) => Some(s.clone()),
        AttributeValue::Flag(false) => None,
        AttributeValue::Flag(true) => Some("Ja".to_string()),
    }
}

/// Fixed methodology paragraph per category.
pub fn methodology(category: AssetCategory) -> &'static str {
    match category {
        AssetCategory::RealEstate => {
            "Die Bewertung basiert auf einem lageabhängigen Quadratmeterpreis, \
             der aus der Einstufung der Region in drei Lagekategorien abgeleitet \
             wird. Der Punktwert ergibt sich aus Wohnfläche und Basispreis; die \
             Spanne bildet übliche Verhandlungs- und Ausstattungsunterschiede ab."
        }
        AssetCategory::Watch => {
            "Die Bewertung basiert auf der Einstufung der Marke in drei \
             Kategorien des Sekundärmarkts. Der Punktwert entspricht dem \
             typischen Marktwert der Kategorie; die Spanne berücksichtigt \
             Zustand, Vollständigkeit von Box und Papieren sowie Modellvarianten."
        }
        AssetCategory::Vehicle => {
            "Die Bewertung geht von einem Neupreisniveau aus und schreibt dieses \
             über Altersabschläge pro Jahr sowie einen Laufleistungsfaktor fort. \
             Die Spanne bildet Markt- und Zustandsunterschiede vergleichbarer \
             Fahrzeuge ab."
        }
    }
}

/// Fixed list of market factors considered, shown as a bullet list.
pub const MARKET_FACTORS: &[&str] = &[
    "Regionale Preisentwicklung",
    "Angebots- und Nachfragesituation in der Region",
    "Saisonale Nachfrageschwankungen",
    "Preise vergleichbarer Objekte am Markt",
    "Zustand und Ausstattungsmerkmale",
];

/// Fixed legal disclaimer block.
pub const DISCLAIMER: &str = "Diese Bewertung wurde automatisiert erstellt und dient \
    ausschließlich der ersten Orientierung. Sie ersetzt kein Gutachten eines \
    vereidigten Sachverständigen und stellt keine Zusicherung eines erzielbaren \
    Verkaufspreises dar. Alle Angaben ohne Gewähr.";

/// Report title per category.
pub fn report_title(category: AssetCategory) -> &'static str {
    match category {
        AssetCategory::RealEstate => "Immobilienbewertung",
        AssetCategory::Watch => "Uhrenbewertung",
        AssetCategory::Vehicle => "Fahrzeugbewertung",
    }
}
