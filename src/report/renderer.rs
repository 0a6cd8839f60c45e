//! Printable valuation report.
//!
//! Assembles the valuation, attributes, market context and comparables into
//! a multi-page HTML document with print CSS. Rendering never fails:
//! missing optional values are omitted, never shown as placeholders.

use chrono::{DateTime, Utc};
use maud::{html, Markup, DOCTYPE};

use super::labels::{
    attribute_rows, methodology, report_title, DISCLAIMER, MARKET_FACTORS,
};
use crate::comparables::{ComparableAsset, PriceDistribution};
use crate::extraction::{AssetCategory, AttributeMap};
use crate::market::{DataSource, MarketContext};
use crate::pricing::ValuationResult;

const BRAND_NAME: &str = "WERTWERK";

const PRINT_CSS: &str = "\
    body { font-family: 'Helvetica Neue', Arial, sans-serif; color: #1a1a2e; margin: 0; } \
    .page { padding: 48px 56px; page-break-after: always; } \
    .page:last-child { page-break-after: auto; } \
    header { border-bottom: 3px solid #1a1a2e; padding-bottom: 12px; margin-bottom: 32px; } \
    .brand { font-size: 22px; font-weight: 700; letter-spacing: 4px; } \
    .report-meta { color: #666; font-size: 12px; } \
    .estimate { text-align: center; margin: 40px 0; } \
    .estimate .point { font-size: 44px; font-weight: 700; } \
    .estimate .range { font-size: 16px; color: #444; margin-top: 8px; } \
    table { width: 100%; border-collapse: collapse; margin: 16px 0; } \
    th, td { text-align: left; padding: 8px 10px; border-bottom: 1px solid #ddd; font-size: 13px; } \
    th { background: #f4f4f8; } \
    h2 { font-size: 16px; border-left: 4px solid #1a1a2e; padding-left: 10px; } \
    ul { font-size: 13px; } \
    .disclaimer { font-size: 11px; color: #777; border-top: 1px solid #ccc; padding-top: 12px; margin-top: 32px; } \
    @media print { .page { padding: 24px 0; } }";

/// Render the full report document as a byte stream.
pub fn render(
    category: AssetCategory,
    result: &ValuationResult,
    attributes: &AttributeMap,
    context: &MarketContext,
    comparables: &[ComparableAsset],
    distribution: &PriceDistribution,
    generated_at: DateTime<Utc>,
) -> Vec<u8> {
    let markup = html! {
        (DOCTYPE)
        html lang="de" {
            head {
                meta charset="utf-8";
                title { (BRAND_NAME) " — " (report_title(category)) }
                style { (PRINT_CSS) }
            }
            body {
                (estimate_page(category, result, attributes, generated_at))
                (market_page(category, context, comparables, distribution, generated_at))
                (methodology_page(category, generated_at))
            }
        }
    };

    markup.into_string().into_bytes()
}

fn page_header(category: AssetCategory, generated_at: DateTime<Utc>) -> Markup {
    html! {
        header {
            div class="brand" { (BRAND_NAME) }
            div class="report-meta" {
                (report_title(category))
                " · erstellt am " (generated_at.format("%d.%m.%Y"))
            }
        }
    }
}

fn estimate_page(
    category: AssetCategory,
    result: &ValuationResult,
    attributes: &AttributeMap,
    generated_at: DateTime<Utc>,
) -> Markup {
    let rows = attribute_rows(category, attributes);

    html! {
        div class="page" {
            (page_header(category, generated_at))

            div class="estimate" {
                div class="point" { (format_eur(result.point_estimate as f64)) }
                div class="range" {
                    "Wertspanne " (format_eur(result.low as f64))
                    " – " (format_eur(result.high as f64))
                }
                div class="report-meta" {
                    "Konfidenz " (format!("{:.0}%", result.confidence * 100.0))
                }
            }

            @if !rows.is_empty() {
                h2 { "Objektmerkmale" }
                table {
                    tbody {
                        @for (label, value) in &rows {
                            tr {
                                th { (label) }
                                td { (value) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn market_page(
    category: AssetCategory,
    context: &MarketContext,
    comparables: &[ComparableAsset],
    distribution: &PriceDistribution,
    generated_at: DateTime<Utc>,
) -> Markup {
    html! {
        div class="page" {
            (page_header(category, generated_at))

            h2 { "Marktumfeld" }
            table {
                tbody {
                    tr {
                        th { "Preistrend" }
                        td {
                            (context.trend.direction)
                            " (" (format!("{:+.1}%", context.trend.percentage))
                            " / " (context.trend.period) ")"
                        }
                    }
                    tr {
                        th { "Nachfrage" }
                        td { (context.supply_demand.label) }
                    }
                    @if let Some(region) = &context.region {
                        tr {
                            th { "Region" }
                            td { (region) }
                        }
                    }
                    @if let Some(seasonal) = &context.seasonal {
                        tr {
                            th { "Saisonaler Effekt" }
                            td { (seasonal.description) }
                        }
                    }
                    tr {
                        th { "Datenbasis" }
                        td {
                            @if context.trend.data_source == DataSource::Database {
                                "Aggregierte Marktdaten der Region"
                            } @else {
                                "Marktschätzung"
                            }
                        }
                    }
                }
            }

            @if !comparables.is_empty() {
                h2 { "Vergleichsobjekte" }
                table {
                    thead {
                        tr {
                            th { "Objekt" }
                            th { "Preis" }
                            th { "Ähnlichkeit" }
                        }
                    }
                    tbody {
                        @for comparable in comparables {
                            tr {
                                td { (comparable.title) }
                                td { (format_eur(comparable.price)) }
                                td { (format!("{:.0}", comparable.similarity_score)) }
                            }
                        }
                    }
                }
            }

            h2 { "Preisverteilung" }
            table {
                tbody {
                    tr { th { "Minimum" } td { (format_eur(distribution.min)) } }
                    tr { th { "Median" } td { (format_eur(distribution.median)) } }
                    tr { th { "Durchschnitt" } td { (format_eur(distribution.avg)) } }
                    tr { th { "Maximum" } td { (format_eur(distribution.max)) } }
                    tr {
                        th { "Marktposition der Bewertung" }
                        td { (distribution.percentile_of_estimate) ". Perzentil" }
                    }
                }
            }
        }
    }
}

fn methodology_page(category: AssetCategory, generated_at: DateTime<Utc>) -> Markup {
    html! {
        div class="page" {
            (page_header(category, generated_at))

            h2 { "Methodik" }
            p { (methodology(category)) }

            h2 { "Berücksichtigte Marktfaktoren" }
            ul {
                @for factor in MARKET_FACTORS {
                    li { (factor) }
                }
            }

            div class="disclaimer" { (DISCLAIMER) }
        }
    }
}

/// German-style euro formatting with dot thousand separators.
fn format_eur(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-{} €", grouped)
    } else {
        format!("{} €", grouped)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparables::compute_distribution;
    use crate::extraction::fields;
    use crate::market::synthesize;
    use chrono::TimeZone;

    fn render_to_string(attributes: &AttributeMap) -> String {
        let result = ValuationResult::from_point(1_500_000.0, 0.88, 1.12, 0.78);
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let context = synthesize(AssetCategory::RealEstate, Some("München"), None, now);
        let distribution = compute_distribution(&[1_250_000.0, 1_480_000.0], 1_500_000.0);

        let bytes = render(
            AssetCategory::RealEstate,
            &result,
            attributes,
            &context,
            &[],
            &distribution,
            now,
        );
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(1_500_000.0), "1.500.000 €");
        assert_eq!(format_eur(950.0), "950 €");
        assert_eq!(format_eur(0.0), "0 €");
    }

    #[test]
    fn test_report_contains_fixed_sections() {
        let mut attributes = AttributeMap::new();
        attributes.set_number(fields::AREA, 120.0);

        let doc = render_to_string(&attributes);
        assert!(doc.contains("WERTWERK"));
        assert!(doc.contains("1.500.000 €"));
        assert!(doc.contains("Objektmerkmale"));
        assert!(doc.contains("Methodik"));
        assert!(doc.contains("Berücksichtigte Marktfaktoren"));
        assert!(doc.contains("Alle Angaben ohne Gewähr"));
    }

    #[test]
    fn test_missing_attributes_render_without_placeholders() {
        let doc = render_to_string(&AttributeMap::new());
        // No attribute table at all, and certainly no blank rows
        assert!(!doc.contains("Objektmerkmale"));
        assert!(!doc.contains("<td></td>"));
    }

    #[test]
    fn test_false_flags_not_rendered() {
        let mut attributes = AttributeMap::new();
        attributes.set_number(fields::AREA, 80.0);
        attributes.set_flag(fields::HAS_GARDEN, false);

        let doc = render_to_string(&attributes);
        assert!(!doc.contains("Garten"));
    }
}
