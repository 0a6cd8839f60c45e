//! Comparable asset pools.
//!
//! The pool is read-only reference data. The built-in static pool carries a
//! small curated set per category so the engine works without any external
//! collaborator; deployments plug in their own [`ComparableSource`] backed
//! by the marketplace inventory.

use crate::extraction::{fields, AssetCategory, AttributeMap};

use super::types::ComparableAsset;

/// Read-only source of comparable candidates per category.
#[async_trait::async_trait]
pub trait ComparableSource: Send + Sync {
    async fn candidates(&self, category: AssetCategory) -> anyhow::Result<Vec<ComparableAsset>>;
}

/// Built-in static pool with curated reference assets.
#[derive(Debug, Default)]
pub struct StaticComparablePool;

impl StaticComparablePool {
    pub fn new() -> Self {
        Self
    }

    fn real_estate() -> Vec<ComparableAsset> {
        vec![
            reference(
                "re-001",
                AssetCategory::RealEstate,
                "3-Zimmer Altbauwohnung, München Schwabing",
                1_250_000.0,
                92.0,
                &[(fields::AREA, 96.0), (fields::ROOMS, 3.0)],
            ),
            reference(
                "re-002",
                AssetCategory::RealEstate,
                "4-Zimmer Neubauwohnung, München Bogenhausen",
                1_480_000.0,
                88.0,
                &[(fields::AREA, 118.0), (fields::ROOMS, 4.0)],
            ),
            reference(
                "re-003",
                AssetCategory::RealEstate,
                "Penthouse mit Dachterrasse, Hamburg HafenCity",
                1_890_000.0,
                81.0,
                &[(fields::AREA, 142.0), (fields::ROOMS, 4.0)],
            ),
            reference(
                "re-004",
                AssetCategory::RealEstate,
                "2-Zimmer Wohnung, Berlin Prenzlauer Berg",
                640_000.0,
                76.0,
                &[(fields::AREA, 68.0), (fields::ROOMS, 2.0)],
            ),
            reference(
                "re-005",
                AssetCategory::RealEstate,
                "Reihenhaus mit Garten, Leipzig Gohlis",
                485_000.0,
                64.0,
                &[(fields::AREA, 130.0), (fields::ROOMS, 5.0)],
            ),
            reference(
                "re-006",
                AssetCategory::RealEstate,
                "Einfamilienhaus, Stuttgart Vaihingen",
                890_000.0,
                59.0,
                &[(fields::AREA, 155.0), (fields::ROOMS, 6.0)],
            ),
        ]
    }

    fn watches() -> Vec<ComparableAsset> {
        vec![
            reference(
                "wa-001",
                AssetCategory::Watch,
                "Rolex Submariner Date, 2020, Box & Papiere",
                14_800.0,
                95.0,
                &[(fields::YEAR, 2020.0)],
            ),
            reference(
                "wa-002",
                AssetCategory::Watch,
                "Rolex GMT-Master II, 2019",
                17_900.0,
                90.0,
                &[(fields::YEAR, 2019.0)],
            ),
            reference(
                "wa-003",
                AssetCategory::Watch,
                "Omega Speedmaster Professional, 2021",
                6_400.0,
                78.0,
                &[(fields::YEAR, 2021.0)],
            ),
            reference(
                "wa-004",
                AssetCategory::Watch,
                "Patek Philippe Aquanaut, 2018",
                58_000.0,
                71.0,
                &[(fields::YEAR, 2018.0)],
            ),
            reference(
                "wa-005",
                AssetCategory::Watch,
                "Tudor Black Bay 58, 2022",
                3_450.0,
                66.0,
                &[(fields::YEAR, 2022.0)],
            ),
            reference(
                "wa-006",
                AssetCategory::Watch,
                "IWC Portugieser Chronograph, 2017",
                5_900.0,
                60.0,
                &[(fields::YEAR, 2017.0)],
            ),
        ]
    }

    fn vehicles() -> Vec<ComparableAsset> {
        vec![
            reference(
                "ve-001",
                AssetCategory::Vehicle,
                "Porsche 911 Carrera S, 2021, 18.500 km",
                148_000.0,
                94.0,
                &[(fields::YEAR, 2021.0), (fields::MILEAGE, 18_500.0)],
            ),
            reference(
                "ve-002",
                AssetCategory::Vehicle,
                "Porsche 911 Carrera 4, 2020, 31.000 km",
                132_500.0,
                89.0,
                &[(fields::YEAR, 2020.0), (fields::MILEAGE, 31_000.0)],
            ),
            reference(
                "ve-003",
                AssetCategory::Vehicle,
                "Mercedes AMG GT, 2019, 42.000 km",
                98_000.0,
                77.0,
                &[(fields::YEAR, 2019.0), (fields::MILEAGE, 42_000.0)],
            ),
            reference(
                "ve-004",
                AssetCategory::Vehicle,
                "BMW M4 Competition, 2022, 12.000 km",
                86_500.0,
                70.0,
                &[(fields::YEAR, 2022.0), (fields::MILEAGE, 12_000.0)],
            ),
            reference(
                "ve-005",
                AssetCategory::Vehicle,
                "Audi R8 V10, 2018, 55.000 km",
                112_000.0,
                65.0,
                &[(fields::YEAR, 2018.0), (fields::MILEAGE, 55_000.0)],
            ),
        ]
    }
}

#[async_trait::async_trait]
impl ComparableSource for StaticComparablePool {
    async fn candidates(&self, category: AssetCategory) -> anyhow::Result<Vec<ComparableAsset>> {
        Ok(match category {
            AssetCategory::RealEstate => Self::real_estate(),
            AssetCategory::Watch => Self::watches(),
            AssetCategory::Vehicle => Self::vehicles(),
        })
    }
}

fn reference(
    id: &str,
    category: AssetCategory,
    title: &str,
    price: f64,
    similarity_score: f64,
    numbers: &[(&str, f64)],
) -> ComparableAsset {
    let mut attributes = AttributeMap::new();
    for (field, value) in numbers {
        attributes.set_number(field, *value);
    }

    ComparableAsset {
        id: id.to_string(),
        category,
        title: title.to_string(),
        price,
        attributes,
        similarity_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_pool_serves_every_category() {
        let pool = StaticComparablePool::new();
        for category in AssetCategory::ALL {
            let candidates = pool.candidates(category).await.unwrap();
            assert!(!candidates.is_empty());
            assert!(candidates.iter().all(|c| c.category == category));
            assert!(candidates
                .iter()
                .all(|c| (0.0..=100.0).contains(&c.similarity_score)));
        }
    }
}
