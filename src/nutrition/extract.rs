//! Nutrient extraction
//!
//! Turns one raw candidate into a `NutritionRecord`, reconciling kJ/kcal and
//! rounding every value to one decimal.

use crate::external::RawCandidate;
use crate::models::{NutritionRecord, SOURCE_OPEN_FOOD_FACTS};

use super::energy::{reconcile, round1};

// Open Food Facts nutrient keys (per 100 g)
pub const ENERGY_KJ_KEY: &str = "energy-kj_100g";
/// Some entries only carry the generic energy field, which is in kJ
pub const ENERGY_GENERIC_KEY: &str = "energy_100g";
pub const ENERGY_KCAL_KEY: &str = "energy-kcal_100g";
pub const FAT_KEY: &str = "fat_100g";
pub const CARBS_KEY: &str = "carbohydrates_100g";
pub const SUGARS_KEY: &str = "sugars_100g";
pub const PROTEIN_KEY: &str = "proteins_100g";

/// Extract a record from a candidate, or `None` if it carries no usable values
pub fn extract(candidate: &RawCandidate, query_used: &str) -> Option<NutritionRecord> {
    let kj = candidate
        .nutrient(ENERGY_KJ_KEY)
        .or_else(|| candidate.nutrient(ENERGY_GENERIC_KEY));
    let kcal = candidate.nutrient(ENERGY_KCAL_KEY);
    let (kj, kcal) = reconcile(kj, kcal);

    let record = NutritionRecord {
        query: query_used.to_string(),
        product_name: candidate.product_name.clone(),
        energy_kj: kj.map(round1),
        energy_kcal: kcal.map(round1),
        fat_g: candidate.nutrient(FAT_KEY).map(round1),
        carbs_g: candidate.nutrient(CARBS_KEY).map(round1),
        sugars_g: candidate.nutrient(SUGARS_KEY).map(round1),
        protein_g: candidate.nutrient(PROTEIN_KEY).map(round1),
        source: SOURCE_OPEN_FOOD_FACTS.to_string(),
    };

    if record.field_count() == 0 {
        return None;
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(nutrients: serde_json::Value) -> RawCandidate {
        serde_json::from_value(json!({
            "product_name": "Test product",
            "lang": "en",
            "nutriments": nutrients
        }))
        .unwrap()
    }

    #[test]
    fn test_extract_derives_kj_from_kcal() {
        let record = extract(&candidate(json!({"energy-kcal_100g": 52})), "apple").unwrap();
        assert_eq!(record.energy_kcal, Some(52.0));
        assert_eq!(record.energy_kj, Some(217.6));
        assert_eq!(record.query, "apple");
        assert_eq!(record.source, "OpenFoodFacts");
        assert_eq!(record.product_name.as_deref(), Some("Test product"));
    }

    #[test]
    fn test_extract_derives_kcal_from_kj() {
        let record = extract(&candidate(json!({"energy-kj_100g": 217.6})), "apple").unwrap();
        assert_eq!(record.energy_kj, Some(217.6));
        assert_eq!(record.energy_kcal, Some(52.0));
    }

    #[test]
    fn test_extract_falls_back_to_generic_energy() {
        let record = extract(&candidate(json!({"energy_100g": "418.4"})), "x").unwrap();
        assert_eq!(record.energy_kj, Some(418.4));
        assert_eq!(record.energy_kcal, Some(100.0));

        // Unparseable kJ field still lets the generic one through
        let record = extract(
            &candidate(json!({"energy-kj_100g": "?", "energy_100g": 100})),
            "x",
        )
        .unwrap();
        assert_eq!(record.energy_kj, Some(100.0));
    }

    #[test]
    fn test_extract_keeps_both_energies_as_is() {
        let record = extract(
            &candidate(json!({"energy-kj_100g": 1000.04, "energy-kcal_100g": 100.26})),
            "x",
        )
        .unwrap();
        assert_eq!(record.energy_kj, Some(1000.0));
        assert_eq!(record.energy_kcal, Some(100.3));
    }

    #[test]
    fn test_extract_rounds_half_way_macros_to_even() {
        let record = extract(
            &candidate(json!({"fat_100g": 0.25, "sugars_100g": 0.35, "proteins_100g": "0.45"})),
            "x",
        )
        .unwrap();
        assert_eq!(record.fat_g, Some(0.2));
        assert_eq!(record.sugars_g, Some(0.3));
        assert_eq!(record.protein_g, Some(0.5));
    }

    #[test]
    fn test_extract_rounds_macros() {
        let record = extract(
            &candidate(json!({
                "fat_100g": 0.17,
                "carbohydrates_100g": "13.81",
                "sugars_100g": 10.39,
                "proteins_100g": 0.26
            })),
            "apple",
        )
        .unwrap();
        assert_eq!(record.fat_g, Some(0.2));
        assert_eq!(record.carbs_g, Some(13.8));
        assert_eq!(record.sugars_g, Some(10.4));
        assert_eq!(record.protein_g, Some(0.3));
        assert_eq!(record.energy_kj, None);
        assert_eq!(record.energy_kcal, None);
    }

    #[test]
    fn test_extract_zero_is_a_value() {
        let record = extract(&candidate(json!({"fat_100g": 0})), "water").unwrap();
        assert_eq!(record.fat_g, Some(0.0));
    }

    #[test]
    fn test_extract_nothing_usable() {
        assert!(extract(&candidate(json!({})), "x").is_none());
        assert!(extract(
            &candidate(json!({"fat_100g": "n/a", "proteins_100g": null, "salt_100g": 1.2})),
            "x"
        )
        .is_none());
        assert!(extract(&RawCandidate::default(), "x").is_none());
    }

    #[test]
    fn test_extract_missing_product_name() {
        let c = RawCandidate {
            nutriments: json!({"sugars_100g": 5})
                .as_object()
                .cloned()
                .unwrap_or_default(),
            ..RawCandidate::default()
        };
        let record = extract(&c, "x").unwrap();
        assert_eq!(record.product_name, None);
        assert_eq!(record.sugars_g, Some(5.0));
    }
}
