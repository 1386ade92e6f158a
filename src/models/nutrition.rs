//! Resolved nutrition record
//!
//! Per-100g values for one detected label, as handed back to callers.

use serde::{Deserialize, Serialize};

/// Provenance tag carried by every record
pub const SOURCE_OPEN_FOOD_FACTS: &str = "OpenFoodFacts";

/// Nutrition facts per 100 g
///
/// At least one of the six numeric fields is always present; a candidate
/// with none of them never becomes a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// The search variant that produced this record
    pub query: String,
    pub product_name: Option<String>,
    pub energy_kj: Option<f64>,
    pub energy_kcal: Option<f64>,
    pub fat_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub sugars_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub source: String,
}

impl NutritionRecord {
    /// Number of numeric fields carrying a value
    pub fn field_count(&self) -> usize {
        [
            self.energy_kj,
            self.energy_kcal,
            self.fat_g,
            self.carbs_g,
            self.sugars_g,
            self.protein_g,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// Cached outcome for one key: a record, or an explicit absence
pub type ResolutionEntry = Option<NutritionRecord>;
