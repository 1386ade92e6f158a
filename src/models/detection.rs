//! Detection records
//!
//! What the object detector hands over per recognized item. Only `label` is
//! read here; every other field is carried through untouched.

use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::NutritionRecord;

/// One detected item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Detection {
    /// Free-text food label from the detector
    #[serde(default)]
    pub label: String,
    /// Detector confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Detector class index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
    /// Any further detector fields (bounding box, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Detection {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            confidence: None,
            class_id: None,
            extra: Map::new(),
        }
    }
}

/// Output field carrying the attached nutrition
pub const NUTRITION_FIELD: &str = "nutrition_per_100g";

/// A detection with its per-100g nutrition attached (`null` when absent)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedDetection {
    #[serde(flatten)]
    pub detection: Detection,
    pub nutrition_per_100g: Option<NutritionRecord>,
}

impl EnrichedDetection {
    /// Attach nutrition, replacing any same-named field the detector sent
    pub fn new(mut detection: Detection, nutrition_per_100g: Option<NutritionRecord>) -> Self {
        detection.extra.remove(NUTRITION_FIELD);
        Self {
            detection,
            nutrition_per_100g,
        }
    }
}
