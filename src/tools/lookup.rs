//! Nutrition lookup tools
//!
//! Batch label lookup and detection enrichment on top of `BulkResolver`.

use serde::Serialize;

use crate::models::{Detection, EnrichedDetection};
use crate::nutrition::{normalize, NormalizedKey};
use crate::resolve::{BulkResolution, BulkResolver};

/// Response for lookup_nutrition
#[derive(Debug, Serialize)]
pub struct LookupNutritionResponse {
    /// Normalized label -> nutrition per 100 g, or null
    pub nutrition: BulkResolution,
    pub labels_received: usize,
    pub distinct_labels: usize,
    pub resolved: usize,
    pub absent: usize,
}

/// Response for enrich_detections
#[derive(Debug, Serialize)]
pub struct EnrichDetectionsResponse {
    pub items: Vec<EnrichedDetection>,
    pub resolved: usize,
}

/// Resolve a batch of raw labels
pub async fn lookup_nutrition(resolver: &BulkResolver, labels: &[String]) -> LookupNutritionResponse {
    let nutrition = resolver.resolve_many(labels).await;
    let resolved = nutrition.resolved_count();

    LookupNutritionResponse {
        labels_received: labels.len(),
        distinct_labels: nutrition.len(),
        resolved,
        absent: nutrition.len() - resolved,
        nutrition,
    }
}

/// Attach `nutrition_per_100g` to each detection
///
/// Labels are resolved in one batch; absent nutrition passes through as null.
pub async fn enrich_detections(
    resolver: &BulkResolver,
    detections: Vec<Detection>,
) -> EnrichDetectionsResponse {
    let keys: Vec<NormalizedKey> = detections.iter().map(|d| normalize(&d.label)).collect();
    let nutrition = resolver.resolve_many(&keys).await;
    let index = nutrition.index();

    let items: Vec<EnrichedDetection> = detections
        .into_iter()
        .zip(&keys)
        .map(|(detection, key)| {
            let record = index.get(key).and_then(|entry| (*entry).clone());
            EnrichedDetection::new(detection, record)
        })
        .collect();

    let resolved = items
        .iter()
        .filter(|item| item.nutrition_per_100g.is_some())
        .count();

    EnrichDetectionsResponse { items, resolved }
}
