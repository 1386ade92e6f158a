//! Single-label resolution
//!
//! Cascading fallback search: the most faithful variant is tried first and
//! fuzzier ones only when every candidate of the previous variant turned out
//! unusable.

use std::sync::Arc;

use crate::external::FoodSearch;
use crate::models::NutritionRecord;
use crate::nutrition::{extract, rank, variants, NormalizedKey};

/// Resolves one normalized key against the food database, uncached
#[derive(Clone)]
pub struct NutritionResolver {
    search: Arc<dyn FoodSearch>,
}

impl NutritionResolver {
    pub fn new(search: Arc<dyn FoodSearch>) -> Self {
        Self { search }
    }

    /// Resolve a key to the best usable record, or `None` when the database
    /// has nothing usable for it
    pub async fn resolve(&self, key: &NormalizedKey) -> Option<NutritionRecord> {
        for variant in variants(key) {
            let candidates = self.search.search(&variant).await;
            if candidates.is_empty() {
                tracing::debug!("No candidates for variant '{}'", variant);
                continue;
            }

            let total = candidates.len();
            for candidate in rank(candidates) {
                if let Some(record) = extract(&candidate, &variant) {
                    tracing::debug!(
                        key = %key,
                        variant = %variant,
                        product = record.product_name.as_deref().unwrap_or("<unnamed>"),
                        "Resolved nutrition"
                    );
                    return Some(record);
                }
            }
            tracing::debug!("None of {} candidates for '{}' had nutrition data", total, variant);
        }

        if !key.is_empty() {
            tracing::info!("No nutrition data found for '{}'", key);
        }
        None
    }
}
