//! Nutrition resolution engine
//!
//! `NutritionResolver` runs the cascading search for one key,
//! `ResolutionCache` memoizes outcomes with single-flight semantics, and
//! `BulkResolver` is what the rest of the crate calls per batch.

pub mod bulk;
pub mod cache;
pub mod resolver;

use std::sync::Arc;

pub use bulk::{BulkResolution, BulkResolver};
pub use cache::{CacheStats, ResolutionCache};
pub use resolver::NutritionResolver;

use crate::external::{OpenFoodFactsClient, OpenFoodFactsConfig, SearchResult};

/// Wire a bulk resolver to the live Open Food Facts API with a fresh cache
pub fn open_food_facts(config: OpenFoodFactsConfig, cache_capacity: usize) -> SearchResult<BulkResolver> {
    let client = OpenFoodFactsClient::new(config)?;
    Ok(BulkResolver::new(
        NutritionResolver::new(Arc::new(client)),
        Arc::new(ResolutionCache::with_capacity(cache_capacity)),
    ))
}
