//! External API clients
//!
//! The food database is reached through the `FoodSearch` seam so the
//! resolver can be driven by a fake in tests.

pub mod openfoodfacts;

pub use openfoodfacts::{
    FoodSearch, OpenFoodFactsClient, OpenFoodFactsConfig, RawCandidate, SearchError, SearchResult,
};
