//! Data models
//!
//! Records exchanged with callers and rows of the feedback log.

mod detection;
mod feedback;
mod nutrition;

pub use detection::{Detection, EnrichedDetection, NUTRITION_FIELD};
pub use feedback::{Feedback, FeedbackCreate, UNKNOWN_SHA256};
pub use nutrition::{NutritionRecord, ResolutionEntry, SOURCE_OPEN_FOOD_FACTS};
