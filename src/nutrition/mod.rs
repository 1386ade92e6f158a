//! Nutrition resolution building blocks
//!
//! Label normalization, query variants, candidate scoring and nutrient
//! extraction. All pure functions; the I/O lives in `external` and the
//! orchestration in `resolve`.

pub mod energy;
pub mod extract;
pub mod normalize;
pub mod scoring;

pub use energy::{kcal_to_kj, kj_to_kcal, reconcile, round1, KJ_PER_KCAL};
pub use extract::extract;
pub use normalize::{normalize, variants, NormalizedKey};
pub use scoring::{rank, score, CandidateScore};
