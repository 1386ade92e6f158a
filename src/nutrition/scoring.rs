//! Candidate ranking
//!
//! Searches return many near-duplicates (regional variants, branded
//! products). Candidates are ordered by a score tuple compared
//! lexicographically: nutrient completeness, then language preference,
//! then whether the product is tagged as a generic food group.

use crate::external::RawCandidate;

use super::extract::{
    CARBS_KEY, ENERGY_GENERIC_KEY, ENERGY_KCAL_KEY, ENERGY_KJ_KEY, FAT_KEY, PROTEIN_KEY,
    SUGARS_KEY,
};

/// Declared languages that earn the language bonus
pub const PREFERRED_LANGUAGES: [&str; 2] = ["de", "en"];

/// Category tag fragments marking generic food groups
pub const GENERIC_CATEGORY_MARKERS: [&str; 5] = [
    "en:generic",
    "en:fruits",
    "en:vegetables",
    "de:obst",
    "de:gemuese",
];

const LANGUAGE_BONUS: u8 = 2;
const GENERIC_BONUS: u8 = 1;

/// Score of one candidate; derives `Ord` so comparison is lexicographic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CandidateScore {
    /// Number of the six nutrition fields present (0-6)
    pub completeness: u8,
    /// 2 for a preferred language, else 0
    pub language: u8,
    /// 1 when tagged with a generic food group, else 0
    pub generic: u8,
}

pub fn completeness(candidate: &RawCandidate) -> u8 {
    let energy_kj =
        candidate.has_nutrient(ENERGY_KJ_KEY) || candidate.has_nutrient(ENERGY_GENERIC_KEY);
    let rest = [ENERGY_KCAL_KEY, FAT_KEY, CARBS_KEY, SUGARS_KEY, PROTEIN_KEY]
        .iter()
        .filter(|key| candidate.has_nutrient(key))
        .count() as u8;
    rest + u8::from(energy_kj)
}

pub fn language_score(candidate: &RawCandidate) -> u8 {
    let lang = candidate
        .lang
        .as_deref()
        .map(|l| l.trim().to_lowercase())
        .unwrap_or_default();
    if PREFERRED_LANGUAGES.contains(&lang.as_str()) {
        LANGUAGE_BONUS
    } else {
        0
    }
}

pub fn generic_score(candidate: &RawCandidate) -> u8 {
    let hit = candidate.categories_tags.iter().any(|tag| {
        GENERIC_CATEGORY_MARKERS
            .iter()
            .any(|marker| tag.contains(marker))
    });
    if hit {
        GENERIC_BONUS
    } else {
        0
    }
}

pub fn score(candidate: &RawCandidate) -> CandidateScore {
    CandidateScore {
        completeness: completeness(candidate),
        language: language_score(candidate),
        generic: generic_score(candidate),
    }
}

/// Order candidates best first
///
/// The sort is stable: equal scores keep the order the database returned,
/// which is itself not guaranteed stable across calls.
pub fn rank(mut candidates: Vec<RawCandidate>) -> Vec<RawCandidate> {
    candidates.sort_by_cached_key(|c| std::cmp::Reverse(score(c)));
    candidates
}
