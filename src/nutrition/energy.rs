//! Energy units and rounding
//!
//! Nutrition values are reported per 100 g, rounded to one decimal place.

/// Kilojoules per kilocalorie (thermochemical calorie)
pub const KJ_PER_KCAL: f64 = 4.184;

/// Round to one decimal place
///
/// Rounds the exact binary value, ties to even, so `0.25` becomes `0.2`
/// and `0.35` (stored just below) becomes `0.3`.
pub fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Convert kilocalories to kilojoules, rounded to one decimal
pub fn kcal_to_kj(kcal: f64) -> f64 {
    round1(kcal * KJ_PER_KCAL)
}

/// Convert kilojoules to kilocalories, rounded to one decimal
pub fn kj_to_kcal(kj: f64) -> f64 {
    round1(kj / KJ_PER_KCAL)
}

/// Fill in whichever of kJ/kcal is missing from the other
///
/// When both are present they are returned untouched; the database often
/// carries slightly inconsistent pairs and no cross-validation is done.
pub fn reconcile(kj: Option<f64>, kcal: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (kj, kcal) {
        (None, Some(kcal)) => (Some(kcal_to_kj(kcal)), Some(kcal)),
        (Some(kj), None) => (Some(kj), Some(kj_to_kcal(kj))),
        other => other,
    }
}
