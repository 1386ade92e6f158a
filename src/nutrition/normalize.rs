//! Label normalization and search-variant generation
//!
//! Detector labels arrive as free text ("Hot_Dog", " 7up", "french-fries").
//! The food database indexes hand-written product names with inconsistent
//! spacing, so one label is turned into a few spelling variants that are
//! tried in order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum key length (in characters) before the compound split is attempted
const COMPOUND_SPLIT_MIN_LEN: usize = 6;

/// Characters kept on the right-hand side of the compound split
const COMPOUND_SPLIT_TAIL: usize = 3;

/// A canonicalized label: trimmed, lowercase, `_`/`-` replaced by spaces,
/// whitespace runs collapsed to a single space
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty keys mean "no label" and must be skipped by callers
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw detector label
///
/// Idempotent: normalizing an already normalized key returns it unchanged.
pub fn normalize(raw: &str) -> NormalizedKey {
    let lowered = raw.to_lowercase().replace(['_', '-'], " ");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    NormalizedKey(collapsed)
}

/// Produce the ordered, deduplicated search variants for a key
///
/// Order: the key itself, the key with letter/digit boundaries spaced out,
/// and for single words of six or more characters a compound split three
/// characters from the end ("hotdog" -> "hot dog"). The split point is a
/// heuristic, not a dictionary segmentation.
pub fn variants(key: &NormalizedKey) -> Vec<String> {
    let base = key.as_str();
    let mut candidates = vec![base.to_string(), space_digit_boundaries(base)];

    if !base.contains(' ') {
        if let Some(split) = compound_split(base) {
            candidates.push(split);
        }
    }

    let mut out: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

/// Insert a space at every letter/digit transition ("7up" -> "7 up", "b12x" -> "b 12 x")
fn space_digit_boundaries(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if let Some(p) = prev {
            let boundary = (p.is_ascii_digit() && c.is_alphabetic())
                || (p.is_alphabetic() && c.is_ascii_digit());
            if boundary {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn compound_split(s: &str) -> Option<String> {
    if s.chars().count() < COMPOUND_SPLIT_MIN_LEN {
        return None;
    }
    // Byte offset of the third character from the end
    let (idx, _) = s.char_indices().rev().nth(COMPOUND_SPLIT_TAIL - 1)?;
    Some(format!("{} {}", &s[..idx], &s[idx..]))
}
