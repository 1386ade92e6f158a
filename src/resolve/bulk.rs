//! Batch resolution
//!
//! Entry point for a batch of detector labels: normalize, drop empties,
//! deduplicate, and resolve each distinct key once through the shared cache.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::ResolutionEntry;
use crate::nutrition::{normalize, NormalizedKey};

use super::cache::ResolutionCache;
use super::resolver::NutritionResolver;

/// Normalized key -> record-or-absent, in first-seen order
///
/// Serializes as a JSON object with `null` for absent entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkResolution {
    entries: Vec<(NormalizedKey, ResolutionEntry)>,
}

impl BulkResolution {
    /// Look up by raw or normalized label
    pub fn get(&self, label: &str) -> Option<&ResolutionEntry> {
        let key = normalize(label);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, entry)| entry)
    }

    /// Keyed view for repeated lookups by normalized key
    pub fn index(&self) -> HashMap<&NormalizedKey, &ResolutionEntry> {
        self.entries.iter().map(|(k, v)| (k, v)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &NormalizedKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedKey, &ResolutionEntry)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Number of keys that resolved to a record
    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|(_, e)| e.is_some()).count()
    }
}

impl IntoIterator for BulkResolution {
    type Item = (NormalizedKey, ResolutionEntry);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for BulkResolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key.as_str(), entry)?;
        }
        map.end()
    }
}

/// Resolves batches of labels with a constructor-injected cache
///
/// Clones share the same cache, so one instance (or its clones) can serve
/// every request in the process.
#[derive(Clone)]
pub struct BulkResolver {
    resolver: NutritionResolver,
    cache: Arc<ResolutionCache>,
}

impl BulkResolver {
    pub fn new(resolver: NutritionResolver, cache: Arc<ResolutionCache>) -> Self {
        Self { resolver, cache }
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Resolve one normalized key through the cache
    pub async fn resolve_key(&self, key: &NormalizedKey) -> ResolutionEntry {
        if key.is_empty() {
            return None;
        }
        self.cache
            .get_or_compute(key, || self.resolver.resolve(key))
            .await
    }

    /// Resolve a batch of raw labels
    ///
    /// Issues external lookups only for distinct keys not already cached.
    pub async fn resolve_many<S: AsRef<str>>(&self, labels: &[S]) -> BulkResolution {
        let mut seen: HashSet<NormalizedKey> = HashSet::new();
        let mut entries = Vec::new();

        for label in labels {
            let key = normalize(label.as_ref());
            if key.is_empty() || !seen.insert(key.clone()) {
                continue;
            }
            let entry = self.resolve_key(&key).await;
            entries.push((key, entry));
        }

        tracing::debug!(
            labels = labels.len(),
            distinct = entries.len(),
            "Resolved label batch"
        );
        BulkResolution { entries }
    }
}
