//! Process-lifetime postcode cache and the geocoder built on it.
//!
//! Postcodes are treated as static: once a normalized postcode has been
//! resolved, found or not, it is never queried again for the life of the
//! cache. Failed lookups of any kind are cached as misses.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::model::GeoLocation;
use crate::traits::{Geocoder, PostcodeLookup};

/// Cache key form of a postcode: whitespace removed, upper-cased.
pub fn normalize_postcode(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    Found(GeoLocation),
    NotFound,
}

impl CacheEntry {
    pub fn location(&self) -> Option<GeoLocation> {
        match self {
            CacheEntry::Found(location) => Some(location.clone()),
            CacheEntry::NotFound => None,
        }
    }
}

impl From<Option<GeoLocation>> for CacheEntry {
    fn from(location: Option<GeoLocation>) -> Self {
        location.map_or(CacheEntry::NotFound, CacheEntry::Found)
    }
}

/// Shared map from normalized postcode to lookup outcome.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().get(key).cloned()
    }

    /// Record an outcome. The first write for a key wins.
    pub fn insert(&self, key: String, entry: CacheEntry) {
        self.entries.lock().entry(key).or_insert(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// [`Geocoder`] that consults the cache before every lookup.
#[derive(Debug)]
pub struct CachedGeocoder<L> {
    lookup: L,
    cache: GeocodeCache,
}

impl<L: PostcodeLookup> CachedGeocoder<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_cache(lookup, GeocodeCache::new())
    }

    pub fn with_cache(lookup: L, cache: GeocodeCache) -> Self {
        Self { lookup, cache }
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    fn resolve_batch(&self, misses: &[String]) {
        let batch_size = self.lookup.max_batch_size().max(1);

        for chunk in misses.chunks(batch_size) {
            tracing::debug!(count = chunk.len(), "bulk postcode lookup");
            match self.lookup.lookup_batch(chunk) {
                Ok(found) if found.len() == chunk.len() => {
                    for (key, location) in chunk.iter().zip(found) {
                        if location.is_none() {
                            tracing::debug!(postcode = %key, "postcode not found");
                        }
                        self.cache.insert(key.clone(), location.into());
                    }
                }
                Ok(found) => {
                    tracing::warn!(
                        expected = chunk.len(),
                        got = found.len(),
                        "bulk postcode lookup returned wrong number of results"
                    );
                    for key in chunk {
                        self.cache.insert(key.clone(), CacheEntry::NotFound);
                    }
                }
                Err(err) => {
                    tracing::warn!(count = chunk.len(), error = %err, "bulk postcode lookup failed");
                    for key in chunk {
                        self.cache.insert(key.clone(), CacheEntry::NotFound);
                    }
                }
            }
        }
    }
}

impl<L: PostcodeLookup> Geocoder for CachedGeocoder<L> {
    fn geocode(&self, postcode: &str) -> Option<GeoLocation> {
        let key = normalize_postcode(postcode);
        if key.is_empty() {
            return None;
        }

        if let Some(entry) = self.cache.get(&key) {
            tracing::debug!(postcode = %key, "geocode cache hit");
            return entry.location();
        }

        let entry = match self.lookup.lookup(&key) {
            Ok(location) => CacheEntry::from(location),
            Err(err) => {
                tracing::warn!(postcode = %key, error = %err, "postcode lookup failed");
                CacheEntry::NotFound
            }
        };
        let location = entry.location();
        self.cache.insert(key, entry);
        location
    }

    fn geocode_many(&self, postcodes: &[String]) -> Vec<Option<GeoLocation>> {
        let keys: Vec<String> = postcodes.iter().map(|raw| normalize_postcode(raw)).collect();
        let mut results: Vec<Option<GeoLocation>> = vec![None; keys.len()];
        let mut pending: Vec<usize> = Vec::new();
        let mut misses: Vec<String> = Vec::new();
        let mut queued: HashSet<&str> = HashSet::new();

        for (index, key) in keys.iter().enumerate() {
            if key.is_empty() {
                continue;
            }
            match self.cache.get(key) {
                Some(entry) => results[index] = entry.location(),
                None => {
                    pending.push(index);
                    if queued.insert(key.as_str()) {
                        misses.push(key.clone());
                    }
                }
            }
        }

        tracing::debug!(
            total = keys.len(),
            hits = keys.len() - pending.len(),
            misses = misses.len(),
            "bulk geocode"
        );

        if !misses.is_empty() {
            self.resolve_batch(&misses);
        }

        for index in pending {
            results[index] = self.cache.get(&keys[index]).and_then(|entry| entry.location());
        }

        results
    }
}
