use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use geojson::FeatureCollection;

use crate::region::RegionKey;

/// Cache slot: the country-wide states document, or one state's districts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    States,
    Districts(RegionKey),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::States => f.write_str("states"),
            CacheKey::Districts(key) => write!(f, "{key}"),
        }
    }
}

/// Fetched boundary documents, kept for the lifetime of the page.
///
/// Entries are write-once: there is no eviction, expiry, or overwrite.
#[derive(Debug, Default, Clone)]
pub struct BoundaryCache {
    entries: HashMap<CacheKey, Rc<FeatureCollection>>,
}

impl BoundaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Rc<FeatureCollection>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `doc` under `key`. Returns `false` and keeps the existing entry if
    /// the key was already filled.
    pub fn put(&mut self, key: CacheKey, doc: FeatureCollection) -> bool {
        if self.entries.contains_key(&key) {
            tracing::debug!(key = %key, "boundary cache entry already present, keeping first");
            return false;
        }
        tracing::debug!(key = %key, features = doc.features.len(), "caching boundary document");
        self.entries.insert(key, Rc::new(doc));
        true
    }

    pub fn states(&self) -> Option<Rc<FeatureCollection>> {
        self.get(&CacheKey::States)
    }

    pub fn districts(&self, key: &RegionKey) -> Option<Rc<FeatureCollection>> {
        self.get(&CacheKey::Districts(key.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
