use dashmap::DashMap;
use lru::LruCache;
use osfws_model::Payload;
use std::num::NonZeroUsize;
use tracing::debug;

/// The default number of entries a single region holds before it starts evicting.
pub const DEFAULT_REGION_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// A cache of operation payloads, partitioned into named regions.
///
/// Invalidation works on whole regions. Each region holds at most `capacity` entries and evicts
/// the least recently used one when it is full.
///
/// Every region carries a generation that [`RegionCache::invalidate`] increments. Readers take the
/// generation with [`RegionCache::generation`] before they query the store and hand it back to
/// [`RegionCache::insert`], which drops payloads computed before an invalidation.
#[derive(Debug)]
pub struct RegionCache {
    regions: DashMap<String, Region>,
    capacity: NonZeroUsize,
}

#[derive(Debug)]
struct Region {
    entries: LruCache<String, Payload>,
    generation: u64,
}

impl Default for RegionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REGION_CAPACITY)
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            regions: DashMap::new(),
            capacity,
        }
    }

    pub fn get(&self, region: &str, key: &str) -> Option<Payload> {
        self.regions
            .get_mut(region)
            .and_then(|mut region| region.entries.get(key).cloned())
    }

    /// Returns the current generation of `region`.
    pub fn generation(&self, region: &str) -> u64 {
        self.regions.get(region).map_or(0, |region| region.generation)
    }

    /// Stores `payload` if `region` has not been invalidated since `generation` was taken.
    ///
    /// Returns whether the payload was stored.
    pub fn insert(
        &self,
        region: &str,
        generation: u64,
        key: impl Into<String>,
        payload: Payload,
    ) -> bool {
        let mut entry = self.region(region);
        if entry.generation != generation {
            debug!(
                region,
                generation,
                current = entry.generation,
                "Dropped payload computed before an invalidation"
            );
            return false;
        }
        entry.entries.put(key.into(), payload);
        true
    }

    /// Drops every entry of `region` and returns how many entries were dropped.
    pub fn invalidate(&self, region: &str) -> usize {
        let mut entry = self.region(region);
        let dropped = entry.entries.len();
        entry.entries.clear();
        entry.generation += 1;
        debug!(region, dropped, "Invalidated cache region");
        dropped
    }

    /// Returns the number of entries in `region`.
    pub fn region_len(&self, region: &str) -> usize {
        self.regions.get(region).map_or(0, |region| region.entries.len())
    }

    fn region(&self, region: &str) -> dashmap::mapref::one::RefMut<'_, String, Region> {
        self.regions
            .entry(region.to_owned())
            .or_insert_with(|| Region {
                entries: LruCache::new(self.capacity),
                generation: 0,
            })
    }
}
