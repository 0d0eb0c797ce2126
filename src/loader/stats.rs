//! Lookup counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters kept by a loader
#[derive(Debug, Default)]
pub struct LoaderStats {
    cache_hits: AtomicU64,
    negative_hits: AtomicU64,
    host_unit_lookups: AtomicU64,
    local_searches: AtomicU64,
    byte_reads: AtomicU64,
    definitions: AtomicU64,
}

/// Point-in-time copy of [`LoaderStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Unit lookups answered from the positive cache
    pub cache_hits: u64,
    /// Unit lookups answered from the negative cache
    pub negative_hits: u64,
    /// Unit lookups forwarded to the host
    pub host_unit_lookups: u64,
    /// Unit lookups that searched registered sources
    pub local_searches: u64,
    /// Unit byte reads attempted against a locator
    pub byte_reads: u64,
    /// Units defined from local bytes
    pub definitions: u64,
}

impl LoaderStats {
    pub(crate) fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn negative_hit(&self) {
        self.negative_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn host_lookup(&self) {
        self.host_unit_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn local_search(&self) {
        self.local_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn byte_read(&self) {
        self.byte_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn definition(&self) {
        self.definitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            negative_hits: self.negative_hits.load(Ordering::Relaxed),
            host_unit_lookups: self.host_unit_lookups.load(Ordering::Relaxed),
            local_searches: self.local_searches.load(Ordering::Relaxed),
            byte_reads: self.byte_reads.load(Ordering::Relaxed),
            definitions: self.definitions.load(Ordering::Relaxed),
        }
    }
}
