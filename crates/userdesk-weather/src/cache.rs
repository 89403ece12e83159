//! Per-state forecast cache with a fixed time-to-live.
//!
//! Entries are never evicted. Staleness is judged at read time, so an
//! expired entry stays available as a fallback when a refresh fails.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::provider::ForecastData;
use crate::regions::RegionCode;

/// One hour.
pub const CACHE_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub payload: ForecastData,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ForecastCache {
    entries: Mutex<HashMap<RegionCode, CacheEntry>>,
    ttl: Duration,
}

impl Default for ForecastCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(CACHE_TTL_SECS),
        }
    }

    /// Snapshot of the entry for `code`, fresh or not.
    pub fn get(&self, code: RegionCode) -> Option<CacheEntry> {
        self.entries.lock().get(&code).cloned()
    }

    /// Replace whatever is stored for `code`.
    pub fn put(&self, code: RegionCode, payload: ForecastData, now: DateTime<Utc>) {
        self.entries.lock().insert(
            code,
            CacheEntry {
                payload,
                fetched_at: now,
            },
        );
    }

    pub fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.fetched_at) < self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
