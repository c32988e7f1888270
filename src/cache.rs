// =============================================================================
// ChartCache — memoised derived series
// =============================================================================
//
// Charts recompute every derived series on each re-render, usually with the
// exact same input.  The cache keys a computed payload by
//
//   (sha256 of the series, overlay tags, indicator tags, parameter fingerprint)
//
// so a hit is always bit-identical to a fresh `IndicatorEngine::compute`.
// Entries are evicted oldest-first once `capacity` is reached; a capacity of
// zero disables caching entirely.
//
// Thread safety: parking_lot::RwLock around the map, atomics for counters.
// =============================================================================

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::engine::{ChartPayload, IndicatorEngine};
use crate::selection::{IndicatorSet, OverlaySet};
use crate::types::OhlcvPoint;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    series_digest: String,
    overlays: OverlaySet,
    indicators: IndicatorSet,
    params: String,
}

#[derive(Default)]
struct Entries {
    map: HashMap<CacheKey, Arc<ChartPayload>>,
    order: VecDeque<CacheKey>,
}

/// Hit / miss counters and occupancy, for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

pub struct ChartCache {
    entries: RwLock<Entries>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hex SHA-256 over every field of every point, in order.
pub fn series_digest(series: &[OhlcvPoint]) -> String {
    let mut hasher = Sha256::new();
    for p in series {
        hasher.update(p.time.to_le_bytes());
        for v in [p.open, p.high, p.low, p.close, p.volume] {
            hasher.update(v.to_bits().to_le_bytes());
        }
    }
    hex::encode(hasher.finalize())
}

impl ChartCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached payload for this input, computing it on a miss.
    pub fn get_or_compute(
        &self,
        engine: &IndicatorEngine,
        series: &[OhlcvPoint],
        overlays: &OverlaySet,
        indicators: &IndicatorSet,
    ) -> Arc<ChartPayload> {
        if self.capacity == 0 {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Arc::new(engine.compute(series, overlays, indicators));
        }

        let key = CacheKey {
            series_digest: series_digest(series),
            overlays: overlays.clone(),
            indicators: indicators.clone(),
            params: engine.params().fingerprint(),
        };

        if let Some(hit) = self.entries.read().map.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(hit);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Computed outside the lock; a concurrent miss on the same key just
        // produces an identical payload.
        let payload = Arc::new(engine.compute(series, overlays, indicators));

        let mut entries = self.entries.write();
        if let Some(existing) = entries.map.get(&key) {
            return Arc::clone(existing);
        }
        entries.order.push_back(key.clone());
        entries.map.insert(key, Arc::clone(&payload));
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.map.remove(&oldest);
                debug!(digest = %oldest.series_digest, "evicted cached chart payload");
            }
        }

        payload
    }

    /// Drop every cached payload (e.g. after a parameter change).
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.map.clear();
        entries.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().map.len(),
            capacity: self.capacity,
        }
    }
}
