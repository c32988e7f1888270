// =============================================================================
// Central Application State — ProChart service
// =============================================================================
//
// Shared across all request handlers via `Arc<AppState>`.
//
// Thread safety:
//   - Atomic counter for requests served.
//   - parking_lot::RwLock around the runtime config.
//   - The chart cache manages its own interior mutability.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::cache::ChartCache;
use crate::engine::{IndicatorEngine, IndicatorParams};
use crate::runtime_config::RuntimeConfig;

pub struct AppState {
    pub runtime_config: RwLock<RuntimeConfig>,
    pub cache: ChartCache,
    /// Where parameter changes are persisted; `None` keeps them in memory.
    pub config_path: Option<PathBuf>,
    requests_served: AtomicU64,
}

impl AppState {
    pub fn new(config: RuntimeConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            cache: ChartCache::new(config.cache_capacity),
            runtime_config: RwLock::new(config),
            config_path,
            requests_served: AtomicU64::new(0),
        }
    }

    /// An engine configured with the current indicator parameters.
    pub fn engine(&self) -> IndicatorEngine {
        IndicatorEngine::new(self.runtime_config.read().indicator_params)
    }

    /// Replace the indicator parameters.  Cached payloads are dropped since
    /// their keys can no longer be hit.
    pub fn set_indicator_params(&self, params: IndicatorParams) {
        self.runtime_config.write().indicator_params = params;
        self.cache.clear();
    }

    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}
