// =============================================================================
// Runtime Configuration — service settings with atomic save
// =============================================================================
//
// Every tunable of the chart service lives here.  All fields carry
// `#[serde(default)]` so that adding new fields never breaks loading an older
// config file.  Persistence uses an atomic tmp + rename pattern.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::IndicatorParams;
use crate::types::Timeframe;

pub const DEFAULT_CONFIG_PATH: &str = "prochart_config.json";

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_cache_capacity() -> usize {
    256
}

fn default_mock_points() -> usize {
    200
}

fn default_max_points() -> usize {
    5_000
}

/// Top-level runtime configuration for the chart service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum number of memoised chart payloads; 0 disables the cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Bars generated by the mock source when the request does not say.
    #[serde(default = "default_mock_points")]
    pub mock_points: usize,

    /// Upper bound on bars accepted or generated per request.
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// Timeframe used when a request omits one.
    #[serde(default)]
    pub default_timeframe: Timeframe,

    /// Overlay / oscillator parameters.
    #[serde(default)]
    pub indicator_params: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cache_capacity: default_cache_capacity(),
            mock_points: default_mock_points(),
            max_points: default_max_points(),
            default_timeframe: Timeframe::default(),
            indicator_params: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            cache_capacity = config.cache_capacity,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Apply `PROCHART_BIND_ADDR` / `PROCHART_CACHE_CAPACITY` overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("PROCHART_BIND_ADDR") {
            if !addr.trim().is_empty() {
                self.bind_addr = addr.trim().to_string();
            }
        }
        if let Ok(cap) = std::env::var("PROCHART_CACHE_CAPACITY") {
            match cap.trim().parse() {
                Ok(cap) => self.cache_capacity = cap,
                Err(_) => tracing::warn!(value = %cap, "ignoring invalid PROCHART_CACHE_CAPACITY"),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.cache_capacity, 256);
        assert_eq!(cfg.mock_points, 200);
        assert_eq!(cfg.default_timeframe, Timeframe::OneDay);
        assert_eq!(cfg.indicator_params, IndicatorParams::default());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.max_points, 5_000);
        assert_eq!(cfg.indicator_params.macd_signal, 9);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "default_timeframe": "4H", "indicator_params": { "bbands_mult": 2.5 } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.default_timeframe, Timeframe::FourHours);
        assert!((cfg.indicator_params.bbands_mult - 2.5).abs() < f64::EPSILON);
        assert_eq!(cfg.indicator_params.bbands_period, 20);
        assert_eq!(cfg.cache_capacity, 256);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("prochart-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut cfg = RuntimeConfig::default();
        cfg.cache_capacity = 3;
        cfg.indicator_params.rsi_period = 21;
        cfg.save(&path).unwrap();

        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded.cache_capacity, 3);
        assert_eq!(loaded.indicator_params.rsi_period, 21);
        assert!(!path.with_extension("json.tmp").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn env_overrides_apply_and_invalid_capacity_is_ignored() {
        std::env::set_var("PROCHART_BIND_ADDR", "  127.0.0.1:39417 ");
        std::env::set_var("PROCHART_CACHE_CAPACITY", " 17 ");
        let mut cfg = RuntimeConfig::default();
        cfg.apply_env_overrides();
        assert_eq!(cfg.bind_addr, "127.0.0.1:39417");
        assert_eq!(cfg.cache_capacity, 17);

        std::env::set_var("PROCHART_BIND_ADDR", "   ");
        std::env::set_var("PROCHART_CACHE_CAPACITY", "lots");
        let mut cfg = RuntimeConfig::default();
        cfg.apply_env_overrides();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.cache_capacity, 256);

        std::env::remove_var("PROCHART_BIND_ADDR");
        std::env::remove_var("PROCHART_CACHE_CAPACITY");
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(RuntimeConfig::load("/definitely/not/here.json").is_err());
    }
}
