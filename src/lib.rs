// =============================================================================
// ProChart indicator engine
// =============================================================================
//
// Turns an ordered OHLCV series plus a selection of overlays and indicators
// into plot-ready derived series on the same time axis:
//
//   overlays    sma20, sma50, sma200, bbands
//   indicators  rsi, macd, volume  (stochRsi, vwap, atr accepted, not drawn)
//
// The computational core (`indicators`, `engine`) is pure and synchronous.
// Around it sit an optional memoisation layer, input normalisation for the
// price-history provider, a mock price source, and a small HTTP service.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod cache;
pub mod engine;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod selection;
pub mod tooltip;
pub mod types;

pub use engine::{ChartPayload, IndicatorEngine, IndicatorOutput, IndicatorParams, OverlayOutput};
pub use selection::{IndicatorKind, IndicatorSet, Overlay, OverlaySet};
pub use types::{ColorTag, ColoredPoint, OhlcvPoint, SeriesPoint, Timeframe};
