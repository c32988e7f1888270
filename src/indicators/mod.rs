// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the chart overlays and
// oscillators.  Each submodule exposes a `calculate_*` function over raw
// values plus a wrapper that stamps results with the matching `time` of the
// source OHLCV series.
//
// Insufficient data is never an error: a series shorter than the warm-up
// period simply yields an empty (or shorter) result.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volume;

pub use bollinger::{bbands, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
pub use sma::sma;
pub use volume::volume_series;

use crate::types::{OhlcvPoint, SeriesPoint};

/// Extract the close prices of `series`.
pub fn closes(series: &[OhlcvPoint]) -> Vec<f64> {
    series.iter().map(|p| p.close).collect()
}

/// Stamp `values` with the times of the trailing `values.len()` points of
/// `series`.  Every warm-up based indicator produces a strict suffix of the
/// input axis, so the time of `values[k]` is `series[series.len() - values.len() + k]`.
pub(crate) fn stamp_trailing(series: &[OhlcvPoint], values: &[f64]) -> Vec<SeriesPoint> {
    debug_assert!(values.len() <= series.len());
    let offset = series.len() - values.len();
    series[offset..]
        .iter()
        .zip(values)
        .map(|(p, &v)| SeriesPoint::new(p.time, v))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::OhlcvPoint;

    /// Build a series from close prices with times 1000, 1060, 1120, ...
    pub fn series_from_closes(closes: &[f64]) -> Vec<OhlcvPoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvPoint {
                time: 1_000 + 60 * i as i64,
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1.0,
            })
            .collect()
    }

    /// A deterministic zig-zag that rises over time but has down steps.
    pub fn wavy(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + i as f64 * 0.3 + ((i * 7) % 11) as f64 - 5.0)
            .collect()
    }
}
