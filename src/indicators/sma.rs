// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted arithmetic mean of the closes in a trailing window.  The first
// value is emitted at index `period - 1`, so the output is `len - period + 1`
// points long.
// =============================================================================

use crate::indicators::{closes, stamp_trailing};
use crate::types::{OhlcvPoint, SeriesPoint};

/// Compute the SMA series for `values` over `period`.
///
/// Returns an empty `Vec` when `period == 0` or `values.len() < period`.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period_f)
        .collect()
}

/// SMA of the closes of `series`, timestamped at the last bar of each window.
pub fn sma(series: &[OhlcvPoint], period: usize) -> Vec<SeriesPoint> {
    let values = calculate_sma(&closes(series), period);
    stamp_trailing(series, &values)
}
