// =============================================================================
// Bollinger Bands
// =============================================================================
//
// An envelope of `mean ± mult * σ` around the SMA of the closes, where σ is
// the *population* standard deviation of the window:
//
//   variance = Σ (x - mean)² / period
//
// Both bands share the SMA warm-up: one point per window ending at index
// `period - 1 ..= len - 1`.

use serde::{Deserialize, Serialize};

use crate::indicators::{closes, stamp_trailing};
use crate::types::{OhlcvPoint, SeriesPoint};

/// Upper and lower band series on the same time axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: Vec<SeriesPoint>,
    pub lower: Vec<SeriesPoint>,
}

/// Compute `(upper, lower)` band values for every full window of `values`.
///
/// Returns empty vectors when `period == 0` or `values.len() < period`.
pub fn calculate_bollinger(values: &[f64], period: usize, mult: f64) -> (Vec<f64>, Vec<f64>) {
    if period == 0 || values.len() < period {
        return (Vec::new(), Vec::new());
    }

    let period_f = period as f64;
    values
        .windows(period)
        .map(|window| {
            let mean = window.iter().sum::<f64>() / period_f;
            let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f;
            let sd = variance.sqrt();
            (mean + mult * sd, mean - mult * sd)
        })
        .unzip()
}

/// Bollinger Bands over the closes of `series`.
pub fn bbands(series: &[OhlcvPoint], period: usize, mult: f64) -> BollingerBands {
    let (upper, lower) = calculate_bollinger(&closes(series), period, mult);
    BollingerBands {
        upper: stamp_trailing(series, &upper),
        lower: stamp_trailing(series, &lower),
    }
}
