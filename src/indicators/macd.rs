// =============================================================================
// MACD (Moving Average Convergence Divergence)
// =============================================================================
//
//   macd      = EMA(close, fast) - EMA(close, slow)
//   signal    = EMA(macd, signal)
//   histogram = macd - signal
//
// Each EMA stage trims its own warm-up from the front, so the three output
// lines are successively shorter suffixes of the input axis:
//
//   EMA(fast)  starts at bar fast - 1
//   EMA(slow)  starts at bar slow - 1
//   macd       the common trailing range of both EMAs
//   signal     starts `signal - 1` values into the macd line
//   histogram  shares the signal line's axis
//
// Every line is stamped by indexing back into the source series from the end,
// which keeps the accumulated offsets exact at each boundary.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::{calculate_ema, closes, stamp_trailing};
use crate::types::{ColorTag, ColoredPoint, OhlcvPoint, SeriesPoint};

/// The three MACD output lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: Vec<SeriesPoint>,
    pub signal: Vec<SeriesPoint>,
    /// Histogram bars tagged `up` when `>= 0`, `down` otherwise.
    pub histogram: Vec<ColoredPoint>,
}

/// Raw MACD values, each vector a trailing suffix of the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdValues {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Element-wise `a - b` over the common trailing range of the two series.
fn trailing_difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    let common = a.len().min(b.len());
    a[a.len() - common..]
        .iter()
        .zip(&b[b.len() - common..])
        .map(|(x, y)| x - y)
        .collect()
}

/// Compute raw MACD / signal / histogram values for `values`.
///
/// The macd line is empty until both EMAs have warmed up; the signal line
/// and histogram are empty until the macd line has `signal` values.
pub fn calculate_macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdValues {
    let fast_ema = calculate_ema(values, fast);
    let slow_ema = calculate_ema(values, slow);
    if fast_ema.is_empty() || slow_ema.is_empty() {
        return MacdValues::default();
    }

    let macd = trailing_difference(&fast_ema, &slow_ema);
    let signal_line = calculate_ema(&macd, signal);
    let histogram = trailing_difference(&macd, &signal_line);

    MacdValues {
        macd,
        signal: signal_line,
        histogram,
    }
}

/// MACD over the closes of `series`, each line on the source time axis.
pub fn macd(series: &[OhlcvPoint], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let values = calculate_macd(&closes(series), fast, slow, signal);

    let histogram = stamp_trailing(series, &values.histogram)
        .into_iter()
        .map(|p| ColoredPoint {
            time: p.time,
            value: p.value,
            color: if p.value >= 0.0 {
                ColorTag::Up
            } else {
                ColorTag::Down
            },
        })
        .collect();

    MacdSeries {
        macd: stamp_trailing(series, &values.macd),
        signal: stamp_trailing(series, &values.signal),
        histogram,
    }
}
