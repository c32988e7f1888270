// =============================================================================
// Relative Strength Index (RSI) — simple-mean variant
// =============================================================================
//
// Step 1 — Per-step change Δ[i] = close[i] - close[i-1], split into
//          gain = max(Δ, 0) and loss = max(-Δ, 0).
// Step 2 — For every window of `period` consecutive changes, take the plain
//          arithmetic mean of gains and of losses.  There is no Wilder
//          smoothing; each window is averaged independently.
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A window with no losses reads exactly 100.
//
// The value for the window of changes ending at Δ[i] is stamped with the time
// of close[i + 1], the bar that completes the last change in the window.
// =============================================================================

use crate::indicators::{closes, stamp_trailing};
use crate::types::{OhlcvPoint, SeriesPoint};

/// RSI reading used when a window contains no losses.
pub const RSI_NO_LOSS: f64 = 100.0;

/// Compute the RSI series for `values` and `period`.
///
/// The result has `values.len() - period` elements; element `k` describes the
/// changes ending at `values[k + period]`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `values.len() < period + 1` => empty vec (need at least `period` changes)
pub fn calculate_rsi(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period + 1 {
        return Vec::new();
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = values
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let period_f = period as f64;
    gains
        .windows(period)
        .zip(losses.windows(period))
        .map(|(g, l)| {
            let avg_gain = g.iter().sum::<f64>() / period_f;
            let avg_loss = l.iter().sum::<f64>() / period_f;
            rsi_from_averages(avg_gain, avg_loss)
        })
        .collect()
}

/// RSI of the closes of `series`, aligned one bar after each change window.
pub fn rsi(series: &[OhlcvPoint], period: usize) -> Vec<SeriesPoint> {
    let values = calculate_rsi(&closes(series), period);
    stamp_trailing(series, &values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return RSI_NO_LOSS;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{series_from_closes, wavy};

    #[test]
    fn rsi_empty_input() {
        assert!(rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 changes < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).is_empty());
    }

    #[test]
    fn rsi_first_point_aligned_after_window() {
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        let series = series_from_closes(&closes);
        let out = rsi(&series, 14);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].time, series[14].time);
    }

    #[test]
    fn rsi_all_gains_is_exactly_100() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let out = rsi(&series_from_closes(&closes), 14);
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(|p| p.value == 100.0));
    }

    #[test]
    fn rsi_non_decreasing_window_is_exactly_100() {
        let closes = [
            10.0, 10.0, 11.0, 11.0, 12.0, 12.0, 12.0, 13.0, 14.0, 14.0, 15.0, 15.0, 16.0, 16.0,
            16.0,
        ];
        let out = calculate_rsi(&closes, 14);
        assert_eq!(out, vec![100.0]);
    }

    #[test]
    fn rsi_flat_market_reads_100() {
        let out = calculate_rsi(&[100.0; 30], 14);
        assert!(out.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let out = calculate_rsi(&closes, 14);
        assert!(out.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn rsi_uses_simple_window_means() {
        // Changes: +2, -1, +1, -2 ; period 2.
        // Window [+2, -1]: gain 1.0, loss 0.5 => RS 2 => 66.66..
        // Window [-1, +1]: gain 0.5, loss 0.5 => RS 1 => 50
        // Window [+1, -2]: gain 0.5, loss 1.0 => RS 0.5 => 33.33..
        let out = calculate_rsi(&[10.0, 12.0, 11.0, 12.0, 10.0], 2);
        assert_eq!(out.len(), 3);
        assert!((out[0] - 200.0 / 3.0).abs() < 1e-9);
        assert!((out[1] - 50.0).abs() < 1e-9);
        assert!((out[2] - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_range_check() {
        let out = rsi(&series_from_closes(&wavy(200)), 14);
        assert_eq!(out.len(), 186);
        for p in &out {
            assert!(p.value > 0.0 && p.value <= 100.0, "RSI {} out of range", p.value);
        }
    }
}
