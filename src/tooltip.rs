// =============================================================================
// Crosshair tooltip
// =============================================================================
//
// The readout shown when hovering a bar: its OHLCV plus the change against
// the previous bar's close.  The first bar (or a bar whose previous close is
// zero) is compared against its own open instead.

use serde::{Deserialize, Serialize};

use crate::types::OhlcvPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipData {
    /// Unix milliseconds, ready for display formatting.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Percentage change vs. the reference close.
    pub change: f64,
    /// Absolute change vs. the reference close.
    pub change_value: f64,
}

/// Build the tooltip for the bar stamped `time` (unix seconds).
///
/// Returns `None` when no bar has that timestamp.
pub fn tooltip_at(series: &[OhlcvPoint], time: i64) -> Option<TooltipData> {
    let idx = series.binary_search_by_key(&time, |p| p.time).ok()?;
    let point = series[idx];

    let reference = idx
        .checked_sub(1)
        .map(|prev| series[prev].close)
        .filter(|&c| c != 0.0)
        .unwrap_or(point.open);

    let change_value = point.close - reference;
    let change = if reference != 0.0 {
        change_value / reference * 100.0
    } else {
        0.0
    };

    Some(TooltipData {
        time: point.time * 1000,
        open: point.open,
        high: point.high,
        low: point.low,
        close: point.close,
        volume: point.volume,
        change,
        change_value,
    })
}
