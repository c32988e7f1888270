// =============================================================================
// Volume bars
// =============================================================================
//
// Pass-through of each bar's volume with an up/down color tag: `up` when the
// bar closed at or above its open.  No windowing.

use crate::types::{ColorTag, ColoredPoint, OhlcvPoint};

/// One colored volume bar per input point.
pub fn volume_series(series: &[OhlcvPoint]) -> Vec<ColoredPoint> {
    series
        .iter()
        .map(|p| ColoredPoint {
            time: p.time,
            value: p.volume,
            color: if p.close >= p.open {
                ColorTag::Up
            } else {
                ColorTag::Down
            },
        })
        .collect()
}
