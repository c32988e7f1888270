// =============================================================================
// Price-history normalisation
// =============================================================================
//
// The price-history provider answers in two shapes:
//
//   intraday  (1m .. 4H)  rows of [time, open, high, low, close], no volume
//   daily+    (1D .. 1M)  parallel `prices` / `total_volumes` arrays of
//                         [time, value]; OHLC is approximated by the price
//
// Timestamps may be in milliseconds or seconds.  Everything handed to the
// engine is in unix seconds, ascending, with unique timestamps.
// =============================================================================

use serde::Deserialize;

use crate::types::{OhlcvPoint, Timeframe};

/// Values above this are treated as unix milliseconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Convert a provider timestamp to unix seconds.
pub fn normalize_timestamp(raw: i64) -> i64 {
    if raw > MILLIS_THRESHOLD {
        raw.div_euclid(1000)
    } else {
        raw
    }
}

/// Build points from intraday `[time, open, high, low, close]` rows.
/// The provider reports no volume for these, so volume is zero.
pub fn from_ohlc_rows(rows: &[[f64; 5]]) -> Vec<OhlcvPoint> {
    rows.iter()
        .map(|&[time, open, high, low, close]| OhlcvPoint {
            time: normalize_timestamp(time as i64),
            open,
            high,
            low,
            close,
            volume: 0.0,
        })
        .collect()
}

/// Build points from daily+ `prices` and `volumes` samples.
///
/// Open, high and low all equal the sampled price.  Volume is matched by
/// index and defaults to zero when the volume array is shorter.
pub fn from_market_chart(prices: &[[f64; 2]], volumes: &[[f64; 2]]) -> Vec<OhlcvPoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &[time, price])| OhlcvPoint {
            time: normalize_timestamp(time as i64),
            open: price,
            high: price,
            low: price,
            close: price,
            volume: volumes.get(i).map_or(0.0, |v| v[1]),
        })
        .collect()
}

/// Body of a daily+ market-chart response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<[f64; 2]>,
    #[serde(default)]
    pub total_volumes: Vec<[f64; 2]>,
}

/// Parse a raw provider body for `timeframe` into an ordered series.
pub fn parse_provider_body(timeframe: Timeframe, body: &str) -> anyhow::Result<Vec<OhlcvPoint>> {
    let points = if timeframe.is_intraday() {
        let rows: Vec<[f64; 5]> = serde_json::from_str(body)?;
        from_ohlc_rows(&rows)
    } else {
        let chart: MarketChart = serde_json::from_str(body)?;
        from_market_chart(&chart.prices, &chart.total_volumes)
    };
    Ok(sort_and_dedup(points))
}

/// Sort ascending by time and drop later points that repeat a timestamp.
pub fn sort_and_dedup(mut points: Vec<OhlcvPoint>) -> Vec<OhlcvPoint> {
    points.sort_by_key(|p| p.time);
    points.dedup_by_key(|p| p.time);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_are_floored_to_seconds() {
        assert_eq!(normalize_timestamp(1_700_000_000_999), 1_700_000_000);
        assert_eq!(normalize_timestamp(1_700_000_000), 1_700_000_000);
        assert_eq!(normalize_timestamp(MILLIS_THRESHOLD), MILLIS_THRESHOLD);
    }

    #[test]
    fn ohlc_rows_have_zero_volume() {
        let rows = [[1_700_000_000_000.0, 1.0, 2.0, 0.5, 1.5]];
        let points = from_ohlc_rows(&rows);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].time, 1_700_000_000);
        assert_eq!(points[0].high, 2.0);
        assert_eq!(points[0].volume, 0.0);
    }

    #[test]
    fn market_chart_approximates_ohlc_from_price() {
        let prices = [[1_700_000_000_000.0, 10.0], [1_700_086_400_000.0, 11.0]];
        let volumes = [[1_700_000_000_000.0, 500.0]];
        let points = from_market_chart(&prices, &volumes);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].open, 10.0);
        assert_eq!(points[0].low, 10.0);
        assert_eq!(points[0].volume, 500.0);
        assert_eq!(points[1].volume, 0.0);
        assert_eq!(points[1].time, 1_700_086_400);
    }

    #[test]
    fn sort_and_dedup_keeps_first_of_each_time() {
        let mk = |time, close| OhlcvPoint {
            time,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        };
        let out = sort_and_dedup(vec![mk(3, 3.0), mk(1, 1.0), mk(3, 9.0), mk(2, 2.0)]);
        let times: Vec<i64> = out.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![1, 2, 3]);
        assert_eq!(out[2].close, 3.0);
    }

    #[test]
    fn parse_intraday_and_daily_bodies() {
        let intraday = "[[1700000060000, 1, 2, 0.5, 1.5], [1700000000000, 1, 1, 1, 1]]";
        let points = parse_provider_body(Timeframe::OneHour, intraday).unwrap();
        assert_eq!(points[0].time, 1_700_000_000);
        assert_eq!(points[1].time, 1_700_000_060);

        let daily = r#"{"prices": [[1700000000000, 5.0]], "total_volumes": [[1700000000000, 9.0]]}"#;
        let points = parse_provider_body(Timeframe::OneDay, daily).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].volume, 9.0);

        assert!(parse_provider_body(Timeframe::OneDay, "not json").is_err());
    }
}
