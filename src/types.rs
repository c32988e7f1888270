// =============================================================================
// Shared types used across the ProChart indicator engine
// =============================================================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One bar of price history. `time` is unix seconds.
///
/// Series handed to the engine are expected to be ascending by `time` with no
/// duplicate timestamps; the engine trusts this and does not re-check it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvPoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl OhlcvPoint {
    /// The bar reduced to its close, as drawn by a line chart.
    pub fn close_point(&self) -> SeriesPoint {
        SeriesPoint::new(self.time, self.close)
    }
}

/// A single plotted value on the shared time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: i64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Discrete color hint for bar-style series (volume, MACD histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Up,
    Down,
}

/// A bar value carrying its color tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColoredPoint {
    pub time: i64,
    pub value: f64,
    pub color: ColorTag,
}

/// How the primary price series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Candlestick,
    Ohlc,
}

impl Default for ChartType {
    fn default() -> Self {
        Self::Candlestick
    }
}

// =============================================================================
// Timeframe
// =============================================================================

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Bar granularity selectable on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1H")]
    OneHour,
    #[serde(rename = "4H")]
    FourHours,
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::OneDay
    }
}

impl Timeframe {
    pub const ALL: [Timeframe; 8] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
    ];

    /// The wire tag, e.g. `"1H"`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::OneHour => "1H",
            Self::FourHours => "4H",
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
        }
    }

    /// Short label shown on the timeframe selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::OneMinute => "1M",
            Self::FiveMinutes => "5M",
            Self::FifteenMinutes => "15M",
            Self::OneHour => "1H",
            Self::FourHours => "4H",
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
        }
    }

    /// Length of one bar in seconds. A month is counted as 30 days.
    pub fn interval_secs(self) -> i64 {
        match self {
            Self::OneMinute => MINUTE,
            Self::FiveMinutes => 5 * MINUTE,
            Self::FifteenMinutes => 15 * MINUTE,
            Self::OneHour => HOUR,
            Self::FourHours => 4 * HOUR,
            Self::OneDay => DAY,
            Self::OneWeek => 7 * DAY,
            Self::OneMonth => 30 * DAY,
        }
    }

    /// Days of history requested from the price-history provider.
    pub fn lookback_days(self) -> u32 {
        match self {
            Self::OneMinute | Self::FiveMinutes | Self::FifteenMinutes => 1,
            Self::OneHour => 7,
            Self::FourHours => 30,
            Self::OneDay => 365,
            Self::OneWeek => 365 * 2,
            Self::OneMonth => 365 * 3,
        }
    }

    /// Intraday timeframes are served as true OHLC rows by the provider;
    /// daily and longer come back as close-only price samples.
    pub fn is_intraday(self) -> bool {
        matches!(
            self,
            Self::OneMinute
                | Self::FiveMinutes
                | Self::FifteenMinutes
                | Self::OneHour
                | Self::FourHours
        )
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tf| tf.tag() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown timeframe '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_tags_roundtrip_through_from_str() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.tag().parse::<Timeframe>().unwrap(), tf);
        }
    }

    #[test]
    fn timeframe_tags_are_case_sensitive() {
        // "1m" is one minute, "1M" is one month.
        assert_eq!("1m".parse::<Timeframe>().unwrap(), Timeframe::OneMinute);
        assert_eq!("1M".parse::<Timeframe>().unwrap(), Timeframe::OneMonth);
        assert!("1h".parse::<Timeframe>().is_err());
    }

    #[test]
    fn timeframe_serde_uses_wire_tags() {
        let json = serde_json::to_string(&Timeframe::FourHours).unwrap();
        assert_eq!(json, "\"4H\"");
        let tf: Timeframe = serde_json::from_str("\"1W\"").unwrap();
        assert_eq!(tf, Timeframe::OneWeek);
    }

    #[test]
    fn intraday_split() {
        assert!(Timeframe::FourHours.is_intraday());
        assert!(!Timeframe::OneDay.is_intraday());
        assert_eq!(Timeframe::OneMonth.interval_secs(), 30 * 86_400);
        assert_eq!(Timeframe::OneWeek.lookback_days(), 730);
    }

    #[test]
    fn color_tag_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&ColorTag::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&ColorTag::Down).unwrap(), "\"down\"");
    }

    #[test]
    fn ohlcv_volume_defaults_to_zero() {
        let p: OhlcvPoint =
            serde_json::from_str(r#"{"time":1,"open":1,"high":2,"low":0.5,"close":1.5}"#).unwrap();
        assert_eq!(p.volume, 0.0);
    }
}
