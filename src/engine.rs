// =============================================================================
// Indicator Engine — selection-driven batch transform
// =============================================================================
//
// Given an ordered OHLCV series and the selected overlay / indicator tags,
// produce every requested derived series on the source time axis.
//
// The engine holds only its parameters.  `compute` is a pure function of its
// inputs: calling it twice with the same series and selections yields
// bit-identical output.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{self, BollingerBands, MacdSeries};
use crate::selection::{IndicatorKind, IndicatorSet, Overlay, OverlaySet};
use crate::types::{ColoredPoint, OhlcvPoint, SeriesPoint};

// =============================================================================
// Parameters
// =============================================================================

fn default_bbands_period() -> usize {
    20
}

fn default_bbands_mult() -> f64 {
    2.0
}

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

/// Tunable indicator parameters.  SMA overlay periods are fixed by their tags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Bollinger window length.
    #[serde(default = "default_bbands_period")]
    pub bbands_period: usize,

    /// Bollinger band width in standard deviations.
    #[serde(default = "default_bbands_mult")]
    pub bbands_mult: f64,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            bbands_period: default_bbands_period(),
            bbands_mult: default_bbands_mult(),
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

impl IndicatorParams {
    /// Stable textual fingerprint, used as part of cache keys.
    pub fn fingerprint(&self) -> String {
        format!(
            "bb{}x{:?}|rsi{}|macd{}-{}-{}",
            self.bbands_period,
            self.bbands_mult.to_bits(),
            self.rsi_period,
            self.macd_fast,
            self.macd_slow,
            self.macd_signal
        )
    }
}

// =============================================================================
// Output
// =============================================================================

/// Price-pane overlays.  A field is present iff its tag was selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma20: Option<Vec<SeriesPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma50: Option<Vec<SeriesPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma200: Option<Vec<SeriesPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbands: Option<BollingerBands>,
}

/// Separate-pane indicators.  Placeholder tags never populate a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<Vec<SeriesPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Vec<ColoredPoint>>,
}

/// Every derived series requested for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub overlays: OverlayOutput,
    pub indicators: IndicatorOutput,
}

impl ChartPayload {
    /// True when no derived series was requested.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Engine
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Compute all selected overlays and indicators for `series`.
    pub fn compute(
        &self,
        series: &[OhlcvPoint],
        overlays: &OverlaySet,
        indicators: &IndicatorSet,
    ) -> ChartPayload {
        let payload = ChartPayload {
            overlays: self.compute_overlays(series, overlays),
            indicators: self.compute_indicators(series, indicators),
        };

        debug!(
            points = series.len(),
            overlays = ?overlays.tag_strings(),
            indicators = ?indicators.tag_strings(),
            "derived series computed"
        );

        payload
    }

    fn compute_overlays(&self, series: &[OhlcvPoint], overlays: &OverlaySet) -> OverlayOutput {
        let mut out = OverlayOutput::default();
        let p = &self.params;

        for overlay in overlays.iter() {
            match overlay {
                Overlay::Sma20 => out.sma20 = sma_line(series, overlay),
                Overlay::Sma50 => out.sma50 = sma_line(series, overlay),
                Overlay::Sma200 => out.sma200 = sma_line(series, overlay),
                Overlay::Bbands => {
                    out.bbands = Some(indicators::bbands(series, p.bbands_period, p.bbands_mult))
                }
            }
        }

        out
    }

    fn compute_indicators(
        &self,
        series: &[OhlcvPoint],
        selected: &IndicatorSet,
    ) -> IndicatorOutput {
        let mut out = IndicatorOutput::default();
        let p = &self.params;

        for kind in selected.iter() {
            match kind {
                IndicatorKind::Rsi => out.rsi = Some(indicators::rsi(series, p.rsi_period)),
                IndicatorKind::Macd => {
                    out.macd = Some(indicators::macd(
                        series,
                        p.macd_fast,
                        p.macd_slow,
                        p.macd_signal,
                    ))
                }
                IndicatorKind::Volume => out.volume = Some(indicators::volume_series(series)),
                IndicatorKind::StochRsi | IndicatorKind::Vwap | IndicatorKind::Atr => {}
            }
        }

        out
    }
}

fn sma_line(series: &[OhlcvPoint], overlay: Overlay) -> Option<Vec<SeriesPoint>> {
    overlay.sma_period().map(|period| indicators::sma(series, period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{series_from_closes, wavy};

    fn engine() -> IndicatorEngine {
        IndicatorEngine::default()
    }

    #[test]
    fn empty_selection_produces_nothing() {
        let series = series_from_closes(&wavy(300));
        let payload = engine().compute(&series, &OverlaySet::new(), &IndicatorSet::new());
        assert!(payload.is_empty());
    }

    #[test]
    fn placeholders_produce_no_output() {
        let series = series_from_closes(&wavy(100));
        let indicators = IndicatorSet::from_tags(["stochRsi", "vwap", "atr"]);
        let payload = engine().compute(&series, &OverlaySet::new(), &indicators);
        assert!(payload.is_empty());
    }

    #[test]
    fn selected_series_are_present_even_when_short() {
        let series = series_from_closes(&wavy(30));
        let overlays = OverlaySet::from_tags(["sma20", "sma200"]);
        let payload = engine().compute(&series, &overlays, &IndicatorSet::new());
        assert_eq!(payload.overlays.sma20.as_ref().map(Vec::len), Some(11));
        assert_eq!(payload.overlays.sma200, Some(Vec::new()));
        assert!(payload.overlays.sma50.is_none());
        assert!(payload.overlays.bbands.is_none());
    }

    #[test]
    fn bbands_on_exactly_twenty_points() {
        let series = series_from_closes(&wavy(20));
        let overlays = OverlaySet::from_tags(["bbands"]);
        let payload = engine().compute(&series, &overlays, &IndicatorSet::new());
        let bands = payload.overlays.bbands.unwrap();
        assert_eq!(bands.upper.len(), 1);
        assert_eq!(bands.lower.len(), 1);
    }

    #[test]
    fn full_selection_matches_direct_calls() {
        let series = series_from_closes(&wavy(260));
        let overlays = OverlaySet::from_tags(["sma20", "sma50", "sma200", "bbands"]);
        let selected = IndicatorSet::from_tags(["rsi", "macd", "volume"]);
        let payload = engine().compute(&series, &overlays, &selected);

        assert_eq!(payload.overlays.sma50.unwrap(), indicators::sma(&series, 50));
        assert_eq!(payload.overlays.bbands.unwrap(), indicators::bbands(&series, 20, 2.0));
        assert_eq!(payload.indicators.rsi.unwrap(), indicators::rsi(&series, 14));
        assert_eq!(payload.indicators.macd.unwrap(), indicators::macd(&series, 12, 26, 9));
        assert_eq!(payload.indicators.volume.unwrap().len(), 260);
    }

    #[test]
    fn compute_is_idempotent() {
        let series = series_from_closes(&wavy(240));
        let overlays = OverlaySet::from_tags(["bbands", "sma20", "sma20"]);
        let selected = IndicatorSet::from_tags(["macd", "rsi", "atr"]);
        let e = engine();
        let a = e.compute(&series, &overlays, &selected);
        let b = e.compute(&series, &overlays, &selected);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn custom_params_are_used() {
        let series = series_from_closes(&wavy(60));
        let params = IndicatorParams {
            rsi_period: 5,
            ..IndicatorParams::default()
        };
        let payload = IndicatorEngine::new(params).compute(
            &series,
            &OverlaySet::new(),
            &IndicatorSet::from_tags(["rsi"]),
        );
        assert_eq!(payload.indicators.rsi.unwrap().len(), 55);
    }

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let series = series_from_closes(&wavy(40));
        let payload = engine().compute(
            &series,
            &OverlaySet::from_tags(["sma20"]),
            &IndicatorSet::from_tags(["volume"]),
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["overlays"].get("sma20").is_some());
        assert!(json["overlays"].get("bbands").is_none());
        assert!(json["indicators"].get("rsi").is_none());
        assert_eq!(json["indicators"]["volume"][0]["color"], "up");
    }

    #[test]
    fn params_deserialise_with_defaults() {
        let p: IndicatorParams = serde_json::from_str(r#"{"rsi_period": 7}"#).unwrap();
        assert_eq!(p.rsi_period, 7);
        assert_eq!(p.macd_slow, 26);
        assert!((p.bbands_mult - 2.0).abs() < f64::EPSILON);
    }
}
