// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are public: the service only turns
// caller-supplied (or mock) price history into plot-ready series.
//
// CORS is configured permissively so a browser chart can call it directly.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::cache::CacheStats;
use crate::engine::{ChartPayload, IndicatorParams};
use crate::market_data::{generate_mock_ohlcv, sort_and_dedup};
use crate::selection::{IndicatorKind, IndicatorSet, Overlay, OverlaySet, Tag};
use crate::tooltip::tooltip_at;
use crate::types::{ChartType, OhlcvPoint, SeriesPoint, Timeframe};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/timeframes", get(timeframes))
        .route("/api/v1/selections", get(selections))
        .route("/api/v1/chart", post(chart))
        .route("/api/v1/chart/mock/:coin_id", get(mock_chart))
        .route("/api/v1/tooltip", post(tooltip))
        .route("/api/v1/params", get(get_params).post(set_params))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    requests_served: u64,
    cache: CacheStats,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        requests_served: state.requests_served(),
        cache: state.cache.stats(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Timeframes
// =============================================================================

#[derive(Serialize)]
struct TimeframeInfo {
    timeframe: Timeframe,
    label: &'static str,
    interval_secs: i64,
    lookback_days: u32,
    intraday: bool,
}

async fn timeframes() -> impl IntoResponse {
    let table: Vec<TimeframeInfo> = Timeframe::ALL
        .into_iter()
        .map(|tf| TimeframeInfo {
            timeframe: tf,
            label: tf.label(),
            interval_secs: tf.interval_secs(),
            lookback_days: tf.lookback_days(),
            intraday: tf.is_intraday(),
        })
        .collect();
    Json(table)
}

// =============================================================================
// Selection catalog
// =============================================================================

#[derive(Serialize)]
struct SelectionEntry {
    tag: &'static str,
    implemented: bool,
}

#[derive(Serialize)]
struct SelectionCatalog {
    overlays: Vec<SelectionEntry>,
    indicators: Vec<SelectionEntry>,
}

async fn selections() -> impl IntoResponse {
    let overlays = Overlay::ALL
        .iter()
        .map(|o| SelectionEntry {
            tag: o.tag(),
            implemented: true,
        })
        .collect();
    let indicators = IndicatorKind::ALL
        .iter()
        .map(|k| SelectionEntry {
            tag: k.tag(),
            implemented: k.is_implemented(),
        })
        .collect();
    Json(SelectionCatalog {
        overlays,
        indicators,
    })
}

// =============================================================================
// Chart (caller-supplied series)
// =============================================================================

#[derive(Deserialize)]
struct ChartRequest {
    data: Vec<OhlcvPoint>,
    #[serde(default)]
    overlays: OverlaySet,
    #[serde(default)]
    indicators: IndicatorSet,
}

async fn chart(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChartRequest>,
) -> Result<Response, ApiError> {
    state.record_request();
    let series = accept_series(&state, req.data)?;

    let payload = state.cache.get_or_compute(
        &state.engine(),
        &series,
        &req.overlays,
        &req.indicators,
    );
    debug!(points = series.len(), "chart request served");

    Ok(Json(&*payload).into_response())
}

/// Enforce the size limit and the ascending / unique-time precondition.
fn accept_series(state: &AppState, data: Vec<OhlcvPoint>) -> Result<Vec<OhlcvPoint>, ApiError> {
    let max_points = state.runtime_config.read().max_points;
    if data.len() > max_points {
        return Err(api_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("series has {} points; the limit is {max_points}", data.len()),
        ));
    }
    Ok(sort_and_dedup(data))
}

// =============================================================================
// Chart (mock source)
// =============================================================================

#[derive(Deserialize)]
struct MockQuery {
    timeframe: Option<String>,
    #[serde(default)]
    overlays: String,
    #[serde(default)]
    indicators: String,
    seed: Option<u64>,
    points: Option<usize>,
    #[serde(default)]
    chart_type: ChartType,
}

#[derive(Serialize)]
struct MockChartResponse<'a> {
    symbol: &'a str,
    timeframe: Timeframe,
    chart_type: ChartType,
    data: &'a [OhlcvPoint],
    /// Close-only price line, present for line charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<Vec<SeriesPoint>>,
    series: &'a ChartPayload,
}

async fn mock_chart(
    State(state): State<Arc<AppState>>,
    Path(coin_id): Path<String>,
    Query(query): Query<MockQuery>,
) -> Result<Response, ApiError> {
    state.record_request();

    let (default_timeframe, default_points, max_points) = {
        let config = state.runtime_config.read();
        (config.default_timeframe, config.mock_points, config.max_points)
    };

    let timeframe = match query.timeframe.as_deref() {
        Some(tag) => tag
            .parse::<Timeframe>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?,
        None => default_timeframe,
    };
    let points = query.points.unwrap_or(default_points).min(max_points);
    let seed = query.seed.unwrap_or_else(rand::random);

    let step = timeframe.interval_secs();
    let now = chrono::Utc::now().timestamp();
    let now_aligned = now - now.rem_euclid(step);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let data = generate_mock_ohlcv(&coin_id, timeframe, points, now_aligned, &mut rng);

    let overlays = OverlaySet::from_csv(&query.overlays);
    let indicators = IndicatorSet::from_csv(&query.indicators);
    let payload = state
        .cache
        .get_or_compute(&state.engine(), &data, &overlays, &indicators);

    debug!(coin = %coin_id, timeframe = %timeframe, points, seed, "mock chart served");

    Ok(Json(MockChartResponse {
        symbol: &coin_id,
        timeframe,
        chart_type: query.chart_type,
        data: &data,
        line: (query.chart_type == ChartType::Line)
            .then(|| data.iter().map(OhlcvPoint::close_point).collect()),
        series: &*payload,
    })
    .into_response())
}

// =============================================================================
// Tooltip
// =============================================================================

#[derive(Deserialize)]
struct TooltipRequest {
    data: Vec<OhlcvPoint>,
    time: i64,
}

async fn tooltip(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TooltipRequest>,
) -> Result<Response, ApiError> {
    state.record_request();
    let series = accept_series(&state, req.data)?;
    match tooltip_at(&series, req.time) {
        Some(data) => Ok(Json(data).into_response()),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("no bar at time {}", req.time),
        )),
    }
}

// =============================================================================
// Indicator parameters
// =============================================================================

async fn get_params(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.runtime_config.read().indicator_params)
}

fn validate_params(p: &IndicatorParams) -> Result<(), String> {
    let periods = [
        ("bbands_period", p.bbands_period),
        ("rsi_period", p.rsi_period),
        ("macd_fast", p.macd_fast),
        ("macd_slow", p.macd_slow),
        ("macd_signal", p.macd_signal),
    ];
    if let Some((name, _)) = periods.iter().find(|(_, v)| *v == 0) {
        return Err(format!("{name} must be at least 1"));
    }
    if !p.bbands_mult.is_finite() || p.bbands_mult < 0.0 {
        return Err("bbands_mult must be a finite, non-negative number".to_string());
    }
    Ok(())
}

async fn set_params(
    State(state): State<Arc<AppState>>,
    Json(params): Json<IndicatorParams>,
) -> Result<impl IntoResponse, ApiError> {
    validate_params(&params).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    let previous = state.runtime_config.read().indicator_params;
    if previous != params {
        state.set_indicator_params(params);
        info!(old = ?previous, new = ?params, "indicator params updated");

        if let Some(path) = &state.config_path {
            let config_clone = state.runtime_config.read().clone();
            // Best-effort: the new params are already live in memory.
            if let Err(e) = config_clone.save(path) {
                warn!(error = %e, "failed to save indicator params to disk");
            }
        }
    }

    Ok(Json(params))
}
