//! Per-stock indicator chart data and the momentum screener

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use quant::analysis::IndicatorSummary;
use quant::data::BarSeries;
use shared::models::StrongStock;
use shared::screener;

use crate::error::ApiError;
use crate::state::AppState;

fn default_days() -> i64 {
    30
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

/// Chart payload: all arrays positionally aligned to `labels`.
///
/// MA and KD slots stay null until their lookback is filled; RSI falls
/// back to the neutral 50 and MACD/signal to 0 where undefined.
#[derive(Debug, Serialize)]
pub struct StockIndicators {
    pub code: String,
    pub labels: Vec<String>,
    pub prices: Vec<f64>,
    pub ma5: Vec<Option<f64>>,
    pub ma20: Vec<Option<f64>>,
    pub ma60: Vec<Option<f64>>,
    pub rsi: Vec<f64>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

pub async fn stock_indicators(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(query): Query<StockQuery>,
) -> Result<Json<StockIndicators>, ApiError> {
    let bars = state.market.daily_bars(&code, query.days).await?;
    let series = BarSeries::from_vec(bars);
    let summary = IndicatorSummary::compute(&series);

    Ok(Json(StockIndicators {
        code,
        labels: summary
            .dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect(),
        prices: summary.closes,
        ma5: summary.ma5,
        ma20: summary.ma20,
        ma60: summary.ma60,
        rsi: summary.rsi.iter().map(|v| v.unwrap_or(50.0)).collect(),
        macd: summary.macd.iter().map(|v| v.unwrap_or(0.0)).collect(),
        signal: summary.signal.iter().map(|v| v.unwrap_or(0.0)).collect(),
        k: summary.k,
        d: summary.d,
    }))
}

fn default_min_volume() -> i64 {
    1000
}

fn default_min_price() -> f64 {
    10.0
}

#[derive(Debug, Deserialize)]
pub struct ScreenQuery {
    #[serde(default = "default_min_volume")]
    pub min_volume: i64,
    #[serde(default = "default_min_price")]
    pub min_price: f64,
}

const SCREEN_RESULT_LIMIT: usize = 20;

pub async fn strong_stocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScreenQuery>,
) -> Result<Json<Vec<StrongStock>>, ApiError> {
    let stocks = screener::screen_strong(
        &state.market,
        query.min_volume,
        query.min_price,
        SCREEN_RESULT_LIMIT,
    )
    .await?;
    Ok(Json(stocks))
}
