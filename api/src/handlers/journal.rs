//! Trade journal and strategy library endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use shared::entity::{strategies, trades};
use shared::journal;
use shared::models::{PerformanceReport, StrategyForm, TradeFilter, TradeForm, TradeUpdate};
use shared::strategy;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TradesQuery {
    pub stock: Option<String>,
}

pub async fn list_trades(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TradesQuery>,
) -> Result<Json<Vec<trades::Model>>, ApiError> {
    let filter = TradeFilter {
        code: query.stock,
        ..TradeFilter::default()
    };
    let trades = journal::get_trades(&state.db, &filter).await?;
    Ok(Json(trades))
}

pub async fn add_trade(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TradeForm>,
) -> Result<Json<Value>, ApiError> {
    let id = journal::add_trade(&state.db, form).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn update_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<TradeUpdate>,
) -> Result<Json<Value>, ApiError> {
    if journal::update_trade(&state.db, &id, update).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound)
    }
}

pub async fn delete_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if journal::delete_trade(&state.db, &id).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound)
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    pub year: Option<i32>,
}

pub async fn trade_analysis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<PerformanceReport>, ApiError> {
    let labels = state.settings().result_labels.clone();
    let report = journal::analyze_performance(&state.db, query.year, &labels).await?;
    Ok(Json(report))
}

pub async fn list_strategies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<strategies::Model>>, ApiError> {
    let all = strategy::get_strategies(&state.db).await?;
    Ok(Json(all))
}

pub async fn add_strategy(
    State(state): State<Arc<AppState>>,
    Json(form): Json<StrategyForm>,
) -> Result<Json<Value>, ApiError> {
    let id = strategy::add_strategy(&state.db, form).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn update_strategy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(form): Json<StrategyForm>,
) -> Result<Json<Value>, ApiError> {
    if strategy::update_strategy(&state.db, &id, form).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound)
    }
}
