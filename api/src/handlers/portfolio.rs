//! Portfolio and watchlist endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use shared::models::{
    round2, PortfolioRow, PositionForm, PositionUpdate, WatchForm, WatchUpdate, WatchlistRow,
};
use shared::{portfolio, watchlist};

use crate::error::ApiError;
use crate::state::AppState;

/// Held positions enriched with live quotes, P/L and an advice label.
///
/// A symbol without a quote degrades to zero price and a breakeven-hold
/// label instead of failing the whole table.
pub async fn list_portfolio(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PortfolioRow>>, ApiError> {
    let positions = portfolio::get_all_positions(&state.db).await?;
    let mut rows = Vec::with_capacity(positions.len());

    for position in positions {
        let (current_price, change_pct) = state.market.latest_quote(&position.code).await;
        let pl = if current_price > 0.0 {
            portfolio::profit_loss(&position, current_price)
        } else {
            portfolio::flat_profit_loss(&position)
        };
        let strategy = portfolio::advise(&pl);

        rows.push(PortfolioRow {
            code: position.code,
            name: position.name,
            cost: position.cost,
            shares: position.shares,
            current_price,
            change_pct: round2(change_pct),
            profit_loss: round2(pl.profit_loss),
            profit_loss_pct: round2(pl.profit_loss_pct),
            stop_loss: position.stop_loss,
            stop_profit: position.stop_profit,
            industry: position.industry,
            strategy,
        });
    }

    Ok(Json(rows))
}

pub async fn add_position(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PositionForm>,
) -> Result<Json<Value>, ApiError> {
    portfolio::upsert_position(&state.db, form).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn update_position(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(update): Json<PositionUpdate>,
) -> Result<Json<Value>, ApiError> {
    if portfolio::update_position(&state.db, &code, update).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound)
    }
}

pub async fn delete_position(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if portfolio::remove_position(&state.db, &code).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound)
    }
}

pub async fn list_watchlist(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WatchlistRow>>, ApiError> {
    let items = watchlist::get_all(&state.db).await?;
    let mut rows = Vec::with_capacity(items.len());

    for item in items {
        let (current_price, change_pct) = state.market.latest_quote(&item.code).await;
        rows.push(WatchlistRow {
            code: item.code,
            name: item.name,
            current_price,
            target_price: item.target_price,
            change_pct: round2(change_pct),
            reason: item.reason,
            industry: item.industry,
        });
    }

    Ok(Json(rows))
}

pub async fn add_watch(
    State(state): State<Arc<AppState>>,
    Json(form): Json<WatchForm>,
) -> Result<Json<Value>, ApiError> {
    watchlist::upsert(&state.db, form).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn update_watch(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(update): Json<WatchUpdate>,
) -> Result<Json<Value>, ApiError> {
    if watchlist::update(&state.db, &code, update).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound)
    }
}

pub async fn delete_watch(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if watchlist::remove(&state.db, &code).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound)
    }
}
