//! Position management and profit/loss analytics

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::entity::positions;
use crate::models::{Advice, Alert, AlertKind, PositionForm, PositionUpdate, ProfitLoss};
use crate::settings::Thresholds;

pub async fn get_all_positions(db: &DatabaseConnection) -> Result<Vec<positions::Model>, DbErr> {
    positions::Entity::find()
        .order_by_asc(positions::Column::Code)
        .all(db)
        .await
}

pub async fn get_position(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<positions::Model>, DbErr> {
    positions::Entity::find_by_id(code).one(db).await
}

/// Insert or fully replace the position for `form.code`.
///
/// Last write wins; there is no optimistic concurrency at this layer.
pub async fn upsert_position(db: &DatabaseConnection, form: PositionForm) -> Result<(), DbErr> {
    let now = Utc::now();
    let existing = get_position(db, &form.code).await?;

    let mut model = positions::ActiveModel {
        code: ActiveValue::Set(form.code),
        name: ActiveValue::Set(form.name),
        cost: ActiveValue::Set(form.cost),
        shares: ActiveValue::Set(form.shares),
        stop_loss: ActiveValue::Set(form.stop_loss),
        stop_profit: ActiveValue::Set(form.stop_profit),
        industry: ActiveValue::Set(form.industry),
        buy_date: ActiveValue::Set(form.buy_date),
        created_at: ActiveValue::Set(Some(now)),
        updated_at: ActiveValue::Set(Some(now)),
    };

    match existing {
        Some(current) => {
            model.created_at = ActiveValue::Set(current.created_at);
            positions::Entity::update(model).exec(db).await?;
        }
        None => {
            positions::Entity::insert(model).exec(db).await?;
        }
    }
    Ok(())
}

/// Apply a partial update; `false` when the code is unknown.
pub async fn update_position(
    db: &DatabaseConnection,
    code: &str,
    update: PositionUpdate,
) -> Result<bool, DbErr> {
    let Some(current) = get_position(db, code).await? else {
        return Ok(false);
    };

    let mut model: positions::ActiveModel = current.into();
    if let Some(name) = update.name {
        model.name = ActiveValue::Set(name);
    }
    if let Some(cost) = update.cost {
        model.cost = ActiveValue::Set(cost);
    }
    if let Some(shares) = update.shares {
        model.shares = ActiveValue::Set(shares);
    }
    if update.stop_loss.is_some() {
        model.stop_loss = ActiveValue::Set(update.stop_loss);
    }
    if update.stop_profit.is_some() {
        model.stop_profit = ActiveValue::Set(update.stop_profit);
    }
    if update.industry.is_some() {
        model.industry = ActiveValue::Set(update.industry);
    }
    if update.buy_date.is_some() {
        model.buy_date = ActiveValue::Set(update.buy_date);
    }
    model.updated_at = ActiveValue::Set(Some(Utc::now()));

    positions::Entity::update(model).exec(db).await?;
    Ok(true)
}

/// Remove a position; `false` when the code is unknown.
pub async fn remove_position(db: &DatabaseConnection, code: &str) -> Result<bool, DbErr> {
    let result = positions::Entity::delete_by_id(code).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Profit/loss for a position at `current_price`.
///
/// `cost_total ≤ 0` (for example zero shares) yields a zero percentage
/// rather than a division error.
pub fn profit_loss(position: &positions::Model, current_price: f64) -> ProfitLoss {
    let cost_total = position.cost * position.shares as f64;
    let current_total = current_price * position.shares as f64;
    let profit_loss = current_total - cost_total;
    let profit_loss_pct = if cost_total > 0.0 {
        profit_loss / cost_total * 100.0
    } else {
        0.0
    };

    ProfitLoss {
        code: position.code.clone(),
        name: position.name.clone(),
        cost: position.cost,
        shares: position.shares,
        current_price,
        cost_total,
        current_total,
        profit_loss,
        profit_loss_pct,
        stop_loss: position.stop_loss,
        stop_profit: position.stop_profit,
    }
}

/// Zeroed snapshot used when no quote is available; classifies as
/// breakeven-hold instead of a phantom full loss.
pub fn flat_profit_loss(position: &positions::Model) -> ProfitLoss {
    ProfitLoss {
        code: position.code.clone(),
        name: position.name.clone(),
        cost: position.cost,
        shares: position.shares,
        current_price: 0.0,
        cost_total: 0.0,
        current_total: 0.0,
        profit_loss: 0.0,
        profit_loss_pct: 0.0,
        stop_loss: None,
        stop_profit: None,
    }
}

/// Threshold check; loss and gain alerts may fire together when the
/// thresholds are configured to overlap.
pub fn check_alert(pl: &ProfitLoss, thresholds: &Thresholds) -> Option<Alert> {
    let mut alerts = Vec::new();
    if pl.profit_loss_pct <= -thresholds.loss_threshold {
        alerts.push(AlertKind::Loss);
    }
    if pl.profit_loss_pct >= thresholds.gain_threshold {
        alerts.push(AlertKind::Gain);
    }

    if alerts.is_empty() {
        None
    } else {
        Some(Alert {
            code: pl.code.clone(),
            name: pl.name.clone(),
            price: pl.current_price,
            profit_loss_pct: pl.profit_loss_pct,
            alerts,
        })
    }
}

/// Classify a position into exactly one advice band.
///
/// Stop conditions are checked before the percentage bands; a stop level
/// of zero counts as unset.
pub fn advise(pl: &ProfitLoss) -> Advice {
    if let Some(stop_loss) = pl.stop_loss {
        if stop_loss > 0.0 && pl.current_price <= stop_loss {
            return Advice::StopLossHit;
        }
    }
    if let Some(stop_profit) = pl.stop_profit {
        if stop_profit > 0.0 && pl.current_price >= stop_profit {
            return Advice::StopProfitHit;
        }
    }

    let pct = pl.profit_loss_pct;
    if pct >= 10.0 {
        Advice::StrongGain
    } else if pct >= 5.0 {
        Advice::Hold
    } else if pct >= 0.0 {
        Advice::AwaitBreakeven
    } else if pct >= -5.0 {
        Advice::Watch
    } else {
        Advice::CutLoss
    }
}
