//! Trade journal: CRUD, derived fields and performance analysis
//!
//! Derived money fields are computed when a record is written, never
//! trusted from the client. Holding period derivation is best-effort: a
//! date that does not parse leaves the field unset and the rest of the
//! record intact.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::warn;

use crate::entity::trades;
use crate::models::{GroupStats, PerformanceReport, TradeFilter, TradeForm, TradeUpdate};
use crate::settings::{Outcome, ResultLabels};

const DATE_FORMAT: &str = "%Y-%m-%d";
const UNRECORDED: &str = "unrecorded";

/// Fields derived from the raw buy/sell data of a trade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedFields {
    pub total_cost: Option<f64>,
    pub total_revenue: Option<f64>,
    pub profit_loss: Option<f64>,
    pub profit_loss_pct: Option<f64>,
    pub holding_days: Option<i64>,
}

/// Compute the derived fields for a trade record.
pub fn derive_fields(
    buy_date: Option<&str>,
    buy_price: Option<f64>,
    sell_date: Option<&str>,
    sell_price: Option<f64>,
    shares: Option<i64>,
) -> DerivedFields {
    let mut derived = DerivedFields::default();

    if let (Some(price), Some(shares)) = (buy_price, shares) {
        derived.total_cost = Some(price * shares as f64);
    }
    if let (Some(price), Some(shares)) = (sell_price, shares) {
        derived.total_revenue = Some(price * shares as f64);
    }
    if let (Some(cost), Some(revenue)) = (derived.total_cost, derived.total_revenue) {
        let profit_loss = revenue - cost;
        derived.profit_loss = Some(profit_loss);
        derived.profit_loss_pct = Some(if cost > 0.0 {
            profit_loss / cost * 100.0
        } else {
            0.0
        });
    }

    if let (Some(buy), Some(sell)) = (buy_date, sell_date) {
        match (
            NaiveDate::parse_from_str(buy, DATE_FORMAT),
            NaiveDate::parse_from_str(sell, DATE_FORMAT),
        ) {
            (Ok(bought), Ok(sold)) => {
                derived.holding_days = Some((sold - bought).num_days());
            }
            _ => warn!(
                "unparseable trade dates ({:?}, {:?}), skipping holding period",
                buy, sell
            ),
        }
    }

    derived
}

/// Allocate the next `TRDnnn` id from the highest existing suffix;
/// counting rows instead would collide with surviving ids after a
/// deletion.
pub async fn next_trade_id(db: &DatabaseConnection) -> Result<String, DbErr> {
    let existing = trades::Entity::find().all(db).await?;
    let next = existing
        .iter()
        .filter_map(|t| t.id.strip_prefix("TRD").and_then(|n| n.parse::<u32>().ok()))
        .max()
        .unwrap_or(0)
        + 1;
    Ok(format!("TRD{:03}", next))
}

pub async fn add_trade(db: &DatabaseConnection, form: TradeForm) -> Result<String, DbErr> {
    let id = next_trade_id(db).await?;
    let derived = derive_fields(
        form.buy_date.as_deref(),
        form.buy_price,
        form.sell_date.as_deref(),
        form.sell_price,
        form.shares,
    );
    let now = Utc::now();

    let trade = trades::ActiveModel {
        id: ActiveValue::Set(id.clone()),
        code: ActiveValue::Set(form.code),
        name: ActiveValue::Set(form.name),
        trade_type: ActiveValue::Set(form.trade_type),
        buy_date: ActiveValue::Set(form.buy_date),
        buy_price: ActiveValue::Set(form.buy_price),
        sell_date: ActiveValue::Set(form.sell_date),
        sell_price: ActiveValue::Set(form.sell_price),
        shares: ActiveValue::Set(form.shares),
        total_cost: ActiveValue::Set(derived.total_cost),
        total_revenue: ActiveValue::Set(derived.total_revenue),
        profit_loss: ActiveValue::Set(derived.profit_loss),
        profit_loss_pct: ActiveValue::Set(derived.profit_loss_pct),
        holding_days: ActiveValue::Set(derived.holding_days),
        entry_strategy_id: ActiveValue::Set(form.entry_strategy_id),
        entry_reason: ActiveValue::Set(form.entry_reason),
        exit_strategy_id: ActiveValue::Set(form.exit_strategy_id),
        exit_reason: ActiveValue::Set(form.exit_reason),
        result: ActiveValue::Set(form.result),
        success_reason: ActiveValue::Set(form.success_reason),
        failure_reason: ActiveValue::Set(form.failure_reason),
        improvement: ActiveValue::Set(form.improvement),
        discipline: ActiveValue::Set(form.discipline),
        discipline_score: ActiveValue::Set(form.discipline_score),
        tags: ActiveValue::Set(form.tags),
        notes: ActiveValue::Set(form.notes),
        created_at: ActiveValue::Set(Some(now)),
        updated_at: ActiveValue::Set(Some(now)),
    };

    trades::Entity::insert(trade).exec(db).await?;
    Ok(id)
}

pub async fn get_trades(
    db: &DatabaseConnection,
    filter: &TradeFilter,
) -> Result<Vec<trades::Model>, DbErr> {
    let mut query = trades::Entity::find();

    if let Some(code) = &filter.code {
        query = query.filter(trades::Column::Code.eq(code.clone()));
    }
    if let Some(year) = filter.year {
        let prefix = format!("{}%", year);
        query = query.filter(
            Condition::any()
                .add(trades::Column::BuyDate.like(prefix.clone()))
                .add(trades::Column::SellDate.like(prefix)),
        );
    }
    if let Some(discipline) = &filter.discipline {
        query = query.filter(trades::Column::Discipline.eq(discipline.clone()));
    }
    if let Some(result) = &filter.result {
        query = query.filter(trades::Column::Result.eq(result.clone()));
    }

    query
        .order_by_desc(trades::Column::BuyDate)
        .all(db)
        .await
}

/// Merge a partial update into an existing trade and recompute derived
/// fields; `false` when the id is unknown.
pub async fn update_trade(
    db: &DatabaseConnection,
    id: &str,
    update: TradeUpdate,
) -> Result<bool, DbErr> {
    let Some(current) = trades::Entity::find_by_id(id).one(db).await? else {
        return Ok(false);
    };

    let buy_date = update.buy_date.or(current.buy_date.clone());
    let buy_price = update.buy_price.or(current.buy_price);
    let sell_date = update.sell_date.or(current.sell_date.clone());
    let sell_price = update.sell_price.or(current.sell_price);
    let shares = update.shares.or(current.shares);
    let derived = derive_fields(
        buy_date.as_deref(),
        buy_price,
        sell_date.as_deref(),
        sell_price,
        shares,
    );

    let mut trade: trades::ActiveModel = current.into();
    if let Some(code) = update.code {
        trade.code = ActiveValue::Set(code);
    }
    if update.name.is_some() {
        trade.name = ActiveValue::Set(update.name);
    }
    if update.trade_type.is_some() {
        trade.trade_type = ActiveValue::Set(update.trade_type);
    }
    trade.buy_date = ActiveValue::Set(buy_date);
    trade.buy_price = ActiveValue::Set(buy_price);
    trade.sell_date = ActiveValue::Set(sell_date);
    trade.sell_price = ActiveValue::Set(sell_price);
    trade.shares = ActiveValue::Set(shares);
    trade.total_cost = ActiveValue::Set(derived.total_cost);
    trade.total_revenue = ActiveValue::Set(derived.total_revenue);
    trade.profit_loss = ActiveValue::Set(derived.profit_loss);
    trade.profit_loss_pct = ActiveValue::Set(derived.profit_loss_pct);
    trade.holding_days = ActiveValue::Set(derived.holding_days);
    if update.entry_strategy_id.is_some() {
        trade.entry_strategy_id = ActiveValue::Set(update.entry_strategy_id);
    }
    if update.entry_reason.is_some() {
        trade.entry_reason = ActiveValue::Set(update.entry_reason);
    }
    if update.exit_strategy_id.is_some() {
        trade.exit_strategy_id = ActiveValue::Set(update.exit_strategy_id);
    }
    if update.exit_reason.is_some() {
        trade.exit_reason = ActiveValue::Set(update.exit_reason);
    }
    if update.result.is_some() {
        trade.result = ActiveValue::Set(update.result);
    }
    if update.success_reason.is_some() {
        trade.success_reason = ActiveValue::Set(update.success_reason);
    }
    if update.failure_reason.is_some() {
        trade.failure_reason = ActiveValue::Set(update.failure_reason);
    }
    if update.improvement.is_some() {
        trade.improvement = ActiveValue::Set(update.improvement);
    }
    if update.discipline.is_some() {
        trade.discipline = ActiveValue::Set(update.discipline);
    }
    if update.discipline_score.is_some() {
        trade.discipline_score = ActiveValue::Set(update.discipline_score);
    }
    if update.tags.is_some() {
        trade.tags = ActiveValue::Set(update.tags);
    }
    if update.notes.is_some() {
        trade.notes = ActiveValue::Set(update.notes);
    }
    trade.updated_at = ActiveValue::Set(Some(Utc::now()));

    trades::Entity::update(trade).exec(db).await?;
    Ok(true)
}

/// Delete a trade; `false` when the id is unknown.
pub async fn delete_trade(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
    let result = trades::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

pub async fn analyze_performance(
    db: &DatabaseConnection,
    year: Option<i32>,
    labels: &ResultLabels,
) -> Result<PerformanceReport, DbErr> {
    let filter = TradeFilter {
        year,
        ..TradeFilter::default()
    };
    let trades = get_trades(db, &filter).await?;
    Ok(summarize(&trades, labels))
}

/// Aggregate a trade list into the performance report.
///
/// Missing profit/loss values count as zero; an empty list yields the
/// all-zero report without any division.
pub fn summarize(trades: &[trades::Model], labels: &ResultLabels) -> PerformanceReport {
    if trades.is_empty() {
        return PerformanceReport::default();
    }

    let total = trades.len();
    let mut success_count = 0;
    let mut failure_count = 0;
    for trade in trades {
        match trade.result.as_deref().and_then(|r| labels.classify(r)) {
            Some(Outcome::Success) => success_count += 1,
            Some(Outcome::Failure) => failure_count += 1,
            None => {}
        }
    }

    let total_profit_loss: f64 = trades.iter().filter_map(|t| t.profit_loss).sum();
    let avg_profit_loss_pct =
        trades.iter().filter_map(|t| t.profit_loss_pct).sum::<f64>() / total as f64;

    PerformanceReport {
        total_trades: total,
        success_count,
        failure_count,
        success_rate: success_count as f64 / total as f64 * 100.0,
        total_profit_loss,
        avg_profit_loss_pct,
        discipline_analysis: group_stats(trades, labels, |t| {
            t.discipline.clone().unwrap_or_else(|| UNRECORDED.to_string())
        }),
        strategy_analysis: group_stats(trades, labels, |t| {
            t.entry_strategy_id
                .clone()
                .unwrap_or_else(|| UNRECORDED.to_string())
        }),
    }
}

fn group_stats<F>(
    trades: &[trades::Model],
    labels: &ResultLabels,
    key: F,
) -> BTreeMap<String, GroupStats>
where
    F: Fn(&trades::Model) -> String,
{
    let mut groups: BTreeMap<String, Vec<&trades::Model>> = BTreeMap::new();
    for trade in trades {
        groups.entry(key(trade)).or_default().push(trade);
    }

    groups
        .into_iter()
        .map(|(label, members)| {
            let count = members.len();
            let success_count = members
                .iter()
                .filter(|t| {
                    matches!(
                        t.result.as_deref().and_then(|r| labels.classify(r)),
                        Some(Outcome::Success)
                    )
                })
                .count();
            let total_profit_loss: f64 =
                members.iter().filter_map(|t| t.profit_loss).sum();
            let avg_profit_loss_pct = members
                .iter()
                .map(|t| t.profit_loss_pct.unwrap_or(0.0))
                .sum::<f64>()
                / count as f64;

            (
                label,
                GroupStats {
                    count,
                    success_count,
                    success_rate: success_count as f64 / count as f64 * 100.0,
                    avg_profit_loss_pct,
                    total_profit_loss,
                },
            )
        })
        .collect()
}
