//! Strategy library management
//!
//! Entry/exit playbooks the journal references through
//! `entry_strategy_id`. Ids follow the `STGnnn` convention and are
//! allocated from the highest existing suffix.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::entity::strategies;
use crate::models::StrategyForm;

pub async fn get_strategies(db: &DatabaseConnection) -> Result<Vec<strategies::Model>, DbErr> {
    strategies::Entity::find()
        .order_by_asc(strategies::Column::Id)
        .all(db)
        .await
}

pub async fn get_strategy(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<strategies::Model>, DbErr> {
    strategies::Entity::find_by_id(id).one(db).await
}

pub async fn next_strategy_id(db: &DatabaseConnection) -> Result<String, DbErr> {
    let existing = strategies::Entity::find().all(db).await?;
    let next = existing
        .iter()
        .filter_map(|s| s.id.strip_prefix("STG").and_then(|n| n.parse::<u32>().ok()))
        .max()
        .unwrap_or(0)
        + 1;
    Ok(format!("STG{:03}", next))
}

pub async fn add_strategy(db: &DatabaseConnection, form: StrategyForm) -> Result<String, DbErr> {
    let id = next_strategy_id(db).await?;
    let now = Utc::now();

    let strategy = strategies::ActiveModel {
        id: ActiveValue::Set(id.clone()),
        name: ActiveValue::Set(form.name),
        strategy_type: ActiveValue::Set(form.strategy_type),
        entry_condition: ActiveValue::Set(form.entry_condition),
        exit_condition: ActiveValue::Set(form.exit_condition),
        stop_loss: ActiveValue::Set(form.stop_loss),
        stop_profit: ActiveValue::Set(form.stop_profit),
        risk_level: ActiveValue::Set(form.risk_level),
        scenario: ActiveValue::Set(form.scenario),
        keywords: ActiveValue::Set(form.keywords),
        notes: ActiveValue::Set(form.notes),
        created_at: ActiveValue::Set(Some(now)),
        updated_at: ActiveValue::Set(Some(now)),
    };

    strategies::Entity::insert(strategy).exec(db).await?;
    Ok(id)
}

/// Apply a partial update; `false` when the id is unknown.
pub async fn update_strategy(
    db: &DatabaseConnection,
    id: &str,
    form: StrategyForm,
) -> Result<bool, DbErr> {
    let Some(current) = get_strategy(db, id).await? else {
        return Ok(false);
    };

    let mut strategy: strategies::ActiveModel = current.into();
    strategy.name = ActiveValue::Set(form.name);
    if form.strategy_type.is_some() {
        strategy.strategy_type = ActiveValue::Set(form.strategy_type);
    }
    if form.entry_condition.is_some() {
        strategy.entry_condition = ActiveValue::Set(form.entry_condition);
    }
    if form.exit_condition.is_some() {
        strategy.exit_condition = ActiveValue::Set(form.exit_condition);
    }
    if form.stop_loss.is_some() {
        strategy.stop_loss = ActiveValue::Set(form.stop_loss);
    }
    if form.stop_profit.is_some() {
        strategy.stop_profit = ActiveValue::Set(form.stop_profit);
    }
    if form.risk_level.is_some() {
        strategy.risk_level = ActiveValue::Set(form.risk_level);
    }
    if form.scenario.is_some() {
        strategy.scenario = ActiveValue::Set(form.scenario);
    }
    if form.keywords.is_some() {
        strategy.keywords = ActiveValue::Set(form.keywords);
    }
    if form.notes.is_some() {
        strategy.notes = ActiveValue::Set(form.notes);
    }
    strategy.updated_at = ActiveValue::Set(Some(Utc::now()));

    strategies::Entity::update(strategy).exec(db).await?;
    Ok(true)
}
