//! `SeaORM` Entity for journal trades
//!
//! `total_cost`, `total_revenue`, `profit_loss`, `profit_loss_pct` and
//! `holding_days` are derived at write time from the raw buy/sell
//! fields, see `crate::journal`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trades")]
pub struct Model {
    /// Sequential tag, `TRD001`, `TRD002`, ...
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub trade_type: Option<String>,
    pub buy_date: Option<String>,
    pub buy_price: Option<f64>,
    pub sell_date: Option<String>,
    pub sell_price: Option<f64>,
    pub shares: Option<i64>,
    pub total_cost: Option<f64>,
    pub total_revenue: Option<f64>,
    pub profit_loss: Option<f64>,
    pub profit_loss_pct: Option<f64>,
    pub holding_days: Option<i64>,
    pub entry_strategy_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub entry_reason: Option<String>,
    pub exit_strategy_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub exit_reason: Option<String>,
    pub result: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub success_reason: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub failure_reason: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub improvement: Option<String>,
    pub discipline: Option<String>,
    pub discipline_score: Option<i32>,
    pub tags: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
