//! `SeaORM` Entity for the strategy library

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "strategies")]
pub struct Model {
    /// Sequential tag, `STG001`, `STG002`, ...
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub strategy_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub entry_condition: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub exit_condition: Option<String>,
    pub stop_loss: Option<f64>,
    pub stop_profit: Option<f64>,
    pub risk_level: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub scenario: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub keywords: Option<Json>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
