//! `SeaORM` Entity for held positions

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "positions")]
pub struct Model {
    /// Stock code, e.g. "2330"; one position per code
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    /// Average cost per share
    pub cost: f64,
    pub shares: i64,
    pub stop_loss: Option<f64>,
    pub stop_profit: Option<f64>,
    pub industry: Option<String>,
    /// `YYYY-MM-DD`, kept as entered
    pub buy_date: Option<String>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
