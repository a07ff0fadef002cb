//! API and domain data-transfer types
//!
//! Every payload crossing the HTTP boundary is an explicit struct with
//! optional fields as `Option`, never an untyped map.

use serde::{Deserialize, Serialize};

/// Round to two decimals for display payloads.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Profit/loss snapshot for one position at a given price.
#[derive(Debug, Clone, Serialize)]
pub struct ProfitLoss {
    pub code: String,
    pub name: String,
    pub cost: f64,
    pub shares: i64,
    pub current_price: f64,
    pub cost_total: f64,
    pub current_total: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    pub stop_loss: Option<f64>,
    pub stop_profit: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Loss,
    Gain,
}

/// Threshold breach notification for one position.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub profit_loss_pct: f64,
    pub alerts: Vec<AlertKind>,
}

/// Action advice for a held position, ordered by precedence: stop
/// conditions are checked before the percentage bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Advice {
    #[serde(rename = "stop-loss hit")]
    StopLossHit,
    #[serde(rename = "stop-profit hit")]
    StopProfitHit,
    #[serde(rename = "strong gain")]
    StrongGain,
    #[serde(rename = "hold")]
    Hold,
    #[serde(rename = "hold, awaiting breakeven")]
    AwaitBreakeven,
    #[serde(rename = "watch")]
    Watch,
    #[serde(rename = "recommend stop-loss")]
    CutLoss,
}

impl Advice {
    pub fn label(&self) -> &'static str {
        match self {
            Advice::StopLossHit => "stop-loss hit",
            Advice::StopProfitHit => "stop-profit hit",
            Advice::StrongGain => "strong gain",
            Advice::Hold => "hold",
            Advice::AwaitBreakeven => "hold, awaiting breakeven",
            Advice::Watch => "watch",
            Advice::CutLoss => "recommend stop-loss",
        }
    }
}

impl std::fmt::Display for Advice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the portfolio table, enriched with the live quote.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioRow {
    pub code: String,
    pub name: String,
    pub cost: f64,
    pub shares: i64,
    pub current_price: f64,
    pub change_pct: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    pub stop_loss: Option<f64>,
    pub stop_profit: Option<f64>,
    pub industry: Option<String>,
    pub strategy: Advice,
}

/// One row of the watchlist table.
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistRow {
    pub code: String,
    pub name: String,
    pub current_price: f64,
    pub target_price: Option<f64>,
    pub change_pct: f64,
    pub reason: Option<String>,
    pub industry: Option<String>,
}

/// Screener hit, sorted by 5-day momentum.
#[derive(Debug, Clone, Serialize)]
pub struct StrongStock {
    pub code: String,
    pub name: String,
    pub industry: String,
    pub price: f64,
    pub volume: f64,
    pub momentum_5d: f64,
    pub change_pct: f64,
}

/// Aggregate statistics for one group of trades (by discipline label or
/// by entry strategy).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub count: usize,
    pub success_count: usize,
    pub success_rate: f64,
    pub avg_profit_loss_pct: f64,
    pub total_profit_loss: f64,
}

/// Full performance analysis over a (possibly year-filtered) journal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub total_trades: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub success_rate: f64,
    pub total_profit_loss: f64,
    pub avg_profit_loss_pct: f64,
    pub discipline_analysis: std::collections::BTreeMap<String, GroupStats>,
    pub strategy_analysis: std::collections::BTreeMap<String, GroupStats>,
}

/// Create/replace payload for a position.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionForm {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub shares: i64,
    pub stop_loss: Option<f64>,
    pub stop_profit: Option<f64>,
    pub industry: Option<String>,
    pub buy_date: Option<String>,
}

/// Partial update for a position; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionUpdate {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub shares: Option<i64>,
    pub stop_loss: Option<f64>,
    pub stop_profit: Option<f64>,
    pub industry: Option<String>,
    pub buy_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchForm {
    pub code: String,
    pub name: String,
    pub target_price: Option<f64>,
    pub reason: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchUpdate {
    pub name: Option<String>,
    pub target_price: Option<f64>,
    pub reason: Option<String>,
    pub industry: Option<String>,
}

/// New journal entry; derived fields are computed on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeForm {
    pub code: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub trade_type: Option<String>,
    pub buy_date: Option<String>,
    pub buy_price: Option<f64>,
    pub sell_date: Option<String>,
    pub sell_price: Option<f64>,
    pub shares: Option<i64>,
    pub entry_strategy_id: Option<String>,
    pub entry_reason: Option<String>,
    pub exit_strategy_id: Option<String>,
    pub exit_reason: Option<String>,
    pub result: Option<String>,
    pub success_reason: Option<String>,
    pub failure_reason: Option<String>,
    pub improvement: Option<String>,
    pub discipline: Option<String>,
    pub discipline_score: Option<i32>,
    pub tags: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for a journal entry; derived fields are recomputed
/// from the merged record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub trade_type: Option<String>,
    pub buy_date: Option<String>,
    pub buy_price: Option<f64>,
    pub sell_date: Option<String>,
    pub sell_price: Option<f64>,
    pub shares: Option<i64>,
    pub entry_strategy_id: Option<String>,
    pub entry_reason: Option<String>,
    pub exit_strategy_id: Option<String>,
    pub exit_reason: Option<String>,
    pub result: Option<String>,
    pub success_reason: Option<String>,
    pub failure_reason: Option<String>,
    pub improvement: Option<String>,
    pub discipline: Option<String>,
    pub discipline_score: Option<i32>,
    pub tags: Option<String>,
    pub notes: Option<String>,
}

/// Journal query filter; all conditions are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub code: Option<String>,
    pub year: Option<i32>,
    pub discipline: Option<String>,
    pub result: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrategyForm {
    pub name: String,
    #[serde(rename = "type")]
    pub strategy_type: Option<String>,
    pub entry_condition: Option<String>,
    pub exit_condition: Option<String>,
    pub stop_loss: Option<f64>,
    pub stop_profit: Option<f64>,
    pub risk_level: Option<String>,
    pub scenario: Option<String>,
    pub keywords: Option<serde_json::Value>,
    pub notes: Option<String>,
}
