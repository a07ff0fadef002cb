//! Quant: indicator and analytics engine for stockdash
//!
//! Pure computation over daily OHLCV series:
//!
//! - **Data**: [`data::PriceBar`] and [`data::BarSeries`] for ordered
//!   daily bars
//! - **Indicators**: SMA, EMA, RSI, MACD and KD stochastic, each usable
//!   incrementally or over a whole series
//! - **Analysis**: [`analysis::IndicatorSummary`] producing all indicator
//!   arrays positionally aligned to the input dates
//!
//! Every computation is total: short or empty input yields `None` values,
//! never an error.

pub mod analysis;
pub mod data;
pub mod indicators;

pub mod prelude {
    pub use crate::analysis::*;
    pub use crate::data::*;
    pub use crate::indicators::*;
}
