//! Technical indicators module
//!
//! Hand-rolled implementations of the dashboard's indicator set. Each
//! indicator can be fed incrementally through [`Indicator::update`] or
//! applied to a whole series with its `calculate_*` helper, which returns
//! one `Option<f64>` per input value. `None` marks positions where the
//! lookback window is not yet filled, distinct from a computed zero.

pub mod ema;
pub mod kd;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::*;
pub use kd::*;
pub use macd::*;
pub use rsi::*;
pub use sma::*;

/// Indicator trait for close-price driven indicators
pub trait Indicator {
    /// Get the name of the indicator
    fn name(&self) -> &str;

    /// Update indicator with a new close
    fn update(&mut self, value: f64);

    /// Get current indicator value, `None` while warming up
    fn value(&self) -> Option<f64>;

    /// Check if indicator has enough data
    fn is_ready(&self) -> bool;
}
