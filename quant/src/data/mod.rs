//! Price data module
//!
//! Daily OHLCV bars and ordered series helpers.

pub mod bar;

pub use bar::*;
