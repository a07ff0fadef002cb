//! Daily OHLCV bar data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume (shares)
    pub volume: f64,
    /// Net change against the previous close, when the source supplies it
    pub change: Option<f64>,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            change: None,
        }
    }

    /// Day change in percent, derived from the net change field.
    ///
    /// Matches the quote convention: change / previous close × 100, with
    /// the previous close reconstructed as close − change. Zero when the
    /// change is unknown or the reconstructed base is not positive.
    pub fn change_percent(&self) -> f64 {
        match self.change {
            Some(chg) if self.close > chg => chg / (self.close - chg) * 100.0,
            _ => 0.0,
        }
    }

    /// Typical price (HLC/3)
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Total range (high − low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Check if the bar closed above its open
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Ordered collection of daily bars for one symbol.
///
/// Bars are kept ascending by date; [`BarSeries::sort_by_date`] restores
/// the invariant after bulk loads.
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    bars: Vec<PriceBar>,
}

impl BarSeries {
    pub fn new() -> Self {
        Self { bars: Vec::new() }
    }

    pub fn from_vec(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self { bars }
    }

    pub fn push(&mut self, bar: PriceBar) {
        self.bars.push(bar);
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Sort ascending by date
    pub fn sort_by_date(&mut self) {
        self.bars.sort_by_key(|b| b.date);
    }

    /// Simple return over the trailing `days` closes, averaged per day.
    ///
    /// Used by the screener for short-horizon momentum. `None` when fewer
    /// than two bars are available.
    pub fn momentum(&self, days: usize) -> Option<f64> {
        if self.bars.len() < 2 {
            return None;
        }
        let start = self.bars.len().saturating_sub(days + 1);
        let window = &self.bars[start..];
        let mut returns = Vec::new();
        for pair in window.windows(2) {
            if pair[0].close > 0.0 {
                returns.push((pair[1].close - pair[0].close) / pair[0].close);
            }
        }
        if returns.is_empty() {
            None
        } else {
            Some(returns.iter().sum::<f64>() / returns.len() as f64)
        }
    }
}

impl From<Vec<PriceBar>> for BarSeries {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self::from_vec(bars)
    }
}
