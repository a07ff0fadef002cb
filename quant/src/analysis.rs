//! Aligned indicator computation for a bar series
//!
//! Produces the full indicator set the dashboard charts: MA 5/20/60, RSI,
//! MACD with signal line, and KD stochastic, one value slot per input
//! bar.

use chrono::NaiveDate;

use crate::data::BarSeries;
use crate::indicators::{calculate_kd, calculate_macd, calculate_rsi, calculate_sma};

pub const MA_SHORT: usize = 5;
pub const MA_MID: usize = 20;
pub const MA_LONG: usize = 60;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const KD_PERIOD: usize = 9;

/// All indicator series for one symbol, positionally aligned to `dates`.
///
/// `None` marks slots where the lookback window is not yet filled (or,
/// for KD, where the window range was zero).
#[derive(Debug, Clone)]
pub struct IndicatorSummary {
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub ma5: Vec<Option<f64>>,
    pub ma20: Vec<Option<f64>>,
    pub ma60: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

impl IndicatorSummary {
    pub fn compute(series: &BarSeries) -> Self {
        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();

        let (macd, signal) = calculate_macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
        let (k, d) = calculate_kd(&highs, &lows, &closes, KD_PERIOD);

        Self {
            dates: series.dates(),
            ma5: calculate_sma(&closes, MA_SHORT),
            ma20: calculate_sma(&closes, MA_MID),
            ma60: calculate_sma(&closes, MA_LONG),
            rsi: calculate_rsi(&closes, RSI_PERIOD),
            macd,
            signal,
            k,
            d,
            closes,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PriceBar;
    use chrono::NaiveDate;

    fn series(n: usize) -> BarSeries {
        let bars = (0..n)
            .map(|i| {
                let close = 100.0 + ((i % 11) as f64 - 5.0) * 2.0;
                PriceBar::new(
                    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(i as u64),
                    close - 0.5,
                    close + 2.0,
                    close - 2.0,
                    close,
                    1_000.0,
                )
            })
            .collect();
        BarSeries::from_vec(bars)
    }

    #[test]
    fn all_arrays_aligned() {
        let summary = IndicatorSummary::compute(&series(70));
        let n = summary.len();
        assert_eq!(summary.closes.len(), n);
        assert_eq!(summary.ma5.len(), n);
        assert_eq!(summary.ma20.len(), n);
        assert_eq!(summary.ma60.len(), n);
        assert_eq!(summary.rsi.len(), n);
        assert_eq!(summary.macd.len(), n);
        assert_eq!(summary.signal.len(), n);
        assert_eq!(summary.k.len(), n);
        assert_eq!(summary.d.len(), n);
    }

    #[test]
    fn lookback_windows_respected() {
        let summary = IndicatorSummary::compute(&series(70));
        assert!(summary.ma5[3].is_none());
        assert!(summary.ma5[4].is_some());
        assert!(summary.ma20[18].is_none());
        assert!(summary.ma20[19].is_some());
        assert!(summary.ma60[58].is_none());
        assert!(summary.ma60[59].is_some());
        assert!(summary.rsi[13].is_none());
        assert!(summary.rsi[14].is_some());
        assert!(summary.k[7].is_none());
        assert!(summary.k[8].is_some());
    }

    #[test]
    fn short_series_never_errors() {
        let summary = IndicatorSummary::compute(&series(3));
        assert_eq!(summary.len(), 3);
        assert!(summary.ma20.iter().all(|v| v.is_none()));
        assert!(summary.rsi.iter().all(|v| v.is_none()));
        // EMAs are defined from the first sample
        assert!(summary.macd.iter().all(|v| v.is_some()));
    }

    #[test]
    fn empty_series() {
        let summary = IndicatorSummary::compute(&BarSeries::new());
        assert!(summary.is_empty());
    }
}
