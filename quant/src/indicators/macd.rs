//! MACD (Moving Average Convergence Divergence) indicator
//!
//! MACD line = EMA(fast) − EMA(slow); signal line = EMA(signal span) of
//! the MACD line. With first-value-seeded EMAs both lines are defined
//! from the first sample onward.

use crate::indicators::{Ema, Indicator};

/// MACD output for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD indicator built from three EMAs.
#[derive(Debug)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
    last: Option<MacdOutput>,
}

impl Macd {
    pub fn new(fast_span: usize, slow_span: usize, signal_span: usize) -> Self {
        Self {
            fast: Ema::new(fast_span),
            slow: Ema::new(slow_span),
            signal: Ema::new(signal_span),
            last: None,
        }
    }

    pub fn output(&self) -> Option<MacdOutput> {
        self.last
    }

    pub fn signal_value(&self) -> Option<f64> {
        self.last.map(|o| o.signal)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        "MACD"
    }

    fn update(&mut self, value: f64) {
        self.fast.update(value);
        self.slow.update(value);
        if let (Some(fast), Some(slow)) = (self.fast.value(), self.slow.value()) {
            let macd = fast - slow;
            self.signal.update(macd);
            let signal = self.signal.value().unwrap_or(macd);
            self.last = Some(MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            });
        }
    }

    fn value(&self) -> Option<f64> {
        self.last.map(|o| o.macd)
    }

    fn is_ready(&self) -> bool {
        self.last.is_some()
    }
}

/// Calculate MACD and signal lines over a series of closes.
///
/// Returns `(macd, signal)`, each aligned to the input.
pub fn calculate_macd(
    values: &[f64],
    fast_span: usize,
    slow_span: usize,
    signal_span: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut macd = Macd::new(fast_span, slow_span, signal_span);
    let mut macd_line = Vec::with_capacity(values.len());
    let mut signal_line = Vec::with_capacity(values.len());

    for &value in values {
        macd.update(value);
        macd_line.push(macd.value());
        signal_line.push(macd.signal_value());
    }

    (macd_line, signal_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::calculate_ema;
    use approx::assert_relative_eq;

    #[test]
    fn macd_is_ema_difference() {
        let values: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64).sin() * 5.0).collect();
        let (macd_line, _) = calculate_macd(&values, 12, 26, 9);
        let fast = calculate_ema(&values, 12);
        let slow = calculate_ema(&values, 26);
        for i in 0..values.len() {
            assert_relative_eq!(
                macd_line[i].unwrap(),
                fast[i].unwrap() - slow[i].unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn macd_defined_from_first_sample() {
        let (macd_line, signal_line) = calculate_macd(&[100.0, 101.0], 12, 26, 9);
        assert!(macd_line[0].is_some());
        assert!(signal_line[0].is_some());
    }

    #[test]
    fn signal_smooths_macd_line() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
        let (macd_line, signal_line) = calculate_macd(&values, 12, 26, 9);
        let macd_values: Vec<f64> = macd_line.iter().map(|v| v.unwrap()).collect();
        let expected = calculate_ema(&macd_values, 9);
        for i in 0..values.len() {
            assert_relative_eq!(signal_line[i].unwrap(), expected[i].unwrap(), epsilon = 1e-12);
        }
    }

    #[test]
    fn macd_empty_input() {
        let (macd_line, signal_line) = calculate_macd(&[], 12, 26, 9);
        assert!(macd_line.is_empty());
        assert!(signal_line.is_empty());
    }
}
