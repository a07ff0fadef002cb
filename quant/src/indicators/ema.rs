//! EMA (Exponential Moving Average) indicator
//!
//! α = 2/(span+1), seeded from the first value:
//! EMA_t = value_t·α + EMA_{t-1}·(1−α). This is the `adjust=false`
//! convention, so the EMA is defined from the first sample onward.

use crate::indicators::Indicator;

/// Exponential moving average with span-based smoothing.
#[derive(Debug)]
pub struct Ema {
    span: usize,
    alpha: f64,
    state: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        let span = span.max(1);
        Self {
            span,
            alpha: 2.0 / (span as f64 + 1.0),
            state: None,
        }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        "EMA"
    }

    fn update(&mut self, value: f64) {
        self.state = Some(match self.state {
            None => value,
            Some(prev) => value * self.alpha + prev * (1.0 - self.alpha),
        });
    }

    fn value(&self) -> Option<f64> {
        self.state
    }

    fn is_ready(&self) -> bool {
        self.state.is_some()
    }
}

/// Calculate EMA over a series of values.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut ema = Ema::new(span);
    let mut results = Vec::with_capacity(values.len());

    for &value in values {
        ema.update(value);
        results.push(ema.value());
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_seeds_from_first_value() {
        let out = calculate_ema(&[10.0, 20.0], 12);
        assert_relative_eq!(out[0].unwrap(), 10.0);
    }

    #[test]
    fn ema_recurrence() {
        let out = calculate_ema(&[10.0, 20.0, 30.0], 3);
        let alpha = 2.0 / 4.0;
        let e1 = 20.0 * alpha + 10.0 * (1.0 - alpha);
        let e2 = 30.0 * alpha + e1 * (1.0 - alpha);
        assert_relative_eq!(out[1].unwrap(), e1);
        assert_relative_eq!(out[2].unwrap(), e2);
    }

    #[test]
    fn ema_constant_input_is_constant() {
        let out = calculate_ema(&[100.0; 10], 5);
        for v in out {
            assert_relative_eq!(v.unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 12).is_empty());
    }
}
