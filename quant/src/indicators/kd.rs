//! KD stochastic oscillator
//!
//! RSV_t = (close_t − min(low, n)) / (max(high, n) − min(low, n)) × 100
//! over a rolling n-bar window. %K smooths RSV and %D smooths %K with the
//! same exponential recurrence, smoothing factor 1/3 (the `com=2`
//! convention). A zero high/low range makes RSV undefined: the output at
//! that index is `None` and the smoothing state carries over unchanged.

use std::collections::VecDeque;

/// Smoothing factor for %K and %D (com = 2).
const KD_ALPHA: f64 = 1.0 / 3.0;

/// KD stochastic over a rolling high/low window.
///
/// Unlike the close-only indicators this one consumes full bars, so it
/// has its own `update(high, low, close)` instead of [`crate::indicators::Indicator`].
#[derive(Debug)]
pub struct Kd {
    period: usize,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    k: Option<f64>,
    d: Option<f64>,
    current: Option<(f64, f64)>,
}

impl Kd {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            highs: VecDeque::new(),
            lows: VecDeque::new(),
            k: None,
            d: None,
            current: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, high: f64, low: f64, close: f64) {
        self.highs.push_back(high);
        self.lows.push_back(low);
        if self.highs.len() > self.period {
            self.highs.pop_front();
            self.lows.pop_front();
        }

        if self.highs.len() < self.period {
            self.current = None;
            return;
        }

        let highest = self.highs.iter().cloned().fold(f64::MIN, f64::max);
        let lowest = self.lows.iter().cloned().fold(f64::MAX, f64::min);
        let range = highest - lowest;
        if range <= 0.0 {
            // undefined RSV: emit null, keep smoothing state
            self.current = None;
            return;
        }

        let rsv = (close - lowest) / range * 100.0;
        let k = match self.k {
            None => rsv,
            Some(prev) => prev * (1.0 - KD_ALPHA) + rsv * KD_ALPHA,
        };
        let d = match self.d {
            None => k,
            Some(prev) => prev * (1.0 - KD_ALPHA) + k * KD_ALPHA,
        };
        self.k = Some(k);
        self.d = Some(d);
        self.current = Some((k, d));
    }

    /// `(%K, %D)` at the last update, `None` while warming up or when the
    /// window range was zero.
    pub fn value(&self) -> Option<(f64, f64)> {
        self.current
    }
}

/// Calculate %K and %D over aligned high/low/close series.
pub fn calculate_kd(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let len = highs.len().min(lows.len()).min(closes.len());
    let mut kd = Kd::new(period);
    let mut k_line = Vec::with_capacity(len);
    let mut d_line = Vec::with_capacity(len);

    for i in 0..len {
        kd.update(highs[i], lows[i], closes[i]);
        match kd.value() {
            Some((k, d)) => {
                k_line.push(Some(k));
                d_line.push(Some(d));
            }
            None => {
                k_line.push(None);
                d_line.push(None);
            }
        }
    }

    (k_line, d_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kd_warmup_is_none() {
        let highs = vec![10.0; 8];
        let lows = vec![0.0; 8];
        let closes = vec![5.0; 8];
        let (k, d) = calculate_kd(&highs, &lows, &closes, 9);
        assert!(k.iter().all(|v| v.is_none()));
        assert!(d.iter().all(|v| v.is_none()));
    }

    #[test]
    fn kd_known_sequence() {
        let highs = [10.0, 10.0, 10.0, 10.0];
        let lows = [0.0, 0.0, 0.0, 0.0];
        let closes = [5.0, 7.0, 9.0, 4.0];
        let (k, d) = calculate_kd(&highs, &lows, &closes, 3);

        // first filled window: rsv = 90, seeds both lines
        assert_relative_eq!(k[2].unwrap(), 90.0);
        assert_relative_eq!(d[2].unwrap(), 90.0);

        // next: rsv = 40, k = 90*2/3 + 40/3, d follows k
        let k3 = 90.0 * (2.0 / 3.0) + 40.0 / 3.0;
        let d3 = 90.0 * (2.0 / 3.0) + k3 / 3.0;
        assert_relative_eq!(k[3].unwrap(), k3, epsilon = 1e-12);
        assert_relative_eq!(d[3].unwrap(), d3, epsilon = 1e-12);
    }

    #[test]
    fn kd_zero_range_yields_none_not_panic() {
        let highs = [5.0, 5.0, 5.0, 10.0];
        let lows = [5.0, 5.0, 5.0, 0.0];
        let closes = [5.0, 5.0, 5.0, 8.0];
        let (k, d) = calculate_kd(&highs, &lows, &closes, 3);
        // flat windows: undefined
        assert!(k[2].is_none());
        // once the range opens up the line resumes
        assert!(k[3].is_some());
        assert!(d[3].is_some());
    }

    #[test]
    fn kd_bounded() {
        let highs: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let lows: Vec<f64> = (0..30).map(|i| 90.0 - (i % 3) as f64).collect();
        let closes: Vec<f64> = (0..30).map(|i| 95.0 + ((i % 7) as f64 - 3.0)).collect();
        let (k, d) = calculate_kd(&highs, &lows, &closes, 9);
        for v in k.into_iter().chain(d).flatten() {
            assert!((0.0..=100.0).contains(&v), "KD value {} out of range", v);
        }
    }

    #[test]
    fn kd_mismatched_lengths_truncate() {
        let (k, _) = calculate_kd(&[1.0, 2.0], &[0.0], &[0.5, 0.6, 0.7], 1);
        assert_eq!(k.len(), 1);
    }
}
