//! Market data client for the FinMind-style upstream API
//!
//! Wraps `reqwest` with the three correctness pieces the dashboard needs:
//! a fixed-window throttle (minimum gap between requests plus a longer
//! pause after a burst), bounded retry with linear backoff on HTTP 429,
//! and a TTL cache that also serves stale data when a live fetch fails.

use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use quant::data::PriceBar;

use crate::cache::TtlCache;

pub const DATASET_DAILY_PRICE: &str = "TaiwanStockPrice";
pub const DATASET_STOCK_INFO: &str = "TaiwanStockInfo";

const MAX_ATTEMPTS: u64 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Window for "latest price" lookups; wide enough to span weekends and
/// market holidays.
const LATEST_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("rate limited by upstream")]
    RateLimited,
    #[error("no data for {0}")]
    NoData(String),
    #[error("upstream returned status {0}")]
    Upstream(i64),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Fixed-window throttle: at least `min_interval` between requests, and
/// after `burst` requests a `pause` before the window restarts.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    burst: usize,
    pause: Duration,
    count: usize,
    next_allowed: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration, burst: usize, pause: Duration) -> Self {
        Self {
            min_interval,
            burst,
            pause,
            count: 0,
            next_allowed: None,
        }
    }

    /// How long the caller must wait before sending the next request.
    ///
    /// Updates the window bookkeeping assuming the request goes out after
    /// the returned delay.
    pub fn next_delay(&mut self, now: Instant) -> Duration {
        let mut delay = match self.next_allowed {
            Some(at) => at.saturating_duration_since(now),
            None => Duration::ZERO,
        };

        if self.count >= self.burst {
            delay += self.pause;
            self.count = 0;
        }
        self.count += 1;

        self.next_allowed = Some(now + delay + self.min_interval);
        delay
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Duration::from_millis(600), 10, Duration::from_secs(6))
    }
}

/// Backoff before retry `attempt` (1-based) after an upstream rate limit.
pub(crate) fn rate_limit_backoff(attempt: u64) -> Duration {
    Duration::from_secs(attempt * 10)
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    status: i64,
    #[serde(default)]
    #[allow(dead_code)]
    msg: Option<String>,
    #[serde(default)]
    data: Vec<T>,
}

/// One daily price row in the upstream's field naming.
#[derive(Debug, Deserialize)]
struct PriceRow {
    date: String,
    #[serde(default)]
    open: f64,
    #[serde(rename = "max", default)]
    high: f64,
    #[serde(rename = "min", default)]
    low: f64,
    #[serde(default)]
    close: f64,
    #[serde(rename = "Trading_Volume", default)]
    volume: f64,
    #[serde(default)]
    spread: Option<f64>,
}

/// Listed-company directory row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInfo {
    #[serde(rename = "stock_id")]
    pub code: String,
    #[serde(rename = "stock_name", default)]
    pub name: String,
    #[serde(rename = "industry_category", default)]
    pub industry: String,
}

fn rows_to_bars(rows: Vec<PriceRow>) -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = rows
        .into_iter()
        .filter_map(|row| match NaiveDate::parse_from_str(&row.date, "%Y-%m-%d") {
            Ok(date) => Some(PriceBar {
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
                change: row.spread,
            }),
            Err(err) => {
                warn!("skipping price row with bad date {:?}: {}", row.date, err);
                None
            }
        })
        .collect();
    bars.sort_by_key(|b| b.date);
    bars
}

pub struct MarketClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    throttle: Mutex<Throttle>,
    bars: Mutex<TtlCache<String, Vec<PriceBar>>>,
    directory: Mutex<TtlCache<String, Vec<StockInfo>>>,
}

impl MarketClient {
    pub fn new(base_url: String, token: Option<String>, cache_ttl: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url,
            token,
            throttle: Mutex::new(Throttle::default()),
            bars: Mutex::new(TtlCache::new(cache_ttl)),
            directory: Mutex::new(TtlCache::new(cache_ttl)),
        }
    }

    async fn wait_turn(&self) {
        let delay = self.throttle.lock().await.next_delay(Instant::now());
        if delay > Duration::ZERO {
            debug!("throttling upstream request for {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, MarketError> {
        self.wait_turn().await;

        let mut request = self.http.get(&self.base_url).query(params);
        if let Some(token) = &self.token {
            request = request.query(&[("token", token.as_str())]);
        }

        let response = request.send().await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketError::RateLimited);
        }

        let envelope: Envelope<T> = response.json().await?;
        if envelope.status == 429 {
            return Err(MarketError::RateLimited);
        }
        if envelope.status != 200 {
            return Err(MarketError::Upstream(envelope.status));
        }
        Ok(envelope.data)
    }

    async fn fetch_with_retry<T: DeserializeOwned>(
        &self,
        what: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, MarketError> {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.fetch_rows(params).await {
                Ok(rows) => return Ok(rows),
                Err(MarketError::RateLimited) => {
                    let wait = rate_limit_backoff(attempt);
                    warn!(
                        "rate limited fetching {}, attempt {}/{}, backing off {:?}",
                        what, attempt, MAX_ATTEMPTS, wait
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => {
                    error!("fetching {} failed: {}", what, err);
                    return Err(err);
                }
            }
        }
        Err(MarketError::RateLimited)
    }

    /// Daily bars for `code` over a trailing window, ascending by date.
    ///
    /// Serves fresh cache when available; on upstream failure degrades to
    /// a stale cache entry before giving up.
    pub async fn daily_bars(&self, code: &str, days: i64) -> Result<Vec<PriceBar>, MarketError> {
        let key = format!("price_{}_{}d", code, days);
        if let Some(bars) = self.bars.lock().await.get(&key) {
            return Ok(bars.clone());
        }

        let end = Utc::now().date_naive();
        let start = end - ChronoDuration::days(days);
        let params = [
            ("dataset", DATASET_DAILY_PRICE.to_string()),
            ("data_id", code.to_string()),
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
        ];

        match self.fetch_with_retry::<PriceRow>(code, &params).await {
            Ok(rows) => {
                let bars = rows_to_bars(rows);
                if bars.is_empty() {
                    if let Some(stale) = self.bars.lock().await.get_stale(&key) {
                        warn!("empty payload for {}, serving stale cache", code);
                        return Ok(stale.clone());
                    }
                    return Err(MarketError::NoData(code.to_string()));
                }
                self.bars.lock().await.insert(key, bars.clone());
                Ok(bars)
            }
            Err(err) => {
                if let Some(stale) = self.bars.lock().await.get_stale(&key) {
                    warn!("fetch for {} failed ({}), serving stale cache", code, err);
                    return Ok(stale.clone());
                }
                Err(err)
            }
        }
    }

    /// Last close and day change-percent for `code`; `(0, 0)` when no
    /// quote is available, so callers degrade instead of erroring.
    pub async fn latest_quote(&self, code: &str) -> (f64, f64) {
        match self.daily_bars(code, LATEST_WINDOW_DAYS).await {
            Ok(bars) => bars
                .last()
                .map(|bar| (bar.close, bar.change_percent()))
                .unwrap_or((0.0, 0.0)),
            Err(err) => {
                warn!("no quote for {}: {}", code, err);
                (0.0, 0.0)
            }
        }
    }

    /// Listed-company directory, filtered to rows with an industry and a
    /// plain numeric code.
    pub async fn stock_directory(&self) -> Result<Vec<StockInfo>, MarketError> {
        let key = "all_stocks".to_string();
        if let Some(stocks) = self.directory.lock().await.get(&key) {
            return Ok(stocks.clone());
        }

        let params = [
            ("dataset", DATASET_STOCK_INFO.to_string()),
            ("data_date", Utc::now().date_naive().format("%Y-%m-%d").to_string()),
        ];

        match self.fetch_with_retry::<StockInfo>("stock directory", &params).await {
            Ok(rows) => {
                let stocks: Vec<StockInfo> = rows
                    .into_iter()
                    .filter(|s| {
                        !s.industry.is_empty()
                            && !s.code.chars().any(|c| matches!(c, 'X' | 'Y' | 'Z'))
                    })
                    .collect();
                if stocks.is_empty() {
                    return Err(MarketError::NoData("stock directory".to_string()));
                }
                self.directory.lock().await.insert(key, stocks.clone());
                Ok(stocks)
            }
            Err(err) => {
                if let Some(stale) = self.directory.lock().await.get_stale(&key) {
                    warn!("directory fetch failed ({}), serving stale cache", err);
                    return Ok(stale.clone());
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_first_request_is_immediate() {
        let mut throttle = Throttle::default();
        assert_eq!(throttle.next_delay(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn throttle_enforces_min_interval() {
        let mut throttle = Throttle::default();
        let now = Instant::now();
        throttle.next_delay(now);
        let delay = throttle.next_delay(now);
        assert_eq!(delay, Duration::from_millis(600));
    }

    #[test]
    fn throttle_no_delay_after_gap() {
        let mut throttle = Throttle::default();
        let now = Instant::now();
        throttle.next_delay(now);
        let delay = throttle.next_delay(now + Duration::from_secs(5));
        assert_eq!(delay, Duration::ZERO);
    }

    #[test]
    fn throttle_pauses_after_burst() {
        let mut throttle = Throttle::new(Duration::from_millis(600), 10, Duration::from_secs(6));
        let mut now = Instant::now();
        for _ in 0..10 {
            now += Duration::from_secs(1);
            assert_eq!(throttle.next_delay(now), Duration::ZERO);
        }
        // the window is spent: the next request waits out the pause
        now += Duration::from_secs(1);
        assert_eq!(throttle.next_delay(now), Duration::from_secs(6));
        // window restarted
        now += Duration::from_secs(10);
        assert_eq!(throttle.next_delay(now), Duration::ZERO);
    }

    #[test]
    fn backoff_grows_linearly() {
        assert_eq!(rate_limit_backoff(1), Duration::from_secs(10));
        assert_eq!(rate_limit_backoff(2), Duration::from_secs(20));
        assert_eq!(rate_limit_backoff(3), Duration::from_secs(30));
    }

    #[test]
    fn price_rows_deserialize_upstream_names() {
        let raw = r#"{
            "msg": "success",
            "status": 200,
            "data": [
                {"date": "2025-07-01", "stock_id": "2330", "Trading_Volume": 21837000.0,
                 "open": 1060.0, "max": 1075.0, "min": 1055.0, "close": 1070.0, "spread": 15.0},
                {"date": "not-a-date", "open": 1.0, "max": 1.0, "min": 1.0, "close": 1.0,
                 "Trading_Volume": 0.0}
            ]
        }"#;
        let envelope: Envelope<PriceRow> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.status, 200);
        let bars = rows_to_bars(envelope.data);
        // the malformed row is skipped, not fatal
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].high, 1075.0);
        assert_eq!(bars[0].low, 1055.0);
        assert_eq!(bars[0].volume, 21837000.0);
        assert_eq!(bars[0].change, Some(15.0));
    }

    #[test]
    fn bars_sorted_ascending() {
        let raw = r#"[
            {"date": "2025-07-03", "open": 1, "max": 1, "min": 1, "close": 3.0, "Trading_Volume": 1},
            {"date": "2025-07-01", "open": 1, "max": 1, "min": 1, "close": 1.0, "Trading_Volume": 1},
            {"date": "2025-07-02", "open": 1, "max": 1, "min": 1, "close": 2.0, "Trading_Volume": 1}
        ]"#;
        let rows: Vec<PriceRow> = serde_json::from_str(raw).unwrap();
        let bars = rows_to_bars(rows);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn directory_rows_deserialize() {
        let raw = r#"{"stock_id": "2330", "stock_name": "TSMC", "industry_category": "Semiconductors"}"#;
        let info: StockInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.code, "2330");
        assert_eq!(info.industry, "Semiconductors");
    }
}
