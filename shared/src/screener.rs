//! Momentum screener over the listed-company directory
//!
//! For each candidate symbol: filter on last price and volume, compute
//! the average 5-day return, keep positive momentum, and rank by it.
//! Symbols whose price history cannot be fetched are skipped, not fatal.

use std::cmp::Ordering;

use tracing::debug;

use quant::data::BarSeries;

use crate::market::{MarketClient, MarketError};
use crate::models::StrongStock;

/// How many directory entries to scan per screening pass; each one costs
/// an upstream request on a cold cache.
const SCREEN_UNIVERSE: usize = 30;
const MOMENTUM_DAYS: usize = 5;
const HISTORY_DAYS: i64 = 30;

pub async fn screen_strong(
    market: &MarketClient,
    min_volume: i64,
    min_price: f64,
    limit: usize,
) -> Result<Vec<StrongStock>, MarketError> {
    let directory = market.stock_directory().await?;
    let mut strong = Vec::new();

    for info in directory.iter().take(SCREEN_UNIVERSE) {
        let bars = match market.daily_bars(&info.code, HISTORY_DAYS).await {
            Ok(bars) => bars,
            Err(err) => {
                debug!("screener skipping {}: {}", info.code, err);
                continue;
            }
        };
        let series = BarSeries::from_vec(bars);
        let Some(latest) = series.last() else {
            continue;
        };

        if latest.close <= min_price || latest.volume <= min_volume as f64 * 1000.0 {
            continue;
        }
        let Some(momentum) = series.momentum(MOMENTUM_DAYS) else {
            continue;
        };
        if momentum <= 0.0 {
            continue;
        }

        let change_pct = match series.len().checked_sub(2).and_then(|i| series.get(i)) {
            Some(prev) if prev.close > 0.0 => {
                (latest.close - prev.close) / prev.close * 100.0
            }
            _ => 0.0,
        };

        strong.push(StrongStock {
            code: info.code.clone(),
            name: info.name.clone(),
            industry: info.industry.clone(),
            price: latest.close,
            volume: latest.volume,
            momentum_5d: momentum * 100.0,
            change_pct,
        });
    }

    strong.sort_by(|a, b| {
        b.momentum_5d
            .partial_cmp(&a.momentum_5d)
            .unwrap_or(Ordering::Equal)
    });
    strong.truncate(limit);
    Ok(strong)
}
