//! Portfolio digest messages
//!
//! One HTML message per schedule slot: every position with its quote,
//! P/L and advice label, an overall total, and a section for threshold
//! alerts when any fired.

use anyhow::Result;
use sea_orm::DatabaseConnection;

use shared::models::{Advice, Alert, AlertKind, ProfitLoss};
use shared::portfolio;
use shared::settings::{Settings, Slot};
use shared::MarketClient;

pub async fn portfolio_digest(
    db: &DatabaseConnection,
    market: &MarketClient,
    settings: &Settings,
    slot: Slot,
) -> Result<Option<String>> {
    let positions = portfolio::get_all_positions(db).await?;
    if positions.is_empty() {
        return Ok(None);
    }

    let mut rows = Vec::with_capacity(positions.len());
    let mut alerts = Vec::new();

    for position in &positions {
        let (price, _) = market.latest_quote(&position.code).await;
        let pl = if price > 0.0 {
            portfolio::profit_loss(position, price)
        } else {
            portfolio::flat_profit_loss(position)
        };
        if let Some(alert) = portfolio::check_alert(&pl, &settings.thresholds) {
            alerts.push(alert);
        }
        let advice = portfolio::advise(&pl);
        rows.push((pl, advice));
    }

    Ok(Some(format_digest(slot, &rows, &alerts)))
}

fn slot_title(slot: Slot) -> &'static str {
    match slot {
        Slot::Morning => "Morning check",
        Slot::Monitor => "Market monitor",
        Slot::Evening => "Closing summary",
    }
}

fn alert_tag(alert: &Alert) -> &'static str {
    // a position can breach both thresholds at once
    if alert.alerts.contains(&AlertKind::Loss) && alert.alerts.contains(&AlertKind::Gain) {
        "loss+gain"
    } else if alert.alerts.contains(&AlertKind::Loss) {
        "loss"
    } else {
        "gain"
    }
}

pub fn format_digest(slot: Slot, rows: &[(ProfitLoss, Advice)], alerts: &[Alert]) -> String {
    let mut message = format!("📊 <b>{}</b>\n\n", slot_title(slot));

    let mut total_cost = 0.0;
    let mut total_value = 0.0;
    for (pl, advice) in rows {
        total_cost += pl.cost_total;
        total_value += pl.current_total;
        message.push_str(&format!(
            "<b>{} {}</b>: <code>{:.2}</code> ({:+.2}%) {}\n",
            pl.code,
            pl.name,
            pl.current_price,
            pl.profit_loss_pct,
            advice.label(),
        ));
    }

    let total_pl = total_value - total_cost;
    let total_pct = if total_cost > 0.0 {
        total_pl / total_cost * 100.0
    } else {
        0.0
    };
    message.push_str(&format!(
        "\n<b>Total P/L:</b> <code>{:.2}</code> ({:+.2}%)\n",
        total_pl, total_pct
    ));

    if !alerts.is_empty() {
        message.push_str("\n⚠️ <b>Alerts</b>\n");
        for alert in alerts {
            message.push_str(&format!(
                "{} {}: {:+.2}% [{}]\n",
                alert.code,
                alert.name,
                alert.profit_loss_pct,
                alert_tag(alert),
            ));
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pl(code: &str, cost_total: f64, current_total: f64) -> ProfitLoss {
        let profit_loss = current_total - cost_total;
        ProfitLoss {
            code: code.to_string(),
            name: "Test".to_string(),
            cost: 100.0,
            shares: 1000,
            current_price: current_total / 1000.0,
            cost_total,
            current_total,
            profit_loss,
            profit_loss_pct: if cost_total > 0.0 {
                profit_loss / cost_total * 100.0
            } else {
                0.0
            },
            stop_loss: None,
            stop_profit: None,
        }
    }

    #[test]
    fn digest_totals_and_labels() {
        let rows = vec![
            (pl("2330", 100_000.0, 112_000.0), Advice::StrongGain),
            (pl("2454", 200_000.0, 188_000.0), Advice::Watch),
        ];
        let message = format_digest(Slot::Evening, &rows, &[]);

        assert!(message.contains("Closing summary"));
        assert!(message.contains("2330"));
        assert!(message.contains("strong gain"));
        assert!(message.contains("watch"));
        // total: 300k cost vs 300k value
        assert!(message.contains("<b>Total P/L:</b> <code>0.00</code> (+0.00%)"));
        assert!(!message.contains("Alerts"));
    }

    #[test]
    fn digest_includes_alert_section() {
        let snapshot = pl("2330", 100_000.0, 88_000.0);
        let alert = Alert {
            code: snapshot.code.clone(),
            name: snapshot.name.clone(),
            price: snapshot.current_price,
            profit_loss_pct: snapshot.profit_loss_pct,
            alerts: vec![AlertKind::Loss],
        };
        let message = format_digest(Slot::Monitor, &[(snapshot, Advice::CutLoss)], &[alert]);

        assert!(message.contains("Market monitor"));
        assert!(message.contains("⚠️ <b>Alerts</b>"));
        assert!(message.contains("[loss]"));
        assert!(message.contains("-12.00%"));
    }

    #[test]
    fn digest_zero_cost_total_guarded() {
        let rows = vec![(pl("2330", 0.0, 0.0), Advice::AwaitBreakeven)];
        let message = format_digest(Slot::Morning, &rows, &[]);
        assert!(message.contains("(+0.00%)"));
    }
}
