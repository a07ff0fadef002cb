use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Asia::Taipei;
use shared::{get_db_connection, Config, MarketClient, Settings};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

mod digest;
mod notify;

use notify::{Notifier, TelegramNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting stockdash notifier...");

    let config = Config::from_env()?;
    let token = config
        .bot_token
        .clone()
        .context("BOT_TOKEN is not set")?;
    let chat_id = config.chat_id.context("TELEGRAM_CHAT_ID is not set")?;

    let db = get_db_connection(&config.database_url).await?;
    let settings_path = PathBuf::from(&config.settings_path);
    let settings = Settings::load(&settings_path);
    let market = MarketClient::new(
        config.market_base_url.clone(),
        config.market_token.clone(),
        Duration::from_secs(settings.cache_ttl_secs),
    );
    let notifier = TelegramNotifier::new(&token, chat_id);

    info!("Notifier running on a minute tick");

    let mut ticker = tokio::time::interval(Duration::from_secs(60));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // remembers the last minute that fired so a slot triggers only once
    let mut last_fired: Option<String> = None;

    loop {
        ticker.tick().await;

        // the schedule is editable through the dashboard, re-read each tick
        let settings = Settings::load(&settings_path);
        let now = Utc::now().with_timezone(&Taipei);
        let stamp = now.format("%Y-%m-%d %H:%M").to_string();
        if last_fired.as_deref() == Some(stamp.as_str()) {
            continue;
        }

        let hhmm = now.format("%H:%M").to_string();
        let Some(slot) = settings.schedule.slot_at(&hhmm) else {
            continue;
        };
        last_fired = Some(stamp);

        info!("schedule slot {:?} reached, building digest", slot);
        match digest::portfolio_digest(&db, &market, &settings, slot).await {
            Ok(Some(message)) => {
                if !notifier.send(&message).await {
                    warn!("digest delivery failed");
                }
            }
            Ok(None) => info!("no positions held, skipping digest"),
            Err(err) => error!("building digest failed: {}", err),
        }
    }
}
