use dotenv::dotenv;

/// Process-level configuration from the environment.
///
/// Runtime-editable settings (schedule, thresholds, labels) live in the
/// JSON settings file instead, see [`crate::settings::Settings`].
pub struct Config {
    pub database_url: String,
    pub market_base_url: String,
    pub market_token: Option<String>,
    pub settings_path: String,
    pub static_dir: String,
    pub bind_addr: String,
    pub bot_token: Option<String>,
    pub chat_id: Option<i64>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://stockdash.db?mode=rwc".to_string()),
            market_base_url: std::env::var("MARKET_BASE_URL")
                .unwrap_or_else(|_| "https://api.finmindtrade.com/api/v4/data".to_string()),
            market_token: std::env::var("MARKET_TOKEN").ok(),
            settings_path: std::env::var("SETTINGS_PATH")
                .unwrap_or_else(|_| "./settings.json".to_string()),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            bot_token: std::env::var("BOT_TOKEN").ok(),
            chat_id: std::env::var("TELEGRAM_CHAT_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
        })
    }
}
