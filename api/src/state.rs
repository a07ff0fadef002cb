use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use sea_orm::DatabaseConnection;
use shared::{Config, MarketClient, Settings};

/// Application state handed to every request handler.
///
/// Settings are kept as an immutable snapshot behind the lock; handlers
/// read a cheap `Arc` clone and writers swap in a fresh snapshot via
/// [`AppState::reload`].
pub struct AppState {
    pub db: DatabaseConnection,
    pub market: MarketClient,
    settings_path: PathBuf,
    settings: RwLock<Arc<Settings>>,
}

impl AppState {
    pub fn new(config: &Config, db: DatabaseConnection) -> Self {
        let settings_path = PathBuf::from(&config.settings_path);
        let settings = Settings::load(&settings_path);
        let market = MarketClient::new(
            config.market_base_url.clone(),
            config.market_token.clone(),
            Duration::from_secs(settings.cache_ttl_secs),
        );

        Self {
            db,
            market,
            settings_path,
            settings: RwLock::new(Arc::new(settings)),
        }
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Arc<Settings> {
        self.settings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Re-read the settings file and publish a fresh snapshot.
    pub fn reload(&self) -> Arc<Settings> {
        let fresh = Arc::new(Settings::load(&self.settings_path));
        *self
            .settings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = fresh.clone();
        fresh
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }
}
