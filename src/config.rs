//! Central configuration for the paper-broker deployment.
//!
//! All deployment knobs are defined here for easy tuning; the CLI and
//! `BROKER_*` environment variables override individual fields.

use feed::{FeedConfig, FeedMode};
use server::AuthPolicy;
use store::{StoreBackend, StoreConfig};
use types::{Cash, Price};

/// Master configuration for the whole service.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Price Feed
    // ─────────────────────────────────────────────────────────────────────────
    /// Symbol being quoted and traded.
    pub symbol: String,
    /// Price on the board before the first feed update.
    pub initial_price: Price,
    /// Milliseconds between feed updates.
    pub feed_interval_ms: u64,
    /// Random-walk simulation or external REST fetch.
    pub feed_mode: FeedMode,
    /// API key for real-time mode.
    pub api_key: Option<String>,
    /// Quote API base URL for real-time mode.
    pub api_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────────
    /// Cash every new account starts with.
    pub starting_balance: Cash,
    /// Persistence backend for accounts.
    pub store_backend: StoreBackend,
    /// Store location (file path; `:memory:` for in-memory SQLite).
    pub store_path: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Auth
    // ─────────────────────────────────────────────────────────────────────────
    /// How trade requests are matched to accounts.
    pub auth_policy: AuthPolicy,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            // Price Feed
            symbol: "AAPL".to_string(),
            initial_price: Price::from_float(150.0),
            feed_interval_ms: 1000, // one update per second
            feed_mode: FeedMode::Simulation,
            api_key: None,
            api_url: None,

            // Accounts
            starting_balance: Cash::from_float(10_000.0),
            store_backend: StoreBackend::Sqlite,
            store_path: "paper-broker.db".to_string(),

            // Auth
            auth_policy: AuthPolicy::Session,
        }
    }
}

impl BrokerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The feed crate's view of this config.
    pub fn feed_config(&self) -> FeedConfig {
        let mut config = FeedConfig::default()
            .with_symbol(self.symbol.clone())
            .with_initial_price(self.initial_price)
            .with_interval_ms(self.feed_interval_ms)
            .with_mode(self.feed_mode);
        if let (Some(key), Some(url)) = (&self.api_key, &self.api_url) {
            config = config.with_api(key.clone(), url.clone());
        }
        config
    }

    /// The store crate's view of this config.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_backend(self.store_backend)
            .with_path(self.store_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_target_deployment() {
        let config = BrokerConfig::default();
        assert_eq!(config.symbol, "AAPL");
        assert_eq!(config.initial_price, Price::from_float(150.0));
        assert_eq!(config.feed_mode, FeedMode::Simulation);
        assert_eq!(config.auth_policy, AuthPolicy::Session);
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
    }

    #[test]
    fn test_derived_configs() {
        let mut config = BrokerConfig::default();
        config.feed_mode = FeedMode::RealTime;
        config.api_key = Some("demo".to_string());
        config.api_url = Some("https://www.alphavantage.co".to_string());

        let feed = config.feed_config();
        assert_eq!(feed.mode, FeedMode::RealTime);
        assert_eq!(feed.api_key.as_deref(), Some("demo"));

        let store = config.store_config();
        assert_eq!(store.path, "paper-broker.db");
    }
}
