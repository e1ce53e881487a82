//! Feed configuration: symbol, cadence, and price source.

use std::fmt;
use std::str::FromStr;
use types::{Price, Quote, Symbol};

/// Where each tick's price comes from. Fixed per deployment; requests can
/// never switch a running feed between modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedMode {
    /// Random walk from the initial price.
    #[default]
    Simulation,
    /// Fetch the latest quote from an external REST API each tick.
    RealTime,
}

impl FromStr for FeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulation" | "sim" => Ok(FeedMode::Simulation),
            "real-time" | "realtime" | "real_time" => Ok(FeedMode::RealTime),
            other => Err(format!(
                "unknown feed mode {other:?} (expected \"simulation\" or \"real-time\")"
            )),
        }
    }
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedMode::Simulation => write!(f, "simulation"),
            FeedMode::RealTime => write!(f, "real-time"),
        }
    }
}

/// Configuration for the feed task.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Symbol the feed quotes.
    pub symbol: Symbol,
    /// Price of the first quote on the board.
    pub initial_price: Price,
    /// Milliseconds between updates.
    pub interval_ms: u64,
    /// Simulation walk or real-time fetch.
    pub mode: FeedMode,
    /// API key for real-time mode.
    pub api_key: Option<String>,
    /// Base URL for real-time mode (e.g. "https://www.alphavantage.co").
    pub api_url: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            initial_price: Price::from_float(150.0),
            interval_ms: 1000, // one update per second
            mode: FeedMode::Simulation,
            api_key: None,
            api_url: None,
        }
    }
}

impl FeedConfig {
    /// Set the quoted symbol.
    pub fn with_symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Set the initial price.
    pub fn with_initial_price(mut self, price: Price) -> Self {
        self.initial_price = price;
        self
    }

    /// Set the update interval in milliseconds.
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Set the price source mode.
    pub fn with_mode(mut self, mode: FeedMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the real-time API credentials.
    pub fn with_api(mut self, key: impl Into<String>, url: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self.api_url = Some(url.into());
        self
    }

    /// The quote the board starts with, before the first feed update.
    pub fn initial_quote(&self) -> Quote {
        Quote::new(self.symbol.clone(), self.initial_price)
    }
}
