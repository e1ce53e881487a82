//! Shared quote board: the single source of truth for the current price.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use types::{Price, Quote};

/// The current quote, shared between the feed task and request handlers.
///
/// Cloning is cheap (two `Arc`s). Handlers read a consistent snapshot via
/// [`QuoteBoard::latest`]; only the feed task writes.
#[derive(Clone)]
pub struct QuoteBoard {
    quote: Arc<RwLock<Quote>>,
    ticks: Arc<AtomicU64>,
}

impl QuoteBoard {
    /// Create a board holding the initial quote. Tick count starts at zero;
    /// readiness probes treat the board as warm once the feed has published.
    pub fn new(initial: Quote) -> Self {
        Self {
            quote: Arc::new(RwLock::new(initial)),
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Snapshot of the current quote.
    pub async fn latest(&self) -> Quote {
        self.quote.read().await.clone()
    }

    /// Replace the quoted price and count the update.
    pub async fn publish(&self, price: Price) {
        self.quote.write().await.price = price;
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of feed updates published so far.
    pub fn tick(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

/// Wire form of a quote update, as broadcast to subscribers and serialized
/// to WebSocket clients. Prices cross this boundary as floats exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    pub symbol: String,
    pub price: f64,
}

impl QuoteUpdate {
    /// Build the wire update for a freshly published quote.
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            price: quote.price.to_float(),
        }
    }
}
