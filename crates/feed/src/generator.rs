//! The feed task: advance the price, publish it, broadcast it.

use crate::board::{QuoteBoard, QuoteUpdate};
use crate::config::{FeedConfig, FeedMode};
use crate::error::FeedError;
use crate::fetch::QuoteFetcher;
use rand::Rng;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use types::Price;

/// One random-walk step: a uniform shift in [-1.0, 1.0] dollars.
///
/// There is deliberately no floor; a long unlucky run can push the price
/// to zero or below, and the rest of the system must cope.
pub fn advance(price: Price) -> Price {
    let step: f64 = rand::rng().random_range(-1.0..=1.0);
    price + Price::from_float(step)
}

/// How the feed obtains each tick's price.
enum PriceSource {
    Walk,
    Fetch(QuoteFetcher),
}

impl PriceSource {
    fn from_config(config: &FeedConfig) -> Result<Self, FeedError> {
        match config.mode {
            FeedMode::Simulation => Ok(PriceSource::Walk),
            FeedMode::RealTime => Ok(PriceSource::Fetch(QuoteFetcher::from_config(config)?)),
        }
    }

    /// Next price given the current one. Fetch failures fall back to the
    /// current price so a flaky upstream never stalls or kills the feed.
    async fn next(&self, current: Price) -> Price {
        match self {
            PriceSource::Walk => advance(current),
            PriceSource::Fetch(fetcher) => match fetcher.fetch().await {
                Ok(price) => price,
                Err(e) => {
                    warn!(error = %e, "quote fetch failed, keeping previous price");
                    current
                }
            },
        }
    }
}

/// Run the price feed until the process exits.
///
/// Every `interval_ms`: compute the next price, publish it on the board,
/// and broadcast a [`QuoteUpdate`]. Returns early only when real-time mode
/// is configured without credentials.
pub async fn run_feed(
    board: QuoteBoard,
    tx: broadcast::Sender<QuoteUpdate>,
    config: FeedConfig,
) -> Result<(), FeedError> {
    let source = PriceSource::from_config(&config)?;
    let mut interval = tokio::time::interval(Duration::from_millis(config.interval_ms));

    info!(
        symbol = %config.symbol,
        mode = %config.mode,
        interval_ms = config.interval_ms,
        "price feed started"
    );

    loop {
        interval.tick().await;

        let current = board.latest().await.price;
        let next = source.next(current).await;
        board.publish(next).await;

        let update = QuoteUpdate {
            symbol: config.symbol.clone(),
            price: next.to_float(),
        };
        debug!(symbol = %update.symbol, price = update.price, "quote published");

        // No subscribers is fine; the update is simply dropped.
        let _ = tx.send(update);
    }
}
