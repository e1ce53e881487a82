//! Background price feed for the paper-broker service.
//!
//! One task owns the quoted price of the configured symbol. Every interval
//! it computes the next price — a random walk in simulation mode, a REST
//! fetch in real-time mode — publishes it to the shared [`QuoteBoard`], and
//! broadcasts a [`QuoteUpdate`] to any subscribers (the WebSocket route).
//!
//! A failed fetch keeps the previous price; the feed never dies on a bad
//! upstream response.

pub mod board;
pub mod config;
pub mod error;
pub mod fetch;
pub mod generator;

pub use board::{QuoteBoard, QuoteUpdate};
pub use config::{FeedConfig, FeedMode};
pub use error::FeedError;
pub use fetch::QuoteFetcher;
pub use generator::{advance, run_feed};
