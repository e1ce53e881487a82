//! Trade settlement and account lifecycle for the paper-broker service.
//!
//! The [`TradeEngine`] owns the business rules: buys must be covered by the
//! account balance, sells by the account's holdings, and every mutation of
//! one account happens under that account's own lock. The quote used for a
//! settlement is taken once, by the caller, and passed in — the engine never
//! re-reads the price mid-trade.

pub mod credentials;
mod engine;
mod error;

pub use engine::{ANONYMOUS_USER, Settlement, TradeEngine};
pub use error::EngineError;
