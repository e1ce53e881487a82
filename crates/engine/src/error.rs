//! Engine error types.
//!
//! The display strings double as caller-visible messages, so the two trade
//! rejections keep their exact historical wording.

use store::StoreError;
use thiserror::Error;

/// Errors from trade settlement and account operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Buy rejected: balance cannot cover price × quantity.
    #[error("Insufficient balance")]
    InsufficientFunds,

    /// Sell rejected: fewer shares held than requested.
    #[error("Not enough stocks to sell")]
    InsufficientHoldings,

    /// Malformed request input (empty username, zero quantity, ...).
    #[error("{0}")]
    Validation(String),

    /// Unknown username or wrong password. Deliberately does not say which.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Registration hit an existing username.
    #[error("Username already exists")]
    Duplicate,

    /// A named account disappeared from the store mid-session.
    #[error("No such account: {0}")]
    AccountNotFound(String),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
