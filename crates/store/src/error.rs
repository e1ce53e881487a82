//! Store error types.

use thiserror::Error;

/// Errors from account persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `create` hit an existing username.
    #[error("account already exists: {0}")]
    Duplicate(String),

    /// File I/O failed (JSON backend).
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite failed (SQLite backend).
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored document or column did not parse.
    #[error("corrupt store document: {0}")]
    Serde(#[from] serde_json::Error),
}
