//! Feed error types.

use thiserror::Error;

/// Errors from the real-time price source.
///
/// The feed loop treats every variant the same way: log it and keep the
/// previous price. Only [`FeedError::MissingCredentials`] is fatal, and it
/// surfaces before the loop starts.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Real-time mode configured without an API key and URL.
    #[error("real-time feed requires an API key and URL")]
    MissingCredentials,

    /// The HTTP request itself failed (connect, timeout, non-JSON body).
    #[error("quote request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response parsed as JSON but did not contain a usable price.
    #[error("malformed quote payload: {0}")]
    MalformedQuote(String),
}
