//! Real-time quote source speaking the Alpha Vantage `GLOBAL_QUOTE` shape.

use crate::config::FeedConfig;
use crate::error::FeedError;
use serde_json::Value;
use types::{Price, Symbol};

/// Fetches the latest quote for a single symbol over REST.
pub struct QuoteFetcher {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    symbol: Symbol,
}

impl QuoteFetcher {
    /// Build a fetcher from the feed config.
    pub fn from_config(config: &FeedConfig) -> Result<Self, FeedError> {
        let (api_key, api_url) = match (&config.api_key, &config.api_url) {
            (Some(key), Some(url)) => (key.clone(), url.clone()),
            _ => return Err(FeedError::MissingCredentials),
        };

        Ok(Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            symbol: config.symbol.clone(),
        })
    }

    /// Fetch the current price for the configured symbol.
    pub async fn fetch(&self) -> Result<Price, FeedError> {
        let url = format!(
            "{}/query?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            self.api_url.trim_end_matches('/'),
            self.symbol,
            self.api_key,
        );

        let body = self.client.get(&url).send().await?.json::<Value>().await?;
        parse_global_quote(&body)
    }
}

/// Extract the price from a `GLOBAL_QUOTE` response body.
///
/// Expected shape: `{"Global Quote": {"05. price": "150.2500", ...}}`.
/// The upstream API reports prices as decimal strings, not numbers.
pub fn parse_global_quote(body: &Value) -> Result<Price, FeedError> {
    let raw = body["Global Quote"]["05. price"].as_str().ok_or_else(|| {
        FeedError::MalformedQuote("missing \"Global Quote\" -> \"05. price\"".to_string())
    })?;

    let value: f64 = raw
        .parse()
        .map_err(|_| FeedError::MalformedQuote(format!("unparseable price {raw:?}")))?;

    Ok(Price::from_float(value))
}
