//! Request and response bodies for the JSON API.
//!
//! Payload shapes follow the frontend contract: money is a float,
//! holdings are a symbol-to-count map (zero entries included), and the
//! legacy login fields keep their camelCase names.

use engine::Settlement;
use serde::{Deserialize, Serialize};
use types::{Holdings, Quote};

/// `GET /api/stock/info` response and the quote part of other payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDto {
    pub symbol: String,
    pub price: f64,
}

impl From<&Quote> for QuoteDto {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            price: quote.price.to_float(),
        }
    }
}

/// `POST /api/register` request. Fields are optional so a missing field
/// is our 400 with a message, not a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/login` request.
///
/// `mode`, `apiKey`, and `apiUrl` are a legacy shape: validated (real-time
/// needs both extras) but never applied, since the feed mode is deployment
/// configuration.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub mode: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(rename = "apiUrl")]
    pub api_url: Option<String>,
}

/// Optional body for `POST /api/stock/buy` and `/api/stock/sell`.
#[derive(Debug, Default, Deserialize)]
pub struct TradeRequest {
    pub quantity: Option<u64>,
}

/// Query string for the trade endpoints (`?quantity=`).
#[derive(Debug, Default, Deserialize)]
pub struct TradeQuery {
    pub quantity: Option<u64>,
}

/// Plain acknowledgment body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Response for a settled trade.
#[derive(Debug, Serialize)]
pub struct TradeResponse {
    pub message: &'static str,
    pub balance: f64,
    pub stocks: Holdings,
}

impl TradeResponse {
    /// Wrap a settlement in the frontend payload shape.
    pub fn new(message: &'static str, settlement: Settlement) -> Self {
        Self {
            message,
            balance: settlement.balance.to_float(),
            stocks: settlement.holdings,
        }
    }
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub balance: f64,
    pub stocks: Holdings,
    /// Present only under the Token policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
