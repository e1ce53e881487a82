//! Quote view and trade endpoints.
//!
//! - `GET|POST /api/stock/info` - current quote (no auth)
//! - `GET|POST /api/stock/buy` - settle a buy for the caller
//! - `GET|POST /api/stock/sell` - settle a sell for the caller
//!
//! Each trade takes ONE quote snapshot from the board and settles the
//! whole order at that price; the feed may move the price concurrently
//! without affecting an in-flight settlement.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use types::Quantity;

use crate::auth::identify;
use crate::dto::{QuoteDto, TradeQuery, TradeRequest, TradeResponse};
use crate::error::{AppError, AppResult};
use crate::state::ServerState;

/// Current quote: `GET|POST /api/stock/info`
pub async fn info(State(state): State<ServerState>) -> Json<QuoteDto> {
    let quote = state.board.latest().await;
    Json(QuoteDto::from(&quote))
}

/// Resolve the order quantity: body wins over query string, default 1.
fn resolve_quantity(query: &TradeQuery, body: &Option<Json<TradeRequest>>) -> AppResult<Quantity> {
    let raw = body
        .as_ref()
        .and_then(|Json(body)| body.quantity)
        .or(query.quantity)
        .unwrap_or(1);

    if raw == 0 {
        return Err(AppError::BadRequest("quantity must be positive".to_string()));
    }
    Ok(Quantity(raw))
}

/// Settle a buy: `GET|POST /api/stock/buy`
pub async fn buy(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<TradeQuery>,
    body: Option<Json<TradeRequest>>,
) -> AppResult<Json<TradeResponse>> {
    let username = identify(state.policy, &state.sessions, &headers)?;
    let quantity = resolve_quantity(&query, &body)?;
    let quote = state.board.latest().await;

    let settlement = state.engine.buy(&username, quote.price, quantity).await?;
    Ok(Json(TradeResponse::new("Purchase successful", settlement)))
}

/// Settle a sell: `GET|POST /api/stock/sell`
pub async fn sell(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<TradeQuery>,
    body: Option<Json<TradeRequest>>,
) -> AppResult<Json<TradeResponse>> {
    let username = identify(state.policy, &state.sessions, &headers)?;
    let quantity = resolve_quantity(&query, &body)?;
    let quote = state.board.latest().await;

    let settlement = state.engine.sell(&username, quote.price, quantity).await?;
    Ok(Json(TradeResponse::new("Sale successful", settlement)))
}
