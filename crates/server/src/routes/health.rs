//! Health check endpoints.
//!
//! - `GET /health` - liveness probe (always 200 while the server is up)
//! - `GET /health/ready` - readiness probe (ready once the feed has ticked)

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::ServerState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: &'static str,
    /// Feed updates published so far.
    pub tick: u64,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Active WebSocket connections.
    pub ws_connections: u64,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the service is ready to quote.
    pub ready: bool,
    /// Readiness reason.
    pub reason: &'static str,
}

/// Liveness probe: `GET /health`
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        tick: state.board.tick(),
        uptime_secs: state.uptime_secs(),
        ws_connections: state.metrics.ws_count(),
    })
}

/// Readiness probe: `GET /health/ready`
///
/// Ready once the feed has published at least one quote; before that the
/// board only holds the configured initial price.
pub async fn ready(State(state): State<ServerState>) -> Json<ReadyResponse> {
    let (ready, reason) = if state.board.tick() > 0 {
        (true, "feed publishing")
    } else {
        (false, "waiting for first feed update")
    };

    Json(ReadyResponse { ready, reason })
}
