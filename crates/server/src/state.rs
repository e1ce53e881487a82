//! Shared server state: everything a handler needs, cloned per request.

use crate::auth::{AuthPolicy, AuthSessions};
use engine::TradeEngine;
use feed::{QuoteBoard, QuoteUpdate};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::broadcast;

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct ServerState {
    /// Broadcast channel the feed task publishes on (feed → WS clients).
    pub quote_tx: broadcast::Sender<QuoteUpdate>,
    /// Latest quote, written by the feed task.
    pub board: QuoteBoard,
    /// Trade settlement and account lifecycle.
    pub engine: Arc<TradeEngine>,
    /// Active sessions/tokens.
    pub sessions: Arc<AuthSessions>,
    /// How callers are identified. Fixed per deployment.
    pub policy: AuthPolicy,
    /// Server start time.
    pub start_time: Instant,
    /// Connection metrics.
    pub metrics: Arc<ServerMetrics>,
}

impl ServerState {
    /// Create server state around an engine and a running feed.
    pub fn new(
        quote_tx: broadcast::Sender<QuoteUpdate>,
        board: QuoteBoard,
        engine: Arc<TradeEngine>,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            quote_tx,
            board,
            engine,
            sessions: Arc::new(AuthSessions::new()),
            policy,
            start_time: Instant::now(),
            metrics: Arc::new(ServerMetrics::new()),
        }
    }

    /// Uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Subscribe to quote updates.
    pub fn subscribe_quotes(&self) -> broadcast::Receiver<QuoteUpdate> {
        self.quote_tx.subscribe()
    }
}

/// Server-side metrics.
pub struct ServerMetrics {
    /// Active WebSocket connections.
    pub ws_connections: AtomicU64,
}

impl ServerMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self {
            ws_connections: AtomicU64::new(0),
        }
    }

    /// Count one WebSocket client in.
    pub fn ws_connect(&self) {
        self.ws_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one WebSocket client out.
    pub fn ws_disconnect(&self) {
        self.ws_connections.fetch_sub(1, Ordering::Relaxed);
    }

    /// Current WebSocket connection count.
    pub fn ws_count(&self) -> u64 {
        self.ws_connections.load(Ordering::Relaxed)
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_connection_counting() {
        let metrics = ServerMetrics::new();
        assert_eq!(metrics.ws_count(), 0);

        metrics.ws_connect();
        metrics.ws_connect();
        assert_eq!(metrics.ws_count(), 2);

        metrics.ws_disconnect();
        assert_eq!(metrics.ws_count(), 1);
    }
}
