//! Axum application builder.
//!
//! Configures routes, middleware, and state for the server.
//!
//! # Routes
//!
//! - `GET /health`, `GET /health/ready` - probes
//! - `GET /ws` - WebSocket quote stream
//! - `GET|POST /api/stock/info` - current quote
//! - `POST /api/register`, `/api/login`, `/api/logout` - account lifecycle
//! - `GET|POST /api/stock/buy`, `/api/stock/sell` - trades

use axum::Router;
use axum::routing::{get, post};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{account, health, stock, ws};
use crate::state::ServerState;

/// Create the Axum application with all routes.
pub fn create_app(state: ServerState) -> Router {
    // CORS layer for frontend development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        // Health endpoints
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        // WebSocket endpoint
        .route("/ws", get(ws::ws_handler))
        // Quote
        .route("/api/stock/info", get(stock::info).post(stock::info))
        // Account lifecycle
        .route("/api/register", post(account::register))
        .route("/api/login", post(account::login))
        .route("/api/logout", post(account::logout))
        // Trades (clients mix GET and POST for these)
        .route("/api/stock/buy", get(stock::buy).post(stock::buy))
        .route("/api/stock/sell", get(stock::sell).post(stock::sell))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Server bind configuration.
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".into(),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("BROKER_SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);

        let host = std::env::var("BROKER_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());

        Self { port, host }
    }

    /// Get bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthPolicy;
    use engine::TradeEngine;
    use feed::QuoteBoard;
    use std::sync::Arc;
    use store::SqliteStore;
    use tokio::sync::broadcast;
    use types::{Cash, Price, Quote};

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_create_app() {
        let (quote_tx, _) = broadcast::channel(16);
        let board = QuoteBoard::new(Quote::new("AAPL", Price::from_float(150.0)));
        let store = Arc::new(SqliteStore::open(":memory:").unwrap());
        let engine = Arc::new(TradeEngine::new(store, "AAPL", Cash::from_float(10_000.0)));
        let state = ServerState::new(quote_tx, board, engine, AuthPolicy::Session);

        let _app = create_app(state);
        // App created successfully
    }
}
