//! HTTP/WebSocket surface for the paper-broker service.
//!
//! The server owns no business logic: handlers identify the caller through
//! the configured [`auth::AuthPolicy`], snapshot the current quote from the
//! [`feed::QuoteBoard`], and hand both to the trade engine. Quote updates
//! published by the feed task are forwarded verbatim to WebSocket clients.
//!
//! # Modules
//!
//! - [`app`]: router setup and bind configuration
//! - [`state`]: shared handler state and connection metrics
//! - [`auth`]: session/token storage and caller identification
//! - [`error`]: engine-to-HTTP error mapping
//! - [`dto`]: request/response bodies for the JSON API
//! - [`routes`]: route handlers (health, stock, account, ws)

pub mod app;
pub mod auth;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use app::{ServerConfig, create_app};
pub use auth::{AuthPolicy, AuthSessions};
pub use error::{AppError, AppResult};
pub use state::{ServerMetrics, ServerState};
