//! Route handlers for the server.
//!
//! # Modules
//!
//! - [`health`]: liveness and readiness probes
//! - [`stock`]: quote view and trade endpoints
//! - [`account`]: registration, login, logout
//! - [`ws`]: WebSocket quote stream

pub mod account;
pub mod health;
pub mod stock;
pub mod ws;
