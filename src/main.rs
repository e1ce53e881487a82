//! paper-broker - Main binary
//!
//! Wires the price feed, account store, trade engine, and HTTP/WS server
//! together:
//!
//! ```text
//! ┌────────────────┐    QuoteUpdate     ┌────────────────┐
//! │   Price Feed   │ ────────────────►  │  Axum Server   │
//! │  (tokio task)  │   (broadcast)      │  (HTTP + WS)   │
//! │                │                    │                │
//! │  QuoteBoard ◄──┼────────────────────┼── trade reads  │
//! └────────────────┘   shared snapshot  └────────────────┘
//! ```
//!
//! The feed runs for the lifetime of the process; handlers read one quote
//! snapshot per trade and settle through the engine.

mod config;

use clap::Parser;
use engine::TradeEngine;
use feed::{FeedMode, QuoteBoard, run_feed};
use server::{AuthPolicy, ServerConfig, ServerState, create_app};
use std::sync::Arc;
use store::{StoreBackend, open_store};
use tokio::sync::broadcast;
use tracing::{error, info};
use types::{Cash, Price};

pub use config::BrokerConfig;

/// paper-broker - toy stock-trading service with a live price feed
#[derive(Parser, Debug)]
#[command(name = "paper-broker")]
#[command(about = "A toy paper-trading service: background price feed + HTTP trade API")]
#[command(version)]
struct Args {
    /// Symbol to quote and trade
    #[arg(long, env = "BROKER_SYMBOL")]
    symbol: Option<String>,

    /// Initial price before the first feed update
    #[arg(long, env = "BROKER_INITIAL_PRICE")]
    initial_price: Option<f64>,

    /// Milliseconds between feed updates
    #[arg(long, env = "BROKER_FEED_INTERVAL_MS")]
    feed_interval_ms: Option<u64>,

    /// Feed mode: "simulation" or "real-time"
    #[arg(long, env = "BROKER_FEED_MODE")]
    feed_mode: Option<FeedMode>,

    /// API key for real-time mode
    #[arg(long, env = "BROKER_API_KEY")]
    api_key: Option<String>,

    /// Quote API base URL for real-time mode
    #[arg(long, env = "BROKER_API_URL")]
    api_url: Option<String>,

    /// Starting cash for new accounts
    #[arg(long, env = "BROKER_STARTING_BALANCE")]
    starting_balance: Option<f64>,

    /// Store backend: "json" or "sqlite"
    #[arg(long, env = "BROKER_STORE_BACKEND")]
    store_backend: Option<StoreBackend>,

    /// Store path (":memory:" for in-memory SQLite)
    #[arg(long, env = "BROKER_STORE_PATH")]
    store_path: Option<String>,

    /// Auth policy: "none", "token", or "session"
    #[arg(long, env = "BROKER_AUTH_POLICY")]
    auth_policy: Option<AuthPolicy>,
}

/// Merge CLI/env overrides onto the defaults.
fn build_config(args: &Args) -> BrokerConfig {
    let mut config = BrokerConfig::default();

    if let Some(symbol) = &args.symbol {
        config.symbol = symbol.clone();
    }
    if let Some(price) = args.initial_price {
        config.initial_price = Price::from_float(price);
    }
    if let Some(interval) = args.feed_interval_ms {
        config.feed_interval_ms = interval;
    }
    if let Some(mode) = args.feed_mode {
        config.feed_mode = mode;
    }
    if let Some(key) = &args.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(url) = &args.api_url {
        config.api_url = Some(url.clone());
    }
    if let Some(balance) = args.starting_balance {
        config.starting_balance = Cash::from_float(balance);
    }
    if let Some(backend) = args.store_backend {
        config.store_backend = backend;
    }
    if let Some(path) = &args.store_path {
        config.store_path = path.clone();
    }
    if let Some(policy) = args.auth_policy {
        config.auth_policy = policy;
    }

    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args);

    // Real-time mode without credentials would fail on the first tick;
    // fail at startup instead.
    if config.feed_mode == FeedMode::RealTime
        && (config.api_key.is_none() || config.api_url.is_none())
    {
        anyhow::bail!("real-time feed mode requires --api-key and --api-url");
    }

    let server_config = ServerConfig::from_env();

    eprintln!("paper-broker");
    eprintln!("  symbol:        {}", config.symbol);
    eprintln!("  feed:          {} every {}ms", config.feed_mode, config.feed_interval_ms);
    eprintln!("  store:         {} ({})", config.store_backend, config.store_path);
    eprintln!("  auth:          {}", config.auth_policy);
    eprintln!("  listening on:  {}", server_config.bind_addr());

    let store = open_store(&config.store_config())?;
    let engine = Arc::new(TradeEngine::new(
        store,
        config.symbol.clone(),
        config.starting_balance,
    ));

    let feed_config = config.feed_config();
    let board = QuoteBoard::new(feed_config.initial_quote());
    let (quote_tx, _) = broadcast::channel(64);

    tokio::spawn({
        let board = board.clone();
        let quote_tx = quote_tx.clone();
        async move {
            if let Err(e) = run_feed(board, quote_tx, feed_config).await {
                error!(error = %e, "price feed stopped");
            }
        }
    });

    let state = ServerState::new(quote_tx, board, engine, config.auth_policy);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr()).await?;
    info!(addr = %server_config.bind_addr(), "server started");
    axum::serve(listener, app).await?;

    Ok(())
}
