//! WebSocket quote stream.
//!
//! - `GET /ws` - upgrade; the client then receives each published quote
//!   as a JSON text frame
//!
//! Fire-and-forget fan-out: a slow client that lags the broadcast channel
//! just misses updates, it never blocks the feed or other clients.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use crate::state::ServerState;

/// WebSocket upgrade handler: `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle one WebSocket connection.
async fn handle_socket(socket: WebSocket, state: ServerState) {
    state.metrics.ws_connect();
    debug!("WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut quote_rx = state.subscribe_quotes();

    // Forward quote updates to the client.
    let send_task = tokio::spawn(async move {
        loop {
            match quote_rx.recv().await {
                Ok(update) => match serde_json::to_string(&update) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    Err(e) => {
                        warn!("Failed to serialize quote update: {}", e);
                    }
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    debug!("WebSocket client lagged by {} quotes", n);
                    // Continue, the client will get the next quote.
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    break; // Feed gone, nothing more to send
                }
            }
        }
    });

    // Drain client frames; the stream is one-way, so anything but Close
    // is ignored.
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    state.metrics.ws_disconnect();
    debug!("WebSocket client disconnected");
}
