//! `WebSocket` stream of tick summaries.
//!
//! Clients connect to `GET /ws/ticks` and receive one JSON-encoded
//! [`TickSummary`](citysim_core::TickSummary) per tick. A client that
//! falls behind skips to the newest summary.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// `GET /ws/ticks`
pub async fn ws_ticks(ws: WebSocketUpgrade, State(app): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, app))
}

async fn handle_ws(mut socket: WebSocket, app: Arc<AppState>) {
    debug!("tick stream client connected");
    let mut rx = app.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(summary) => {
                        let json = match serde_json::to_string(&summary) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!(error = %e, "failed to serialize tick summary");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("tick stream client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "tick stream client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("tick channel closed, closing stream");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => {
                        debug!("tick stream client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            return;
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
