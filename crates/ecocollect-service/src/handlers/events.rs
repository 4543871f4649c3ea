//! WebSocket fan-out of the change-event feed.
//!
//! Devices open a socket per dashboard session and receive every report
//! change event as JSON. The channel is server-to-client only; delivery
//! matches the feed's semantics (a lagging socket misses events, nothing
//! is replayed).

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;

use ecocollect_store::Store;

use crate::state::AppState;

/// Upgrade to a WebSocket delivering change-feed events.
pub async fn events(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let rx = state.store.subscribe();
    ws.on_upgrade(move |socket| event_socket(socket, rx))
}

async fn event_socket(
    mut socket: WebSocket,
    mut rx: tokio::sync::broadcast::Receiver<ecocollect_core::FeedMessage>,
) {
    loop {
        tokio::select! {
            msg = rx.recv() => {
                match msg {
                    Ok(event) => {
                        let Ok(payload) = serde_json::to_string(&event) else {
                            continue;
                        };
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event socket lagging; events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    // Ignore any client messages (this channel is server->client only).
                    _ => {}
                }
            }
        }
    }
}
