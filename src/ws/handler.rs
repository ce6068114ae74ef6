//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::domain::ConnectionId;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// Each upgraded socket gets a fresh [`ConnectionId`] and an outbound
/// queue in the [`super::ConnectionHub`].
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let relay = Arc::clone(&state.relay);

    ws.on_upgrade(move |socket| async move {
        let connection = ConnectionId::new();
        let outbox = relay.deliverer().attach(connection).await;
        run_connection(socket, connection, outbox, relay).await;
    })
}
