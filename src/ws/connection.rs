//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands to the relay and forwarding events
//! from the connection's outbound queue.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::hub::ConnectionHub;
use super::messages::{WsCommand, WsMessage};
use crate::domain::{ConnectionId, RelayEvent};
use crate::error::ErrorBody;
use crate::service::RelayService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them to `relay`.
/// - Forwards events from `outbox` to the client.
///
/// When the loop ends, for whatever reason, the connection's memberships
/// are cleared and its queue is detached from the hub.
pub async fn run_connection(
    socket: WebSocket,
    connection: ConnectionId,
    mut outbox: mpsc::Receiver<RelayEvent>,
    relay: Arc<RelayService<ConnectionHub>>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    tracing::debug!(%connection, "ws connection opened");

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, connection, &relay).await;
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%connection, error = %err, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Event fanned out to this connection
            event = outbox.recv() => {
                let Some(event) = event else { break };
                tracing::trace!(
                    %connection,
                    group = %event.group_id(),
                    event = event.name(),
                    "forwarding event"
                );
                let Ok(json) = serde_json::to_string(&WsMessage::event(&event)) else {
                    continue;
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    relay.handle_disconnect(connection).await;
    relay.deliverer().detach(connection).await;
    tracing::debug!(%connection, "ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
async fn handle_text_message(
    text: &str,
    connection: ConnectionId,
    relay: &RelayService<ConnectionHub>,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage::protocol_error(String::new(), 400, "malformed JSON");
        return serde_json::to_string(&err).ok();
    };

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        let err = WsMessage::protocol_error(msg.id, 404, "unknown command");
        return serde_json::to_string(&err).ok();
    };

    // A missing group id goes through validation as a blank one.
    let name = command.name();
    let result = match command {
        WsCommand::Join { group_id } => {
            relay
                .handle_join(connection, group_id.as_deref().unwrap_or_default())
                .await
        }
        WsCommand::Leave { group_id } => {
            relay
                .handle_leave(connection, group_id.as_deref().unwrap_or_default())
                .await;
            Ok(())
        }
        WsCommand::Publish { group_id, content } => relay
            .handle_publish(connection, group_id.as_deref().unwrap_or_default(), content)
            .await
            .map(|_| ()),
    };

    let reply = match result {
        Ok(()) => WsMessage::ok(msg.id, name),
        Err(err) => {
            tracing::debug!(%connection, command = name, error = %err, "command rejected");
            WsMessage::error(msg.id, &ErrorBody::from(&err))
        }
    };
    serde_json::to_string(&reply).ok()
}
