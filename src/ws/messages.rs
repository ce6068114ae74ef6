//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RelayEvent;
use crate::error::ErrorBody;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a successful `response` to the command `id`.
    #[must_use]
    pub fn ok(id: String, command: &str) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Response,
            timestamp: Utc::now(),
            payload: serde_json::json!({
                "command": command,
                "status": "ok",
            }),
        }
    }

    /// Builds an `error` reply carrying `body`.
    #[must_use]
    pub fn error(id: String, body: &ErrorBody) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Error,
            timestamp: Utc::now(),
            payload: serde_json::to_value(body).unwrap_or_default(),
        }
    }

    /// Builds an `error` reply for a protocol-level failure (bad frame,
    /// unknown command).
    #[must_use]
    pub fn protocol_error(id: String, code: u32, message: &str) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Error,
            timestamp: Utc::now(),
            payload: serde_json::json!({
                "code": code,
                "kind": "protocol",
                "message": message,
            }),
        }
    }

    /// Wraps a relay event as a server-generated `event` message.
    #[must_use]
    pub fn event(event: &RelayEvent) -> Self {
        let payload = match event {
            RelayEvent::ReceiveUpdate { group_id, content } => serde_json::json!({
                "event": event.name(),
                "group_id": group_id,
                "content": &**content,
            }),
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: WsMessageType::Event,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Join the group for a document.
    Join {
        /// Document identifier; `null` or absent is rejected as invalid.
        #[serde(default)]
        group_id: Option<String>,
    },
    /// Leave the group for a document.
    Leave {
        /// Document identifier; `null` or absent is ignored.
        #[serde(default)]
        group_id: Option<String>,
    },
    /// Send updated content to the other members of a group.
    Publish {
        /// Document identifier; `null` or absent is rejected as invalid.
        #[serde(default)]
        group_id: Option<String>,
        /// Opaque content; `null` or absent is rejected.
        #[serde(default)]
        content: Option<String>,
    },
}

impl WsCommand {
    /// Returns the command name as it appears on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::Publish { .. } => "publish",
        }
    }
}
