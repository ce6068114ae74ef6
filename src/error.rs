//! Relay error types.
//!
//! [`RelayError`] is the caller-facing rejection taxonomy: each variant
//! rejects exactly one `join`/`publish` call and never the connection.
//! [`DeliveryError`] describes a failed hand-off to a single recipient
//! during fan-out and is never surfaced to the publisher.

use serde::Serialize;

use crate::domain::ConnectionId;

/// Structured error payload sent back to the originating client.
///
/// ```json
/// { "code": 1003, "kind": "content_too_large", "message": "..." }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Numeric error code (see [`RelayError::error_code`]).
    pub code: u32,
    /// Stable machine-readable error kind.
    pub kind: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Validation failure for a single relay request.
///
/// # Error Codes
///
/// | Code | Kind                | Raised by          |
/// |------|---------------------|--------------------|
/// | 1001 | `invalid_group_id`  | join, publish      |
/// | 1002 | `null_content`      | publish            |
/// | 1003 | `content_too_large` | publish            |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    /// Group identifier is blank or over the length limit.
    #[error("invalid group id: {0}")]
    InvalidGroupId(String),

    /// Publish request carried no content.
    #[error("content must not be null")]
    NullContent,

    /// Publish content exceeds the maximum length.
    #[error("content exceeds the maximum length of {max} characters")]
    ContentTooLarge {
        /// Configured maximum content length, in characters.
        max: usize,
    },
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidGroupId(_) => 1001,
            Self::NullContent => 1002,
            Self::ContentTooLarge { .. } => 1003,
        }
    }

    /// Returns the machine-readable kind for this variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidGroupId(_) => "invalid_group_id",
            Self::NullContent => "null_content",
            Self::ContentTooLarge { .. } => "content_too_large",
        }
    }
}

impl From<&RelayError> for ErrorBody {
    fn from(err: &RelayError) -> Self {
        Self {
            code: err.error_code(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Failure to hand an event to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The recipient has no registered outbound queue.
    #[error("connection {0} is not attached")]
    UnknownConnection(ConnectionId),

    /// The recipient's outbound queue is full (slow consumer).
    #[error("outbound queue full for connection {0}")]
    QueueFull(ConnectionId),

    /// The recipient's socket task has gone away.
    #[error("outbound queue closed for connection {0}")]
    QueueClosed(ConnectionId),
}
