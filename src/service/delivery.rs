//! Per-connection delivery capability supplied by the transport layer.

use std::future::Future;

use crate::domain::{ConnectionId, RelayEvent};
use crate::error::DeliveryError;

/// Hands a [`RelayEvent`] to one connection.
///
/// Implementations must not block on a slow recipient: a failed or
/// rejected hand-off is reported as a [`DeliveryError`] for that target
/// only. [`crate::ws::ConnectionHub`] is the WebSocket implementation.
pub trait Deliver: Send + Sync {
    /// Delivers `event` to `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] when the event could not be handed to
    /// the target's transport.
    fn deliver(
        &self,
        target: ConnectionId,
        event: RelayEvent,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
