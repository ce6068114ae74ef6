//! Per-connection outbound queues.
//!
//! [`ConnectionHub`] maps each attached socket to a bounded
//! [`tokio::sync::mpsc`] queue drained by that socket's write loop. It is
//! the WebSocket implementation of [`Deliver`].

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use crate::domain::{ConnectionId, RelayEvent};
use crate::error::DeliveryError;
use crate::service::Deliver;

/// Registry of outbound queues for live sockets.
///
/// Cloning shares the same underlying map. Delivery never waits for a
/// slow consumer: when a queue is full the event is dropped for that
/// recipient only.
#[derive(Debug, Clone)]
pub struct ConnectionHub {
    outboxes: Arc<RwLock<HashMap<ConnectionId, mpsc::Sender<RelayEvent>>>>,
    capacity: usize,
}

impl ConnectionHub {
    /// Creates a hub whose queues hold up to `capacity` events (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            outboxes: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Attaches `connection` and returns the receiving end of its queue.
    ///
    /// Re-attaching an existing connection replaces its queue.
    pub async fn attach(&self, connection: ConnectionId) -> mpsc::Receiver<RelayEvent> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.outboxes.write().await.insert(connection, tx);
        rx
    }

    /// Detaches `connection`. Returns `true` if it was attached.
    pub async fn detach(&self, connection: ConnectionId) -> bool {
        self.outboxes.write().await.remove(&connection).is_some()
    }

    /// Returns the number of attached connections.
    pub async fn len(&self) -> usize {
        self.outboxes.read().await.len()
    }

    /// Returns `true` if no connection is attached.
    pub async fn is_empty(&self) -> bool {
        self.outboxes.read().await.is_empty()
    }
}

impl Deliver for ConnectionHub {
    async fn deliver(&self, target: ConnectionId, event: RelayEvent) -> Result<(), DeliveryError> {
        let sender = self
            .outboxes
            .read()
            .await
            .get(&target)
            .cloned()
            .ok_or(DeliveryError::UnknownConnection(target))?;
        sender.try_send(event).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => DeliveryError::QueueFull(target),
            mpsc::error::TrySendError::Closed(_) => DeliveryError::QueueClosed(target),
        })
    }
}
