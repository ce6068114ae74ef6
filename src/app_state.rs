//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::MembershipRegistry;
use crate::service::RelayService;
use crate::ws::ConnectionHub;

/// Relay service wired to the WebSocket delivery hub.
pub type Relay = RelayService<ConnectionHub>;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay service for join/leave/publish/disconnect.
    pub relay: Arc<Relay>,
}

impl AppState {
    /// Builds the state from a fresh registry and a hub whose per-connection
    /// queues hold `outbound_queue_capacity` events.
    #[must_use]
    pub fn new(outbound_queue_capacity: usize) -> Self {
        let registry = Arc::new(MembershipRegistry::new());
        let hub = ConnectionHub::new(outbound_queue_capacity);
        Self {
            relay: Arc::new(RelayService::new(registry, hub)),
        }
    }
}
