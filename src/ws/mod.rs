//! WebSocket layer: connection handling, message routing, delivery queues.
//!
//! The WebSocket endpoint at `/ws` is the relay's transport: it mints a
//! connection per socket, maps JSON commands onto the relay service, and
//! drains each connection's outbound queue back to the client.

pub mod connection;
pub mod handler;
pub mod hub;
pub mod messages;

pub use hub::ConnectionHub;
