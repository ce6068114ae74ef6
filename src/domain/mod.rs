//! Domain layer: identifiers, relay events, and the membership registry.
//!
//! This module contains the relay's data model: connection and group
//! identity, the closed set of events delivered to clients, and the
//! concurrent registry that owns group membership.

pub mod connection_id;
pub mod group_id;
pub mod membership_registry;
pub mod relay_event;

pub use connection_id::ConnectionId;
pub use group_id::{GroupId, MAX_GROUP_ID_LEN};
pub use membership_registry::MembershipRegistry;
pub use relay_event::RelayEvent;
