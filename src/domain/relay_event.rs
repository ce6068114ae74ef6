//! Events the relay pushes to connections.
//!
//! The set of deliverable event kinds is closed: a publish produces exactly
//! one kind, [`RelayEvent::ReceiveUpdate`]. Content is shared behind an
//! `Arc<str>` so a fan-out clones a pointer per recipient, not the payload.

use std::sync::Arc;

use super::GroupId;

/// Event handed to the transport's delivery capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Another member of `group_id` published new content.
    ReceiveUpdate {
        /// Group the update was published to.
        group_id: GroupId,
        /// Opaque document content, never interpreted by the relay.
        content: Arc<str>,
    },
}

impl RelayEvent {
    /// Returns the wire name clients listen for.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ReceiveUpdate { .. } => "ReceiveUpdate",
        }
    }

    /// Returns the group this event belongs to.
    #[must_use]
    pub const fn group_id(&self) -> &GroupId {
        match self {
            Self::ReceiveUpdate { group_id, .. } => group_id,
        }
    }
}
