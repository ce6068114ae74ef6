//! Service layer: request validation and fan-out orchestration.
//!
//! [`RelayService`] validates join/leave/publish requests, consults the
//! [`super::domain::MembershipRegistry`], and hands outbound events to the
//! transport through the [`Deliver`] capability.

pub mod delivery;
pub mod relay_service;

pub use delivery::Deliver;
pub use relay_service::{MAX_CONTENT_LEN, PublishOutcome, RelayService};
