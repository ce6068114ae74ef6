//! # doc-relay
//!
//! Real-time group-scoped broadcast relay for collaboratively edited
//! documents.
//!
//! Clients attach over WebSocket, join one group per document, and publish
//! content updates that the relay fans out to every other member of the
//! same group. The relay holds no durable state and never interprets
//! content; merging is left entirely to clients.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler + ConnectionHub (ws/)
//!     ├── System endpoints (api/)
//!     │
//!     ├── RelayService (service/)
//!     │
//!     └── MembershipRegistry (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
