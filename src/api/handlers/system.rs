//! System endpoints: health check and relay statistics.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Point-in-time relay statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Groups with at least one member.
    groups: usize,
    /// Connections holding at least one membership.
    connections: usize,
    /// Attached WebSocket sockets, including those in no group.
    sockets: usize,
}

/// `GET /stats` — Relay membership statistics.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "System",
    summary = "Relay statistics",
    description = "Returns the number of live groups, connections with memberships, and attached sockets.",
    responses(
        (status = 200, description = "Current relay statistics", body = StatsResponse),
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.relay.registry();
    let stats = StatsResponse {
        groups: registry.group_count().await,
        connections: registry.connection_count().await,
        sockets: state.relay.deliverer().len().await,
    };
    (StatusCode::OK, Json(stats))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
}
