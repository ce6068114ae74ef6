//! HTTP layer: system endpoints, OpenAPI document, and router composition.

pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// OpenAPI document for the HTTP endpoints.
///
/// The WebSocket protocol at `/ws` is not described here.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "doc-relay",
        description = "Real-time group-scoped broadcast relay for collaboratively edited documents"
    ),
    paths(handlers::system::health_handler, handlers::system::stats_handler),
    components(schemas(handlers::system::HealthResponse, handlers::system::StatsResponse)),
    tags((name = "System", description = "Health and relay statistics"))
)]
pub struct ApiDoc;

/// Builds the router with all HTTP endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(handlers::system::routes())
}

/// Builds the complete application: HTTP endpoints, `/ws`, tracing and
/// CORS layers, and (with the `swagger-ui` feature) the Swagger UI.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
