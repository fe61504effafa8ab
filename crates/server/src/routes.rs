use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::{errors, openapi};

pub mod auth;
pub mod gists;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health, gist resources and the OpenAPI document.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let gist_routes = Router::new()
        .route("/gists", get(gists::list).post(gists::create))
        .route("/gists/starred", get(gists::list_starred))
        .route("/gists/:id", get(gists::get).patch(gists::patch).delete(gists::delete))
        .route(
            "/gists/:id/:property",
            get(gists::property_status).put(gists::put_property).delete(gists::delete_property),
        );

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .merge(gist_routes)
        .fallback(errors::fallback)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request, method and path included
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
