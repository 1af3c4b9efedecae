pub mod services;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::auth::{self, ServerState};
use crate::errors::JsonApiError;

pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Service Catalogue API" }))
}

/// Liveness probe.
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Readiness probe: one trivial round-trip against the store.
pub async fn ready(
    axum::extract::State(state): axum::extract::State<ServerState>,
) -> Result<Json<Health>, JsonApiError> {
    state
        .catalog
        .ping()
        .await
        .map_err(|e| JsonApiError::new(StatusCode::SERVICE_UNAVAILABLE, "store unavailable", Some(e.to_string())))?;
    Ok(Json(Health { status: "ready" }))
}

/// Build the full application router: public probes plus the token-guarded
/// catalogue API.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (index + probes)
    let public = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Protected API routes
    let api = Router::new()
        .route(
            "/api/v1/services",
            get(services::list_services).post(services::create_service),
        )
        .route("/api/v1/services/import", post(services::import_services))
        .route(
            "/api/v1/services/:id",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    // Compose
    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                ),
        )
}
