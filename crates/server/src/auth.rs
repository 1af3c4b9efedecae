use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use service::repository::CatalogRepository;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub cfg: Arc<configs::AppConfig>,
}

/// Middleware: require a bearer token matching the configured shared secret
/// on every `/api/v1` route. The response carries no hint about which part
/// of the check failed.
pub async fn require_token(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == state.cfg.auth.token => Ok(next.run(req).await),
        _ => Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "invalid token", None)),
    }
}
