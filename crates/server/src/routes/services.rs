use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::Pagination;
use models::service_record::Model;
use service::catalog::{CreateService, UpdateService};
use service::import::ImportReport;
use service::query::{ServiceFilter, ServicePage};

use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub owner_team: Option<String>,
    pub tier: Option<String>,
    pub lifecycle: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Create a service record
pub async fn create_service(
    State(state): State<ServerState>,
    Json(input): Json<CreateService>,
) -> Result<(StatusCode, Json<Model>), JsonApiError> {
    let created = state.catalog.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List service records with optional filters
pub async fn list_services(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ServicePage>, JsonApiError> {
    let filter = ServiceFilter {
        owner_team: params.owner_team,
        tier: params.tier,
        lifecycle: params.lifecycle,
        search: params.search,
    };
    let page = Pagination::from_query(params.limit, params.offset);
    let (items, total) = state.catalog.list(&filter, page).await?;
    Ok(Json(ServicePage { items, total }))
}

/// Fetch one service record
pub async fn get_service(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Model>, JsonApiError> {
    let record = state.catalog.get(id).await?;
    Ok(Json(record))
}

/// Partial update of a service record
pub async fn update_service(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateService>,
) -> Result<Json<Model>, JsonApiError> {
    let updated = state.catalog.update(id, input).await?;
    Ok(Json(updated))
}

/// Hard delete of a service record
pub async fn delete_service(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if state.catalog.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("service not found".into())))
    }
}

/// Bulk import from an uploaded CSV file (multipart field `file`)
pub async fn import_services(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportReport>), JsonApiError> {
    let mut content: Option<String> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid multipart payload", Some(e.to_string()))
    })? {
        if field.name() == Some("file") {
            let text = field.text().await.map_err(|e| {
                JsonApiError::new(
                    StatusCode::BAD_REQUEST,
                    "Invalid multipart payload",
                    Some(e.to_string()),
                )
            })?;
            content = Some(text);
        }
    }
    let content = content.ok_or_else(|| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Missing file field", None)
    })?;

    let report = state
        .catalog
        .import_csv(&content, state.cfg.import.max_rows)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(report)))
}
