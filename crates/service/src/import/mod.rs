//! CSV bulk import: reconcile external rows against the catalogue.
//!
//! Header problems reject the whole file before any row runs. Row problems
//! are soft: each failed row is reported and the batch continues. The caller
//! owns the surrounding transaction, so a hard failure (store error) rolls
//! back everything.

mod reader;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{self, CreateService, UpdateService};
use crate::errors::ServiceError;

use reader::CsvReader;

/// Every column the import understands; only `id` may be omitted.
pub const EXPECTED_COLUMNS: [&str; 7] =
    ["name", "owner_team", "tier", "lifecycle", "endpoints", "tags", "id"];

/// Per-import summary returned to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub created: u64,
    pub updated: u64,
    pub errors: Vec<String>,
    pub total_rows: u64,
}

/// Whole-file header check: unknown columns first, then missing ones.
pub fn validate_columns(headers: &[String]) -> Result<(), ServiceError> {
    let mut unknown: Vec<&str> = headers
        .iter()
        .map(String::as_str)
        .filter(|h| !EXPECTED_COLUMNS.contains(h))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(ServiceError::Validation(format!(
            "Unknown columns: {}",
            unknown.join(", ")
        )));
    }

    let mut missing: Vec<&str> = EXPECTED_COLUMNS
        .iter()
        .copied()
        .filter(|c| *c != "id" && !headers.iter().any(|h| h == c))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(ServiceError::Validation(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

/// `;`-delimited cell to list: split, trim, drop empty segments.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Assemble one row into a creation payload. Cells missing from a short row
/// read as empty and fail the usual field validation downstream.
fn row_payload(headers: &[String], fields: &[String]) -> Result<CreateService, ServiceError> {
    let cell = |col: &str| {
        headers
            .iter()
            .position(|h| h == col)
            .and_then(|i| fields.get(i))
            .map(String::as_str)
            .unwrap_or("")
    };

    let id = match cell("id").trim() {
        "" => None,
        raw => Some(
            Uuid::parse_str(raw)
                .map_err(|e| ServiceError::Validation(format!("invalid id '{raw}': {e}")))?,
        ),
    };

    Ok(CreateService {
        id,
        name: cell("name").to_string(),
        owner_team: cell("owner_team").to_string(),
        tier: cell("tier").to_string(),
        lifecycle: cell("lifecycle").to_string(),
        endpoints: parse_list(cell("endpoints")),
        tags: parse_list(cell("tags")),
    })
}

/// Create or update services from CSV text within the caller's transaction.
pub async fn import_services<C: ConnectionTrait>(
    conn: &C,
    content: &str,
    max_rows: usize,
) -> Result<ImportReport, ServiceError> {
    let mut reader = CsvReader::new(content);
    let headers = reader
        .next_record()
        .ok_or_else(|| ServiceError::Validation("CSV missing header row".into()))?;
    validate_columns(&headers)?;

    let mut created = 0u64;
    let mut updated = 0u64;
    let mut errors: Vec<String> = Vec::new();
    let mut total_rows = 0u64;

    while let Some(fields) = reader.next_record() {
        total_rows += 1;
        if total_rows as usize > max_rows {
            errors.push(format!(
                "row {}: exceeded maximum allowed rows ({})",
                total_rows, max_rows
            ));
            break;
        }

        let payload = match row_payload(&headers, &fields) {
            Ok(p) => p,
            Err(e) => {
                errors.push(format!("row {}: {}", total_rows, e));
                continue;
            }
        };
        if let Err(e) = catalog::validate_payload(&payload) {
            errors.push(format!("row {}: {}", total_rows, e));
            continue;
        }

        // natural-key reconciliation: update when the name is already taken
        match catalog::find_service_by_name(conn, &payload.name).await? {
            Some(existing) => {
                let update = UpdateService {
                    owner_team: Some(payload.owner_team),
                    tier: Some(payload.tier),
                    lifecycle: Some(payload.lifecycle),
                    endpoints: Some(payload.endpoints),
                    tags: Some(payload.tags),
                };
                catalog::update_service(conn, existing.id, update).await?;
                updated += 1;
            }
            None => {
                catalog::create_service(conn, payload).await?;
                created += 1;
            }
        }
    }

    tracing::debug!(created, updated, total_rows, row_errors = errors.len(), "csv import processed");
    Ok(ImportReport { created, updated, errors, total_rows })
}
