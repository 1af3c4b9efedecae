use sea_orm::{entity::prelude::*, FromJsonQueryResult};
use serde::{Deserialize, Serialize};

use crate::errors;

/// JSON-backed list column (endpoints, tags). Serializes as a plain array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub owner_team: String,
    pub tier: String,
    pub lifecycle: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub endpoints: StringList,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: StringList,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Closed set of service tiers.
pub const TIERS: [&str; 3] = ["gold", "silver", "bronze"];

/// Closed set of lifecycle stages.
pub const LIFECYCLES: [&str; 4] = ["production", "preprod", "dev", "deprecated"];

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    let len = name.chars().count();
    if len == 0 || len > 255 {
        return Err(errors::ModelError::Validation("name must be 1-255 characters".into()));
    }
    Ok(())
}

pub fn validate_owner_team(owner_team: &str) -> Result<(), errors::ModelError> {
    let len = owner_team.chars().count();
    if len == 0 || len > 255 {
        return Err(errors::ModelError::Validation("owner_team must be 1-255 characters".into()));
    }
    Ok(())
}

pub fn validate_tier(tier: &str) -> Result<(), errors::ModelError> {
    if !TIERS.contains(&tier) {
        return Err(errors::ModelError::Validation(format!(
            "invalid tier '{}' (expected one of {})",
            tier,
            TIERS.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_lifecycle(lifecycle: &str) -> Result<(), errors::ModelError> {
    if !LIFECYCLES.contains(&lifecycle) {
        return Err(errors::ModelError::Validation(format!(
            "invalid lifecycle '{}' (expected one of {})",
            lifecycle,
            LIFECYCLES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_endpoint(url: &str) -> Result<(), errors::ModelError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(r) if !r.is_empty() && !r.chars().any(char::is_whitespace) => Ok(()),
        _ => Err(errors::ModelError::Validation(format!("invalid endpoint url '{}'", url))),
    }
}

/// Trim and lower-case tags at the boundary. Entries must be 1-50 characters
/// after normalization; duplicates are kept in order.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, errors::ModelError> {
    let mut out = Vec::with_capacity(tags.len());
    for tag in tags {
        let normalized = tag.trim().to_lowercase();
        let len = normalized.chars().count();
        if len == 0 || len > 50 {
            return Err(errors::ModelError::Validation(format!(
                "invalid tag '{}' (must be 1-50 characters after trimming)",
                tag
            )));
        }
        out.push(normalized);
    }
    Ok(out)
}
