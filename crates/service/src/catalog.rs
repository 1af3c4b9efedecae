//! Catalogue CRUD built on the `service` entity.
//!
//! Every function is generic over [`ConnectionTrait`] so callers can compose
//! them under a single transaction (the repository does, per request).

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::service_record::{self, Column, Entity, Model, StringList};

use crate::errors::ServiceError;

/// Creation payload; `id` is honored when supplied, generated otherwise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateService {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub owner_team: String,
    pub tier: String,
    pub lifecycle: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; absent fields are left untouched. `name` and `id` never change.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateService {
    pub owner_team: Option<String>,
    pub tier: Option<String>,
    pub lifecycle: Option<String>,
    pub endpoints: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Run the full creation checks and return the normalized tags.
pub(crate) fn validate_payload(input: &CreateService) -> Result<Vec<String>, ServiceError> {
    service_record::validate_name(&input.name)?;
    service_record::validate_owner_team(&input.owner_team)?;
    service_record::validate_tier(&input.tier)?;
    service_record::validate_lifecycle(&input.lifecycle)?;
    for url in &input.endpoints {
        service_record::validate_endpoint(url)?;
    }
    let tags = service_record::normalize_tags(&input.tags)?;
    Ok(tags)
}

pub async fn create_service<C: ConnectionTrait>(
    conn: &C,
    input: CreateService,
) -> Result<Model, ServiceError> {
    let tags = validate_payload(&input)?;

    let now = Utc::now();
    let am = service_record::ActiveModel {
        id: Set(input.id.unwrap_or_else(Uuid::new_v4)),
        name: Set(input.name),
        owner_team: Set(input.owner_team),
        tier: Set(input.tier),
        lifecycle: Set(input.lifecycle),
        endpoints: Set(StringList(input.endpoints)),
        tags: Set(StringList(tags)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    am.insert(conn).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::Conflict("service with this name already exists".into())
        }
        _ => ServiceError::Db(e.to_string()),
    })
}

pub async fn get_service<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Model, ServiceError> {
    Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("service"))
}

/// Natural-key lookup: case-insensitive match on `name`.
pub async fn find_service_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<Model>, ServiceError> {
    Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.to_lowercase()))
        .one(conn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_service<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    input: UpdateService,
) -> Result<Model, ServiceError> {
    let existing = get_service(conn, id).await?;

    if let Some(v) = &input.owner_team {
        service_record::validate_owner_team(v)?;
    }
    if let Some(v) = &input.tier {
        service_record::validate_tier(v)?;
    }
    if let Some(v) = &input.lifecycle {
        service_record::validate_lifecycle(v)?;
    }
    if let Some(urls) = &input.endpoints {
        for url in urls {
            service_record::validate_endpoint(url)?;
        }
    }
    let tags = match &input.tags {
        Some(t) => Some(service_record::normalize_tags(t)?),
        None => None,
    };

    let mut am: service_record::ActiveModel = existing.into();
    if let Some(v) = input.owner_team {
        am.owner_team = Set(v);
    }
    if let Some(v) = input.tier {
        am.tier = Set(v);
    }
    if let Some(v) = input.lifecycle {
        am.lifecycle = Set(v);
    }
    if let Some(v) = input.endpoints {
        am.endpoints = Set(StringList(v));
    }
    if let Some(t) = tags {
        am.tags = Set(StringList(t));
    }
    am.updated_at = Set(Utc::now().into());
    am.update(conn).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Hard delete. Returns `false` when nothing was deleted.
pub async fn delete_service<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<bool, ServiceError> {
    let res = Entity::delete_by_id(id)
        .exec(conn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_available, get_db, sample_create};
    use sea_orm::TransactionTrait;

    #[test]
    fn validate_payload_normalizes_tags() {
        let mut input = sample_create("billing");
        input.tags = vec!["  Critical ".into(), "Billing".into()];
        let tags = validate_payload(&input).unwrap();
        assert_eq!(tags, vec!["critical", "billing"]);
    }

    #[test]
    fn validate_payload_rejects_bad_enum() {
        let mut input = sample_create("billing");
        input.tier = "platinum".into();
        assert!(matches!(
            validate_payload(&input),
            Err(ServiceError::Model(models::errors::ModelError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn create_then_get_round_trips() -> anyhow::Result<()> {
        if !db_available() { return Ok(()); }
        let db = get_db().await?;
        let txn = db.begin().await?;

        let name = format!("svc-{}", Uuid::new_v4());
        let created = create_service(&txn, sample_create(&name)).await?;
        let fetched = get_service(&txn, created.id).await?;
        assert_eq!(fetched.name, name);
        assert_eq!(fetched.owner_team, created.owner_team);
        assert_eq!(fetched.tier, created.tier);
        assert_eq!(fetched.tags, created.tags);
        assert!(fetched.updated_at >= fetched.created_at);

        txn.rollback().await?;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_but_case_variant_passes() -> anyhow::Result<()> {
        if !db_available() { return Ok(()); }
        let db = get_db().await?;

        // case-variant names are distinct under the case-sensitive unique index
        let txn = db.begin().await?;
        let suffix = Uuid::new_v4();
        create_service(&txn, sample_create(&format!("billing-{suffix}"))).await?;
        create_service(&txn, sample_create(&format!("Billing-{suffix}"))).await?;
        txn.rollback().await?;

        // identical names collide
        let txn = db.begin().await?;
        let name = format!("svc-{}", Uuid::new_v4());
        create_service(&txn, sample_create(&name)).await?;
        let err = create_service(&txn, sample_create(&name)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        txn.rollback().await?;
        Ok(())
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields() -> anyhow::Result<()> {
        if !db_available() { return Ok(()); }
        let db = get_db().await?;
        let txn = db.begin().await?;

        let created = create_service(&txn, sample_create(&format!("svc-{}", Uuid::new_v4()))).await?;
        let update = UpdateService { owner_team: Some("Platform".into()), ..Default::default() };
        let updated = update_service(&txn, created.id, update).await?;

        assert_eq!(updated.owner_team, "Platform");
        assert_eq!(updated.tier, created.tier);
        assert_eq!(updated.lifecycle, created.lifecycle);
        assert_eq!(updated.endpoints, created.endpoints);
        assert_eq!(updated.tags, created.tags);
        assert_eq!(updated.name, created.name);
        assert!(updated.updated_at >= created.updated_at);

        txn.rollback().await?;
        Ok(())
    }

    #[tokio::test]
    async fn delete_then_get_reports_not_found() -> anyhow::Result<()> {
        if !db_available() { return Ok(()); }
        let db = get_db().await?;
        let txn = db.begin().await?;

        let created = create_service(&txn, sample_create(&format!("svc-{}", Uuid::new_v4()))).await?;
        assert!(delete_service(&txn, created.id).await?);
        assert!(!delete_service(&txn, created.id).await?);
        let err = get_service(&txn, created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        txn.rollback().await?;
        Ok(())
    }

    #[tokio::test]
    async fn name_lookup_ignores_case() -> anyhow::Result<()> {
        if !db_available() { return Ok(()); }
        let db = get_db().await?;
        let txn = db.begin().await?;

        let name = format!("Billing-{}", Uuid::new_v4());
        let created = create_service(&txn, sample_create(&name)).await?;
        let found = find_service_by_name(&txn, &name.to_uppercase()).await?;
        assert_eq!(found.map(|m| m.id), Some(created.id));
        assert!(find_service_by_name(&txn, "no-such-service").await?.is_none());

        txn.rollback().await?;
        Ok(())
    }
}
