//! Filtered, paginated views over the catalogue.
//!
//! One `Select` carries the whole predicate set; the total is counted from a
//! clone of that same select before limit/offset are applied, so the page and
//! the count can never disagree on the filter.

use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use serde::{Deserialize, Serialize};

use common::pagination::Pagination;
use models::service_record::{Column, Entity, Model};

use crate::errors::ServiceError;

/// Optional list filters. Empty strings are treated as absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServiceFilter {
    pub owner_team: Option<String>,
    pub tier: Option<String>,
    pub lifecycle: Option<String>,
    pub search: Option<String>,
}

/// One page of results plus the filter-wide total.
#[derive(Debug, Serialize)]
pub struct ServicePage {
    pub items: Vec<Model>,
    pub total: u64,
}

impl ServiceFilter {
    /// Attach the filter predicates to a select.
    pub fn apply(&self, mut select: Select<Entity>) -> Select<Entity> {
        if let Some(owner) = self.owner_team.as_deref().filter(|s| !s.is_empty()) {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(Column::OwnerTeam))).eq(owner.to_lowercase()),
            );
        }
        if let Some(tier) = self.tier.as_deref().filter(|s| !s.is_empty()) {
            select = select.filter(Column::Tier.eq(tier));
        }
        if let Some(lifecycle) = self.lifecycle.as_deref().filter(|s| !s.is_empty()) {
            select = select.filter(Column::Lifecycle.eq(lifecycle));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            // name OR the rendered text of the tags array
            select = select.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(Column::Name))).like(pattern.as_str()))
                    .add(
                        Expr::expr(Func::lower(
                            Expr::col(Column::Tags).cast_as(Alias::new("text")),
                        ))
                        .like(pattern.as_str()),
                    ),
            );
        }
        select
    }
}

/// Fetch one page of services and the total match count for the same filter.
/// Results are ordered by creation time.
pub async fn list_services<C: ConnectionTrait>(
    conn: &C,
    filter: &ServiceFilter,
    page: Pagination,
) -> Result<(Vec<Model>, u64), ServiceError> {
    let query = filter.apply(Entity::find());
    let total = query
        .clone()
        .count(conn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = query
        .order_by_asc(Column::CreatedAt)
        .offset(page.offset)
        .limit(page.limit)
        .all(conn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::create_service;
    use crate::test_support::{db_available, get_db, sample_create};
    use sea_orm::{DbBackend, QueryTrait, TransactionTrait};
    use uuid::Uuid;

    fn sql(select: Select<Entity>) -> String {
        select.build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn empty_filter_adds_no_predicates() {
        let built = sql(ServiceFilter::default().apply(Entity::find()));
        assert!(!built.contains("WHERE"));
    }

    #[test]
    fn owner_filter_compares_lowercased() {
        let filter = ServiceFilter { owner_team: Some("FinOps".into()), ..Default::default() };
        let built = sql(filter.apply(Entity::find()));
        assert!(built.contains("LOWER(\"owner_team\")"));
        assert!(built.contains("finops"));
    }

    #[test]
    fn enum_filters_compare_exact() {
        let filter = ServiceFilter {
            tier: Some("gold".into()),
            lifecycle: Some("production".into()),
            ..Default::default()
        };
        let built = sql(filter.apply(Entity::find()));
        assert!(built.contains("\"tier\" = "));
        assert!(built.contains("\"lifecycle\" = "));
        assert!(!built.contains("LOWER(\"tier\")"));
    }

    #[test]
    fn search_spans_name_and_tags_text() {
        let filter = ServiceFilter { search: Some("Report".into()), ..Default::default() };
        let built = sql(filter.apply(Entity::find()));
        assert!(built.contains("LOWER(\"name\") LIKE"));
        assert!(built.contains("CAST(\"tags\" AS"));
        assert!(built.contains(" OR "));
        assert!(built.contains("%report%"));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let filter = ServiceFilter {
            owner_team: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        let built = sql(filter.apply(Entity::find()));
        assert!(!built.contains("WHERE"));
    }

    #[test]
    fn count_and_page_share_one_predicate() {
        let filter = ServiceFilter {
            owner_team: Some("FinOps".into()),
            search: Some("rep".into()),
            ..Default::default()
        };
        let base = filter.apply(Entity::find());
        let counted = sql(base.clone());
        let paged = sql(base.offset(10).limit(5));

        let where_clause = |s: &str| {
            s.split(" WHERE ")
                .nth(1)
                .map(|rest| rest.split(" LIMIT ").next().unwrap_or(rest).to_string())
        };
        assert_eq!(where_clause(&counted), where_clause(&paged));
    }

    #[tokio::test]
    async fn list_filters_and_counts_consistently() -> anyhow::Result<()> {
        if !db_available() { return Ok(()); }
        let db = get_db().await?;
        let txn = db.begin().await?;

        let owner = format!("FinOps-{}", Uuid::new_v4());
        let tag_marker = Uuid::new_v4().simple().to_string();
        for i in 0..3 {
            let mut input = sample_create(&format!("svc-{}-{}", i, Uuid::new_v4()));
            input.owner_team = owner.clone();
            if i == 0 {
                input.tags = vec![format!("reporting-{tag_marker}")];
            }
            create_service(&txn, input).await?;
        }

        // owner filter is case-insensitive and total matches the filtered count
        let filter = ServiceFilter { owner_team: Some(owner.to_uppercase()), ..Default::default() };
        let (items, total) = list_services(&txn, &filter, Pagination::default()).await?;
        assert_eq!(total, 3);
        assert_eq!(items.len(), 3);

        // pagination bounds the page but not the total
        let (page, total) =
            list_services(&txn, &filter, Pagination { limit: 2, offset: 0 }).await?;
        assert_eq!(page.len(), 2);
        assert_eq!(total, 3);

        // tag substring search matches without touching name
        let filter = ServiceFilter { search: Some(tag_marker.clone()), ..Default::default() };
        let (items, total) = list_services(&txn, &filter, Pagination::default()).await?;
        assert_eq!(total, 1);
        assert!(items[0].tags.0[0].contains(&tag_marker));

        // unmatched combination yields an empty page, not an error
        let filter = ServiceFilter {
            owner_team: Some(owner),
            tier: Some("bronze".into()),
            ..Default::default()
        };
        let (items, total) = list_services(&txn, &filter, Pagination::default()).await?;
        assert!(items.is_empty());
        assert_eq!(total, 0);

        txn.rollback().await?;
        Ok(())
    }
}
