//! Store-facing seam for the catalogue.
//!
//! The trait keeps the HTTP layer ignorant of SeaORM; the implementation owns
//! the unit of work. Every mutating call runs inside one transaction that
//! commits on success — the transaction rolls back on drop for every error
//! path, so partial writes never leak.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

use common::pagination::Pagination;
use models::service_record::Model;

use crate::catalog::{self, CreateService, UpdateService};
use crate::errors::ServiceError;
use crate::import::{self, ImportReport};
use crate::query::{self, ServiceFilter};

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create(&self, input: CreateService) -> Result<Model, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Model, ServiceError>;
    async fn list(
        &self,
        filter: &ServiceFilter,
        page: Pagination,
    ) -> Result<(Vec<Model>, u64), ServiceError>;
    async fn update(&self, id: Uuid, input: UpdateService) -> Result<Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn import_csv(&self, content: &str, max_rows: usize)
        -> Result<ImportReport, ServiceError>;
    async fn ping(&self) -> Result<(), ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmCatalogRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn create(&self, input: CreateService) -> Result<Model, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let created = catalog::create_service(&txn, input).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(created)
    }

    async fn get(&self, id: Uuid) -> Result<Model, ServiceError> {
        catalog::get_service(&self.db, id).await
    }

    async fn list(
        &self,
        filter: &ServiceFilter,
        page: Pagination,
    ) -> Result<(Vec<Model>, u64), ServiceError> {
        query::list_services(&self.db, filter, page).await
    }

    async fn update(&self, id: Uuid, input: UpdateService) -> Result<Model, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let updated = catalog::update_service(&txn, id, input).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let deleted = catalog::delete_service(&txn, id).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(deleted)
    }

    async fn import_csv(
        &self,
        content: &str,
        max_rows: usize,
    ) -> Result<ImportReport, ServiceError> {
        // the whole file is one unit of work; row errors are data, not failures
        let txn = self.db.begin().await.map_err(db_err)?;
        let report = import::import_services(&txn, content, max_rows).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(report)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        self.db.ping().await.map_err(db_err)
    }
}
