//! Create `service` table.
//!
//! Single catalogue entity; `name` carries the unique natural key.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(string_len(Service::Name, 255).unique_key().not_null())
                    .col(string_len(Service::OwnerTeam, 255).not_null())
                    .col(string_len(Service::Tier, 32).not_null())
                    .col(string_len(Service::Lifecycle, 32).not_null())
                    .col(json_binary(Service::Endpoints).not_null())
                    .col(json_binary(Service::Tags).not_null())
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Service::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service { Table, Id, Name, OwnerTeam, Tier, Lifecycle, Endpoints, Tags, CreatedAt, UpdatedAt }
