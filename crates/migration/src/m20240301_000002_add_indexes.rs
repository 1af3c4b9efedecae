use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: secondary indexes for the list filters
        manager
            .create_index(
                Index::create()
                    .name("idx_service_owner_team")
                    .table(Service::Table)
                    .col(Service::OwnerTeam)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_tier")
                    .table(Service::Table)
                    .col(Service::Tier)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_lifecycle")
                    .table(Service::Table)
                    .col(Service::Lifecycle)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_owner_team").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_tier").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_lifecycle").table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service { Table, OwnerTeam, Tier, Lifecycle }
