use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Gist: lookups by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_gist_user")
                    .table(Gist::Table)
                    .col(Gist::UserId)
                    .to_owned(),
            )
            .await?;

        // Gist: starred listing
        manager
            .create_index(
                Index::create()
                    .name("idx_gist_starred")
                    .table(Gist::Table)
                    .col(Gist::Starred)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_gist_starred").table(Gist::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_gist_user").table(Gist::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Gist { Table, UserId, Starred }
