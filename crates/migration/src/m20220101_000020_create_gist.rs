//! Create `gist` table with FK to its owning `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gist::Table)
                    .if_not_exists()
                    .col(pk_auto(Gist::Id))
                    .col(integer(Gist::UserId).not_null())
                    .col(ColumnDef::new(Gist::Description).text().null())
                    .col(ColumnDef::new(Gist::Content).text().null())
                    .col(boolean(Gist::Starred).not_null().default(false))
                    .col(timestamp_with_time_zone(Gist::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Gist::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gist_user")
                            .from(Gist::Table, Gist::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Gist::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Gist { Table, Id, UserId, Description, Content, Starred, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
