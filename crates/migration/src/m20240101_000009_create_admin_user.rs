//! Create `admin_users` and `admin_credentials` tables for the back-office login.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminUsers::Table)
                    .if_not_exists()
                    .col(uuid(AdminUsers::Id).primary_key())
                    .col(string_len(AdminUsers::Email, 255).unique_key().not_null())
                    .col(string_len(AdminUsers::Name, 128).not_null())
                    .col(timestamp_with_time_zone(AdminUsers::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminCredentials::Table)
                    .if_not_exists()
                    .col(uuid(AdminCredentials::Id).primary_key())
                    .col(uuid(AdminCredentials::UserId).unique_key().not_null())
                    .col(string_len(AdminCredentials::PasswordHash, 255).not_null())
                    .col(string_len(AdminCredentials::PasswordAlgorithm, 32).not_null())
                    .col(timestamp_with_time_zone(AdminCredentials::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(AdminCredentials::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_credentials_user")
                            .from(AdminCredentials::Table, AdminCredentials::UserId)
                            .to(AdminUsers::Table, AdminUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AdminCredentials::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(AdminUsers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AdminUsers { Table, Id, Email, Name, CreatedAt }

#[derive(DeriveIden)]
enum AdminCredentials { Table, Id, UserId, PasswordHash, PasswordAlgorithm, CreatedAt, UpdatedAt }
