//! Create `categories` table.
//!
//! Product groupings shown as storefront navigation.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(uuid(Categories::Id).primary_key())
                    .col(string_len(Categories::Name, 128).not_null())
                    .col(string_len(Categories::Slug, 160).unique_key().not_null())
                    .col(text_null(Categories::Description))
                    .col(string_len_null(Categories::ImageUrl, 1024))
                    .col(timestamp_with_time_zone(Categories::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Categories::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Categories::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Categories { Table, Id, Name, Slug, Description, ImageUrl, CreatedAt, UpdatedAt }
