//! Create `news` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(uuid(News::Id).primary_key())
                    .col(string_len(News::Title, 255).not_null())
                    .col(string_len(News::Slug, 280).unique_key().not_null())
                    .col(text_null(News::Excerpt))
                    .col(text(News::Content).not_null())
                    .col(string_len_null(News::CoverImageUrl, 1024))
                    .col(boolean(News::IsPublished).not_null())
                    .col(timestamp_with_time_zone_null(News::PublishedAt))
                    .col(timestamp_with_time_zone(News::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(News::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(News::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum News { Table, Id, Title, Slug, Excerpt, Content, CoverImageUrl, IsPublished, PublishedAt, CreatedAt, UpdatedAt }
