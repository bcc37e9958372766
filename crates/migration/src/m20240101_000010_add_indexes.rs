use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Products: storefront listing filters on category and active flag
        manager
            .create_index(
                Index::create()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_products_active_created")
                    .table(Products::Table)
                    .col(Products::IsActive)
                    .col(Products::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // News: published listing ordered by publish date
        manager
            .create_index(
                Index::create()
                    .name("idx_news_published")
                    .table(News::Table)
                    .col(News::IsPublished)
                    .col(News::PublishedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_products_category").table(Products::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_products_active_created").table(Products::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_news_published").table(News::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products { Table, CategoryId, IsActive, CreatedAt }

#[derive(DeriveIden)]
enum News { Table, IsPublished, PublishedAt }
