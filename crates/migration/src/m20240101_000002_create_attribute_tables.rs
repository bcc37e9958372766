//! Create the product attribute lookup tables: `colors`, `cap_patterns`
//! and `tiedye_patterns`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Colors::Table)
                    .if_not_exists()
                    .col(uuid(Colors::Id).primary_key())
                    .col(string_len(Colors::Name, 128).not_null())
                    .col(string_len(Colors::Slug, 160).unique_key().not_null())
                    .col(string_len_null(Colors::HexCode, 7))
                    .col(timestamp_with_time_zone(Colors::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CapPatterns::Table)
                    .if_not_exists()
                    .col(uuid(CapPatterns::Id).primary_key())
                    .col(string_len(CapPatterns::Name, 128).not_null())
                    .col(string_len(CapPatterns::Slug, 160).unique_key().not_null())
                    .col(text_null(CapPatterns::Description))
                    .col(string_len_null(CapPatterns::ImageUrl, 1024))
                    .col(timestamp_with_time_zone(CapPatterns::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TiedyePatterns::Table)
                    .if_not_exists()
                    .col(uuid(TiedyePatterns::Id).primary_key())
                    .col(string_len(TiedyePatterns::Name, 128).not_null())
                    .col(string_len(TiedyePatterns::Slug, 160).unique_key().not_null())
                    .col(text_null(TiedyePatterns::Description))
                    .col(string_len_null(TiedyePatterns::ImageUrl, 1024))
                    .col(timestamp_with_time_zone(TiedyePatterns::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TiedyePatterns::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CapPatterns::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Colors::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Colors { Table, Id, Name, Slug, HexCode, CreatedAt }

#[derive(DeriveIden)]
enum CapPatterns { Table, Id, Name, Slug, Description, ImageUrl, CreatedAt }

#[derive(DeriveIden)]
enum TiedyePatterns { Table, Id, Name, Slug, Description, ImageUrl, CreatedAt }
