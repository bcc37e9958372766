//! Create `media_library` table.
//! Tracks stored blobs; `(bucket, path)` is unique so a sync never double-inserts.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MediaLibrary::Table)
                    .if_not_exists()
                    .col(uuid(MediaLibrary::Id).primary_key())
                    .col(string_len(MediaLibrary::Bucket, 32).not_null())
                    .col(string_len(MediaLibrary::Path, 512).not_null())
                    .col(string_len(MediaLibrary::FileName, 255).not_null())
                    .col(string_len(MediaLibrary::PublicUrl, 1024).not_null())
                    .col(string_len_null(MediaLibrary::MimeType, 128))
                    .col(big_integer(MediaLibrary::SizeBytes).not_null())
                    .col(string_len_null(MediaLibrary::AltText, 255))
                    .col(timestamp_with_time_zone(MediaLibrary::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_media_library_bucket_path")
                    .table(MediaLibrary::Table)
                    .col(MediaLibrary::Bucket)
                    .col(MediaLibrary::Path)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MediaLibrary::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MediaLibrary { Table, Id, Bucket, Path, FileName, PublicUrl, MimeType, SizeBytes, AltText, CreatedAt }
