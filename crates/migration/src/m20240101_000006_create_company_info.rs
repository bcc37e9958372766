//! Create `company_info` table. Holds a single profile row.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanyInfo::Table)
                    .if_not_exists()
                    .col(uuid(CompanyInfo::Id).primary_key())
                    .col(string_len(CompanyInfo::Name, 200).not_null())
                    .col(string_len_null(CompanyInfo::Tagline, 255))
                    .col(text_null(CompanyInfo::Description))
                    .col(text_null(CompanyInfo::Address))
                    .col(string_len_null(CompanyInfo::Phone, 32))
                    .col(string_len_null(CompanyInfo::Email, 255))
                    .col(string_len_null(CompanyInfo::Whatsapp, 32))
                    .col(string_len_null(CompanyInfo::Instagram, 128))
                    .col(string_len_null(CompanyInfo::LogoUrl, 1024))
                    .col(timestamp_with_time_zone(CompanyInfo::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CompanyInfo::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CompanyInfo {
    Table,
    Id,
    Name,
    Tagline,
    Description,
    Address,
    Phone,
    Email,
    Whatsapp,
    Instagram,
    LogoUrl,
    UpdatedAt,
}
