//! Create `products` table.
//!
//! Lookup references use `SET NULL` so deleting a category or attribute
//! never deletes products.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(uuid(Products::Id).primary_key())
                    .col(string_len(Products::Name, 200).not_null())
                    .col(string_len(Products::Slug, 220).unique_key().not_null())
                    .col(text_null(Products::Description))
                    .col(big_integer(Products::Price).not_null())
                    .col(integer(Products::Stock).not_null())
                    .col(uuid_null(Products::CategoryId))
                    .col(uuid_null(Products::ColorId))
                    .col(uuid_null(Products::CapPatternId))
                    .col(uuid_null(Products::TiedyePatternId))
                    .col(string_len_null(Products::ImageUrl, 1024))
                    .col(json_binary(Products::Gallery).not_null())
                    .col(boolean(Products::IsFeatured).not_null())
                    .col(boolean(Products::IsActive).not_null())
                    .col(timestamp_with_time_zone(Products::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Products::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_color")
                            .from(Products::Table, Products::ColorId)
                            .to(Colors::Table, Colors::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_cap_pattern")
                            .from(Products::Table, Products::CapPatternId)
                            .to(CapPatterns::Table, CapPatterns::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_tiedye_pattern")
                            .from(Products::Table, Products::TiedyePatternId)
                            .to(TiedyePatterns::Table, TiedyePatterns::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Products::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Price,
    Stock,
    CategoryId,
    ColorId,
    CapPatternId,
    TiedyePatternId,
    ImageUrl,
    Gallery,
    IsFeatured,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories { Table, Id }

#[derive(DeriveIden)]
enum Colors { Table, Id }

#[derive(DeriveIden)]
enum CapPatterns { Table, Id }

#[derive(DeriveIden)]
enum TiedyePatterns { Table, Id }
