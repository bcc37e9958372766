//! Migrator registering table migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_category;
mod m20240101_000002_create_attribute_tables;
mod m20240101_000003_create_product;
mod m20240101_000004_create_news;
mod m20240101_000005_create_testimonial;
mod m20240101_000006_create_company_info;
mod m20240101_000007_create_setting;
mod m20240101_000008_create_media_library;
mod m20240101_000009_create_admin_user;
mod m20240101_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_category::Migration),
            Box::new(m20240101_000002_create_attribute_tables::Migration),
            Box::new(m20240101_000003_create_product::Migration),
            Box::new(m20240101_000004_create_news::Migration),
            Box::new(m20240101_000005_create_testimonial::Migration),
            Box::new(m20240101_000006_create_company_info::Migration),
            Box::new(m20240101_000007_create_setting::Migration),
            Box::new(m20240101_000008_create_media_library::Migration),
            Box::new(m20240101_000009_create_admin_user::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000010_add_indexes::Migration),
        ]
    }
}
