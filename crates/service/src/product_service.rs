use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use models::{media_library, product, validation};

use crate::errors::ServiceError;
use crate::serde_ext::double_option;
use crate::storage::BlobStore;

fn default_true() -> bool { true }

#[derive(Clone, Debug, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub color_id: Option<Uuid>,
    #[serde(default)]
    pub cap_pattern_id: Option<Uuid>,
    #[serde(default)]
    pub tiedye_pattern_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub color_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cap_pattern_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tiedye_pattern_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default)]
    pub gallery: Option<Vec<String>>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Every product, newest first.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>, ServiceError> {
    Ok(product::Entity::find().order_by_desc(product::Column::CreatedAt).all(db).await?)
}

/// Storefront listing: active products only, newest first.
pub async fn list_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>, ServiceError> {
    Ok(product::Entity::find()
        .filter(product::Column::IsActive.eq(true))
        .order_by_desc(product::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn list_featured_products(db: &DatabaseConnection, limit: u64) -> Result<Vec<product::Model>, ServiceError> {
    Ok(product::Entity::find()
        .filter(product::Column::IsActive.eq(true))
        .filter(product::Column::IsFeatured.eq(true))
        .order_by_desc(product::Column::CreatedAt)
        .limit(limit.max(1))
        .all(db)
        .await?)
}

pub async fn get_product(db: &DatabaseConnection, id: Uuid) -> Result<product::Model, ServiceError> {
    product::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("product"))
}

pub async fn get_product_by_slug(db: &DatabaseConnection, slug: &str) -> Result<product::Model, ServiceError> {
    product::Entity::find()
        .filter(product::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("product"))
}

pub async fn create_product(db: &DatabaseConnection, input: ProductInput) -> Result<product::Model, ServiceError> {
    let name = product::validate_name(&input.name)?;
    let slug = validation::resolve_slug(input.slug.as_deref(), &name)?;
    let now = Utc::now().into();
    let am = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        description: Set(validation::optional_text(input.description.as_deref())),
        price: Set(product::validate_price(input.price)?),
        stock: Set(product::validate_stock(input.stock)?),
        category_id: Set(input.category_id),
        color_id: Set(input.color_id),
        cap_pattern_id: Set(input.cap_pattern_id),
        tiedye_pattern_id: Set(input.tiedye_pattern_id),
        image_url: Set(validation::optional_url("image_url", input.image_url.as_deref())?),
        gallery: Set(product::gallery_json(&input.gallery)?),
        is_featured: Set(input.is_featured),
        is_active: Set(input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await?;
    info!(product_id = %created.id, slug = %created.slug, "product created");
    Ok(created)
}

pub async fn update_product(db: &DatabaseConnection, id: Uuid, patch: ProductPatch) -> Result<product::Model, ServiceError> {
    let mut am: product::ActiveModel = get_product(db, id).await?.into();
    if let Some(name) = patch.name {
        am.name = Set(product::validate_name(&name)?);
    }
    if let Some(slug) = patch.slug {
        am.slug = Set(validation::resolve_slug(Some(&slug), "")?);
    }
    if let Some(description) = patch.description {
        am.description = Set(validation::optional_text(description.as_deref()));
    }
    if let Some(price) = patch.price {
        am.price = Set(product::validate_price(price)?);
    }
    if let Some(stock) = patch.stock {
        am.stock = Set(product::validate_stock(stock)?);
    }
    if let Some(v) = patch.category_id { am.category_id = Set(v); }
    if let Some(v) = patch.color_id { am.color_id = Set(v); }
    if let Some(v) = patch.cap_pattern_id { am.cap_pattern_id = Set(v); }
    if let Some(v) = patch.tiedye_pattern_id { am.tiedye_pattern_id = Set(v); }
    if let Some(image_url) = patch.image_url {
        am.image_url = Set(validation::optional_url("image_url", image_url.as_deref())?);
    }
    if let Some(gallery) = patch.gallery {
        am.gallery = Set(product::gallery_json(&gallery)?);
    }
    if let Some(v) = patch.is_featured { am.is_featured = Set(v); }
    if let Some(v) = patch.is_active { am.is_active = Set(v); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Add `delta` to the stock level; a result below zero is rejected.
pub async fn adjust_stock(db: &DatabaseConnection, id: Uuid, delta: i32) -> Result<product::Model, ServiceError> {
    let current = get_product(db, id).await?;
    let next = next_stock(current.stock, delta)?;
    let mut am: product::ActiveModel = current.into();
    am.stock = Set(next);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

fn next_stock(current: i32, delta: i32) -> Result<i32, ServiceError> {
    match current.checked_add(delta) {
        Some(n) if n >= 0 => Ok(n),
        Some(_) => Err(ServiceError::Validation(format!("insufficient stock: {current} available"))),
        None => Err(ServiceError::Validation("stock out of range".into())),
    }
}

/// Remove the product. With `purge_files`, its main image and gallery objects
/// are deleted from the store together with their media rows; URLs that the
/// store did not produce are left alone.
pub async fn delete_product(
    db: &DatabaseConnection,
    store: &dyn BlobStore,
    id: Uuid,
    purge_files: bool,
) -> Result<(), ServiceError> {
    let existing = get_product(db, id).await?;
    product::Entity::delete_by_id(id).exec(db).await?;
    info!(product_id = %id, purge_files, "product deleted");
    if !purge_files {
        return Ok(());
    }

    let urls: Vec<String> = existing.image_url.iter().cloned().chain(existing.gallery_urls()).collect();
    let purged = purge_product_files(db, store, &urls).await;
    info!(product_id = %id, purged, "product files purged");
    Ok(())
}

/// Best effort once the product row is gone: failures are logged and the
/// remaining files are still attempted. Returns how many objects were removed.
async fn purge_product_files(db: &DatabaseConnection, store: &dyn BlobStore, urls: &[String]) -> usize {
    let mut removed = 0;
    for url in urls {
        let Some((bucket, path)) = store.locate(url) else { continue };
        match store.delete(bucket, &path).await {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => {
                warn!(%bucket, %path, error = %e, "failed to purge product file");
                continue;
            }
        }
        let untracked = media_library::Entity::delete_many()
            .filter(media_library::Column::Bucket.eq(bucket.as_str()))
            .filter(media_library::Column::Path.eq(path.as_str()))
            .exec(db)
            .await;
        if let Err(e) = untracked {
            warn!(%bucket, %path, error = %e, "failed to drop media row for purged file");
        }
    }
    removed
}
