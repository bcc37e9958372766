use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::{category, validation};

use crate::errors::ServiceError;
use crate::serde_ext::double_option;

#[derive(Clone, Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial update. `Some(None)` clears an optional column.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
}

/// All categories ordered by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    Ok(category::Entity::find().order_by_asc(category::Column::Name).all(db).await?)
}

pub async fn get_category(db: &DatabaseConnection, id: Uuid) -> Result<category::Model, ServiceError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("category"))
}

pub async fn get_category_by_slug(db: &DatabaseConnection, slug: &str) -> Result<category::Model, ServiceError> {
    category::Entity::find()
        .filter(category::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("category"))
}

pub async fn create_category(db: &DatabaseConnection, input: CategoryInput) -> Result<category::Model, ServiceError> {
    let name = category::validate_name(&input.name)?;
    let slug = validation::resolve_slug(input.slug.as_deref(), &name)?;
    let now = Utc::now().into();
    let am = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        description: Set(validation::optional_text(input.description.as_deref())),
        image_url: Set(validation::optional_url("image_url", input.image_url.as_deref())?),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    patch: CategoryPatch,
) -> Result<category::Model, ServiceError> {
    let mut am: category::ActiveModel = get_category(db, id).await?.into();
    if let Some(name) = patch.name {
        am.name = Set(category::validate_name(&name)?);
    }
    if let Some(slug) = patch.slug {
        am.slug = Set(validation::resolve_slug(Some(&slug), "")?);
    }
    if let Some(description) = patch.description {
        am.description = Set(validation::optional_text(description.as_deref()));
    }
    if let Some(image_url) = patch.image_url {
        am.image_url = Set(validation::optional_url("image_url", image_url.as_deref())?);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Products in the category survive with `category_id = NULL`.
pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = category::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("category"));
    }
    Ok(())
}
