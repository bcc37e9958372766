use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::{testimonial, validation};

use crate::errors::ServiceError;
use crate::serde_ext::double_option;

fn default_rating() -> i16 { 5 }
fn default_true() -> bool { true }

#[derive(Clone, Debug, Deserialize)]
pub struct TestimonialInput {
    pub customer_name: String,
    #[serde(default)]
    pub customer_title: Option<String>,
    pub content: String,
    #[serde(default = "default_rating")]
    pub rating: i16,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TestimonialPatch {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub customer_title: Option<Option<String>>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<i16>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

fn validate_content(content: &str) -> Result<String, ServiceError> {
    Ok(validation::required_text("content", content, 2000)?)
}

pub async fn list_testimonials(db: &DatabaseConnection) -> Result<Vec<testimonial::Model>, ServiceError> {
    Ok(testimonial::Entity::find().order_by_desc(testimonial::Column::CreatedAt).all(db).await?)
}

pub async fn list_active_testimonials(db: &DatabaseConnection) -> Result<Vec<testimonial::Model>, ServiceError> {
    Ok(testimonial::Entity::find()
        .filter(testimonial::Column::IsActive.eq(true))
        .order_by_desc(testimonial::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get_testimonial(db: &DatabaseConnection, id: Uuid) -> Result<testimonial::Model, ServiceError> {
    testimonial::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("testimonial"))
}

pub async fn create_testimonial(db: &DatabaseConnection, input: TestimonialInput) -> Result<testimonial::Model, ServiceError> {
    let am = testimonial::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_name: Set(testimonial::validate_customer_name(&input.customer_name)?),
        customer_title: Set(validation::optional_text(input.customer_title.as_deref())),
        content: Set(validate_content(&input.content)?),
        rating: Set(testimonial::validate_rating(input.rating)?),
        avatar_url: Set(validation::optional_url("avatar_url", input.avatar_url.as_deref())?),
        is_active: Set(input.is_active),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn update_testimonial(
    db: &DatabaseConnection,
    id: Uuid,
    patch: TestimonialPatch,
) -> Result<testimonial::Model, ServiceError> {
    let mut am: testimonial::ActiveModel = get_testimonial(db, id).await?.into();
    if let Some(name) = patch.customer_name {
        am.customer_name = Set(testimonial::validate_customer_name(&name)?);
    }
    if let Some(title) = patch.customer_title {
        am.customer_title = Set(validation::optional_text(title.as_deref()));
    }
    if let Some(content) = patch.content {
        am.content = Set(validate_content(&content)?);
    }
    if let Some(rating) = patch.rating {
        am.rating = Set(testimonial::validate_rating(rating)?);
    }
    if let Some(avatar) = patch.avatar_url {
        am.avatar_url = Set(validation::optional_url("avatar_url", avatar.as_deref())?);
    }
    if let Some(active) = patch.is_active {
        am.is_active = Set(active);
    }
    Ok(am.update(db).await?)
}

pub async fn delete_testimonial(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = testimonial::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("testimonial"));
    }
    Ok(())
}
