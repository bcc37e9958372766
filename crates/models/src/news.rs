use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "news")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub excerpt: Option<String>,
    /// Rich-text HTML, stored as submitted.
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub cover_image_url: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<String, ModelError> {
    validation::required_text("title", title, 255)
}

pub fn validate_content(content: &str) -> Result<String, ModelError> {
    if content.trim().is_empty() {
        return Err(ModelError::Validation("content required".into()));
    }
    Ok(content.to_string())
}

/// `published_at` after a publish toggle: first publish stamps `now`,
/// unpublishing and re-publishing keep the original stamp.
pub fn next_published_at(
    current: Option<DateTimeWithTimeZone>,
    publish: bool,
    now: DateTimeWithTimeZone,
) -> Option<DateTimeWithTimeZone> {
    match (current, publish) {
        (Some(ts), _) => Some(ts),
        (None, true) => Some(now),
        (None, false) => None,
    }
}
