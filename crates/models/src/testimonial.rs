use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "testimonials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_name: String,
    pub customer_title: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub rating: i16,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_customer_name(name: &str) -> Result<String, ModelError> {
    validation::required_text("customer_name", name, 128)
}

pub fn validate_rating(rating: i16) -> Result<i16, ModelError> {
    if !(1..=5).contains(&rating) {
        return Err(ModelError::Validation("rating must be between 1 and 5".into()));
    }
    Ok(rating)
}
