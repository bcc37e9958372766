use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{category, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    /// Whole rupiah.
    pub price: i64,
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub color_id: Option<Uuid>,
    pub cap_pattern_id: Option<Uuid>,
    pub tiedye_pattern_id: Option<Uuid>,
    pub image_url: Option<String>,
    /// JSON array of additional image URLs.
    pub gallery: Json,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Category,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Gallery URLs; non-string entries are skipped.
    pub fn gallery_urls(&self) -> Vec<String> {
        self.gallery
            .as_array()
            .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    }

    pub fn in_stock(&self) -> bool { self.stock > 0 }
}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validation::required_text("name", name, 200)
}

pub fn validate_price(price: i64) -> Result<i64, ModelError> {
    if price < 0 {
        return Err(ModelError::Validation("price must be >= 0".into()));
    }
    Ok(price)
}

pub fn validate_stock(stock: i32) -> Result<i32, ModelError> {
    if stock < 0 {
        return Err(ModelError::Validation("stock must be >= 0".into()));
    }
    Ok(stock)
}

/// Normalize gallery input into a JSON array of http(s) URLs.
pub fn gallery_json(urls: &[String]) -> Result<Json, ModelError> {
    let mut out = Vec::with_capacity(urls.len());
    for url in urls {
        if let Some(u) = validation::optional_url("gallery", Some(url))? {
            out.push(Json::String(u));
        }
    }
    Ok(Json::Array(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_price_and_stock_rejected() {
        assert!(validate_price(-1).is_err());
        assert_eq!(validate_price(0).unwrap(), 0);
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn gallery_drops_blanks_and_rejects_relative_urls() {
        let json = gallery_json(&["https://cdn/a.jpg".into(), "  ".into()]).unwrap();
        assert_eq!(json, serde_json::json!(["https://cdn/a.jpg"]));
        assert!(gallery_json(&["/a.jpg".into()]).is_err());
    }
}
