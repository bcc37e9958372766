use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "colors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub hex_code: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// `#RRGGBB`, normalized to uppercase.
pub fn validate_hex_code(hex: &str) -> Result<String, ModelError> {
    let h = hex.trim();
    let valid = h.len() == 7
        && h.starts_with('#')
        && h[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(ModelError::Validation(format!("invalid hex color '{h}'")));
    }
    Ok(h.to_ascii_uppercase())
}
