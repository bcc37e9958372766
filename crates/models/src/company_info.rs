use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company_info")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub logo_url: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: Option<&str>) -> Result<(), ModelError> {
    match email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(e) if !e.contains('@') => Err(ModelError::Validation("invalid email".into())),
        _ => Ok(()),
    }
}

/// Digits-only international form for wa.me links: a leading `0` becomes the
/// Indonesian `62` prefix, a leading `+` and every separator are dropped.
pub fn normalize_whatsapp(number: &str) -> Result<String, ModelError> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 8 {
        return Err(ModelError::Validation(format!("invalid whatsapp number '{number}'")));
    }
    match digits.strip_prefix('0') {
        Some(rest) => Ok(format!("62{rest}")),
        None => Ok(digits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_local_prefix_is_rewritten() {
        assert_eq!(normalize_whatsapp("0812-3456-7890").unwrap(), "6281234567890");
        assert_eq!(normalize_whatsapp("+62 812 3456 7890").unwrap(), "6281234567890");
        assert!(normalize_whatsapp("12-34").is_err());
    }

    #[test]
    fn email_optional_but_checked() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some(" ")).is_ok());
        assert!(validate_email(Some("hello")).is_err());
        assert!(validate_email(Some("halo@batik.id")).is_ok());
    }
}
