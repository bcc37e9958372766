use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::{company_info, product, validation};

use crate::errors::ServiceError;

/// Full replacement of the company profile.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// The single profile row, `None` before the first save.
pub async fn get_company_info(db: &DatabaseConnection) -> Result<Option<company_info::Model>, ServiceError> {
    Ok(company_info::Entity::find()
        .order_by_asc(company_info::Column::UpdatedAt)
        .one(db)
        .await?)
}

pub async fn upsert_company_info(db: &DatabaseConnection, input: CompanyInput) -> Result<company_info::Model, ServiceError> {
    let name = validation::required_text("name", &input.name, 200)?;
    let email = validation::optional_text(input.email.as_deref());
    company_info::validate_email(email.as_deref())?;
    let whatsapp = validation::optional_text(input.whatsapp.as_deref());
    if let Some(number) = &whatsapp {
        company_info::normalize_whatsapp(number)?;
    }
    let logo_url = validation::optional_url("logo_url", input.logo_url.as_deref())?;

    let (mut am, is_new) = match get_company_info(db).await? {
        Some(existing) => (company_info::ActiveModel::from(existing), false),
        None => (company_info::ActiveModel { id: Set(Uuid::new_v4()), ..Default::default() }, true),
    };
    am.name = Set(name);
    am.tagline = Set(validation::optional_text(input.tagline.as_deref()));
    am.description = Set(validation::optional_text(input.description.as_deref()));
    am.address = Set(validation::optional_text(input.address.as_deref()));
    am.phone = Set(validation::optional_text(input.phone.as_deref()));
    am.email = Set(email);
    am.whatsapp = Set(whatsapp);
    am.instagram = Set(validation::optional_text(input.instagram.as_deref()));
    am.logo_url = Set(logo_url);
    am.updated_at = Set(Utc::now().into());

    let saved = if is_new { am.insert(db).await? } else { am.update(db).await? };
    Ok(saved)
}

/// `Rp 1.250.000` style amount.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 { format!("-Rp {grouped}") } else { format!("Rp {grouped}") }
}

/// Pre-filled WhatsApp order message for one product.
pub fn order_message(company: &company_info::Model, product: &product::Model, quantity: u32) -> String {
    let total = product.price.saturating_mul(i64::from(quantity));
    format!(
        "Halo {}, saya ingin memesan {} x {} ({}). Total: {}. Link: /products/{}",
        company.name,
        quantity,
        product.name,
        format_rupiah(product.price),
        format_rupiah(total),
        product.slug,
    )
}

/// `https://wa.me/<digits>?text=<message>` for ordering `product`.
pub fn whatsapp_order_link(
    company: &company_info::Model,
    product: &product::Model,
    quantity: u32,
) -> Result<String, ServiceError> {
    let number = company
        .whatsapp
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ServiceError::Validation("company whatsapp number is not set".into()))?;
    let digits = company_info::normalize_whatsapp(number)?;
    let quantity = quantity.max(1);
    let message = order_message(company, product, quantity);
    Ok(format!("https://wa.me/{}?text={}", digits, urlencoding::encode(&message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_enabled, get_db};

    fn company(whatsapp: Option<&str>) -> company_info::Model {
        company_info::Model {
            id: Uuid::new_v4(),
            name: "Batik Sari".into(),
            tagline: None,
            description: None,
            address: None,
            phone: None,
            email: None,
            whatsapp: whatsapp.map(str::to_string),
            instagram: None,
            logo_url: None,
            updated_at: Utc::now().into(),
        }
    }

    fn product(price: i64) -> product::Model {
        product::Model {
            id: Uuid::new_v4(),
            name: "Kain Parang".into(),
            slug: "kain-parang".into(),
            description: None,
            price,
            stock: 5,
            category_id: None,
            color_id: None,
            cap_pattern_id: None,
            tiedye_pattern_id: None,
            image_url: None,
            gallery: serde_json::json!([]),
            is_featured: false,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn rupiah_grouping() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(950), "Rp 950");
        assert_eq!(format_rupiah(350_000), "Rp 350.000");
        assert_eq!(format_rupiah(1_250_000), "Rp 1.250.000");
        assert_eq!(format_rupiah(-4_500), "-Rp 4.500");
    }

    #[test]
    fn link_uses_normalized_number_and_encoded_text() {
        let link = whatsapp_order_link(&company(Some("0812-3456-7890")), &product(350_000), 2).unwrap();
        assert!(link.starts_with("https://wa.me/6281234567890?text="));
        assert!(link.contains("Halo%20Batik%20Sari"));
        assert!(link.contains("2%20x%20Kain%20Parang"));
        assert!(link.contains("Rp%20700.000"));
        assert!(!link[link.find("text=").unwrap()..].contains(' '));
    }

    #[test]
    fn link_without_number_is_validation_error() {
        assert!(matches!(
            whatsapp_order_link(&company(None), &product(1), 1),
            Err(ServiceError::Validation(_))
        ));
        assert!(whatsapp_order_link(&company(Some("  ")), &product(1), 1).is_err());
    }

    #[test]
    fn zero_quantity_orders_one() {
        let msg = order_message(&company(None), &product(100), 1);
        let link = whatsapp_order_link(&company(Some("+62 812 0000 1111")), &product(100), 0).unwrap();
        assert!(link.ends_with(&*urlencoding::encode(&msg)));
    }

    #[tokio::test]
    async fn upsert_keeps_single_row() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() { return Ok(()); }
        let db = get_db().await?;

        let first = upsert_company_info(&db, CompanyInput {
            name: "Batik Sari".into(),
            whatsapp: Some("081234567890".into()),
            ..Default::default()
        }).await?;
        let second = upsert_company_info(&db, CompanyInput {
            name: "Batik Sari Solo".into(),
            email: Some("halo@batiksari.id".into()),
            ..Default::default()
        }).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(second.whatsapp, None);
        assert_eq!(get_company_info(&db).await?.map(|c| c.name), Some("Batik Sari Solo".to_string()));

        let bad = upsert_company_info(&db, CompanyInput { name: "X".into(), email: Some("nope".into()), ..Default::default() }).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
