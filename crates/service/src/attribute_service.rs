//! Product attribute lookups: colors, cap patterns and tie-dye patterns.
//!
//! The three tables share name/slug columns; [`AttributeKind`] picks the
//! table and [`Attribute`] is the common view returned to callers.

use std::{fmt, str::FromStr};

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::{cap_pattern, color, tiedye_pattern, validation};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::errors::ServiceError;
use crate::serde_ext::double_option;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeKind {
    Colors,
    CapPatterns,
    TiedyePatterns,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 3] = [Self::Colors, Self::CapPatterns, Self::TiedyePatterns];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Colors => "colors",
            Self::CapPatterns => "cap-patterns",
            Self::TiedyePatterns => "tiedye-patterns",
        }
    }

    fn entity_name(self) -> &'static str {
        match self {
            Self::Colors => "color",
            Self::CapPatterns => "cap pattern",
            Self::TiedyePatterns => "tie-dye pattern",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for AttributeKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ServiceError::NotFound(format!("unknown attribute kind '{s}'")))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: Uuid,
    pub kind: AttributeKind,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

impl From<color::Model> for Attribute {
    fn from(m: color::Model) -> Self {
        Self {
            id: m.id,
            kind: AttributeKind::Colors,
            name: m.name,
            slug: m.slug,
            hex_code: m.hex_code,
            description: None,
            image_url: None,
            created_at: m.created_at,
        }
    }
}

impl From<cap_pattern::Model> for Attribute {
    fn from(m: cap_pattern::Model) -> Self {
        Self {
            id: m.id,
            kind: AttributeKind::CapPatterns,
            name: m.name,
            slug: m.slug,
            hex_code: None,
            description: m.description,
            image_url: m.image_url,
            created_at: m.created_at,
        }
    }
}

impl From<tiedye_pattern::Model> for Attribute {
    fn from(m: tiedye_pattern::Model) -> Self {
        Self {
            id: m.id,
            kind: AttributeKind::TiedyePatterns,
            name: m.name,
            slug: m.slug,
            hex_code: None,
            description: m.description,
            image_url: m.image_url,
            created_at: m.created_at,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AttributeInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub hex_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AttributePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub hex_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
}

fn validate_name(name: &str) -> Result<String, ServiceError> {
    Ok(validation::required_text("name", name, 128)?)
}

fn validate_hex(hex: Option<&str>) -> Result<Option<String>, ServiceError> {
    match validation::optional_text(hex) {
        Some(h) => Ok(Some(color::validate_hex_code(&h)?)),
        None => Ok(None),
    }
}

/// Colors carry a hex code; patterns carry description and image.
fn check_fields(kind: AttributeKind, hex: bool, pattern_fields: bool) -> Result<(), ServiceError> {
    match kind {
        AttributeKind::Colors if pattern_fields => {
            Err(ServiceError::Validation("colors take no description or image_url".into()))
        }
        AttributeKind::CapPatterns | AttributeKind::TiedyePatterns if hex => {
            Err(ServiceError::Validation(format!("{kind} take no hex_code")))
        }
        _ => Ok(()),
    }
}

pub async fn list_attributes(db: &DatabaseConnection, kind: AttributeKind) -> Result<Vec<Attribute>, ServiceError> {
    let items: Vec<Attribute> = match kind {
        AttributeKind::Colors => color::Entity::find()
            .order_by_asc(color::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(Attribute::from)
            .collect(),
        AttributeKind::CapPatterns => cap_pattern::Entity::find()
            .order_by_asc(cap_pattern::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(Attribute::from)
            .collect(),
        AttributeKind::TiedyePatterns => tiedye_pattern::Entity::find()
            .order_by_asc(tiedye_pattern::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(Attribute::from)
            .collect(),
    };
    Ok(items)
}

pub async fn get_attribute(db: &DatabaseConnection, kind: AttributeKind, id: Uuid) -> Result<Attribute, ServiceError> {
    let found = match kind {
        AttributeKind::Colors => color::Entity::find_by_id(id).one(db).await?.map(Attribute::from),
        AttributeKind::CapPatterns => cap_pattern::Entity::find_by_id(id).one(db).await?.map(Attribute::from),
        AttributeKind::TiedyePatterns => tiedye_pattern::Entity::find_by_id(id).one(db).await?.map(Attribute::from),
    };
    found.ok_or_else(|| ServiceError::not_found(kind.entity_name()))
}

/// Resolve a storefront slug to an id; `None` when nothing matches.
pub async fn find_attribute_by_slug(
    db: &DatabaseConnection,
    kind: AttributeKind,
    slug: &str,
) -> Result<Option<Attribute>, ServiceError> {
    Ok(list_attributes(db, kind).await?.into_iter().find(|a| a.slug == slug))
}

pub async fn create_attribute(
    db: &DatabaseConnection,
    kind: AttributeKind,
    input: AttributeInput,
) -> Result<Attribute, ServiceError> {
    let has_pattern_fields = validation::optional_text(input.description.as_deref()).is_some()
        || validation::optional_text(input.image_url.as_deref()).is_some();
    check_fields(kind, validation::optional_text(input.hex_code.as_deref()).is_some(), has_pattern_fields)?;

    let name = validate_name(&input.name)?;
    let slug = validation::resolve_slug(input.slug.as_deref(), &name)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let id = Uuid::new_v4();
    let description = validation::optional_text(input.description.as_deref());
    let image_url = validation::optional_url("image_url", input.image_url.as_deref())?;

    let created: Attribute = match kind {
        AttributeKind::Colors => color::ActiveModel {
            id: Set(id),
            name: Set(name),
            slug: Set(slug),
            hex_code: Set(validate_hex(input.hex_code.as_deref())?),
            created_at: Set(now),
        }
        .insert(db)
        .await?
        .into(),
        AttributeKind::CapPatterns => cap_pattern::ActiveModel {
            id: Set(id),
            name: Set(name),
            slug: Set(slug),
            description: Set(description),
            image_url: Set(image_url),
            created_at: Set(now),
        }
        .insert(db)
        .await?
        .into(),
        AttributeKind::TiedyePatterns => tiedye_pattern::ActiveModel {
            id: Set(id),
            name: Set(name),
            slug: Set(slug),
            description: Set(description),
            image_url: Set(image_url),
            created_at: Set(now),
        }
        .insert(db)
        .await?
        .into(),
    };
    Ok(created)
}

pub async fn update_attribute(
    db: &DatabaseConnection,
    kind: AttributeKind,
    id: Uuid,
    patch: AttributePatch,
) -> Result<Attribute, ServiceError> {
    let hex_given = matches!(&patch.hex_code, Some(Some(h)) if !h.trim().is_empty());
    let pattern_given = matches!(&patch.description, Some(Some(d)) if !d.trim().is_empty())
        || matches!(&patch.image_url, Some(Some(u)) if !u.trim().is_empty());
    check_fields(kind, hex_given, pattern_given)?;

    let name = patch.name.as_deref().map(validate_name).transpose()?;
    let slug = patch
        .slug
        .as_deref()
        .map(|s| validation::resolve_slug(Some(s), ""))
        .transpose()?;
    let description = patch.description.map(|d| validation::optional_text(d.as_deref()));
    let image_url = patch
        .image_url
        .map(|u| validation::optional_url("image_url", u.as_deref()))
        .transpose()?;

    let updated: Attribute = match kind {
        AttributeKind::Colors => {
            let mut am: color::ActiveModel = color::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found(kind.entity_name()))?
                .into();
            if let Some(v) = name { am.name = Set(v); }
            if let Some(v) = slug { am.slug = Set(v); }
            if let Some(hex) = patch.hex_code {
                am.hex_code = Set(validate_hex(hex.as_deref())?);
            }
            am.update(db).await?.into()
        }
        AttributeKind::CapPatterns => {
            let mut am: cap_pattern::ActiveModel = cap_pattern::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found(kind.entity_name()))?
                .into();
            if let Some(v) = name { am.name = Set(v); }
            if let Some(v) = slug { am.slug = Set(v); }
            if let Some(v) = description { am.description = Set(v); }
            if let Some(v) = image_url { am.image_url = Set(v); }
            am.update(db).await?.into()
        }
        AttributeKind::TiedyePatterns => {
            let mut am: tiedye_pattern::ActiveModel = tiedye_pattern::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found(kind.entity_name()))?
                .into();
            if let Some(v) = name { am.name = Set(v); }
            if let Some(v) = slug { am.slug = Set(v); }
            if let Some(v) = description { am.description = Set(v); }
            if let Some(v) = image_url { am.image_url = Set(v); }
            am.update(db).await?.into()
        }
    };
    Ok(updated)
}

/// Products referencing the attribute keep existing with the reference cleared.
pub async fn delete_attribute(db: &DatabaseConnection, kind: AttributeKind, id: Uuid) -> Result<(), ServiceError> {
    let res = match kind {
        AttributeKind::Colors => color::Entity::delete_by_id(id).exec(db).await?,
        AttributeKind::CapPatterns => cap_pattern::Entity::delete_by_id(id).exec(db).await?,
        AttributeKind::TiedyePatterns => tiedye_pattern::Entity::delete_by_id(id).exec(db).await?,
    };
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found(kind.entity_name()));
    }
    Ok(())
}
