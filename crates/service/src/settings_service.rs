//! Key/value site settings with a read-through in-process cache.

use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use sea_orm::{sea_query::OnConflict, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde_json::Value as Json;
use tracing::debug;

use models::setting;

use crate::errors::ServiceError;

const CACHE_CAPACITY: u64 = 1_000;
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Settings access for handlers. Cloning shares the cache.
#[derive(Clone)]
pub struct SettingsStore {
    db: DatabaseConnection,
    cache: Cache<String, setting::Model>,
}

impl SettingsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let cache = Cache::builder().max_capacity(CACHE_CAPACITY).time_to_live(CACHE_TTL).build();
        Self { db, cache }
    }

    pub async fn list_settings(&self) -> Result<Vec<setting::Model>, ServiceError> {
        Ok(setting::Entity::find().order_by_asc(setting::Column::Key).all(&self.db).await?)
    }

    pub async fn get_setting(&self, key: &str) -> Result<setting::Model, ServiceError> {
        setting::validate_key(key)?;
        if let Some(hit) = self.cache.get(key).await {
            debug!(%key, "settings cache hit");
            return Ok(hit);
        }
        let found = setting::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("setting"))?;
        self.cache.insert(key.to_string(), found.clone()).await;
        Ok(found)
    }

    /// Insert or replace the value under `key`.
    pub async fn set_setting(&self, key: &str, value: Json) -> Result<setting::Model, ServiceError> {
        setting::validate_key(key)?;
        let am = setting::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(Utc::now().into()),
        };
        setting::Entity::insert(am)
            .on_conflict(
                OnConflict::column(setting::Column::Key)
                    .update_columns([setting::Column::Value, setting::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        self.cache.invalidate(key).await;
        self.get_setting(key).await
    }

    pub async fn delete_setting(&self, key: &str) -> Result<(), ServiceError> {
        setting::validate_key(key)?;
        let res = setting::Entity::delete_by_id(key.to_string()).exec(&self.db).await?;
        self.cache.invalidate(key).await;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found("setting"));
        }
        Ok(())
    }
}
