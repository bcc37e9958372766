//! Media library: uploads tracked in `media_library`, and reconciliation of
//! that table against what actually sits in each bucket.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use common::metrics::record_sync_inserted;
use models::{media_library, validation};

use crate::errors::ServiceError;
use crate::storage::{naming, BlobStore, Bucket, ObjectInfo};

/// A file as received from the admin upload form.
#[derive(Clone, Debug)]
pub struct MediaUpload {
    pub bucket: Bucket,
    pub prefix: Option<String>,
    pub original_name: String,
    pub content_type: Option<String>,
    pub alt_text: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub bucket: String,
    pub scanned: usize,
    pub inserted: usize,
    pub already_tracked: usize,
    pub orphaned_rows: usize,
}

/// What a sync has to do, computed without touching the store or the DB.
#[derive(Debug, Default, PartialEq)]
pub struct SyncPlan<'a> {
    pub untracked: Vec<&'a ObjectInfo>,
    pub already_tracked: usize,
    pub orphaned: Vec<String>,
}

/// Objects missing from `tracked` become inserts; tracked paths with no
/// object left are orphans.
pub fn plan_sync<'a>(objects: &'a [ObjectInfo], tracked: &HashSet<String>) -> SyncPlan<'a> {
    let present: HashSet<&str> = objects.iter().map(|o| o.path.as_str()).collect();
    let (known, untracked): (Vec<&ObjectInfo>, Vec<&ObjectInfo>) =
        objects.iter().partition(|o| tracked.contains(&o.path));
    let mut orphaned: Vec<String> = tracked.iter().filter(|p| !present.contains(p.as_str())).cloned().collect();
    orphaned.sort();
    SyncPlan { untracked, already_tracked: known.len(), orphaned }
}

pub async fn list_media(db: &DatabaseConnection, bucket: Option<Bucket>) -> Result<Vec<media_library::Model>, ServiceError> {
    let mut q = media_library::Entity::find();
    if let Some(b) = bucket {
        q = q.filter(media_library::Column::Bucket.eq(b.as_str()));
    }
    Ok(q.order_by_desc(media_library::Column::CreatedAt).all(db).await?)
}

pub async fn get_media(db: &DatabaseConnection, id: Uuid) -> Result<media_library::Model, ServiceError> {
    media_library::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("media"))
}

/// Store the file under a generated name and record it.
pub async fn upload_media(
    db: &DatabaseConnection,
    store: &dyn BlobStore,
    upload: MediaUpload,
) -> Result<media_library::Model, ServiceError> {
    let file_name = upload
        .original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    if file_name.is_empty() {
        return Err(ServiceError::Validation("file name required".into()));
    }
    let path = naming::generate_object_name(upload.prefix.as_deref(), &file_name);
    let stored = store
        .upload(upload.bucket, &path, &upload.bytes, upload.content_type.as_deref())
        .await?;

    let am = media_library::ActiveModel {
        id: Set(Uuid::new_v4()),
        bucket: Set(upload.bucket.as_str().to_string()),
        path: Set(stored.path.clone()),
        file_name: Set(file_name),
        public_url: Set(stored.public_url.clone()),
        mime_type: Set(stored.content_type.clone()),
        size_bytes: Set(stored.size_bytes as i64),
        alt_text: Set(validation::optional_text(upload.alt_text.as_deref())),
        created_at: Set(Utc::now().into()),
    };
    match am.insert(db).await {
        Ok(row) => {
            info!(media_id = %row.id, bucket = %upload.bucket, path = %row.path, size = row.size_bytes, "media uploaded");
            Ok(row)
        }
        Err(e) => {
            if let Err(cleanup) = store.delete(upload.bucket, &stored.path).await {
                warn!(bucket = %upload.bucket, path = %stored.path, error = %cleanup, "orphaned upload after failed insert");
            }
            Err(e.into())
        }
    }
}

pub async fn update_media_alt_text(
    db: &DatabaseConnection,
    id: Uuid,
    alt_text: Option<String>,
) -> Result<media_library::Model, ServiceError> {
    let mut am: media_library::ActiveModel = get_media(db, id).await?.into();
    am.alt_text = Set(validation::optional_text(alt_text.as_deref()));
    Ok(am.update(db).await?)
}

/// Delete the object and its row. An object already gone from the store is
/// not an error.
pub async fn delete_media(db: &DatabaseConnection, store: &dyn BlobStore, id: Uuid) -> Result<(), ServiceError> {
    let row = get_media(db, id).await?;
    let bucket: Bucket = row.bucket.parse()?;
    let removed = store.delete(bucket, &row.path).await?;
    if !removed {
        warn!(media_id = %id, %bucket, path = %row.path, "blob already missing");
    }
    media_library::Entity::delete_by_id(id).exec(db).await?;
    info!(media_id = %id, %bucket, "media deleted");
    Ok(())
}

/// Track every object in `bucket` that has no row yet.
pub async fn sync_bucket(db: &DatabaseConnection, store: &dyn BlobStore, bucket: Bucket) -> Result<SyncReport, ServiceError> {
    let objects = store.list(bucket, None).await?;
    let tracked: HashSet<String> = media_library::Entity::find()
        .select_only()
        .column(media_library::Column::Path)
        .filter(media_library::Column::Bucket.eq(bucket.as_str()))
        .into_tuple::<String>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let plan = plan_sync(&objects, &tracked);
    let now = Utc::now();
    for obj in &plan.untracked {
        let am = media_library::ActiveModel {
            id: Set(Uuid::new_v4()),
            bucket: Set(bucket.as_str().to_string()),
            path: Set(obj.path.clone()),
            file_name: Set(obj.file_name().to_string()),
            public_url: Set(store.public_url(bucket, &obj.path)),
            mime_type: Set(obj.content_type.clone()),
            size_bytes: Set(obj.size_bytes as i64),
            alt_text: Set(None),
            created_at: Set(obj.last_modified.unwrap_or(now).into()),
        };
        am.insert(db).await?;
    }
    record_sync_inserted(bucket.as_str(), plan.untracked.len() as u64);

    let report = SyncReport {
        bucket: bucket.as_str().to_string(),
        scanned: objects.len(),
        inserted: plan.untracked.len(),
        already_tracked: plan.already_tracked,
        orphaned_rows: plan.orphaned.len(),
    };
    if !plan.orphaned.is_empty() {
        warn!(%bucket, orphaned = ?plan.orphaned, "tracked media without a stored object");
    }
    info!(%bucket, scanned = report.scanned, inserted = report.inserted, orphaned = report.orphaned_rows, "bucket synced");
    Ok(report)
}

/// Sync each bucket in turn; the first failure stops the run.
pub async fn sync_all_buckets(db: &DatabaseConnection, store: &dyn BlobStore) -> Result<Vec<SyncReport>, ServiceError> {
    let mut reports = Vec::with_capacity(Bucket::ALL.len());
    for bucket in Bucket::ALL {
        reports.push(sync_bucket(db, store, bucket).await?);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalBlobStore;
    use crate::test_support::{db_tests_enabled, get_db};

    fn obj(path: &str) -> ObjectInfo {
        ObjectInfo { path: path.into(), size_bytes: 1, content_type: None, last_modified: None }
    }

    #[test]
    fn plan_splits_untracked_tracked_and_orphans() {
        let objects = vec![obj("a.png"), obj("b.png"), obj("c/d.png")];
        let tracked: HashSet<String> = ["b.png", "gone.png", "also-gone.png"].iter().map(|s| s.to_string()).collect();
        let plan = plan_sync(&objects, &tracked);
        let untracked: Vec<_> = plan.untracked.iter().map(|o| o.path.as_str()).collect();
        assert_eq!(untracked, vec!["a.png", "c/d.png"]);
        assert_eq!(plan.already_tracked, 1);
        assert_eq!(plan.orphaned, vec!["also-gone.png".to_string(), "gone.png".to_string()]);
    }

    #[test]
    fn plan_on_empty_bucket() {
        let plan = plan_sync(&[], &HashSet::new());
        assert_eq!(plan, SyncPlan::default());
    }

    #[tokio::test]
    async fn upload_sync_and_delete() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() { return Ok(()); }
        let db = get_db().await?;
        let root = std::env::temp_dir().join(format!("batik_media_{}", Uuid::new_v4()));
        let store = LocalBlobStore::new(&root, "http://localhost:8080/storage", 1024 * 1024);
        store.ensure_buckets().await?;

        let row = upload_media(&db, &store, MediaUpload {
            bucket: Bucket::Images,
            prefix: Some("Banner Home".into()),
            original_name: "C:\\fakepath\\Hero.PNG".into(),
            content_type: None,
            alt_text: Some("Banner utama".into()),
            bytes: b"png-bytes".to_vec(),
        }).await?;
        assert_eq!(row.file_name, "Hero.PNG");
        assert!(row.path.starts_with("banner-home/") && row.path.ends_with(".png"));
        assert_eq!(row.mime_type.as_deref(), Some("image/png"));

        // dropped in by hand, outside the upload flow
        let legacy_path = format!("manual/{}.jpg", Uuid::new_v4());
        store.upload(Bucket::Images, &legacy_path, b"jpg", None).await?;
        let report = sync_bucket(&db, &store, Bucket::Images).await?;
        assert_eq!(report.scanned, 2);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.already_tracked, 1);

        // second run is a no-op
        let again = sync_bucket(&db, &store, Bucket::Images).await?;
        assert_eq!(again.inserted, 0);

        store.delete(Bucket::Images, &legacy_path).await?;
        let orphaned = sync_bucket(&db, &store, Bucket::Images).await?;
        assert!(orphaned.orphaned_rows >= 1);

        delete_media(&db, &store, row.id).await?;
        assert!(matches!(get_media(&db, row.id).await, Err(ServiceError::NotFound(_))));

        let legacy = list_media(&db, Some(Bucket::Images)).await?
            .into_iter()
            .find(|m| m.path == legacy_path);
        if let Some(l) = legacy {
            // blob is gone already; delete must still succeed
            delete_media(&db, &store, l.id).await?;
        }
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
