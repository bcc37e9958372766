use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::metrics::record_storage_op;
use tokio::fs;
use tracing::{debug, info};

use super::{
    check_extension, check_upload, guess_content_type, normalize_object_path, BlobStore, Bucket, ObjectInfo, StorageError,
    StoredObject,
};

/// Filesystem-backed blob store: `<root>/<bucket>/<path>`.
///
/// Objects are exposed to clients under `<public_base_url>/<bucket>/<path>`,
/// which the HTTP layer serves straight from `root`.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
    max_upload_bytes: usize,
}

impl LocalBlobStore {
    pub fn new<P: Into<PathBuf>>(root: P, public_base_url: &str, max_upload_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_upload_bytes,
        }
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn max_upload_bytes(&self) -> usize { self.max_upload_bytes }

    fn object_file(&self, bucket: Bucket, path: &str) -> Result<(String, PathBuf), StorageError> {
        let normalized = normalize_object_path(path)?;
        let file = self.root.join(bucket.as_str()).join(&normalized);
        Ok((normalized, file))
    }

    async fn stored(&self, bucket: Bucket, path: String, file: &Path) -> Result<StoredObject, StorageError> {
        let meta = fs::metadata(file).await?;
        Ok(StoredObject {
            bucket,
            public_url: self.public_url(bucket, &path),
            content_type: guess_content_type(&path),
            size_bytes: meta.len(),
            path,
        })
    }

    async fn ensure_absent(path: &str, file: &Path) -> Result<(), StorageError> {
        if fs::try_exists(file).await? {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        Ok(())
    }

    async fn create_parent(file: &Path) -> Result<(), StorageError> {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn ensure_buckets(&self) -> Result<(), StorageError> {
        for bucket in Bucket::ALL {
            let dir = self.root.join(bucket.as_str());
            if !fs::try_exists(&dir).await? {
                fs::create_dir_all(&dir).await?;
                info!(bucket = %bucket, dir = %dir.display(), "bucket created");
            }
        }
        Ok(())
    }

    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<StoredObject, StorageError> {
        let (path, file) = self.object_file(bucket, path)?;
        let content_type = content_type
            .map(str::to_string)
            .or_else(|| guess_content_type(&path))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        check_upload(bucket, bytes.len(), &content_type, self.max_upload_bytes)?;
        check_extension(bucket, &path)?;
        Self::ensure_absent(&path, &file).await?;
        Self::create_parent(&file).await?;
        fs::write(&file, bytes).await?;
        record_storage_op(bucket.as_str(), "upload");
        debug!(bucket = %bucket, %path, size = bytes.len(), "object uploaded");
        Ok(StoredObject {
            bucket,
            public_url: self.public_url(bucket, &path),
            content_type: Some(content_type),
            size_bytes: bytes.len() as u64,
            path,
        })
    }

    async fn delete(&self, bucket: Bucket, path: &str) -> Result<bool, StorageError> {
        let (path, file) = self.object_file(bucket, path)?;
        match fs::remove_file(&file).await {
            Ok(()) => {
                record_storage_op(bucket.as_str(), "delete");
                debug!(bucket = %bucket, %path, "object deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, bucket: Bucket, prefix: Option<&str>) -> Result<Vec<ObjectInfo>, StorageError> {
        let bucket_dir = self.root.join(bucket.as_str());
        let prefix = match prefix.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => Some(normalize_object_path(p.trim_end_matches('/'))?),
            None => None,
        };
        let mut out = Vec::new();
        if !fs::try_exists(&bucket_dir).await? {
            return Ok(out);
        }

        let mut stack = vec![bucket_dir.clone()];
        while let Some(dir) = stack.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with('.') {
                    continue;
                }
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    stack.push(entry.path());
                    continue;
                }
                if !file_type.is_file() {
                    continue;
                }
                let full = entry.path();
                let Ok(rel) = full.strip_prefix(&bucket_dir) else { continue };
                let rel = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                if let Some(p) = &prefix {
                    if rel != *p && !rel.starts_with(&format!("{p}/")) {
                        continue;
                    }
                }
                let meta = entry.metadata().await?;
                out.push(ObjectInfo {
                    content_type: guess_content_type(&rel),
                    size_bytes: meta.len(),
                    last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
                    path: rel,
                });
            }
        }
        out.sort_by(|a, b| a.path.cmp(&b.path));
        record_storage_op(bucket.as_str(), "list");
        Ok(out)
    }

    async fn copy(&self, bucket: Bucket, from: &str, to: &str) -> Result<StoredObject, StorageError> {
        let (from_path, from_file) = self.object_file(bucket, from)?;
        let (to_path, to_file) = self.object_file(bucket, to)?;
        check_extension(bucket, &to_path)?;
        if !fs::try_exists(&from_file).await? {
            return Err(StorageError::NotFound(from_path));
        }
        Self::ensure_absent(&to_path, &to_file).await?;
        Self::create_parent(&to_file).await?;
        fs::copy(&from_file, &to_file).await?;
        record_storage_op(bucket.as_str(), "copy");
        self.stored(bucket, to_path, &to_file).await
    }

    async fn move_object(&self, bucket: Bucket, from: &str, to: &str) -> Result<StoredObject, StorageError> {
        let (from_path, from_file) = self.object_file(bucket, from)?;
        let (to_path, to_file) = self.object_file(bucket, to)?;
        check_extension(bucket, &to_path)?;
        if !fs::try_exists(&from_file).await? {
            return Err(StorageError::NotFound(from_path));
        }
        Self::ensure_absent(&to_path, &to_file).await?;
        Self::create_parent(&to_file).await?;
        fs::rename(&from_file, &to_file).await?;
        record_storage_op(bucket.as_str(), "move");
        self.stored(bucket, to_path, &to_file).await
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        let encoded = path
            .split('/')
            .map(|seg| urlencoding::encode(seg).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}/{}", self.public_base_url, bucket.as_str(), encoded)
    }

    fn locate(&self, url: &str) -> Option<(Bucket, String)> {
        let rest = url.strip_prefix(&self.public_base_url)?.strip_prefix('/')?;
        let (bucket, path) = rest.split_once('/')?;
        let bucket = bucket.parse::<Bucket>().ok()?;
        let decoded = urlencoding::decode(path).ok()?.into_owned();
        normalize_object_path(&decoded).ok().map(|p| (bucket, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(limit: usize) -> LocalBlobStore {
        let root = std::env::temp_dir().join(format!("batik_blobs_{}", uuid::Uuid::new_v4()));
        LocalBlobStore::new(root, "http://localhost:8080/storage/", limit)
    }

    #[tokio::test]
    async fn upload_list_copy_move_delete() -> Result<(), anyhow::Error> {
        let store = temp_store(1024);
        store.ensure_buckets().await?;

        let up = store.upload(Bucket::Products, "kain/parang.jpg", b"jpeg-bytes", None).await?;
        assert_eq!(up.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(up.public_url, "http://localhost:8080/storage/products/kain/parang.jpg");

        // no silent overwrite
        assert!(matches!(
            store.upload(Bucket::Products, "kain/parang.jpg", b"x", None).await,
            Err(StorageError::AlreadyExists(_))
        ));

        let copied = store.copy(Bucket::Products, "kain/parang.jpg", "arsip/parang.jpg").await?;
        assert_eq!(copied.size_bytes, 10);
        let moved = store.move_object(Bucket::Products, "arsip/parang.jpg", "arsip/parang-lama.jpg").await?;
        assert_eq!(moved.path, "arsip/parang-lama.jpg");

        let all = store.list(Bucket::Products, None).await?;
        let paths: Vec<_> = all.iter().map(|o| o.path.as_str()).collect();
        assert_eq!(paths, vec!["arsip/parang-lama.jpg", "kain/parang.jpg"]);
        assert_eq!(all[1].file_name(), "parang.jpg");

        let under_kain = store.list(Bucket::Products, Some("kain/")).await?;
        assert_eq!(under_kain.len(), 1);

        assert!(store.delete(Bucket::Products, "kain/parang.jpg").await?);
        assert!(!store.delete(Bucket::Products, "kain/parang.jpg").await?);

        let _ = tokio::fs::remove_dir_all(store.root()).await;
        Ok(())
    }

    #[tokio::test]
    async fn upload_rejects_wrong_type_and_size() -> Result<(), anyhow::Error> {
        let store = temp_store(4);
        store.ensure_buckets().await?;
        assert!(matches!(
            store.upload(Bucket::Images, "a.pdf", b"pdf", None).await,
            Err(StorageError::Rejected(_))
        ));
        assert!(matches!(
            store.upload(Bucket::Documents, "a.pdf", b"too big", None).await,
            Err(StorageError::TooLarge { .. })
        ));
        assert!(store.upload(Bucket::Documents, "../a.pdf", b"ok", None).await.is_err());
        let _ = tokio::fs::remove_dir_all(store.root()).await;
        Ok(())
    }

    #[tokio::test]
    async fn declared_image_type_cannot_smuggle_other_extensions() -> Result<(), anyhow::Error> {
        let store = temp_store(1024);
        store.ensure_buckets().await?;
        assert!(matches!(
            store.upload(Bucket::Images, "page.html", b"<script>alert(1)</script>", Some("image/png")).await,
            Err(StorageError::Rejected(_))
        ));
        assert!(!store.root().join("images/page.html").exists());

        store.upload(Bucket::Images, "hero.png", b"png", None).await?;
        assert!(matches!(
            store.copy(Bucket::Images, "hero.png", "hero.html").await,
            Err(StorageError::Rejected(_))
        ));
        assert!(matches!(
            store.move_object(Bucket::Images, "hero.png", "hero.svg.txt").await,
            Err(StorageError::Rejected(_))
        ));
        // documents keep any extension
        store.upload(Bucket::Documents, "price-list.html", b"<p>", None).await?;
        let _ = tokio::fs::remove_dir_all(store.root()).await;
        Ok(())
    }

    #[tokio::test]
    async fn copy_missing_source_is_not_found() -> Result<(), anyhow::Error> {
        let store = temp_store(1024);
        store.ensure_buckets().await?;
        assert!(matches!(
            store.copy(Bucket::Images, "nope.png", "dest.png").await,
            Err(StorageError::NotFound(_))
        ));
        let _ = tokio::fs::remove_dir_all(store.root()).await;
        Ok(())
    }

    #[test]
    fn public_url_round_trips_through_locate() {
        let store = temp_store(10);
        let url = store.public_url(Bucket::Company, "logo/batik sari.png");
        assert_eq!(url, "http://localhost:8080/storage/company/logo/batik%20sari.png");
        assert_eq!(store.locate(&url), Some((Bucket::Company, "logo/batik sari.png".to_string())));
        assert_eq!(store.locate("https://elsewhere.com/company/logo.png"), None);
        assert_eq!(store.locate("http://localhost:8080/storage/videos/a.mp4"), None);
    }
}
