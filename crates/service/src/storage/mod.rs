//! Blob storage: bucket names, object path rules, upload naming, and the
//! `BlobStore` abstraction with its local filesystem implementation.

pub mod local;
pub mod naming;

use std::{fmt, str::FromStr};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use local::LocalBlobStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object path: {0}")]
    InvalidPath(String),
    #[error("unknown bucket: {0}")]
    UnknownBucket(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("object already exists: {0}")]
    AlreadyExists(String),
    #[error("rejected upload: {0}")]
    Rejected(String),
    #[error("upload of {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: usize, limit: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Images,
    Documents,
    Products,
    Company,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [Bucket::Images, Bucket::Documents, Bucket::Products, Bucket::Company];

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Images => "images",
            Bucket::Documents => "documents",
            Bucket::Products => "products",
            Bucket::Company => "company",
        }
    }

    /// Image buckets only take `image/*`; `documents` takes anything.
    pub fn accepts(self, content_type: &str) -> bool {
        match self {
            Bucket::Documents => true,
            Bucket::Images | Bucket::Products | Bucket::Company => content_type.starts_with("image/"),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Bucket {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| StorageError::UnknownBucket(s.to_string()))
    }
}

/// Result of a write (upload, copy, move).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredObject {
    pub bucket: Bucket,
    pub path: String,
    pub size_bytes: u64,
    pub content_type: Option<String>,
    pub public_url: String,
}

/// One entry of a bucket listing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ObjectInfo {
    pub path: String,
    pub size_bytes: u64,
    pub content_type: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectInfo {
    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create every bucket that does not exist yet.
    async fn ensure_buckets(&self) -> Result<(), StorageError>;

    /// Store `bytes` at `path`. Refuses to overwrite an existing object.
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<StoredObject, StorageError>;

    /// Remove an object; `Ok(false)` when it was already gone.
    async fn delete(&self, bucket: Bucket, path: &str) -> Result<bool, StorageError>;

    /// Every object in the bucket (optionally under `prefix`), sorted by path.
    async fn list(&self, bucket: Bucket, prefix: Option<&str>) -> Result<Vec<ObjectInfo>, StorageError>;

    async fn copy(&self, bucket: Bucket, from: &str, to: &str) -> Result<StoredObject, StorageError>;

    async fn move_object(&self, bucket: Bucket, from: &str, to: &str) -> Result<StoredObject, StorageError>;

    fn public_url(&self, bucket: Bucket, path: &str) -> String;

    /// Inverse of `public_url`: `None` for URLs this store did not produce.
    fn locate(&self, url: &str) -> Option<(Bucket, String)>;
}

/// Validate and canonicalize a relative object path.
pub fn normalize_object_path(path: &str) -> Result<String, StorageError> {
    let p = path.trim();
    if p.is_empty() || p.starts_with('/') || p.contains('\\') {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    if p.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(p.to_string())
}

/// Guess a MIME type from the file extension.
pub fn guess_content_type(path: &str) -> Option<String> {
    mime_guess::from_path(path).first_raw().map(str::to_string)
}

/// Size and type rules applied before any upload reaches the store.
pub fn check_upload(bucket: Bucket, size: usize, content_type: &str, limit: usize) -> Result<(), StorageError> {
    if size == 0 {
        return Err(StorageError::Rejected("empty file".into()));
    }
    if size > limit {
        return Err(StorageError::TooLarge { size, limit });
    }
    if !bucket.accepts(content_type) {
        return Err(StorageError::Rejected(format!("{content_type} not allowed in bucket {bucket}")));
    }
    Ok(())
}

/// Objects are served with a type derived from their extension, so image
/// buckets also require an image extension whatever the client declared.
pub fn check_extension(bucket: Bucket, path: &str) -> Result<(), StorageError> {
    if bucket == Bucket::Documents {
        return Ok(());
    }
    match guess_content_type(path) {
        Some(ct) if bucket.accepts(&ct) => Ok(()),
        Some(ct) => Err(StorageError::Rejected(format!("{path} would be served as {ct}, not allowed in bucket {bucket}"))),
        None => Err(StorageError::Rejected(format!("{path} has no image extension, not allowed in bucket {bucket}"))),
    }
}
