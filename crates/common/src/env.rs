//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the storage root exists and is writable; create it when missing.
pub async fn ensure_env(storage_root: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(storage_root).await.is_err() {
        warn!(%storage_root, "storage root not found; creating it");
    }
    tokio::fs::create_dir_all(storage_root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {storage_root}: {e}"))?;

    let probe = std::path::Path::new(storage_root).join(".write-probe");
    tokio::fs::write(&probe, b"ok")
        .await
        .map_err(|e| anyhow::anyhow!("storage root {storage_root} is not writable: {e}"))?;
    let _ = tokio::fs::remove_file(&probe).await;
    info!(%storage_root, "storage root ready");
    Ok(())
}
