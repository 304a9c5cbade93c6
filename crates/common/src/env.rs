//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::info;

/// Create `dir` (and parents) if missing. Returns whether it had to be created.
pub async fn ensure_dir(dir: &Path) -> anyhow::Result<bool> {
    if tokio::fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false) {
        return Ok(false);
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    info!(dir = %dir.display(), "created directory");
    Ok(true)
}

/// Ensure the uploads and data directories exist.
pub async fn ensure_env(uploads_dir: &Path, data_dir: &Path) -> anyhow::Result<()> {
    ensure_dir(uploads_dir).await?;
    ensure_dir(data_dir).await?;
    Ok(())
}
