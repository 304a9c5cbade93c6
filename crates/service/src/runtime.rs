//! Startup bootstrap
//!
//! Creates the uploads and data directories and makes sure every collection
//! file exists with valid JSON before the server accepts requests. Unlike
//! request-time loads, any failure here is returned to the caller.

use configs::StorageConfig;
use models::{employee, user};
use tracing::info;

use crate::storage::{Ensured, RecordStore};

pub const COLLECTIONS: [&str; 2] = [user::COLLECTION, employee::COLLECTION];

/// Directories and collection files, ready for use. Returns the store.
pub async fn bootstrap(storage: &StorageConfig) -> anyhow::Result<RecordStore> {
    common::env::ensure_env(&storage.uploads_dir, &storage.data_dir).await?;
    let store = RecordStore::new(&storage.data_dir);
    for collection in COLLECTIONS {
        let outcome = store
            .ensure(collection)
            .await
            .map_err(|e| anyhow::anyhow!("cannot prepare {collection} collection: {e}"))?;
        if outcome != Ensured::Existing {
            info!(collection, ?outcome, "collection file prepared");
        }
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (StorageConfig, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("svc_bootstrap_{}", uuid::Uuid::new_v4()));
        let cfg = StorageConfig { data_dir: root.join("data"), uploads_dir: root.join("uploads") };
        (cfg, root)
    }

    #[tokio::test]
    async fn bootstrap_creates_dirs_and_empty_collections() -> anyhow::Result<()> {
        let (cfg, root) = temp_storage();
        bootstrap(&cfg).await?;
        assert!(tokio::fs::metadata(&cfg.uploads_dir).await?.is_dir());
        for c in COLLECTIONS {
            let text = tokio::fs::read_to_string(cfg.data_dir.join(format!("{c}.json"))).await?;
            assert_eq!(text, "[]");
        }
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_repairs_corrupt_file_and_keeps_valid_one() -> anyhow::Result<()> {
        let (cfg, root) = temp_storage();
        tokio::fs::create_dir_all(&cfg.data_dir).await?;
        tokio::fs::write(cfg.data_dir.join("users.json"), "{broken").await?;
        tokio::fs::write(cfg.data_dir.join("employees.json"), "[{\"_id\": \"e1\"}]").await?;
        let store = bootstrap(&cfg).await?;
        assert!(store.load("users").await.is_empty());
        assert_eq!(store.load("employees").await.len(), 1);
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_fails_when_data_dir_cannot_be_created() -> anyhow::Result<()> {
        let (mut cfg, root) = temp_storage();
        tokio::fs::create_dir_all(&root).await?;
        let blocker = root.join("blocker");
        tokio::fs::write(&blocker, b"file").await?;
        cfg.data_dir = blocker.join("data");
        assert!(bootstrap(&cfg).await.is_err());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
