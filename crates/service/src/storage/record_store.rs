use std::path::{Path, PathBuf};

use models::Record;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid collection name {0:?}")]
    InvalidName(String),
    #[error("cannot serialize {collection}: {source}")]
    Serialize {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

/// Outcome of [`RecordStore::ensure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    /// File was present and held a valid array.
    Existing,
    /// File was missing and has been created as `[]`.
    Created,
    /// File was empty or corrupt and has been reset to `[]`.
    Reset,
}

enum FileState {
    Missing,
    Empty,
    Valid(Vec<Record>),
    Corrupt(serde_json::Error),
    Unreadable(std::io::Error),
}

/// JSON-array file store rooted at a data directory.
///
/// Each collection lives in `<data_dir>/<name>.json`. Nothing is cached:
/// every `load` reads the file and every `save` rewrites it. There is no
/// locking, so two writers interleaving load/save will lose one update.
#[derive(Clone, Debug)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path { &self.data_dir }

    /// File backing `collection`. Names are limited to `[A-Za-z0-9_-]+`.
    pub fn path_for(&self, collection: &str) -> Result<PathBuf, StoreError> {
        let valid = !collection.is_empty()
            && collection.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidName(collection.to_string()));
        }
        Ok(self.data_dir.join(format!("{collection}.json")))
    }

    /// Read the whole collection.
    ///
    /// Never fails: a missing, blank or corrupt file is logged, rewritten as
    /// `[]` and reported as empty. An unreadable file is reported as empty
    /// and left alone.
    pub async fn load(&self, collection: &str) -> Vec<Record> {
        let path = match self.path_for(collection) {
            Ok(p) => p,
            Err(e) => {
                error!(collection, error = %e, "load rejected");
                return Vec::new();
            }
        };
        match read_state(&path).await {
            FileState::Valid(records) => {
                debug!(collection, count = records.len(), "collection loaded");
                records
            }
            FileState::Missing | FileState::Empty => {
                if let Err(e) = self.save(collection, &[]).await {
                    error!(collection, error = %e, "cannot initialize collection file");
                }
                Vec::new()
            }
            FileState::Corrupt(e) => {
                error!(collection, path = %path.display(), error = %e, "invalid collection file, resetting to []");
                if let Err(e) = self.save(collection, &[]).await {
                    error!(collection, error = %e, "cannot reset collection file");
                }
                Vec::new()
            }
            FileState::Unreadable(e) => {
                error!(collection, path = %path.display(), error = %e, "cannot read collection file");
                Vec::new()
            }
        }
    }

    /// Overwrite the collection with `records`, pretty-printed.
    ///
    /// Writes a sibling temp file and renames it over the target so a failed
    /// write leaves the previous contents in place.
    pub async fn save(&self, collection: &str, records: &[Record]) -> Result<(), StoreError> {
        let path = self.path_for(collection)?;
        let data = serde_json::to_vec_pretty(records)
            .map_err(|source| StoreError::Serialize { collection: collection.to_string(), source })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| StoreError::io(parent, e))?;
        }
        let tmp = path.with_extension(format!("json.tmp-{}", uuid::Uuid::new_v4().simple()));
        if let Err(e) = fs::write(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::io(&path, e));
        }
        debug!(collection, count = records.len(), "collection saved");
        Ok(())
    }

    /// Strict variant of `load` used at startup: make sure the file exists and
    /// holds a JSON array, surfacing any failure to do so.
    pub async fn ensure(&self, collection: &str) -> Result<Ensured, StoreError> {
        let path = self.path_for(collection)?;
        match read_state(&path).await {
            FileState::Valid(_) => Ok(Ensured::Existing),
            FileState::Missing => {
                self.save(collection, &[]).await?;
                info!(collection, path = %path.display(), "created collection file");
                Ok(Ensured::Created)
            }
            FileState::Empty => {
                self.save(collection, &[]).await?;
                info!(collection, path = %path.display(), "reset empty collection file");
                Ok(Ensured::Reset)
            }
            FileState::Corrupt(e) => {
                warn!(collection, path = %path.display(), error = %e, "invalid collection file, resetting to []");
                self.save(collection, &[]).await?;
                Ok(Ensured::Reset)
            }
            FileState::Unreadable(e) => Err(StoreError::io(&path, e)),
        }
    }
}

async fn read_state(path: &Path) -> FileState {
    let bytes = match fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return FileState::Missing,
        Err(e) => return FileState::Unreadable(e),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return FileState::Empty;
    }
    match serde_json::from_slice::<Vec<Record>>(&bytes) {
        Ok(records) => FileState::Valid(records),
        Err(e) => FileState::Corrupt(e),
    }
}
