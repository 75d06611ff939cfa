//! Durable key-value stores for layout blobs
//!
//! The overlay keeps its whole layout under a single key, so a store only
//! has to move strings in and out. Three backends:
//!
//! - [`MemoryLayoutStore`]: process-local, cheap to clone (shared map)
//! - [`FileLayoutStore`]: one JSON file per key in a directory
//! - [`SledLayoutStore`]: embedded sled database

use anyhow::Context;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{LayoutBackend, LayoutConfig};

/// Layout store errors
#[derive(Debug, Error)]
pub enum LayoutStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Stored value for {key:?} is not valid UTF-8")]
    Encoding { key: String },
}

/// Durable client-side key-value store
pub trait LayoutStore {
    fn get(&self, key: &str) -> Result<Option<String>, LayoutStoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), LayoutStoreError>;
    fn remove(&self, key: &str) -> Result<(), LayoutStoreError>;
}

/// In-memory store
///
/// Clones share the same map, so a test (or a second overlay) can observe
/// what another owner wrote.
#[derive(Clone, Default)]
pub struct MemoryLayoutStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn get(&self, key: &str) -> Result<Option<String>, LayoutStoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LayoutStoreError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LayoutStoreError> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// Store keeping each key in `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileLayoutStore {
    dir: PathBuf,
}

impl FileLayoutStore {
    /// Create the store, creating `dir` if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LayoutStoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| LayoutStoreError::Io {
            path: dir.clone(),
            source,
        })?;
        debug!("File layout store at {}", dir.display());
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }
}

impl LayoutStore for FileLayoutStore {
    fn get(&self, key: &str) -> Result<Option<String>, LayoutStoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LayoutStoreError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LayoutStoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| LayoutStoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| LayoutStoreError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), LayoutStoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(LayoutStoreError::Io { path, source }),
        }
    }
}

/// Store backed by an embedded sled database
#[derive(Clone)]
pub struct SledLayoutStore {
    db: sled::Db,
}

impl SledLayoutStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LayoutStoreError> {
        let db = sled::open(path.as_ref())?;
        info!("Layout database opened at: {}", path.as_ref().display());
        Ok(Self { db })
    }
}

impl LayoutStore for SledLayoutStore {
    fn get(&self, key: &str) -> Result<Option<String>, LayoutStoreError> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| LayoutStoreError::Encoding {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LayoutStoreError> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LayoutStoreError> {
        self.db.remove(key.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}

/// Open the store selected by the configuration
///
/// `default_dir` is used when the configuration does not name a path.
pub fn open_layout_store(
    config: &LayoutConfig,
    default_dir: &Path,
) -> anyhow::Result<Box<dyn LayoutStore>> {
    let dir = config.path.clone().unwrap_or_else(|| default_dir.to_path_buf());

    let store: Box<dyn LayoutStore> = match config.backend {
        LayoutBackend::Memory => Box::new(MemoryLayoutStore::new()),
        LayoutBackend::File => Box::new(
            FileLayoutStore::open(&dir)
                .with_context(|| format!("Failed to open layout directory: {}", dir.display()))?,
        ),
        LayoutBackend::Sled => Box::new(
            SledLayoutStore::open(&dir)
                .with_context(|| format!("Failed to open layout database: {}", dir.display()))?,
        ),
    };

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(store: &dyn LayoutStore) {
        assert_eq!(store.get("layout").unwrap(), None);

        store.set("layout", r#"{"btn-a":{}}"#).unwrap();
        assert_eq!(store.get("layout").unwrap().as_deref(), Some(r#"{"btn-a":{}}"#));

        store.set("layout", "{}").unwrap();
        assert_eq!(store.get("layout").unwrap().as_deref(), Some("{}"));

        store.remove("layout").unwrap();
        assert_eq!(store.get("layout").unwrap(), None);

        // Removing twice is fine
        store.remove("layout").unwrap();
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryLayoutStore::new());
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let a = MemoryLayoutStore::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store() {
        let dir = TempDir::new().unwrap();
        let store = FileLayoutStore::open(dir.path().join("layouts")).unwrap();
        exercise(&store);
    }

    #[test]
    fn test_file_store_sanitizes_key() {
        let dir = TempDir::new().unwrap();
        let store = FileLayoutStore::open(dir.path()).unwrap();
        store.set("../escape/key", "x").unwrap();
        assert!(dir.path().join("___escape_key.json").exists());
        assert_eq!(store.get("../escape/key").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_sled_store() {
        let dir = TempDir::new().unwrap();
        let store = SledLayoutStore::open(dir.path().join("layout.sled")).unwrap();
        exercise(&store);
    }

    #[test]
    fn test_open_from_config() {
        let dir = TempDir::new().unwrap();
        let config = LayoutConfig {
            backend: LayoutBackend::File,
            ..Default::default()
        };
        let store = open_layout_store(&config, dir.path()).unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
