//! Key-value stores backing session persistence.
//!
//! File-backed storage lives in `~/.config/chatiq/storage.yaml` by default:
//! a flat YAML map of string keys to string values, rewritten atomically on
//! every mutation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chatiq_config::WidgetConfig;
use thiserror::Error;

use crate::traits::KeyValueStore;

/// Errors raised by a [`KeyValueStore`] implementation
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but does not contain a valid key-value map.
    #[error("storage file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The store refused the operation (disabled, quota exceeded, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

// ── MemoryStore ─────────────────────────────────────────────────────────────

/// Volatile store; also the fallback once durable storage has failed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry (simulates the user clearing site data)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ── FileStore ───────────────────────────────────────────────────────────────

/// Durable store persisted as a YAML map
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Default storage file location (XDG convention)
    pub fn default_path() -> PathBuf {
        WidgetConfig::config_dir().join("storage.yaml")
    }

    /// Open the store at `path`.
    ///
    /// A missing or empty file yields an empty store. A corrupt file is an
    /// error so the caller can decide whether to fall back to memory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = Self::read_entries(&path)?;
        log::info!(
            "[storage] Opened {:?} ({} entries)",
            path,
            entries.len()
        );
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_yaml_ng::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    fn persist(&self) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let yaml = serde_yaml_ng::to_string(&self.entries).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = self.path.with_extension("yaml.tmp");
        std::fs::write(&temp_path, yaml).map_err(io_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_err)?;
        Ok(())
    }

    /// Remove the backing file and all entries
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|source| StorageError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            // Keep the in-memory map consistent with what is on disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if let Some(old) = self.entries.remove(key)
            && let Err(e) = self.persist()
        {
            self.entries.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(())
    }
}
