//! Preference persistence backends
//!
//! A backend maps storage keys (see [`PreferenceKey::storage_key`]) to
//! values. Each write covers exactly one key and either fully happens or
//! leaves the previous value in place.
//!
//! [`PreferenceKey::storage_key`]: crate::keys::PreferenceKey::storage_key

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, PersistenceResult};
use crate::keys::PrefValue;

/// Key/value storage for preferences
pub trait PreferenceBackend {
    /// Stored value, if any
    fn read(&self, key: &str) -> Option<PrefValue>;

    /// Store one value
    fn write(&mut self, key: &str, value: PrefValue) -> PersistenceResult<()>;

    /// Remove one value so reads fall back to the default
    fn remove(&mut self, key: &str) -> PersistenceResult<()>;
}

/// In-process backend
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: PrefValue) -> PersistenceResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Backend storing a flat JSON object on disk
///
/// The whole object is rewritten through a temporary sibling file and an
/// atomic rename. The in-memory copy only changes once the rename succeeds.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    values: BTreeMap<String, PrefValue>,
}

impl JsonFileBackend {
    /// Open `path`, starting empty when the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> PersistenceResult<Self> {
        let path = path.into();

        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| PersistenceError::Corrupted {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
        } else {
            tracing::debug!("preference file {} not found, starting empty", path.display());
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&mut self, values: BTreeMap<String, PrefValue>) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        self.values = values;
        Ok(())
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn read(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: PrefValue) -> PersistenceResult<()> {
        let mut values = self.values.clone();
        values.insert(key.to_string(), value);
        self.commit(values).map_err(|e| PersistenceError::WriteFailed {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        if !self.values.contains_key(key) {
            return Ok(());
        }
        let mut values = self.values.clone();
        values.remove(key);
        self.commit(values)
    }
}
