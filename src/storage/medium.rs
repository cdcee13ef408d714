//! Backing media a persistent store can write to.
//!
//! A medium is a flat string-to-string map with synchronous semantics.
//! Media are allowed to fail on any call; the store above them absorbs
//! those failures.

use crate::storage::error::MediumError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// String key to string value storage.
pub trait StorageMedium {
    /// Read a value, `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Delete a key. Deleting an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), MediumError>;

    /// Every key currently held, across all namespaces.
    fn keys(&self) -> Result<Vec<String>, MediumError>;
}

impl<M: StorageMedium + ?Sized> StorageMedium for Arc<M> {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), MediumError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        (**self).keys()
    }
}

/// In-memory medium.
///
/// Clones share the same underlying map, so several stores (or a store
/// and a test) can observe one medium.
#[derive(Clone, Debug, Default)]
pub struct MemoryMedium {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of keys plus values, in bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota: Some(quota),
        }
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageMedium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        let map = self
            .entries
            .read()
            .map_err(|_| MediumError::LockPoisoned("get"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| MediumError::LockPoisoned("set"))?;

        if let Some(quota) = self.quota {
            let others: usize = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let required = others + key.len() + value.len();
            if required > quota {
                return Err(MediumError::QuotaExceeded { required, quota });
            }
        }

        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), MediumError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| MediumError::LockPoisoned("remove"))?;
        map.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        let map = self
            .entries
            .read()
            .map_err(|_| MediumError::LockPoisoned("keys"))?;
        Ok(map.keys().cloned().collect())
    }
}

/// Medium backed by a single JSON object file.
///
/// Every write rewrites the whole file through a temporary sibling and
/// a rename, so a crash mid-write leaves the previous contents intact.
#[derive(Clone, Debug)]
pub struct JsonFileMedium {
    path: PathBuf,
}

impl JsonFileMedium {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, MediumError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| MediumError::Corrupt(e.to_string()))
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), MediumError> {
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| MediumError::Corrupt(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl StorageMedium for JsonFileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), MediumError> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        Ok(self.read_map()?.into_keys().collect())
    }
}

/// Medium that refuses every operation.
///
/// Stands in for storage that is disabled, such as a private browsing
/// session or a read-only sandbox.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableMedium;

impl StorageMedium for UnavailableMedium {
    fn get(&self, _key: &str) -> Result<Option<String>, MediumError> {
        Err(MediumError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), MediumError> {
        Err(MediumError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<(), MediumError> {
        Err(MediumError::Unavailable)
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        Err(MediumError::Unavailable)
    }
}
