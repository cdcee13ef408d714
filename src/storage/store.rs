//! Namespaced, fail-soft key/value store.

use crate::storage::error::StorageError;
use crate::storage::medium::StorageMedium;
use crate::storage::record::StoredRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Prefix applied to every key when no namespace is given
pub const DEFAULT_NAMESPACE: &str = "counter_app_";

const PROBE_SUFFIX: &str = "__probe__";

/// Diagnostic snapshot of a store and its medium.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    pub supported: bool,
    /// Keys held by the medium across every namespace
    pub total_keys: usize,
    /// Keys under this store's namespace
    pub namespace_key_count: usize,
    /// Sum of key and value lengths across the whole medium
    pub estimated_byte_size: usize,
}

/// Persistent key/value store with a private namespace.
///
/// Every operation is fail-soft: medium failures, serialization errors
/// and corrupt payloads are logged and turned into `false`, a default
/// value, or an empty result. Nothing here returns an error to the caller.
///
/// # Example
///
/// ```rust
/// use tally::storage::{MemoryMedium, PersistentStore};
///
/// let store = PersistentStore::new(MemoryMedium::new());
///
/// assert!(store.is_supported());
/// assert!(store.save("answer", &42));
/// assert_eq!(store.load("answer", 0), 42);
/// assert_eq!(store.load("missing", 7), 7);
/// ```
#[derive(Debug)]
pub struct PersistentStore<M: StorageMedium> {
    medium: M,
    namespace: String,
    supported: bool,
}

impl<M: StorageMedium> PersistentStore<M> {
    /// Create a store under [`DEFAULT_NAMESPACE`].
    pub fn new(medium: M) -> Self {
        Self::with_namespace(medium, DEFAULT_NAMESPACE)
    }

    /// Create a store whose keys are all prefixed with `namespace`.
    ///
    /// The medium is probed once here; the result holds for the
    /// store's whole lifetime.
    pub fn with_namespace(medium: M, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let supported = probe(&medium, &namespace);
        if !supported {
            tracing::warn!(
                namespace = %namespace,
                "storage medium unavailable, persistence disabled"
            );
        }

        Self {
            medium,
            namespace,
            supported,
        }
    }

    /// Whether the startup probe succeeded.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Persist `value` under `key`, wrapped in a versioned record.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => true,
            Err(err) => {
                self.report("save", key, &err);
                false
            }
        }
    }

    /// Load the value stored under `key`, or `default` when it is
    /// absent, unreadable, or the store is unsupported.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Load the value stored under `key`, `None` on any failure.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(err) => {
                self.report("load", key, &err);
                None
            }
        }
    }

    /// Delete `key` from this namespace.
    pub fn remove(&self, key: &str) -> bool {
        let result = self.ensure_supported().and_then(|()| {
            self.medium
                .remove(&self.full_key(key))
                .map_err(StorageError::from)
        });

        match result {
            Ok(()) => true,
            Err(err) => {
                self.report("remove", key, &err);
                false
            }
        }
    }

    /// Delete every key under this namespace, leaving other
    /// namespaces on the same medium untouched.
    pub fn clear(&self) -> bool {
        let keys = match self.try_namespace_keys() {
            Ok(keys) => keys,
            Err(err) => {
                self.report("clear", "*", &err);
                return false;
            }
        };

        let mut cleared = true;
        for key in keys {
            if let Err(err) = self.medium.remove(&key) {
                self.report("clear", &key, &StorageError::from(err));
                cleared = false;
            }
        }
        cleared
    }

    /// Keys under this namespace, with the prefix stripped.
    pub fn list_keys(&self) -> Vec<String> {
        match self.try_namespace_keys() {
            Ok(keys) => keys
                .iter()
                .filter_map(|k| k.strip_prefix(self.namespace.as_str()))
                .map(str::to_string)
                .collect(),
            Err(err) => {
                self.report("list_keys", "*", &err);
                Vec::new()
            }
        }
    }

    /// Diagnostic usage figures for this store and its medium.
    pub fn usage_info(&self) -> StorageUsage {
        match self.try_usage() {
            Ok(usage) => usage,
            Err(err) => {
                self.report("usage_info", "*", &err);
                StorageUsage {
                    supported: self.supported,
                    total_keys: 0,
                    namespace_key_count: 0,
                    estimated_byte_size: 0,
                }
            }
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    fn ensure_supported(&self) -> Result<(), StorageError> {
        if self.supported {
            Ok(())
        } else {
            Err(StorageError::Unsupported)
        }
    }

    fn try_save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.ensure_supported()?;
        let payload = StoredRecord::wrap(value).to_json()?;
        self.medium.set(&self.full_key(key), &payload)?;
        Ok(())
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.ensure_supported()?;
        let Some(raw) = self.medium.get(&self.full_key(key))? else {
            return Ok(None);
        };
        let record = StoredRecord::<T>::from_json(&raw)?;
        Ok(Some(record.value))
    }

    fn try_namespace_keys(&self) -> Result<Vec<String>, StorageError> {
        self.ensure_supported()?;
        Ok(self
            .medium
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(self.namespace.as_str()))
            .collect())
    }

    fn try_usage(&self) -> Result<StorageUsage, StorageError> {
        self.ensure_supported()?;
        let keys = self.medium.keys()?;

        let mut estimated_byte_size = 0;
        for key in &keys {
            let value_len = self.medium.get(key)?.map(|v| v.len()).unwrap_or(0);
            estimated_byte_size += key.len() + value_len;
        }

        let namespace_key_count = keys
            .iter()
            .filter(|k| k.starts_with(self.namespace.as_str()))
            .count();

        Ok(StorageUsage {
            supported: true,
            total_keys: keys.len(),
            namespace_key_count,
            estimated_byte_size,
        })
    }

    fn report(&self, operation: &'static str, key: &str, err: &StorageError) {
        match err {
            StorageError::Unsupported => {
                tracing::debug!(operation, key, namespace = %self.namespace, "storage unsupported, skipping");
            }
            _ => {
                tracing::warn!(operation, key, namespace = %self.namespace, error = %err, "storage operation failed");
            }
        }
    }
}

/// Write and delete a throwaway key to check the medium works.
fn probe<M: StorageMedium>(medium: &M, namespace: &str) -> bool {
    let key = format!("{}{}", namespace, PROBE_SUFFIX);
    medium.set(&key, PROBE_SUFFIX).is_ok() && medium.remove(&key).is_ok()
}
