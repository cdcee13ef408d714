//! Versioned wrapper written around every persisted value.

use crate::storage::error::StorageError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Version identifier for the stored record format
pub const RECORD_VERSION: &str = "1.0";

/// Serializable envelope around a persisted value.
///
/// Stored as `{"value": .., "timestamp": .., "version": "1.0"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord<T> {
    /// The wrapped payload
    pub value: T,

    /// When the record was written
    pub timestamp: DateTime<Utc>,

    /// Record format version
    pub version: String,
}

impl<T> StoredRecord<T> {
    /// Wrap a value in a record stamped with the current time.
    pub fn wrap(value: T) -> Self {
        Self {
            value,
            timestamp: Utc::now(),
            version: RECORD_VERSION.to_string(),
        }
    }
}

impl<T: Serialize> StoredRecord<T> {
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::SerializationFailed(e.to_string()))
    }
}

impl<T: DeserializeOwned> StoredRecord<T> {
    /// Parse a record, rejecting payloads without the envelope shape
    /// and records written by another format version.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let record: Self = serde_json::from_str(raw)
            .map_err(|e| StorageError::DeserializationFailed(e.to_string()))?;

        if record.version != RECORD_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: record.version,
                supported: RECORD_VERSION,
            });
        }

        Ok(record)
    }
}
