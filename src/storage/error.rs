//! Storage error types.

use thiserror::Error;

/// Errors raised by a backing storage medium
#[derive(Debug, Error)]
pub enum MediumError {
    /// The medium is disabled or missing entirely
    #[error("Storage medium is unavailable")]
    Unavailable,

    /// A write would push the medium past its size limit
    #[error("Storage quota exceeded: {required} bytes required, {quota} allowed")]
    QuotaExceeded { required: usize, quota: usize },

    /// Reading or writing the underlying file failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The medium's own contents could not be decoded
    #[error("Storage contents are corrupt: {0}")]
    Corrupt(String),

    #[error("Storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// Errors that can occur inside a persistent store.
///
/// These never cross the store's public API; every operation logs them
/// and degrades to a boolean or default-value result.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The startup probe failed, so the store is a no-op
    #[error("Storage is not supported by the backing medium")]
    Unsupported,

    #[error(transparent)]
    Medium(#[from] MediumError),

    /// Serialization to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// The stored payload is not valid JSON or lacks the record shape
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// The stored record was written by an incompatible format version
    #[error("Unsupported record version {found}, supported: {supported}")]
    UnsupportedVersion {
        found: String,
        supported: &'static str,
    },
}
