//! Best-effort persistence for counter state.
//!
//! A [`PersistentStore`] writes versioned JSON records under a private
//! namespace on a [`StorageMedium`]. The store degrades to a no-op when
//! the medium is missing or failing, so callers never have to handle a
//! persistence error.

pub mod error;
pub mod medium;
pub mod record;
pub mod store;

pub use error::{MediumError, StorageError};
pub use medium::{JsonFileMedium, MemoryMedium, StorageMedium, UnavailableMedium};
pub use record::{StoredRecord, RECORD_VERSION};
pub use store::{PersistentStore, StorageUsage, DEFAULT_NAMESPACE};
