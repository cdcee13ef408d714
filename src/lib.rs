//! Tally: a bounded counter core
//!
//! Tally owns the state behind a counter widget and nothing else. A UI
//! layer calls its mutators, subscribes to its change notifications,
//! and renders from them; rendering, input and accessibility stay with
//! the caller.
//!
//! # Core Concepts
//!
//! - **Counter**: [`BoundedCounter`] clamps, records, persists and notifies
//! - **History**: a capped, drop-oldest log of accepted mutations
//! - **Storage**: a namespaced, fail-soft [`PersistentStore`] over a
//!   pluggable [`StorageMedium`]
//! - **Events**: synchronous `change` notifications with unsubscribe tokens
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tally::builder::CounterConfig;
//! use tally::counter::BoundedCounter;
//! use tally::events::ChangeEvent;
//! use tally::storage::{MemoryMedium, PersistentStore};
//!
//! let medium = MemoryMedium::new();
//! let config = CounterConfig::builder()
//!     .bounds(0.0, 10.0)
//!     .max_history_length(2)
//!     .build()
//!     .unwrap();
//!
//! let mut counter = BoundedCounter::new(0.0, config.clone(), PersistentStore::new(medium.clone()));
//! counter.on_change(Arc::new(|event: &ChangeEvent| {
//!     println!("{} -> {} ({})", event.old_value, event.value, event.action);
//! }));
//!
//! counter.step_up();
//! counter.step_up();
//! counter.step_up();
//! assert_eq!(counter.value(), 3.0);
//! assert_eq!(counter.history().unwrap().len(), 2);
//!
//! // A new counter on the same medium picks up where the last one stopped
//! let restored = BoundedCounter::new(0.0, config, PersistentStore::new(medium));
//! assert_eq!(restored.value(), 3.0);
//! ```

pub mod builder;
pub mod core;
pub mod counter;
pub mod events;
pub mod storage;

// Re-export commonly used types
pub use builder::{BuildError, CounterConfig};
pub use crate::core::{Action, Bounds, CounterState, HistoryEntry, HistoryLog};
pub use counter::{BoundedCounter, CounterSnapshot, CounterStats};
pub use events::{ChangeEvent, EventName, Listener, Subscription};
pub use storage::{MemoryMedium, PersistentStore, StorageMedium};
