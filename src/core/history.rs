//! Capped change history.
//!
//! Tracks accepted mutations of a counter in the order they happened.
//! Once the log holds more than its capacity, the oldest entries are
//! dropped first.

use super::action::Action;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Record of a single accepted mutation.
///
/// # Example
///
/// ```rust
/// use tally::core::{Action, HistoryEntry};
///
/// let entry = HistoryEntry::new(Action::Increment, 4.0, 5.0);
/// assert_eq!(entry.diff, 1.0);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The mutation that produced this change
    pub action: Action,
    /// Value before the mutation
    pub old_value: f64,
    /// Value after the mutation
    pub new_value: f64,
    /// `new_value - old_value`
    pub diff: f64,
    /// When the mutation was accepted
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(action: Action, old_value: f64, new_value: f64) -> Self {
        Self {
            action,
            old_value,
            new_value,
            diff: new_value - old_value,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, capped log of history entries.
///
/// Appending past `capacity` evicts from the front (FIFO), so the log
/// always holds the most recent `capacity` entries.
///
/// # Example
///
/// ```rust
/// use tally::core::{Action, HistoryEntry, HistoryLog};
///
/// let mut log = HistoryLog::with_capacity(2);
/// log.record(HistoryEntry::new(Action::Init, 0.0, 0.0));
/// log.record(HistoryEntry::new(Action::Increment, 0.0, 1.0));
///
/// let evicted = log.record(HistoryEntry::new(Action::Increment, 1.0, 2.0));
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(evicted.len(), 1);
/// assert_eq!(evicted[0].action, Action::Init);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    /// Create an empty log holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one; a log that can never hold
    /// anything would silently discard every mutation.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Rebuild a log from previously persisted entries.
    ///
    /// Only the newest `capacity` entries are kept.
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut log = Self::with_capacity(capacity);
        for entry in entries {
            log.record(entry);
        }
        log
    }

    /// Append an entry, returning whatever was evicted to respect the cap.
    pub fn record(&mut self, entry: HistoryEntry) -> Vec<HistoryEntry> {
        self.entries.push_back(entry);

        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.entries.pop_front() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    /// Remove every entry, keeping the capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Count entries tagged with `action`.
    pub fn count(&self, action: Action) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }

    /// Copy the entries out, oldest first.
    ///
    /// The returned vector is detached from the log; mutating it has no
    /// effect on the recorded history.
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}
