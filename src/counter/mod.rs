//! The bounded counter and its read-only summaries.

mod bounded;
mod stats;

pub use bounded::{BoundedCounter, HISTORY_KEY, VALUE_KEY};
pub use stats::{CounterSnapshot, CounterStats, HistoryStats};
