//! Read-only summaries of a counter.

use crate::builder::CounterConfig;
use crate::core::{Action, HistoryEntry, HistoryLog};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-action tallies over the current history log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_entries: usize,
    pub increments: usize,
    pub decrements: usize,
    pub resets: usize,
}

impl HistoryStats {
    pub fn from_log(log: &HistoryLog) -> Self {
        Self {
            total_entries: log.len(),
            increments: log.count(Action::Increment),
            decrements: log.count(Action::Decrement),
            resets: log.count(Action::Reset),
        }
    }
}

/// Summary of a counter's value, bounds and enabled features.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterStats {
    pub value: f64,
    pub last_updated: DateTime<Utc>,
    pub min_value: f64,
    pub max_value: f64,
    pub history_enabled: bool,
    pub persistence_enabled: bool,
    /// Present only when history is enabled
    pub history: Option<HistoryStats>,
}

/// Full point-in-time dump of a counter, for diagnostics or export.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    pub value: f64,
    pub last_updated: DateTime<Utc>,
    pub config: CounterConfig,
    pub history: Option<Vec<HistoryEntry>>,
    pub stats: CounterStats,
}
