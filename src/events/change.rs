//! Event names and payloads delivered to subscribers.

use crate::core::{Action, HistoryEntry};
use crate::events::registry::SubscribeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names a subscriber can register against.
///
/// `Error` is reserved: listeners can be registered for it, but no
/// counter operation currently emits it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum EventName {
    Change,
    Error,
}

impl EventName {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Error => "error",
        }
    }
}

impl FromStr for EventName {
    type Err = SubscribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "change" => Ok(Self::Change),
            "error" => Ok(Self::Error),
            other => Err(SubscribeError::UnknownEvent(other.to_string())),
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Notification payload for one accepted mutation.
///
/// Built fresh for every change and handed to listeners by reference;
/// nothing retains it afterwards.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// The counter's value after the mutation
    pub value: f64,
    pub old_value: f64,
    pub action: Action,
    pub timestamp: DateTime<Utc>,
    /// `value - old_value`
    pub diff: f64,
}

impl From<&HistoryEntry> for ChangeEvent {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            value: entry.new_value,
            old_value: entry.old_value,
            action: entry.action,
            timestamp: entry.timestamp,
            diff: entry.diff,
        }
    }
}
