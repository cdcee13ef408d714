//! Current value of a counter and when it last changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a counter's value.
///
/// This is also the payload persisted under a counter's value key,
/// serialized as `{"value": .., "lastUpdated": ..}`.
///
/// # Example
///
/// ```rust
/// use tally::core::CounterState;
///
/// let state = CounterState::new(3.0);
/// assert_eq!(state.value, 3.0);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterState {
    pub value: f64,
    pub last_updated: DateTime<Utc>,
}

impl CounterState {
    /// Create a state holding `value`, stamped with the current time.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            last_updated: Utc::now(),
        }
    }
}

/// Check that a candidate value or step amount can be applied.
///
/// `NaN` and the infinities are rejected; every other `f64` is accepted.
pub fn is_acceptable(value: f64) -> bool {
    value.is_finite()
}
