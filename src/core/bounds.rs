//! Inclusive numeric bounds for counter values.
//!
//! Bounds are pure values: clamping and containment checks have no
//! side effects and never fail.

use serde::{Deserialize, Serialize};

/// Largest integer an `f64` represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Smallest integer an `f64` represents exactly (-(2^53 - 1)).
pub const MIN_SAFE_INTEGER: f64 = -9_007_199_254_740_991.0;

/// Inclusive `[min, max]` range a counter value is clamped into.
///
/// # Example
///
/// ```rust
/// use tally::core::Bounds;
///
/// let bounds = Bounds::new(0.0, 10.0);
///
/// assert_eq!(bounds.clamp(15.0), 10.0);
/// assert_eq!(bounds.clamp(-3.0), 0.0);
/// assert_eq!(bounds.clamp(4.5), 4.5);
/// assert!(bounds.contains(10.0));
/// ```
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_value: f64,
    pub max_value: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_value: MIN_SAFE_INTEGER,
            max_value: MAX_SAFE_INTEGER,
        }
    }
}

impl Bounds {
    pub fn new(min_value: f64, max_value: f64) -> Self {
        Self {
            min_value,
            max_value,
        }
    }

    /// Clamp a candidate value into the range.
    ///
    /// Computed as `max(min, min(max, value))`, so an inverted range
    /// resolves to `min` instead of panicking the way `f64::clamp` would.
    pub fn clamp(&self, value: f64) -> f64 {
        self.min_value.max(self.max_value.min(value))
    }

    /// Check whether a value lies inside the range (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_value && value <= self.max_value
    }
}
