//! Counter configuration and its fluent builder.

use crate::builder::error::{BuildError, ConfigViolation};
use crate::core::{Bounds, MAX_SAFE_INTEGER, MIN_SAFE_INTEGER};
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Default cap on the number of history entries kept
pub const DEFAULT_MAX_HISTORY_LENGTH: usize = 100;

/// Immutable configuration of a bounded counter.
///
/// Every option has a stated default; see [`CounterConfig::default`].
/// Fields are private so a config can only be obtained through
/// validation (the builder or [`CounterConfig::from_json`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CounterConfig {
    min_value: f64,
    max_value: f64,
    persist_value: bool,
    validate_bounds: bool,
    enable_history: bool,
    max_history_length: usize,
}

impl Default for CounterConfig {
    /// Safe-integer bounds, persistence, bounds validation and history
    /// all enabled, history capped at 100 entries.
    fn default() -> Self {
        Self {
            min_value: MIN_SAFE_INTEGER,
            max_value: MAX_SAFE_INTEGER,
            persist_value: true,
            validate_bounds: true,
            enable_history: true,
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
        }
    }
}

impl CounterConfig {
    /// Start a builder from the defaults.
    pub fn builder() -> CounterConfigBuilder {
        CounterConfigBuilder::new()
    }

    /// Parse a JSON configuration object.
    ///
    /// Missing options take their defaults; unknown options are an error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tally::builder::CounterConfig;
    ///
    /// let config = CounterConfig::from_json(r#"{"minValue": 0, "maxValue": 10}"#).unwrap();
    /// assert_eq!(config.max_value(), 10.0);
    /// assert!(config.persist_value());
    ///
    /// assert!(CounterConfig::from_json(r#"{"colour": "red"}"#).is_err());
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, BuildError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| BuildError::Parse(e.to_string()))?;
        config.checked()
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.min_value, self.max_value)
    }

    pub fn persist_value(&self) -> bool {
        self.persist_value
    }

    pub fn validate_bounds(&self) -> bool {
        self.validate_bounds
    }

    pub fn enable_history(&self) -> bool {
        self.enable_history
    }

    pub fn max_history_length(&self) -> usize {
        self.max_history_length
    }

    /// Run every check, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        // Inverted only makes sense to report once both ends are numbers
        let inverted = self.min_value.is_finite()
            && self.max_value.is_finite()
            && self.min_value > self.max_value;
        let ordering = if inverted {
            Validation::fail(ConfigViolation::InvertedBounds {
                min: self.min_value,
                max: self.max_value,
            })
        } else {
            Validation::success(())
        };

        let history = if self.max_history_length == 0 {
            Validation::fail(ConfigViolation::ZeroHistoryLength)
        } else {
            Validation::success(())
        };

        let checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = vec![
            finite_bound("minValue", self.min_value),
            finite_bound("maxValue", self.max_value),
            ordering,
            history,
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    fn checked(self) -> Result<Self, BuildError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(violations) => Err(BuildError::InvalidConfig {
                violations: violations.iter().cloned().collect(),
            }),
        }
    }
}

fn finite_bound(name: &'static str, value: f64) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if value.is_finite() {
        Validation::success(())
    } else {
        Validation::fail(ConfigViolation::NonFiniteBound { name, value })
    }
}

/// Builder for counter configurations with a fluent API.
///
/// # Example
///
/// ```rust
/// use tally::builder::CounterConfig;
///
/// let config = CounterConfig::builder()
///     .bounds(0.0, 10.0)
///     .max_history_length(2)
///     .persist_value(false)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.min_value(), 0.0);
/// assert_eq!(config.max_history_length(), 2);
/// assert!(!config.persist_value());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CounterConfigBuilder {
    config: CounterConfig,
}

impl CounterConfigBuilder {
    /// Create a new builder seeded with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_value(mut self, min: f64) -> Self {
        self.config.min_value = min;
        self
    }

    pub fn max_value(mut self, max: f64) -> Self {
        self.config.max_value = max;
        self
    }

    /// Set both bounds at once (inclusive).
    pub fn bounds(self, min: f64, max: f64) -> Self {
        self.min_value(min).max_value(max)
    }

    /// Persist the value (and history) after every accepted mutation.
    pub fn persist_value(mut self, enabled: bool) -> Self {
        self.config.persist_value = enabled;
        self
    }

    /// Clamp mutations into the configured bounds.
    pub fn validate_bounds(mut self, enabled: bool) -> Self {
        self.config.validate_bounds = enabled;
        self
    }

    pub fn enable_history(mut self, enabled: bool) -> Self {
        self.config.enable_history = enabled;
        self
    }

    pub fn max_history_length(mut self, length: usize) -> Self {
        self.config.max_history_length = length;
        self
    }

    /// Build the configuration.
    /// Returns every violation found, not just the first.
    pub fn build(self) -> Result<CounterConfig, BuildError> {
        self.config.checked()
    }
}
