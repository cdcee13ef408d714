//! Errors for counter configuration building.

use thiserror::Error;

/// A single problem found while validating a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("Bound `{name}` must be finite (got {value})")]
    NonFiniteBound { name: &'static str, value: f64 },

    #[error("Minimum ({min}) is greater than maximum ({max})")]
    InvertedBounds { min: f64, max: f64 },

    #[error("History length must be at least 1")]
    ZeroHistoryLength,
}

/// Errors that can occur when building a counter configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    /// One or more validation checks failed; all of them are reported
    #[error("Invalid counter configuration ({} violation(s))", .violations.len())]
    InvalidConfig { violations: Vec<ConfigViolation> },

    /// JSON configuration was malformed or named an unknown option
    #[error("Counter configuration could not be parsed: {0}")]
    Parse(String),
}
