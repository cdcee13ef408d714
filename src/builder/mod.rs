//! Builder API for counter configuration.
//!
//! Configurations are validated when built: every check runs and all
//! violations are reported together, instead of stopping at the first.

pub mod config;
pub mod error;

pub use config::{CounterConfig, CounterConfigBuilder, DEFAULT_MAX_HISTORY_LENGTH};
pub use error::{BuildError, ConfigViolation};
