//! Mutation actions recorded against a counter.
//!
//! Every accepted change to a counter's value is tagged with the
//! action that produced it, both in the history log and in the
//! change notification delivered to subscribers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of mutation that produced a value change.
///
/// Actions serialize as lowercase strings (`"increment"`, `"reset"`, ...)
/// so persisted history stays readable.
///
/// # Example
///
/// ```rust
/// use tally::core::Action;
///
/// assert_eq!(Action::Increment.name(), "increment");
/// assert!(Action::Reset.is_counted());
/// assert!(!Action::Init.is_counted());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Baseline entry written when a counter is constructed
    Init,
    Increment,
    Decrement,
    Reset,
    Set,
    /// Direct call to the mutation primitive
    Update,
}

impl Action {
    /// Get the action's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Reset => "reset",
            Self::Set => "set",
            Self::Update => "update",
        }
    }

    /// Whether this action gets its own counter in history statistics.
    ///
    /// Only increments, decrements and resets are tallied; `set`, `update`
    /// and the `init` baseline are not.
    pub fn is_counted(&self) -> bool {
        matches!(self, Self::Increment | Self::Decrement | Self::Reset)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_name_returns_correct_value() {
        assert_eq!(Action::Init.name(), "init");
        assert_eq!(Action::Increment.name(), "increment");
        assert_eq!(Action::Decrement.name(), "decrement");
        assert_eq!(Action::Reset.name(), "reset");
        assert_eq!(Action::Set.name(), "set");
        assert_eq!(Action::Update.name(), "update");
    }

    #[test]
    fn only_step_and_reset_actions_are_counted() {
        assert!(Action::Increment.is_counted());
        assert!(Action::Decrement.is_counted());
        assert!(Action::Reset.is_counted());
        assert!(!Action::Init.is_counted());
        assert!(!Action::Set.is_counted());
        assert!(!Action::Update.is_counted());
    }

    #[test]
    fn action_serializes_lowercase() {
        let json = serde_json::to_string(&Action::Decrement).unwrap();
        assert_eq!(json, "\"decrement\"");

        let parsed: Action = serde_json::from_str("\"reset\"").unwrap();
        assert_eq!(parsed, Action::Reset);
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(Action::Set.to_string(), "set");
    }
}
