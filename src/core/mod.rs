//! Core counter value types.
//!
//! This module contains the pure building blocks shared by the counter
//! and its persistence layer:
//! - The counter's value and timestamp
//! - Mutation actions
//! - Inclusive bounds and clamping
//! - The capped history log
//!
//! Nothing in this module performs I/O or logging.

mod action;
mod bounds;
mod history;
mod state;

pub use action::Action;
pub use bounds::{Bounds, MAX_SAFE_INTEGER, MIN_SAFE_INTEGER};
pub use history::{HistoryEntry, HistoryLog};
pub use state::{is_acceptable, CounterState};
