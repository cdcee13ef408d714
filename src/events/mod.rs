//! Synchronous change notifications.
//!
//! Listeners are registered per event name and invoked inline, in
//! registration order, by the component that owns the registry.

mod change;
mod registry;

pub use change::{ChangeEvent, EventName};
pub use registry::{Listener, SubscribeError, Subscribers, Subscription};
