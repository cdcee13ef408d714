//! Subscriber registry keyed by event name.

use crate::events::change::{ChangeEvent, EventName};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Callback invoked with each change notification.
pub type Listener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Errors raised synchronously to a subscribing caller
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubscribeError {
    #[error("Unknown event name '{0}', expected 'change' or 'error'")]
    UnknownEvent(String),
}

/// Capability token returned by a subscription.
///
/// Handing the token back to the registry removes exactly that
/// registration; no comparison of callbacks is involved.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    event: EventName,
    id: Uuid,
}

impl Subscription {
    pub fn event(&self) -> EventName {
        self.event
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

struct Registration {
    id: Uuid,
    listener: Listener,
}

/// Listeners grouped by event name, each group in registration order.
///
/// Within one event a listener is registered at most once: subscribing
/// the same `Arc` again hands back the existing subscription.
#[derive(Default)]
pub struct Subscribers {
    registrations: BTreeMap<EventName, Vec<Registration>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event`.
    pub fn subscribe(&mut self, event: EventName, listener: Listener) -> Subscription {
        let group = self.registrations.entry(event).or_default();

        if let Some(existing) = group
            .iter()
            .find(|r| Arc::ptr_eq(&r.listener, &listener))
        {
            return Subscription {
                event,
                id: existing.id,
            };
        }

        let id = Uuid::new_v4();
        group.push(Registration { id, listener });
        Subscription { event, id }
    }

    /// Remove the registration behind `subscription`.
    ///
    /// Returns `false` when it was already removed, so repeated calls
    /// are harmless.
    pub fn unsubscribe(&mut self, subscription: &Subscription) -> bool {
        self.remove_where(subscription.event, |r| r.id == subscription.id)
    }

    /// Remove `listener` from `event` by identity.
    pub fn remove_listener(&mut self, event: EventName, listener: &Listener) -> bool {
        self.remove_where(event, |r| Arc::ptr_eq(&r.listener, listener))
    }

    /// Deliver `data` to every listener of `event`, in registration order.
    ///
    /// A panicking listener is caught and logged; the remaining listeners
    /// still run and the panic never reaches the caller. Returns how many
    /// listeners completed normally.
    pub fn notify(&self, event: EventName, data: &ChangeEvent) -> usize {
        let Some(group) = self.registrations.get(&event) else {
            return 0;
        };

        let mut delivered = 0;
        for registration in group {
            let listener = &registration.listener;
            match panic::catch_unwind(AssertUnwindSafe(|| listener(data))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    tracing::error!(
                        event = %event,
                        subscription = %registration.id,
                        panic = panic_message(payload.as_ref()),
                        "listener panicked during notification"
                    );
                }
            }
        }
        delivered
    }

    pub fn listener_count(&self, event: EventName) -> usize {
        self.registrations.get(&event).map_or(0, Vec::len)
    }

    /// Drop every registration for every event.
    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    fn remove_where<F>(&mut self, event: EventName, predicate: F) -> bool
    where
        F: Fn(&Registration) -> bool,
    {
        let Some(group) = self.registrations.get_mut(&event) else {
            return false;
        };

        let Some(index) = group.iter().position(predicate) else {
            return false;
        };

        group.remove(index);
        if group.is_empty() {
            self.registrations.remove(&event);
        }
        true
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .registrations
            .iter()
            .map(|(event, group)| (event.name(), group.len()))
            .collect();
        f.debug_struct("Subscribers")
            .field("listeners", &counts)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
