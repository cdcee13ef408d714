//! Counter that clamps, records, persists and notifies.

use crate::builder::CounterConfig;
use crate::core::{is_acceptable, Action, CounterState, HistoryEntry, HistoryLog};
use crate::counter::stats::{CounterSnapshot, CounterStats, HistoryStats};
use crate::events::{ChangeEvent, EventName, Listener, SubscribeError, Subscribers, Subscription};
use crate::storage::{MemoryMedium, PersistentStore, StorageMedium};
use chrono::{DateTime, Utc};

/// Key the counter's `{value, lastUpdated}` is persisted under
pub const VALUE_KEY: &str = "value";

/// Key the counter's history entries are persisted under
pub const HISTORY_KEY: &str = "history";

/// A single numeric value with bounds, history and change notifications.
///
/// Every mutator funnels through [`BoundedCounter::update_value`]. An
/// accepted mutation updates the value, appends a history entry,
/// persists, and then notifies `change` listeners before returning, so
/// listeners always observe the new state.
///
/// # Example
///
/// ```rust
/// use tally::builder::CounterConfig;
/// use tally::counter::BoundedCounter;
///
/// let config = CounterConfig::builder().bounds(0.0, 3.0).build().unwrap();
/// let mut counter = BoundedCounter::in_memory(0.0, config);
///
/// counter.increment(2.0);
/// counter.increment(2.0);
///
/// assert_eq!(counter.value(), 3.0);
/// assert_eq!(counter.history().unwrap().len(), 3); // init + two increments
/// ```
#[derive(Debug)]
pub struct BoundedCounter<M: StorageMedium> {
    state: CounterState,
    config: CounterConfig,
    history: Option<HistoryLog>,
    subscribers: Subscribers,
    store: PersistentStore<M>,
}

impl BoundedCounter<MemoryMedium> {
    /// Create a counter persisting to a fresh in-memory medium.
    pub fn in_memory(initial: f64, config: CounterConfig) -> Self {
        Self::new(initial, config, PersistentStore::new(MemoryMedium::new()))
    }
}

impl<M: StorageMedium> BoundedCounter<M> {
    /// Create a counter starting at `initial`.
    ///
    /// With persistence enabled, a previously saved value (and history,
    /// when history is enabled) replaces the initial one; absent or
    /// malformed data is ignored. The starting value is then clamped if
    /// bounds validation is on, and an `init` entry seeds the history.
    pub fn new(initial: f64, config: CounterConfig, store: PersistentStore<M>) -> Self {
        let initial = if is_acceptable(initial) {
            initial
        } else {
            tracing::warn!(initial, "non-finite initial value, starting at 0");
            0.0
        };

        let mut state = CounterState::new(initial);
        if config.persist_value() {
            match store.get::<CounterState>(VALUE_KEY) {
                Some(saved) if is_acceptable(saved.value) => {
                    tracing::debug!(value = saved.value, "restored persisted counter value");
                    state = saved;
                }
                Some(saved) => {
                    tracing::warn!(value = saved.value, "ignoring non-finite persisted value");
                }
                None => {}
            }
        }

        if config.validate_bounds() {
            state.value = config.bounds().clamp(state.value);
        }

        let history = config.enable_history().then(|| {
            let previous = if config.persist_value() {
                store
                    .get::<Vec<HistoryEntry>>(HISTORY_KEY)
                    .unwrap_or_default()
            } else {
                Vec::new()
            };
            HistoryLog::from_entries(previous, config.max_history_length())
        });

        let mut counter = Self {
            state,
            config,
            history,
            subscribers: Subscribers::new(),
            store,
        };

        let start = counter.state.value;
        counter.record(HistoryEntry::new(Action::Init, start, start));
        counter
    }

    /// The single mutation primitive.
    ///
    /// Non-finite input is rejected. The candidate is clamped when bounds
    /// validation is on; if the result equals the current value the call
    /// is a no-op (no history, no persistence, no notification).
    /// Returns the value after the call.
    pub fn update_value(&mut self, new_value: f64, action: Action) -> f64 {
        if !is_acceptable(new_value) {
            tracing::warn!(action = %action, value = new_value, "rejecting non-finite value");
            return self.state.value;
        }

        let candidate = if self.config.validate_bounds() {
            self.config.bounds().clamp(new_value)
        } else {
            new_value
        };

        if candidate == self.state.value {
            tracing::trace!(action = %action, value = candidate, "value unchanged");
            return self.state.value;
        }

        let entry = HistoryEntry::new(action, self.state.value, candidate);
        let event = ChangeEvent::from(&entry);
        self.state = CounterState {
            value: candidate,
            last_updated: entry.timestamp,
        };

        self.record(entry);
        if self.config.persist_value() {
            self.store.save(VALUE_KEY, &self.state);
        }

        tracing::debug!(
            action = %action,
            old_value = event.old_value,
            value = event.value,
            "counter updated"
        );
        self.subscribers.notify(EventName::Change, &event);

        self.state.value
    }

    /// Add `amount` to the value.
    pub fn increment(&mut self, amount: f64) -> f64 {
        if !is_acceptable(amount) {
            tracing::warn!(amount, "rejecting non-finite increment");
            return self.state.value;
        }
        self.update_value(self.state.value + amount, Action::Increment)
    }

    /// Subtract `amount` from the value.
    pub fn decrement(&mut self, amount: f64) -> f64 {
        if !is_acceptable(amount) {
            tracing::warn!(amount, "rejecting non-finite decrement");
            return self.state.value;
        }
        self.update_value(self.state.value - amount, Action::Decrement)
    }

    /// Increment by one.
    pub fn step_up(&mut self) -> f64 {
        self.increment(1.0)
    }

    /// Decrement by one.
    pub fn step_down(&mut self) -> f64 {
        self.decrement(1.0)
    }

    pub fn reset(&mut self, value: f64) -> f64 {
        self.update_value(value, Action::Reset)
    }

    /// Reset to zero.
    pub fn reset_to_zero(&mut self) -> f64 {
        self.reset(0.0)
    }

    pub fn set_value(&mut self, value: f64) -> f64 {
        self.update_value(value, Action::Set)
    }

    pub fn value(&self) -> f64 {
        self.state.value
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.state.last_updated
    }

    pub fn state(&self) -> &CounterState {
        &self.state
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn store(&self) -> &PersistentStore<M> {
        &self.store
    }

    /// Register a listener by event name (`"change"` or `"error"`).
    ///
    /// Subscribing the same listener twice returns the original
    /// subscription. An unknown event name is a caller error.
    pub fn subscribe(
        &mut self,
        event: &str,
        listener: Listener,
    ) -> Result<Subscription, SubscribeError> {
        let event: EventName = event.parse()?;
        Ok(self.subscribers.subscribe(event, listener))
    }

    /// Register a `change` listener.
    pub fn on_change(&mut self, listener: Listener) -> Subscription {
        self.subscribers.subscribe(EventName::Change, listener)
    }

    /// Remove a subscription. Safe to call more than once.
    pub fn unsubscribe(&mut self, subscription: &Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    /// Remove `listener` from `event`, the counterpart of [`Self::subscribe`].
    pub fn remove_listener(
        &mut self,
        event: &str,
        listener: &Listener,
    ) -> Result<bool, SubscribeError> {
        let event: EventName = event.parse()?;
        Ok(self.subscribers.remove_listener(event, listener))
    }

    pub fn listener_count(&self, event: EventName) -> usize {
        self.subscribers.listener_count(event)
    }

    /// Copy of the history, oldest first; `None` when history is disabled.
    pub fn history(&self) -> Option<Vec<HistoryEntry>> {
        self.history.as_ref().map(HistoryLog::to_vec)
    }

    /// Empty the history log, also deleting the persisted copy.
    /// Returns `false` when history is disabled.
    pub fn clear_history(&mut self) -> bool {
        let Some(history) = self.history.as_mut() else {
            return false;
        };

        history.clear();
        if self.config.persist_value() {
            self.store.remove(HISTORY_KEY);
        }
        true
    }

    pub fn stats(&self) -> CounterStats {
        CounterStats {
            value: self.state.value,
            last_updated: self.state.last_updated,
            min_value: self.config.min_value(),
            max_value: self.config.max_value(),
            history_enabled: self.config.enable_history(),
            persistence_enabled: self.config.persist_value(),
            history: self.history.as_ref().map(HistoryStats::from_log),
        }
    }

    pub fn export_snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            value: self.state.value,
            last_updated: self.state.last_updated,
            config: self.config.clone(),
            history: self.history(),
            stats: self.stats(),
        }
    }

    /// Tear the counter down.
    ///
    /// Drops every listener and the in-memory history; with persistence
    /// enabled the value and history keys are deleted as well.
    pub fn destroy(mut self) {
        self.subscribers.clear();
        if let Some(history) = self.history.as_mut() {
            history.clear();
        }

        if self.config.persist_value() {
            self.store.remove(VALUE_KEY);
            self.store.remove(HISTORY_KEY);
        }
        tracing::debug!(namespace = self.store.namespace(), "counter destroyed");
    }

    fn record(&mut self, entry: HistoryEntry) {
        let Some(history) = self.history.as_mut() else {
            return;
        };

        history.record(entry);
        if self.config.persist_value() {
            self.store.save(HISTORY_KEY, &history.to_vec());
        }
    }
}
