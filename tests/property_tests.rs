//! Property-based tests for the bounded counter.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tally::builder::CounterConfig;
use tally::core::{Action, HistoryEntry, HistoryLog};
use tally::counter::BoundedCounter;
use tally::events::{ChangeEvent, Listener};
use tally::storage::{MemoryMedium, PersistentStore};

fn config(min: f64, max: f64) -> CounterConfig {
    CounterConfig::builder()
        .bounds(min, max)
        .persist_value(false)
        .build()
        .unwrap()
}

fn counting_listener(calls: &Arc<AtomicUsize>) -> Listener {
    let calls = Arc::clone(calls);
    Arc::new(move |_: &ChangeEvent| {
        calls.fetch_add(1, Ordering::SeqCst);
    })
}

prop_compose! {
    fn arbitrary_bounds()(min in -1_000i32..=0, span in 1i32..2_000) -> (f64, f64) {
        (min as f64, (min + span) as f64)
    }
}

prop_compose! {
    fn bounds_and_inner_value()(bounds in arbitrary_bounds())
        (value in (bounds.0 as i64)..=(bounds.1 as i64), bounds in Just(bounds))
        -> (f64, f64, f64)
    {
        (bounds.0, bounds.1, value as f64)
    }
}

proptest! {
    #[test]
    fn set_within_bounds_is_exact((min, max, value) in bounds_and_inner_value()) {
        let mut counter = BoundedCounter::in_memory(min, config(min, max));
        counter.set_value(value);
        prop_assert_eq!(counter.value(), value);
    }

    #[test]
    fn set_above_max_saturates_once(
        (min, max) in arbitrary_bounds(),
        excess in 1u32..1_000_000,
    ) {
        let mut counter = BoundedCounter::in_memory(min, config(min, max));
        let calls = Arc::new(AtomicUsize::new(0));
        counter.on_change(counting_listener(&calls));

        let target = max + excess as f64;
        counter.set_value(target);
        counter.set_value(target);

        prop_assert_eq!(counter.value(), max);
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_below_min_saturates(
        (min, max) in arbitrary_bounds(),
        deficit in 1u32..1_000_000,
    ) {
        let mut counter = BoundedCounter::in_memory(max, config(min, max));
        counter.set_value(min - deficit as f64);
        prop_assert_eq!(counter.value(), min);
    }

    #[test]
    fn increment_then_decrement_restores_value(
        start in -10_000i32..10_000,
        amount in 0i32..10_000,
    ) {
        let mut counter = BoundedCounter::in_memory(start as f64, config(-20_000.0, 20_000.0));
        let before = counter.value();

        counter.increment(amount as f64);
        counter.decrement(amount as f64);

        prop_assert_eq!(counter.value(), before);
    }

    #[test]
    fn value_stays_within_bounds(
        (min, max) in arbitrary_bounds(),
        steps in prop::collection::vec(-5_000i32..5_000, 1..50),
    ) {
        let mut counter = BoundedCounter::in_memory(0.0, config(min, max));

        for step in steps {
            if step >= 0 {
                counter.increment(step as f64);
            } else {
                counter.decrement(-step as f64);
            }
            prop_assert!(counter.value() >= min && counter.value() <= max);
        }
    }

    #[test]
    fn history_never_exceeds_cap(
        cap in 1usize..10,
        steps in 0usize..40,
    ) {
        let config = CounterConfig::builder()
            .max_history_length(cap)
            .persist_value(false)
            .build()
            .unwrap();
        let mut counter = BoundedCounter::in_memory(0.0, config);

        for _ in 0..steps {
            counter.step_up();
            prop_assert!(counter.history().unwrap().len() <= cap);
        }

        let history = counter.history().unwrap();
        prop_assert_eq!(history.len(), (steps + 1).min(cap));
        // Oldest survivor is the first entry not evicted
        if steps + 1 > cap {
            let evicted = steps + 1 - cap;
            prop_assert_eq!(history[0].new_value, evicted as f64);
        }
    }

    #[test]
    fn history_log_evicts_in_fifo_order(
        cap in 1usize..8,
        values in prop::collection::vec(-100i32..100, 1..30),
    ) {
        let mut log = HistoryLog::with_capacity(cap);
        for (i, value) in values.iter().enumerate() {
            log.record(HistoryEntry::new(Action::Set, i as f64, *value as f64));
        }

        let kept: Vec<f64> = log.iter().map(|e| e.new_value).collect();
        let expected: Vec<f64> = values
            .iter()
            .skip(values.len().saturating_sub(cap))
            .map(|v| *v as f64)
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn reset_records_negated_old_value(value in -1_000i32..1_000) {
        let mut counter = BoundedCounter::in_memory(value as f64, config(-2_000.0, 2_000.0));
        let old = counter.value();

        counter.reset(0.0);

        if old != 0.0 {
            let last = counter.history().unwrap().pop().unwrap();
            prop_assert_eq!(last.action, Action::Reset);
            prop_assert_eq!(last.diff, 0.0 - old);
        }
        prop_assert_eq!(counter.value(), 0.0);
    }

    #[test]
    fn persisted_value_survives_reconstruction(value in -1_000_000i64..1_000_000) {
        let medium = MemoryMedium::new();
        let config = CounterConfig::default();

        let mut first = BoundedCounter::new(0.0, config.clone(), PersistentStore::new(medium.clone()));
        first.set_value(value as f64);

        let second = BoundedCounter::new(0.0, config, PersistentStore::new(medium));
        prop_assert_eq!(second.value(), value as f64);
    }

    #[test]
    fn duplicate_subscription_fires_once(steps in 1usize..10) {
        let mut counter = BoundedCounter::in_memory(0.0, config(0.0, 100.0));
        let calls = Arc::new(AtomicUsize::new(0));
        let listener = counting_listener(&calls);

        counter.subscribe("change", Arc::clone(&listener)).unwrap();
        counter.subscribe("change", Arc::clone(&listener)).unwrap();

        for _ in 0..steps {
            counter.step_up();
        }

        prop_assert_eq!(calls.load(Ordering::SeqCst), steps);
    }

    #[test]
    fn history_entries_roundtrip_through_json(
        values in prop::collection::vec(-1_000i32..1_000, 0..10)
    ) {
        let entries: Vec<HistoryEntry> = values
            .windows(2)
            .map(|w| HistoryEntry::new(Action::Update, w[0] as f64, w[1] as f64))
            .collect();

        let json = serde_json::to_string(&entries).unwrap();
        let parsed: Vec<HistoryEntry> = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(entries, parsed);
    }
}
