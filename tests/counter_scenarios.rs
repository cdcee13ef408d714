//! End-to-end counter scenarios: persistence across instances,
//! namespace isolation and degraded storage.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tally::builder::CounterConfig;
use tally::core::Action;
use tally::counter::{BoundedCounter, HISTORY_KEY, VALUE_KEY};
use tally::events::{ChangeEvent, Listener};
use tally::storage::{
    JsonFileMedium, MemoryMedium, PersistentStore, StorageMedium, UnavailableMedium,
};

fn counting_listener(calls: &Arc<AtomicUsize>) -> Listener {
    let calls = Arc::clone(calls);
    Arc::new(move |_: &ChangeEvent| {
        calls.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn capped_history_keeps_latest_increments() {
    let config = CounterConfig::builder()
        .bounds(0.0, 10.0)
        .validate_bounds(true)
        .enable_history(true)
        .max_history_length(2)
        .build()
        .unwrap();
    let mut counter = BoundedCounter::in_memory(0.0, config);

    let values: Vec<f64> = (0..3).map(|_| counter.step_up()).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);

    let history = counter.history().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|e| e.action == Action::Increment));
    assert_eq!(history[0].old_value, 1.0);
    assert_eq!(history[0].new_value, 2.0);
    assert_eq!(history[1].old_value, 2.0);
    assert_eq!(history[1].new_value, 3.0);
}

#[test]
fn non_finite_set_changes_nothing() {
    let mut counter = BoundedCounter::in_memory(4.0, CounterConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    counter.on_change(counting_listener(&calls));
    let history_before = counter.history().unwrap();

    assert_eq!(counter.set_value(f64::NAN), 4.0);

    assert_eq!(counter.value(), 4.0);
    assert_eq!(counter.history().unwrap(), history_before);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn new_instance_restores_persisted_value() {
    let medium = MemoryMedium::new();
    let config = CounterConfig::default();

    let mut first = BoundedCounter::new(0.0, config.clone(), PersistentStore::new(medium.clone()));
    first.set_value(42.0);
    let saved_at = first.last_updated();

    let second = BoundedCounter::new(0.0, config, PersistentStore::new(medium));

    assert_eq!(second.value(), 42.0);
    assert_eq!(second.last_updated(), saved_at);
}

#[test]
fn restored_value_is_clamped_into_new_bounds() {
    let medium = MemoryMedium::new();

    let mut first = BoundedCounter::new(
        0.0,
        CounterConfig::default(),
        PersistentStore::new(medium.clone()),
    );
    first.set_value(500.0);

    let narrower = CounterConfig::builder().bounds(0.0, 100.0).build().unwrap();
    let second = BoundedCounter::new(0.0, narrower, PersistentStore::new(medium));

    assert_eq!(second.value(), 100.0);
}

#[test]
fn restored_history_continues_with_init_entry() {
    let medium = MemoryMedium::new();
    let config = CounterConfig::default();

    let mut first = BoundedCounter::new(0.0, config.clone(), PersistentStore::new(medium.clone()));
    first.step_up();
    first.step_up();

    let second = BoundedCounter::new(0.0, config, PersistentStore::new(medium));
    let actions: Vec<Action> = second
        .history()
        .unwrap()
        .iter()
        .map(|e| e.action)
        .collect();

    assert_eq!(
        actions,
        vec![Action::Init, Action::Increment, Action::Increment, Action::Init]
    );
}

#[test]
fn corrupt_persisted_value_keeps_initial_value() {
    let medium = MemoryMedium::new();
    let store = PersistentStore::new(medium.clone());
    medium
        .set(&format!("{}{}", store.namespace(), VALUE_KEY), "{\"value\": \"oops\"}")
        .unwrap();

    let counter = BoundedCounter::new(7.0, CounterConfig::default(), store);

    assert_eq!(counter.value(), 7.0);
}

#[test]
fn persisted_records_use_wrapper_format() {
    let medium = MemoryMedium::new();
    let mut counter = BoundedCounter::new(
        0.0,
        CounterConfig::default(),
        PersistentStore::with_namespace(medium.clone(), "widget_"),
    );
    counter.increment(3.0);

    let raw_value = medium.get("widget_value").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw_value).unwrap();
    assert_eq!(value["version"], "1.0");
    assert_eq!(value["value"]["value"], 3.0);
    assert!(value["value"]["lastUpdated"].is_string());

    let raw_history = medium.get("widget_history").unwrap().unwrap();
    let history: serde_json::Value = serde_json::from_str(&raw_history).unwrap();
    let entries = history["value"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["action"], "increment");
    assert_eq!(entries[1]["oldValue"], 0.0);
    assert_eq!(entries[1]["newValue"], 3.0);
    assert_eq!(entries[1]["diff"], 3.0);
}

#[test]
fn destroy_leaves_other_namespaces_intact() {
    let medium = MemoryMedium::new();
    let config = CounterConfig::default();

    let mut left = BoundedCounter::new(
        0.0,
        config.clone(),
        PersistentStore::with_namespace(medium.clone(), "left_"),
    );
    let mut right = BoundedCounter::new(
        0.0,
        config.clone(),
        PersistentStore::with_namespace(medium.clone(), "right_"),
    );
    left.set_value(1.0);
    right.set_value(2.0);

    left.destroy();

    let left_store = PersistentStore::with_namespace(medium.clone(), "left_");
    assert!(left_store.list_keys().is_empty());

    let right_store = PersistentStore::with_namespace(medium.clone(), "right_");
    let mut keys = right_store.list_keys();
    keys.sort();
    assert_eq!(keys, vec![HISTORY_KEY.to_string(), VALUE_KEY.to_string()]);

    let reloaded = BoundedCounter::new(
        0.0,
        config,
        PersistentStore::with_namespace(medium, "right_"),
    );
    assert_eq!(reloaded.value(), 2.0);
}

#[test]
fn listener_observes_updated_state() {
    let mut counter = BoundedCounter::in_memory(0.0, CounterConfig::default());
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    counter.on_change(Arc::new(move |event: &ChangeEvent| {
        sink.lock().unwrap().push((event.old_value, event.value));
    }));

    counter.step_up();
    counter.set_value(10.0);
    counter.step_down();

    assert_eq!(
        *observed.lock().unwrap(),
        vec![(0.0, 1.0), (1.0, 10.0), (10.0, 9.0)]
    );
}

#[test]
fn unavailable_storage_degrades_to_memory_only() {
    let mut counter = BoundedCounter::new(
        5.0,
        CounterConfig::default(),
        PersistentStore::new(UnavailableMedium),
    );

    counter.step_up();
    assert!(counter.clear_history());
    counter.step_up();

    assert_eq!(counter.value(), 7.0);
    assert_eq!(counter.history().unwrap().len(), 1);
    assert!(!counter.store().usage_info().supported);
}

#[test]
fn quota_exhaustion_does_not_block_mutation() {
    let medium = MemoryMedium::with_quota(120);
    let mut counter = BoundedCounter::new(0.0, CounterConfig::default(), PersistentStore::new(medium));

    for _ in 0..20 {
        counter.step_up();
    }

    assert_eq!(counter.value(), 20.0);
    assert_eq!(counter.history().unwrap().len(), 21);
}

#[test]
fn unbounded_mode_accepts_out_of_range_values() {
    let config = CounterConfig::builder()
        .bounds(0.0, 10.0)
        .validate_bounds(false)
        .build()
        .unwrap();
    let mut counter = BoundedCounter::in_memory(0.0, config);

    assert_eq!(counter.set_value(25.0), 25.0);
    assert_eq!(counter.decrement(40.0), -15.0);
}

#[test]
fn file_medium_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.json");
    let config = CounterConfig::default();

    {
        let mut counter = BoundedCounter::new(
            0.0,
            config.clone(),
            PersistentStore::new(JsonFileMedium::new(&path)),
        );
        counter.increment(12.0);
        counter.decrement(2.0);
    }

    let counter = BoundedCounter::new(0.0, config, PersistentStore::new(JsonFileMedium::new(&path)));

    assert_eq!(counter.value(), 10.0);
    let history = counter.history().unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[2].action, Action::Decrement);
}

#[test]
fn config_from_json_drives_counter() {
    let config = CounterConfig::from_json(
        r#"{"minValue": -1, "maxValue": 1, "persistValue": false, "maxHistoryLength": 5}"#,
    )
    .unwrap();
    let mut counter = BoundedCounter::in_memory(0.0, config);

    counter.increment(5.0);
    counter.decrement(5.0);

    assert_eq!(counter.value(), -1.0);
    assert!(counter.store().list_keys().is_empty());
}
